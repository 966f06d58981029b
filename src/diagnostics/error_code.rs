//! Error code registry shared by compile-time and runtime errors.

/// Distinguishes between compile-time and runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Compiler,
    Runtime,
}

impl ErrorType {
    /// Returns the prefix string used in error headers
    pub fn prefix(&self) -> &'static str {
        match self {
            ErrorType::Compiler => "Compiler error",
            ErrorType::Runtime => "Runtime error",
        }
    }
}

/// Stable error code with a short title and an optional fix-it hint.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCode {
    pub code: &'static str,
    pub title: &'static str,
    pub error_type: ErrorType,
    pub hint: Option<&'static str>,
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ErrorCode {}

pub const UNSUPPORTED_CONSTRUCT: ErrorCode = ErrorCode {
    code: "E001",
    title: "UNSUPPORTED CONSTRUCT",
    error_type: ErrorType::Compiler,
    hint: Some("Only lambdas built from the supported expression shapes can be compiled"),
};
pub const PURITY_VIOLATION: ErrorCode = ErrorCode {
    code: "E002",
    title: "PURITY VIOLATION",
    error_type: ErrorType::Compiler,
    hint: Some("Read the state through a value type or a pure function wrapper"),
};
pub const UNBOUND_PARAMETER: ErrorCode = ErrorCode {
    code: "E003",
    title: "UNBOUND PARAMETER",
    error_type: ErrorType::Compiler,
    hint: None,
};
pub const CONSTANT_EVALUATION: ErrorCode = ErrorCode {
    code: "E004",
    title: "CONSTANT EVALUATION FAILED",
    error_type: ErrorType::Compiler,
    hint: None,
};

pub const UNSUPPORTED_OPERATOR: ErrorCode = ErrorCode {
    code: "E101",
    title: "UNSUPPORTED OPERATOR",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const ARITHMETIC_OVERFLOW: ErrorCode = ErrorCode {
    code: "E102",
    title: "ARITHMETIC OVERFLOW",
    error_type: ErrorType::Runtime,
    hint: Some("Use the unchecked operator if wrapping is intended"),
};
pub const DIVISION_BY_ZERO: ErrorCode = ErrorCode {
    code: "E103",
    title: "DIVISION BY ZERO",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E104",
    title: "TYPE MISMATCH",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const NOT_CALLABLE: ErrorCode = ErrorCode {
    code: "E105",
    title: "NOT CALLABLE",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const ARITY_MISMATCH: ErrorCode = ErrorCode {
    code: "E106",
    title: "ARITY MISMATCH",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const MISSING_MEMBER: ErrorCode = ErrorCode {
    code: "E107",
    title: "MISSING MEMBER",
    error_type: ErrorType::Runtime,
    hint: None,
};
pub const UNHANDLED_JUMP: ErrorCode = ErrorCode {
    code: "E108",
    title: "UNHANDLED JUMP",
    error_type: ErrorType::Runtime,
    hint: Some("A goto must target a label inside the same lambda"),
};

pub const ERROR_CODES: &[ErrorCode] = &[
    UNSUPPORTED_CONSTRUCT,
    PURITY_VIOLATION,
    UNBOUND_PARAMETER,
    CONSTANT_EVALUATION,
    UNSUPPORTED_OPERATOR,
    ARITHMETIC_OVERFLOW,
    DIVISION_BY_ZERO,
    TYPE_MISMATCH,
    NOT_CALLABLE,
    ARITY_MISMATCH,
    MISSING_MEMBER,
    UNHANDLED_JUMP,
];

pub fn lookup_error_code(code: &str) -> Option<&'static ErrorCode> {
    ERROR_CODES.iter().find(|item| item.code == code)
}
