use std::fmt;

use crate::{
    ast::operator::BinaryOp,
    diagnostics::error_code::{
        ARITHMETIC_OVERFLOW, ARITY_MISMATCH, DIVISION_BY_ZERO, ErrorCode, MISSING_MEMBER,
        NOT_CALLABLE, TYPE_MISMATCH, UNHANDLED_JUMP, UNSUPPORTED_OPERATOR,
    },
};

/// Failure while executing a compiled function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The parallel evaluator was handed an operator it cannot combine.
    UnsupportedOperator { operator: BinaryOp },
    /// A checked operation overflowed its type.
    ArithmeticOverflow { operation: &'static str, ty: &'static str },
    DivisionByZero,
    TypeMismatch {
        operation: &'static str,
        expected: String,
        found: String,
    },
    NotCallable { found: &'static str },
    ArityMismatch { expected: usize, found: usize },
    MissingMember { member: String, type_name: String },
    UnhandledJump { label: String },
}

impl RuntimeError {
    pub fn error_code(&self) -> &'static ErrorCode {
        match self {
            RuntimeError::UnsupportedOperator { .. } => &UNSUPPORTED_OPERATOR,
            RuntimeError::ArithmeticOverflow { .. } => &ARITHMETIC_OVERFLOW,
            RuntimeError::DivisionByZero => &DIVISION_BY_ZERO,
            RuntimeError::TypeMismatch { .. } => &TYPE_MISMATCH,
            RuntimeError::NotCallable { .. } => &NOT_CALLABLE,
            RuntimeError::ArityMismatch { .. } => &ARITY_MISMATCH,
            RuntimeError::MissingMember { .. } => &MISSING_MEMBER,
            RuntimeError::UnhandledJump { .. } => &UNHANDLED_JUMP,
        }
    }

    pub(crate) fn type_mismatch(
        operation: &'static str,
        expected: impl fmt::Display,
        found: impl fmt::Display,
    ) -> Self {
        RuntimeError::TypeMismatch {
            operation,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.error_code();
        write!(f, "[{}] {}: ", code.code, code.title)?;
        match self {
            RuntimeError::UnsupportedOperator { operator } => {
                write!(f, "`{}` is not supported when running in parallel", operator)
            }
            RuntimeError::ArithmeticOverflow { operation, ty } => {
                write!(f, "checked {} overflowed {}", operation, ty)
            }
            RuntimeError::DivisionByZero => write!(f, "attempted to divide by zero"),
            RuntimeError::TypeMismatch {
                operation,
                expected,
                found,
            } => write!(f, "{} expected {}, found {}", operation, expected, found),
            RuntimeError::NotCallable { found } => write!(f, "{} is not a function", found),
            RuntimeError::ArityMismatch { expected, found } => write!(
                f,
                "function takes {} argument(s) but {} were supplied",
                expected, found
            ),
            RuntimeError::MissingMember { member, type_name } => {
                write!(f, "{} has no member `{}`", type_name, member)
            }
            RuntimeError::UnhandledJump { label } => {
                write!(f, "jump to `{}` escaped its function", label)
            }
        }?;
        if let Some(hint) = code.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}
