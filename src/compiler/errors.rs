use std::fmt;

use crate::{
    ast::ty::Ty,
    diagnostics::error_code::{
        CONSTANT_EVALUATION, ErrorCode, PURITY_VIOLATION, UNBOUND_PARAMETER,
        UNSUPPORTED_CONSTRUCT,
    },
    runtime::error::RuntimeError,
};

/// Failure while turning a function definition into a callable.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A node shape the engine does not accept in a function definition.
    UnsupportedConstruct {
        construct: &'static str,
        reason: &'static str,
    },
    /// Member access reading shared, mutable state under purity checking.
    PurityViolation {
        member: String,
        object_ty: Ty,
        member_ty: Ty,
    },
    /// A parameter used outside the lambda or block that declares it.
    UnboundParameter { name: String },
    /// `build_constant` failed to evaluate its expression.
    ConstantEvaluation(RuntimeError),
}

impl CompileError {
    pub fn error_code(&self) -> &'static ErrorCode {
        match self {
            CompileError::UnsupportedConstruct { .. } => &UNSUPPORTED_CONSTRUCT,
            CompileError::PurityViolation { .. } => &PURITY_VIOLATION,
            CompileError::UnboundParameter { .. } => &UNBOUND_PARAMETER,
            CompileError::ConstantEvaluation(_) => &CONSTANT_EVALUATION,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.error_code();
        write!(f, "[{}] {}: ", code.code, code.title)?;
        match self {
            CompileError::UnsupportedConstruct { construct, reason } => {
                write!(f, "`{}` {}", construct, reason)
            }
            CompileError::PurityViolation {
                member,
                object_ty,
                member_ty,
            } => write!(
                f,
                "cannot read `{}` ({}) from reference type {} in a pure function",
                member, member_ty, object_ty
            ),
            CompileError::UnboundParameter { name } => {
                write!(f, "`{}` is not declared by any enclosing lambda or block", name)
            }
            CompileError::ConstantEvaluation(err) => write!(f, "{}", err),
        }?;
        if let Some(hint) = code.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::ConstantEvaluation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RuntimeError> for CompileError {
    fn from(err: RuntimeError) -> Self {
        CompileError::ConstantEvaluation(err)
    }
}
