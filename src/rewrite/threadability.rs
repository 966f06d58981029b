//! Structural test for splitting a binary operation across workers.
//!
//! Purely a shape and type check: it does not prove the two sides are free
//! of shared side effects. That is the purity checker's job.

use crate::ast::expression::Expression;

/// Whether both operands of a binary node may be evaluated concurrently.
///
/// Returns `false` for anything that is not a binary node.
pub fn is_threadable(expr: &Expression) -> bool {
    let Expression::Binary {
        op, left, right, ..
    } = expr
    else {
        return false;
    };
    op.is_parallelizable() && side_is_threadable(left) && side_is_threadable(right)
}

fn side_is_threadable(side: &Expression) -> bool {
    match side {
        Expression::Binary { .. } => is_threadable(side),
        Expression::Lambda { parameters, .. } => {
            parameters.iter().all(|p| p.ty.is_value_type())
                && side.ty().ret().is_some_and(|ret| ret.is_value_type())
        }
        Expression::Invoke { arguments, ty, .. } => {
            arguments.iter().all(|a| a.ty().is_value_type()) && ty.is_value_type()
        }
        _ => false,
    }
}
