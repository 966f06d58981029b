//! Sequential operator semantics over runtime values.
//!
//! Operands of a binary operator must share a runtime type. Unchecked integer
//! arithmetic wraps; the checked variants report `ArithmeticOverflow`.

use std::cmp::Ordering;

use crate::{
    ast::{
        operator::{BinaryOp, UnaryOp},
        ty::Ty,
    },
    runtime::{error::RuntimeError, value::Value},
};

macro_rules! integer_op {
    ($op:expr, $l:expr, $r:expr, $variant:ident, $ty:literal) => {{
        let (l, r) = ($l, $r);
        let overflow =
            |operation: &'static str| RuntimeError::ArithmeticOverflow { operation, ty: $ty };
        let value = match $op {
            BinaryOp::Add => l.wrapping_add(r),
            BinaryOp::AddChecked => l.checked_add(r).ok_or_else(|| overflow("add"))?,
            BinaryOp::Subtract => l.wrapping_sub(r),
            BinaryOp::SubtractChecked => l.checked_sub(r).ok_or_else(|| overflow("subtract"))?,
            BinaryOp::Multiply => l.wrapping_mul(r),
            BinaryOp::MultiplyChecked => {
                l.checked_mul(r).ok_or_else(|| overflow("multiply"))?
            }
            BinaryOp::Divide | BinaryOp::Modulo if r == 0 => {
                return Err(RuntimeError::DivisionByZero);
            }
            BinaryOp::Divide => l.checked_div(r).ok_or_else(|| overflow("divide"))?,
            BinaryOp::Modulo => l.checked_rem(r).ok_or_else(|| overflow("modulo"))?,
            BinaryOp::And => l & r,
            BinaryOp::Or => l | r,
            BinaryOp::ExclusiveOr => l ^ r,
            BinaryOp::LeftShift => l.wrapping_shl(r as u32),
            BinaryOp::RightShift => l.wrapping_shr(r as u32),
            other => return Err(RuntimeError::type_mismatch(other.symbol(), "bool", $ty)),
        };
        Ok(Value::$variant(value))
    }};
}

/// Applies `op` to two already-evaluated operands.
///
/// `AndAlso`/`OrElse` are treated as their eager counterparts here; callers
/// that need short-circuiting must not evaluate the right operand first.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if op.is_comparison() {
        return compare(op, left, right).map(Value::Bool);
    }

    match (left, right) {
        (Value::Int32(l), Value::Int32(r)) => integer_op!(op, *l, *r, Int32, "i32"),
        (Value::Int64(l), Value::Int64(r)) => integer_op!(op, *l, *r, Int64, "i64"),
        (Value::UInt64(l), Value::UInt64(r)) => integer_op!(op, *l, *r, UInt64, "u64"),
        (Value::Float64(l), Value::Float64(r)) => {
            let (l, r) = (*l, *r);
            let value = match op {
                BinaryOp::Add | BinaryOp::AddChecked => l + r,
                BinaryOp::Subtract | BinaryOp::SubtractChecked => l - r,
                BinaryOp::Multiply | BinaryOp::MultiplyChecked => l * r,
                BinaryOp::Divide => l / r,
                BinaryOp::Modulo => l % r,
                other => return Err(RuntimeError::type_mismatch(other.symbol(), "integer", "f64")),
            };
            Ok(Value::Float64(value))
        }
        (Value::Bool(l), Value::Bool(r)) => {
            let (l, r) = (*l, *r);
            let value = match op {
                BinaryOp::And | BinaryOp::AndAlso => l && r,
                BinaryOp::Or | BinaryOp::OrElse => l || r,
                BinaryOp::ExclusiveOr => l ^ r,
                other => return Err(RuntimeError::type_mismatch(other.symbol(), "number", "bool")),
            };
            Ok(Value::Bool(value))
        }
        _ => Err(RuntimeError::type_mismatch(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    if left.type_name() != right.type_name() {
        return Err(RuntimeError::type_mismatch(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        ));
    }

    match op {
        BinaryOp::Equal => return Ok(left == right),
        BinaryOp::NotEqual => return Ok(left != right),
        _ => {}
    }

    let ordering = match (left, right) {
        (Value::Int32(l), Value::Int32(r)) => l.partial_cmp(r),
        (Value::Int64(l), Value::Int64(r)) => l.partial_cmp(r),
        (Value::UInt64(l), Value::UInt64(r)) => l.partial_cmp(r),
        (Value::Float64(l), Value::Float64(r)) => l.partial_cmp(r),
        _ => {
            return Err(RuntimeError::type_mismatch(
                op.symbol(),
                "number",
                left.type_name(),
            ));
        }
    };

    // NaN compares false with every ordering operator.
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        BinaryOp::LessThan => ordering == Ordering::Less,
        BinaryOp::LessThanOrEqual => ordering != Ordering::Greater,
        BinaryOp::GreaterThan => ordering == Ordering::Greater,
        BinaryOp::GreaterThanOrEqual => ordering != Ordering::Less,
        _ => unreachable!("equality handled above"),
    })
}

/// Applies a unary operator. `ty` is the node's declared result type and is
/// the target of conversions.
pub fn unary(op: UnaryOp, operand: &Value, ty: &Ty) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Negate | UnaryOp::NegateChecked => negate(operand, op == UnaryOp::NegateChecked),
        UnaryOp::Not => match operand {
            Value::Bool(v) => Ok(Value::Bool(!v)),
            Value::Int32(v) => Ok(Value::Int32(!v)),
            Value::Int64(v) => Ok(Value::Int64(!v)),
            Value::UInt64(v) => Ok(Value::UInt64(!v)),
            other => Err(RuntimeError::type_mismatch(
                "not",
                "bool or integer",
                other.type_name(),
            )),
        },
        UnaryOp::Convert => convert(operand, ty, false),
        UnaryOp::ConvertChecked => convert(operand, ty, true),
    }
}

fn negate(operand: &Value, checked: bool) -> Result<Value, RuntimeError> {
    let overflow = |ty| RuntimeError::ArithmeticOverflow {
        operation: "negate",
        ty,
    };
    match operand {
        Value::Int32(v) if checked => v.checked_neg().map(Value::Int32).ok_or(overflow("i32")),
        Value::Int32(v) => Ok(Value::Int32(v.wrapping_neg())),
        Value::Int64(v) if checked => v.checked_neg().map(Value::Int64).ok_or(overflow("i64")),
        Value::Int64(v) => Ok(Value::Int64(v.wrapping_neg())),
        Value::UInt64(v) if checked => v.checked_neg().map(Value::UInt64).ok_or(overflow("u64")),
        Value::UInt64(v) => Ok(Value::UInt64(v.wrapping_neg())),
        Value::Float64(v) => Ok(Value::Float64(-v)),
        other => Err(RuntimeError::type_mismatch(
            "negate",
            "number",
            other.type_name(),
        )),
    }
}

enum Numeric {
    Integer(i128),
    Float(f64),
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Int32(v) => Some(Numeric::Integer(*v as i128)),
        Value::Int64(v) => Some(Numeric::Integer(*v as i128)),
        Value::UInt64(v) => Some(Numeric::Integer(*v as i128)),
        Value::Float64(v) => Some(Numeric::Float(*v)),
        _ => None,
    }
}

macro_rules! to_integer {
    ($num:expr, $checked:expr, $rust:ty, $variant:ident, $name:literal) => {{
        let overflow = RuntimeError::ArithmeticOverflow {
            operation: "convert",
            ty: $name,
        };
        let value = match $num {
            Numeric::Integer(i) if $checked => <$rust>::try_from(i).map_err(|_| overflow)?,
            Numeric::Integer(i) => i as $rust,
            Numeric::Float(f) if $checked => {
                let t = f.trunc();
                let (min, max) = (<$rust>::MIN as f64, <$rust>::MAX as f64);
                if !f.is_finite() || t < min || t > max {
                    return Err(overflow);
                }
                t as $rust
            }
            Numeric::Float(f) => f as $rust,
        };
        Ok(Value::$variant(value))
    }};
}

/// Converts `value` to `ty`. Non-numeric targets only check conformance.
pub fn convert(value: &Value, ty: &Ty, checked: bool) -> Result<Value, RuntimeError> {
    if value.conforms_to(ty) {
        return Ok(value.clone());
    }
    let Some(num) = ty.is_numeric().then(|| numeric(value)).flatten() else {
        return Err(RuntimeError::type_mismatch(
            "convert",
            ty,
            value.type_name(),
        ));
    };
    match ty {
        Ty::Int32 => to_integer!(num, checked, i32, Int32, "i32"),
        Ty::Int64 => to_integer!(num, checked, i64, Int64, "i64"),
        Ty::UInt64 => to_integer!(num, checked, u64, UInt64, "u64"),
        Ty::Float64 => Ok(Value::Float64(match num {
            Numeric::Integer(i) => i as f64,
            Numeric::Float(f) => f,
        })),
        _ => unreachable!("is_numeric covers every numeric type"),
    }
}
