use std::convert::Infallible;

use crate::{
    ast::{
        expression::Expression,
        fold::{self, Folder},
        operator::UnaryOp,
        ty::Ty,
    },
    runtime::{ops, value::Value},
};

/// One simplification pass, bottom-up:
/// - Identity conversions: `(convert T x)` where `x : T` → `x`
/// - Unary and binary operators over constants are evaluated
///   (skipped when evaluation fails, so the failure still happens at run time)
/// - Conditionals with a constant test → the taken branch
/// - Variable-free blocks holding a single non-label expression → that expression
struct Reducer {
    changed: bool,
}

impl Reducer {
    fn folded(&mut self, value: Value, ty: Ty) -> Expression {
        self.changed = true;
        Expression::Constant { value, ty }
    }
}

impl Folder for Reducer {
    type Error = Infallible;

    fn fold_expr(&mut self, expr: Expression) -> Result<Expression, Infallible> {
        // Fold children first (bottom-up)
        let expr = fold::fold_expr(self, expr)?;

        Ok(match expr {
            Expression::Unary {
                op: UnaryOp::Convert | UnaryOp::ConvertChecked,
                operand,
                ty,
            } if operand.ty() == &ty => {
                self.changed = true;
                *operand
            }
            Expression::Unary { op, operand, ty } => {
                let value = match operand.as_ref() {
                    Expression::Constant { value, .. } => ops::unary(op, value, &ty).ok(),
                    _ => None,
                };
                match value {
                    Some(value) if value.conforms_to(&ty) => self.folded(value, ty),
                    _ => Expression::Unary { op, operand, ty },
                }
            }
            Expression::Binary {
                op,
                left,
                right,
                ty,
            } => {
                let value = match (left.as_ref(), right.as_ref()) {
                    (Expression::Constant { value: l, .. }, Expression::Constant { value: r, .. }) => {
                        ops::binary(op, l, r).ok()
                    }
                    _ => None,
                };
                match value {
                    Some(value) if value.conforms_to(&ty) => self.folded(value, ty),
                    _ => Expression::Binary {
                        op,
                        left,
                        right,
                        ty,
                    },
                }
            }
            Expression::Conditional {
                test,
                if_true,
                if_false,
                ty,
            } => {
                let decided = match test.as_ref() {
                    Expression::Constant {
                        value: Value::Bool(b),
                        ..
                    } => Some(*b),
                    _ => None,
                };
                match decided {
                    Some(true) if if_true.ty() == &ty => {
                        self.changed = true;
                        *if_true
                    }
                    Some(false) if if_false.ty() == &ty => {
                        self.changed = true;
                        *if_false
                    }
                    _ => Expression::Conditional {
                        test,
                        if_true,
                        if_false,
                        ty,
                    },
                }
            }
            Expression::Block {
                variables,
                mut expressions,
                ty,
            } => {
                let inlinable = variables.is_empty()
                    && matches!(
                        expressions.as_slice(),
                        [only] if !matches!(only, Expression::Label { .. }) && only.ty() == &ty
                    );
                match expressions.pop() {
                    Some(only) if inlinable => {
                        self.changed = true;
                        only
                    }
                    last => {
                        expressions.extend(last);
                        Expression::Block {
                            variables,
                            expressions,
                            ty,
                        }
                    }
                }
            }
            other => other,
        })
    }
}

/// Applies simplification passes until one leaves the tree unchanged.
pub fn reduce(expr: Expression) -> Expression {
    let mut expr = expr;
    let mut passes = 0usize;
    loop {
        let mut reducer = Reducer { changed: false };
        let next = match reducer.fold_expr(expr) {
            Ok(next) => next,
            Err(never) => match never {},
        };
        passes += 1;
        if !reducer.changed {
            log::trace!("reduction reached a fixpoint after {} pass(es)", passes);
            return next;
        }
        expr = next;
    }
}
