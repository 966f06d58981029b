//! Recursion rewriting.
//!
//! A function definition's body refers to itself through a *placeholder*
//! parameter. The rewriter replaces every placeholder reference with the
//! *bound* self variable and, depending on [`RewriteOptions`], routes
//! single-argument invocations through the memoization cache, splits
//! threadable binary operations across workers and rejects member reads
//! that could observe shared mutable state.

pub mod threadability;

use crate::{
    ast::{
        expression::{Expression, Parameter},
        fold::{self, Folder},
        operator::{BinaryOp, UnaryOp},
        ty::Ty,
    },
    compiler::errors::CompileError,
};

pub use threadability::is_threadable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteOptions {
    /// Wrap single-argument invocations in a cache lookup.
    pub caching: bool,
    /// Evaluate threadable binary operations with the parallel evaluator.
    pub threading: bool,
    /// Reject member reads of non-pure members on reference types.
    pub purity_checking: bool,
    /// Skip the purity check when `caching` is off.
    pub allow_impure_without_caching: bool,
}

impl RewriteOptions {
    /// Options used by the optimizing builders: purity checking always on.
    pub fn optimized(caching: bool, threading: bool) -> Self {
        Self {
            caching,
            threading,
            purity_checking: true,
            allow_impure_without_caching: false,
        }
    }

    pub fn with_allow_impure_without_caching(mut self, allow: bool) -> Self {
        self.allow_impure_without_caching = allow;
        self
    }
}

pub struct Rewriter<'a> {
    placeholder: &'a Parameter,
    bound: &'a Parameter,
    options: RewriteOptions,
}

impl<'a> Rewriter<'a> {
    pub fn new(placeholder: &'a Parameter, bound: &'a Parameter, options: RewriteOptions) -> Self {
        Self {
            placeholder,
            bound,
            options,
        }
    }

    pub fn rewrite(&mut self, body: Expression) -> Result<Expression, CompileError> {
        self.fold_expr(body)
    }

    fn rewrite_invoke(
        &mut self,
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        ty: Ty,
    ) -> Result<Expression, CompileError> {
        let callee = fold::fold_boxed(self, callee)?;
        match <[Expression; 1]>::try_from(arguments) {
            Ok([argument]) if self.options.caching => {
                let argument = self.fold_expr(argument)?;
                log::trace!("memoizing call of {}", callee);
                Ok(Expression::convert(
                    Expression::Memoize {
                        callee,
                        argument: Box::new(argument),
                        ty: Ty::Object,
                    },
                    ty,
                ))
            }
            Ok(arguments) => Ok(Expression::Invoke {
                callee,
                arguments: fold::fold_exprs(self, arguments.into())?,
                ty,
            }),
            Err(arguments) => Ok(Expression::Invoke {
                callee,
                arguments: fold::fold_exprs(self, arguments)?,
                ty,
            }),
        }
    }

    fn rewrite_binary(
        &mut self,
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: Ty,
        threadable: bool,
    ) -> Result<Expression, CompileError> {
        let both_invocations = left.is_invoke() && right.is_invoke();
        let left = fold::fold_boxed(self, left)?;
        let right = fold::fold_boxed(self, right)?;
        if threadable && both_invocations && is_work_unit(&left) && is_work_unit(&right) {
            log::trace!("evaluating ({} {} {}) on the worker pool", op, left, right);
            return Ok(Expression::convert(
                Expression::Parallel {
                    op,
                    left: Box::new(strip_conversion(*left)),
                    right: Box::new(strip_conversion(*right)),
                    ty: Ty::Object,
                },
                ty,
            ));
        }
        Ok(Expression::Binary {
            op,
            left,
            right,
            ty,
        })
    }

    fn check_member(&self, object: &Expression, member: &str, ty: &Ty) -> Result<(), CompileError> {
        if !self.options.purity_checking
            || object.ty().is_value_type()
            || ty.is_pure_func()
            || (self.options.allow_impure_without_caching && !self.options.caching)
        {
            return Ok(());
        }
        Err(CompileError::PurityViolation {
            member: member.to_string(),
            object_ty: object.ty().clone(),
            member_ty: ty.clone(),
        })
    }
}

impl Folder for Rewriter<'_> {
    type Error = CompileError;

    fn fold_parameter(&mut self, parameter: Parameter) -> Result<Parameter, CompileError> {
        if &parameter == self.placeholder {
            Ok(self.bound.clone())
        } else {
            Ok(parameter)
        }
    }

    fn fold_expr(&mut self, expr: Expression) -> Result<Expression, CompileError> {
        let threadable = self.options.threading && is_threadable(&expr);
        match expr {
            Expression::Invoke {
                callee,
                arguments,
                ty,
            } => self.rewrite_invoke(callee, arguments, ty),
            Expression::Binary {
                op,
                left,
                right,
                ty,
            } => self.rewrite_binary(op, left, right, ty, threadable),
            Expression::Member { object, member, ty } => {
                self.check_member(&object, &member, &ty)?;
                Ok(Expression::Member {
                    object: fold::fold_boxed(self, object)?,
                    member,
                    ty,
                })
            }
            Expression::Memoize { .. } | Expression::Parallel { .. } => {
                Err(CompileError::UnsupportedConstruct {
                    construct: expr.kind_name(),
                    reason: "is produced by rewriting and cannot appear in a definition",
                })
            }
            other => fold::fold_expr(self, other),
        }
    }
}

/// Rewritten operand that can be handed to the parallel evaluator as is,
/// possibly behind a single conversion.
fn is_work_unit(expr: &Expression) -> bool {
    match expr {
        Expression::Invoke { .. } | Expression::Memoize { .. } => true,
        Expression::Unary {
            op: UnaryOp::Convert,
            operand,
            ..
        } => matches!(
            operand.as_ref(),
            Expression::Invoke { .. } | Expression::Memoize { .. }
        ),
        _ => false,
    }
}

fn strip_conversion(expr: Expression) -> Expression {
    match expr {
        Expression::Unary {
            op: UnaryOp::Convert,
            operand,
            ..
        } => *operand,
        other => other,
    }
}
