use crate::ast::expression::{Expression, Parameter};

/// AST folder (rewriter).
///
/// Every `fold_*` method receives an owned node and returns a (possibly
/// rewritten) owned node, or the folder's error. Defaults call the
/// corresponding `fold_*` free function which reconstructs the node after
/// folding its children. Infallible folders use
/// `std::convert::Infallible` as their error.
pub trait Folder {
    type Error;

    fn fold_expr(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
        fold_expr(self, expr)
    }

    fn fold_parameter(&mut self, parameter: Parameter) -> Result<Parameter, Self::Error> {
        Ok(parameter)
    }
}

// ---------------------------------------------------------------------------
// fold_* free functions – exhaustive destructuring so that adding a new
// field or variant causes a compile error until this code is updated.
// ---------------------------------------------------------------------------

pub fn fold_expr<F: Folder + ?Sized>(
    folder: &mut F,
    expr: Expression,
) -> Result<Expression, F::Error> {
    Ok(match expr {
        Expression::Constant { value, ty } => Expression::Constant { value, ty },
        Expression::Parameter(parameter) => Expression::Parameter(folder.fold_parameter(parameter)?),
        Expression::Unary { op, operand, ty } => Expression::Unary {
            op,
            operand: fold_boxed(folder, operand)?,
            ty,
        },
        Expression::Binary {
            op,
            left,
            right,
            ty,
        } => Expression::Binary {
            op,
            left: fold_boxed(folder, left)?,
            right: fold_boxed(folder, right)?,
            ty,
        },
        Expression::Conditional {
            test,
            if_true,
            if_false,
            ty,
        } => Expression::Conditional {
            test: fold_boxed(folder, test)?,
            if_true: fold_boxed(folder, if_true)?,
            if_false: fold_boxed(folder, if_false)?,
            ty,
        },
        Expression::Invoke {
            callee,
            arguments,
            ty,
        } => Expression::Invoke {
            callee: fold_boxed(folder, callee)?,
            arguments: fold_exprs(folder, arguments)?,
            ty,
        },
        Expression::Member { object, member, ty } => Expression::Member {
            object: fold_boxed(folder, object)?,
            member,
            ty,
        },
        Expression::Block {
            variables,
            expressions,
            ty,
        } => Expression::Block {
            variables: fold_parameters(folder, variables)?,
            expressions: fold_exprs(folder, expressions)?,
            ty,
        },
        Expression::Loop {
            body,
            break_label,
            continue_label,
            ty,
        } => Expression::Loop {
            body: fold_boxed(folder, body)?,
            break_label,
            continue_label,
            ty,
        },
        Expression::Label { target, default } => Expression::Label {
            target,
            default: default.map(|d| fold_boxed(folder, d)).transpose()?,
        },
        Expression::Goto {
            kind,
            target,
            value,
            ty,
        } => Expression::Goto {
            kind,
            target,
            value: value.map(|v| fold_boxed(folder, v)).transpose()?,
            ty,
        },
        Expression::Lambda {
            parameters,
            body,
            ty,
        } => Expression::Lambda {
            parameters: fold_parameters(folder, parameters)?,
            body: fold_boxed(folder, body)?,
            ty,
        },
        Expression::Assign { variable, value } => Expression::Assign {
            variable: folder.fold_parameter(variable)?,
            value: fold_boxed(folder, value)?,
        },
        Expression::Memoize {
            callee,
            argument,
            ty,
        } => Expression::Memoize {
            callee: fold_boxed(folder, callee)?,
            argument: fold_boxed(folder, argument)?,
            ty,
        },
        Expression::Parallel {
            op,
            left,
            right,
            ty,
        } => Expression::Parallel {
            op,
            left: fold_boxed(folder, left)?,
            right: fold_boxed(folder, right)?,
            ty,
        },
    })
}

pub fn fold_boxed<F: Folder + ?Sized>(
    folder: &mut F,
    expr: Box<Expression>,
) -> Result<Box<Expression>, F::Error> {
    folder.fold_expr(*expr).map(Box::new)
}

pub fn fold_exprs<F: Folder + ?Sized>(
    folder: &mut F,
    exprs: Vec<Expression>,
) -> Result<Vec<Expression>, F::Error> {
    exprs.into_iter().map(|e| folder.fold_expr(e)).collect()
}

fn fold_parameters<F: Folder + ?Sized>(
    folder: &mut F,
    parameters: Vec<Parameter>,
) -> Result<Vec<Parameter>, F::Error> {
    parameters
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect()
}
