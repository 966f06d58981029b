use crate::ast::expression::{Expression, Parameter};

/// Read-only AST visitor.
///
/// Every `visit_*` method has a default that calls the corresponding `walk_*`
/// free function, which recurses into child nodes. Override a method to
/// intercept a node; call `walk_*` from within your override to continue
/// the traversal.
pub trait Visitor<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expression) {
        walk_expr(self, expr);
    }

    fn visit_parameter(&mut self, _parameter: &'ast Parameter) {}
}

// ---------------------------------------------------------------------------
// walk_* free functions – exhaustive destructuring so that adding a new
// field or variant causes a compile error until this code is updated.
// ---------------------------------------------------------------------------

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Constant { value: _, ty: _ } => {}
        Expression::Parameter(parameter) => visitor.visit_parameter(parameter),
        Expression::Unary {
            op: _,
            operand,
            ty: _,
        } => visitor.visit_expr(operand),
        Expression::Binary {
            op: _,
            left,
            right,
            ty: _,
        }
        | Expression::Parallel {
            op: _,
            left,
            right,
            ty: _,
        } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expression::Conditional {
            test,
            if_true,
            if_false,
            ty: _,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(if_true);
            visitor.visit_expr(if_false);
        }
        Expression::Invoke {
            callee,
            arguments,
            ty: _,
        } => {
            visitor.visit_expr(callee);
            for argument in arguments {
                visitor.visit_expr(argument);
            }
        }
        Expression::Member {
            object,
            member: _,
            ty: _,
        } => visitor.visit_expr(object),
        Expression::Block {
            variables,
            expressions,
            ty: _,
        } => {
            for variable in variables {
                visitor.visit_parameter(variable);
            }
            for expression in expressions {
                visitor.visit_expr(expression);
            }
        }
        Expression::Loop {
            body,
            break_label: _,
            continue_label: _,
            ty: _,
        } => visitor.visit_expr(body),
        Expression::Label { target: _, default } => {
            if let Some(default) = default {
                visitor.visit_expr(default);
            }
        }
        Expression::Goto {
            kind: _,
            target: _,
            value,
            ty: _,
        } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Expression::Lambda {
            parameters,
            body,
            ty: _,
        } => {
            for parameter in parameters {
                visitor.visit_parameter(parameter);
            }
            visitor.visit_expr(body);
        }
        Expression::Assign { variable, value } => {
            visitor.visit_parameter(variable);
            visitor.visit_expr(value);
        }
        Expression::Memoize {
            callee,
            argument,
            ty: _,
        } => {
            visitor.visit_expr(callee);
            visitor.visit_expr(argument);
        }
    }
}
