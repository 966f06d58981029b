use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

use crate::{
    ast::{
        operator::{BinaryOp, UnaryOp},
        ty::Ty,
    },
    runtime::value::Value,
};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

fn next_id() -> u32 {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A named, typed variable: lambda parameter or block variable.
///
/// Ids are process-unique, so two parameters with the same name and type are
/// still distinct variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    pub id: u32,
    pub name: String,
    pub ty: Ty,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            ty,
        }
    }

    /// A fresh variable with the same name and type.
    pub fn fresh_like(&self) -> Self {
        Self::new(self.name.clone(), self.ty.clone())
    }
}

/// Jump target referenced by `Label`, `Goto` and `Loop` nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LabelTarget {
    pub id: u32,
    pub name: String,
    pub ty: Ty,
}

impl LabelTarget {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expression {
    Constant {
        value: Value,
        ty: Ty,
    },
    Parameter(Parameter),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        ty: Ty,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: Ty,
    },
    Conditional {
        test: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        ty: Ty,
    },
    Invoke {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        ty: Ty,
    },
    Member {
        object: Box<Expression>,
        member: String,
        ty: Ty,
    },
    Block {
        variables: Vec<Parameter>,
        expressions: Vec<Expression>,
        ty: Ty,
    },
    Loop {
        body: Box<Expression>,
        break_label: Option<LabelTarget>,
        continue_label: Option<LabelTarget>,
        ty: Ty,
    },
    Label {
        target: LabelTarget,
        default: Option<Box<Expression>>,
    },
    Goto {
        kind: GotoKind,
        target: LabelTarget,
        value: Option<Box<Expression>>,
        ty: Ty,
    },
    Lambda {
        parameters: Vec<Parameter>,
        body: Box<Expression>,
        ty: Ty,
    },
    Assign {
        variable: Parameter,
        value: Box<Expression>,
    },
    /// Cache lookup of `callee(argument)`, computing it on a miss.
    Memoize {
        callee: Box<Expression>,
        argument: Box<Expression>,
        ty: Ty,
    },
    /// Both operand invocations evaluated as independent units of work,
    /// then combined with `op`.
    Parallel {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: Ty,
    },
}

impl Expression {
    /// Declared static type of this node.
    pub fn ty(&self) -> &Ty {
        match self {
            Expression::Constant { ty, .. }
            | Expression::Unary { ty, .. }
            | Expression::Binary { ty, .. }
            | Expression::Conditional { ty, .. }
            | Expression::Invoke { ty, .. }
            | Expression::Member { ty, .. }
            | Expression::Block { ty, .. }
            | Expression::Loop { ty, .. }
            | Expression::Goto { ty, .. }
            | Expression::Lambda { ty, .. }
            | Expression::Memoize { ty, .. }
            | Expression::Parallel { ty, .. } => ty,
            Expression::Parameter(parameter) => &parameter.ty,
            Expression::Label { target, .. } => &target.ty,
            Expression::Assign { variable, .. } => &variable.ty,
        }
    }

    /// Short node-kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Constant { .. } => "constant",
            Expression::Parameter(_) => "parameter",
            Expression::Unary { .. } => "unary",
            Expression::Binary { .. } => "binary",
            Expression::Conditional { .. } => "conditional",
            Expression::Invoke { .. } => "invoke",
            Expression::Member { .. } => "member",
            Expression::Block { .. } => "block",
            Expression::Loop { .. } => "loop",
            Expression::Label { .. } => "label",
            Expression::Goto { .. } => "goto",
            Expression::Lambda { .. } => "lambda",
            Expression::Assign { .. } => "assign",
            Expression::Memoize { .. } => "memoize",
            Expression::Parallel { .. } => "parallel",
        }
    }

    pub fn is_invoke(&self) -> bool {
        matches!(self, Expression::Invoke { .. })
    }

    // -----------------------------------------------------------------------
    // Constructors. Result types are derived from the operands the same way
    // a typed front end would assign them.
    // -----------------------------------------------------------------------

    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = value.static_ty();
        Expression::Constant { value, ty }
    }

    pub fn constant_typed(value: impl Into<Value>, ty: Ty) -> Self {
        Expression::Constant {
            value: value.into(),
            ty,
        }
    }

    pub fn parameter(parameter: &Parameter) -> Self {
        Expression::Parameter(parameter.clone())
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        let ty = match op {
            UnaryOp::Not if operand.ty() == &Ty::Bool => Ty::Bool,
            _ => operand.ty().clone(),
        };
        Expression::Unary {
            op,
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn convert(operand: Expression, ty: Ty) -> Self {
        Expression::Unary {
            op: UnaryOp::Convert,
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn convert_checked(operand: Expression, ty: Ty) -> Self {
        Expression::Unary {
            op: UnaryOp::ConvertChecked,
            operand: Box::new(operand),
            ty,
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        let ty = if op.is_comparison() {
            Ty::Bool
        } else {
            left.ty().clone()
        };
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }

    pub fn add(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn add_checked(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::AddChecked, left, right)
    }

    pub fn subtract(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Subtract, left, right)
    }

    pub fn multiply(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Multiply, left, right)
    }

    pub fn multiply_checked(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::MultiplyChecked, left, right)
    }

    pub fn less_than_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::LessThanOrEqual, left, right)
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Equal, left, right)
    }

    pub fn condition(test: Expression, if_true: Expression, if_false: Expression) -> Self {
        let ty = if_true.ty().clone();
        Expression::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            ty,
        }
    }

    pub fn invoke(callee: Expression, arguments: Vec<Expression>) -> Self {
        let ty = callee.ty().ret().cloned().unwrap_or(Ty::Object);
        Expression::Invoke {
            callee: Box::new(callee),
            arguments,
            ty,
        }
    }

    /// `callee(argument)`.
    pub fn call(callee: Expression, argument: Expression) -> Self {
        Self::invoke(callee, vec![argument])
    }

    pub fn member(object: Expression, member: impl Into<String>, ty: Ty) -> Self {
        Expression::Member {
            object: Box::new(object),
            member: member.into(),
            ty,
        }
    }

    pub fn block(variables: Vec<Parameter>, expressions: Vec<Expression>) -> Self {
        let ty = expressions
            .last()
            .map(|e| e.ty().clone())
            .unwrap_or(Ty::Unit);
        Expression::Block {
            variables,
            expressions,
            ty,
        }
    }

    pub fn loop_with(
        body: Expression,
        break_label: Option<LabelTarget>,
        continue_label: Option<LabelTarget>,
    ) -> Self {
        let ty = break_label
            .as_ref()
            .map(|l| l.ty.clone())
            .unwrap_or(Ty::Unit);
        Expression::Loop {
            body: Box::new(body),
            break_label,
            continue_label,
            ty,
        }
    }

    pub fn label(target: &LabelTarget, default: Option<Expression>) -> Self {
        Expression::Label {
            target: target.clone(),
            default: default.map(Box::new),
        }
    }

    pub fn goto(kind: GotoKind, target: &LabelTarget, value: Option<Expression>) -> Self {
        Expression::Goto {
            kind,
            target: target.clone(),
            value: value.map(Box::new),
            ty: Ty::Unit,
        }
    }

    pub fn lambda(parameters: Vec<Parameter>, body: Expression) -> Self {
        let ty = Ty::func(
            parameters.iter().map(|p| p.ty.clone()).collect(),
            body.ty().clone(),
        );
        Expression::Lambda {
            parameters,
            body: Box::new(body),
            ty,
        }
    }

    pub fn assign(variable: &Parameter, value: Expression) -> Self {
        Expression::Assign {
            variable: variable.clone(),
            value: Box::new(value),
        }
    }
}
