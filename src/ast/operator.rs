use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Negate,
    NegateChecked,
    Not,
    /// Conversion to the node's declared type. Numeric targets wrap.
    Convert,
    /// Numeric conversion that fails instead of wrapping.
    ConvertChecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    And,
    AndAlso,
    Or,
    OrElse,
    ExclusiveOr,
    LeftShift,
    RightShift,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    /// Operators the parallel evaluator knows how to combine.
    pub fn is_parallelizable(self) -> bool {
        !matches!(
            self,
            BinaryOp::Modulo | BinaryOp::LeftShift | BinaryOp::RightShift
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::Equal
                | BinaryOp::NotEqual
        )
    }

    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }

    pub fn is_checked(self) -> bool {
        matches!(
            self,
            BinaryOp::AddChecked | BinaryOp::SubtractChecked | BinaryOp::MultiplyChecked
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::AddChecked => "+!",
            BinaryOp::Subtract => "-",
            BinaryOp::SubtractChecked => "-!",
            BinaryOp::Multiply => "*",
            BinaryOp::MultiplyChecked => "*!",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::And => "&",
            BinaryOp::AndAlso => "&&",
            BinaryOp::Or => "|",
            BinaryOp::OrElse => "||",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "neg",
            UnaryOp::NegateChecked => "neg!",
            UnaryOp::Not => "not",
            UnaryOp::Convert => "convert",
            UnaryOp::ConvertChecked => "convert!",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
