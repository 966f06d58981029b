use std::fmt;

use crate::ast::{
    expression::{Expression, GotoKind},
    operator::UnaryOp,
};

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

/// S-expression rendering. Parameters print by name only, so renderings of
/// structurally equal trees are equal.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant { value, .. } => write!(f, "{}", value),
            Expression::Parameter(parameter) => write!(f, "{}", parameter.name),
            Expression::Unary {
                op: op @ (UnaryOp::Convert | UnaryOp::ConvertChecked),
                operand,
                ty,
            } => write!(f, "({} {} {})", op, ty, operand),
            Expression::Unary { op, operand, .. } => write!(f, "({} {})", op, operand),
            Expression::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", op, left, right),
            Expression::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => write!(f, "(if {} {} {})", test, if_true, if_false),
            Expression::Invoke {
                callee, arguments, ..
            } => {
                write!(f, "(call {}", callee)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            Expression::Member { object, member, .. } => write!(f, "(. {} {})", object, member),
            Expression::Block {
                variables,
                expressions,
                ..
            } => {
                write!(f, "(block")?;
                if !variables.is_empty() {
                    let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
                    write!(f, " [{}]", names.join(" "))?;
                }
                write_list(f, expressions)?;
                write!(f, ")")
            }
            Expression::Loop {
                body,
                break_label,
                continue_label,
                ..
            } => {
                write!(f, "(loop")?;
                if let Some(label) = break_label {
                    write!(f, " :break {}", label.name)?;
                }
                if let Some(label) = continue_label {
                    write!(f, " :continue {}", label.name)?;
                }
                write!(f, " {})", body)
            }
            Expression::Label { target, default } => match default {
                Some(default) => write!(f, "(label {} {})", target.name, default),
                None => write!(f, "(label {})", target.name),
            },
            Expression::Goto {
                kind,
                target,
                value,
                ..
            } => {
                let keyword = match kind {
                    GotoKind::Goto => "goto",
                    GotoKind::Return => "return",
                    GotoKind::Break => "break",
                    GotoKind::Continue => "continue",
                };
                match value {
                    Some(value) => write!(f, "({} {} {})", keyword, target.name, value),
                    None => write!(f, "({} {})", keyword, target.name),
                }
            }
            Expression::Lambda {
                parameters, body, ..
            } => {
                let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
                write!(f, "(fn [{}] {})", names.join(" "), body)
            }
            Expression::Assign { variable, value } => {
                write!(f, "(set {} {})", variable.name, value)
            }
            Expression::Memoize {
                callee, argument, ..
            } => write!(f, "(memo {} {})", callee, argument),
            Expression::Parallel {
                op, left, right, ..
            } => write!(f, "(par {} {} {})", op, left, right),
        }
    }
}
