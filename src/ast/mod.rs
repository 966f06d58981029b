pub mod display;
pub mod expression;
pub mod fold;
pub mod operator;
pub mod reduce;
pub mod stats;
pub mod ty;
pub mod visit;

pub use expression::{Expression, GotoKind, LabelTarget, Parameter};
pub use fold::{Folder, fold_expr};
pub use operator::{BinaryOp, UnaryOp};
pub use reduce::reduce;
pub use stats::{TreeStats, tree_stats};
pub use ty::Ty;
pub use visit::{Visitor, walk_expr};
