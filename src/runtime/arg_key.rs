use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::runtime::{callable::Callable, value::Record};

/// Hashable image of a memoized argument.
///
/// Every variant carries its runtime type as the tag, so `Int32(1)` and
/// `Int64(1)` never collide. Floats key on their bit pattern with `-0.0`
/// folded into `0.0`. Classes and functions key on identity and hold the
/// argument itself, so its address cannot be reused while the entry exists.
#[derive(Debug, Clone)]
pub enum ArgKey {
    Unit,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float64(u64),
    Struct(String, Vec<ArgKey>),
    Class(Arc<Record>),
    Function(Callable),
}

impl ArgKey {
    pub fn float(value: f64) -> Self {
        // 0.0 == -0.0, so both share an entry.
        let value = if value == 0.0 { 0.0 } else { value };
        ArgKey::Float64(value.to_bits())
    }
}

impl PartialEq for ArgKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgKey::Unit, ArgKey::Unit) => true,
            (ArgKey::Bool(a), ArgKey::Bool(b)) => a == b,
            (ArgKey::Int32(a), ArgKey::Int32(b)) => a == b,
            (ArgKey::Int64(a), ArgKey::Int64(b)) => a == b,
            (ArgKey::UInt64(a), ArgKey::UInt64(b)) => a == b,
            (ArgKey::Float64(a), ArgKey::Float64(b)) => a == b,
            (ArgKey::Struct(a, xs), ArgKey::Struct(b, ys)) => a == b && xs == ys,
            (ArgKey::Class(a), ArgKey::Class(b)) => Arc::ptr_eq(a, b),
            (ArgKey::Function(a), ArgKey::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for ArgKey {}

impl Hash for ArgKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ArgKey::Unit => {}
            ArgKey::Bool(v) => v.hash(state),
            ArgKey::Int32(v) => v.hash(state),
            ArgKey::Int64(v) => v.hash(state),
            ArgKey::UInt64(v) | ArgKey::Float64(v) => v.hash(state),
            ArgKey::Struct(name, fields) => {
                name.hash(state);
                fields.hash(state);
            }
            ArgKey::Class(record) => (Arc::as_ptr(record) as usize).hash(state),
            ArgKey::Function(callable) => callable.id().hash(state),
        }
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Unit => write!(f, "()"),
            ArgKey::Bool(v) => write!(f, "{}", v),
            ArgKey::Int32(v) => write!(f, "{}i32", v),
            ArgKey::Int64(v) => write!(f, "{}i64", v),
            ArgKey::UInt64(v) => write!(f, "{}u64", v),
            ArgKey::Float64(bits) => write!(f, "{}f64", f64::from_bits(*bits)),
            ArgKey::Struct(name, fields) => {
                let items: Vec<String> = fields.iter().map(|k| k.to_string()).collect();
                write!(f, "{}({})", name, items.join(", "))
            }
            ArgKey::Class(record) => write!(f, "{}#{:x}", record.ty(), Arc::as_ptr(record) as usize),
            ArgKey::Function(callable) => write!(f, "fn#{:x}", callable.id()),
        }
    }
}
