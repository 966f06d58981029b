use std::fmt;

use serde::Serialize;

/// Static type descriptor carried by every expression node.
///
/// Closed replacement for runtime type introspection: the rewriter and the
/// threadability analysis only ever ask the questions answered here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ty {
    Unit,
    Bool,
    #[serde(rename = "i32")]
    Int32,
    #[serde(rename = "i64")]
    Int64,
    #[serde(rename = "u64")]
    UInt64,
    #[serde(rename = "f64")]
    Float64,
    /// User-defined value type (copied, never shared).
    Struct { name: String },
    /// User-defined reference type.
    Class { name: String },
    /// Erased reference type produced by cache and parallel nodes.
    Object,
    /// Plain closure.
    Func { params: Vec<Ty>, ret: Box<Ty> },
    /// Closure marked as pure; member access yielding one is always allowed.
    PureFunc { params: Vec<Ty>, ret: Box<Ty> },
}

impl Ty {
    pub fn func(params: Vec<Ty>, ret: Ty) -> Self {
        Ty::Func {
            params,
            ret: Box::new(ret),
        }
    }

    /// Single-argument closure type `param -> ret`.
    pub fn func1(param: Ty, ret: Ty) -> Self {
        Ty::func(vec![param], ret)
    }

    pub fn pure_func(params: Vec<Ty>, ret: Ty) -> Self {
        Ty::PureFunc {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Ty::Struct { name: name.into() }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Ty::Class { name: name.into() }
    }

    /// Fixed-size value types: the only types whose values may be handed to
    /// another worker without aliasing caller state.
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Ty::Unit
                | Ty::Bool
                | Ty::Int32
                | Ty::Int64
                | Ty::UInt64
                | Ty::Float64
                | Ty::Struct { .. }
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int32 | Ty::Int64 | Ty::UInt64 | Ty::Float64)
    }

    pub fn is_pure_func(&self) -> bool {
        matches!(self, Ty::PureFunc { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Ty::Func { .. } | Ty::PureFunc { .. })
    }

    /// Parameter types of a callable type.
    pub fn params(&self) -> Option<&[Ty]> {
        match self {
            Ty::Func { params, .. } | Ty::PureFunc { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Return type of a callable type.
    pub fn ret(&self) -> Option<&Ty> {
        match self {
            Ty::Func { ret, .. } | Ty::PureFunc { ret, .. } => Some(ret),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Unit => write!(f, "unit"),
            Ty::Bool => write!(f, "bool"),
            Ty::Int32 => write!(f, "i32"),
            Ty::Int64 => write!(f, "i64"),
            Ty::UInt64 => write!(f, "u64"),
            Ty::Float64 => write!(f, "f64"),
            Ty::Struct { name } | Ty::Class { name } => write!(f, "{}", name),
            Ty::Object => write!(f, "object"),
            Ty::Func { params, ret } | Ty::PureFunc { params, ret } => {
                let prefix = if self.is_pure_func() { "pure " } else { "" };
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "{}fn({}) -> {}", prefix, params.join(", "), ret)
            }
        }
    }
}
