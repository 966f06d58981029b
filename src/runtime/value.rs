use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    ast::ty::Ty,
    runtime::{arg_key::ArgKey, callable::Callable, error::RuntimeError},
};

/// Runtime value produced and consumed by compiled functions.
///
/// Primitives are unboxed; records and functions are `Arc`-shared so values
/// can cross worker threads when a binary operation is split.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    /// Instance of a user struct or class.
    Record(Arc<Record>),
    Function(Callable),
}

/// Named field bag backing both struct (value type) and class (reference
/// type) instances. The declared type decides which equality applies.
#[derive(Debug)]
pub struct Record {
    ty: Ty,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(ty: Ty, fields: Vec<(String, Value)>) -> Self {
        Self { ty, fields }
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

impl Value {
    pub fn record(ty: Ty, fields: Vec<(&str, Value)>) -> Self {
        Value::Record(Arc::new(Record::new(
            ty,
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )))
    }

    /// Returns the runtime type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::UInt64(_) => "u64",
            Value::Float64(_) => "f64",
            Value::Record(record) if record.ty.is_value_type() => "struct",
            Value::Record(_) => "class",
            Value::Function(_) => "function",
        }
    }

    /// Static type a constant holding this value is given by default.
    pub fn static_ty(&self) -> Ty {
        match self {
            Value::Unit => Ty::Unit,
            Value::Bool(_) => Ty::Bool,
            Value::Int32(_) => Ty::Int32,
            Value::Int64(_) => Ty::Int64,
            Value::UInt64(_) => Ty::UInt64,
            Value::Float64(_) => Ty::Float64,
            Value::Record(record) => record.ty.clone(),
            Value::Function(_) => Ty::Object,
        }
    }

    /// Whether this value may occupy a slot of static type `ty`.
    pub fn conforms_to(&self, ty: &Ty) -> bool {
        match (self, ty) {
            (_, Ty::Object) => true,
            (Value::Unit, Ty::Unit)
            | (Value::Bool(_), Ty::Bool)
            | (Value::Int32(_), Ty::Int32)
            | (Value::Int64(_), Ty::Int64)
            | (Value::UInt64(_), Ty::UInt64)
            | (Value::Float64(_), Ty::Float64) => true,
            (Value::Record(record), Ty::Struct { .. } | Ty::Class { .. }) => record.ty == *ty,
            (Value::Function(callable), Ty::Func { params, .. } | Ty::PureFunc { params, .. }) => {
                callable.arity() == params.len()
            }
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(RuntimeError::type_mismatch(
                "condition",
                Ty::Bool,
                other.type_name(),
            )),
        }
    }

    pub fn as_callable(&self) -> Result<&Callable, RuntimeError> {
        match self {
            Value::Function(callable) => Ok(callable),
            other => Err(RuntimeError::NotCallable {
                found: other.type_name(),
            }),
        }
    }

    /// Cache key for this value when used as a memoized argument.
    pub fn arg_key(&self) -> ArgKey {
        match self {
            Value::Unit => ArgKey::Unit,
            Value::Bool(v) => ArgKey::Bool(*v),
            Value::Int32(v) => ArgKey::Int32(*v),
            Value::Int64(v) => ArgKey::Int64(*v),
            Value::UInt64(v) => ArgKey::UInt64(*v),
            Value::Float64(v) => ArgKey::float(*v),
            Value::Record(record) if record.ty.is_value_type() => ArgKey::Struct(
                record.ty.to_string(),
                record.fields.iter().map(|(_, v)| v.arg_key()).collect(),
            ),
            Value::Record(record) => ArgKey::Class(record.clone()),
            Value::Function(callable) => ArgKey::Function(callable.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => {
                if a.ty.is_value_type() {
                    a.ty == b.ty && a.fields == b.fields
                } else {
                    Arc::ptr_eq(a, b)
                }
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Record(record) => {
                let items: Vec<String> = record
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{} {{ {} }}", record.ty, items.join(", "))
            }
            Value::Function(callable) => write!(f, "<fn/{}>", callable.arity()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Unit => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.fields.len() + 1))?;
                map.serialize_entry("type", &record.ty.to_string())?;
                for (name, value) in &record.fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Function(callable) => {
                serializer.collect_str(&format_args!("<fn/{}>", callable.arity()))
            }
        }
    }
}

macro_rules! value_conversions {
    ($($rust:ty => $variant:ident, $ty:expr;)*) => {
        $(
            impl From<$rust> for Value {
                fn from(value: $rust) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $rust {
                type Error = RuntimeError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(RuntimeError::type_mismatch(
                            "conversion",
                            $ty,
                            other.type_name(),
                        )),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    bool => Bool, Ty::Bool;
    i32 => Int32, Ty::Int32;
    i64 => Int64, Ty::Int64;
    u64 => UInt64, Ty::UInt64;
    f64 => Float64, Ty::Float64;
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Function(callable)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int32(42).to_string(), "42");
        assert_eq!(Value::Float64(3.5).to_string(), "3.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        let point = Value::record(
            Ty::structure("Point"),
            vec![("x", Value::Int32(1)), ("y", Value::Int32(2))],
        );
        assert_eq!(point.to_string(), "Point { x: 1, y: 2 }");
    }

    #[test]
    fn struct_records_compare_by_value() {
        let a = Value::record(Ty::structure("P"), vec![("x", Value::Int32(1))]);
        let b = Value::record(Ty::structure("P"), vec![("x", Value::Int32(1))]);
        assert_eq!(a, b);
        assert_eq!(a.arg_key(), b.arg_key());
    }

    #[test]
    fn class_records_compare_by_identity() {
        let a = Value::record(Ty::class("C"), vec![("x", Value::Int32(1))]);
        let b = Value::record(Ty::class("C"), vec![("x", Value::Int32(1))]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a.arg_key(), b.arg_key());
    }

    #[test]
    fn signed_zeros_share_a_key() {
        assert_eq!(Value::Float64(-0.0).arg_key(), Value::Float64(0.0).arg_key());
        assert_ne!(Value::Float64(1.0).arg_key(), Value::Float64(-1.0).arg_key());
    }

    #[test]
    fn conformance() {
        assert!(Value::UInt64(1).conforms_to(&Ty::UInt64));
        assert!(!Value::UInt64(1).conforms_to(&Ty::Int64));
        assert!(Value::UInt64(1).conforms_to(&Ty::Object));
        let f = Value::Function(Callable::unary(Ok));
        assert!(f.conforms_to(&Ty::func1(Ty::Int32, Ty::Int32)));
        assert!(!f.conforms_to(&Ty::func(vec![], Ty::Int32)));
    }

    #[test]
    fn try_from_reports_mismatch() {
        let err = u64::try_from(Value::Bool(true)).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
        assert_eq!(u64::try_from(Value::UInt64(7)).unwrap(), 7);
    }
}
