//! Application sugar for curried functions: `apply3(f, a, b, c)` is
//! `f(a)(b)(c)`.

use crate::runtime::{callable::Callable, error::RuntimeError, value::Value};

pub fn apply1(f: &Callable, a: impl Into<Value>) -> Result<Value, RuntimeError> {
    f.call1(a.into())
}

pub fn apply2(
    f: &Callable,
    a: impl Into<Value>,
    b: impl Into<Value>,
) -> Result<Value, RuntimeError> {
    apply1(apply1(f, a)?.as_callable()?, b)
}

pub fn apply3(
    f: &Callable,
    a: impl Into<Value>,
    b: impl Into<Value>,
    c: impl Into<Value>,
) -> Result<Value, RuntimeError> {
    apply2(apply1(f, a)?.as_callable()?, b, c)
}

pub fn apply4(
    f: &Callable,
    a: impl Into<Value>,
    b: impl Into<Value>,
    c: impl Into<Value>,
    d: impl Into<Value>,
) -> Result<Value, RuntimeError> {
    apply3(apply1(f, a)?.as_callable()?, b, c, d)
}

/// `second ∘ first` as a new single-argument function.
pub fn compose(first: Callable, second: Callable) -> Callable {
    Callable::unary(move |value| second.call1(first.call1(value)?))
}
