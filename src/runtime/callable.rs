use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::runtime::{error::RuntimeError, value::Value};

type NativeFn = dyn Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// A shareable function value.
///
/// Identity is the underlying allocation: clones of a `Callable` are the same
/// function, two separately built callables never are, even when they
/// compute the same thing. The memoization cache keys on this identity.
#[derive(Clone)]
pub struct Callable {
    func: Arc<NativeFn>,
    arity: usize,
}

impl Callable {
    pub fn new<F>(arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            arity,
        }
    }

    /// Single-argument callable.
    pub fn unary<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self::new(1, move |args| func(args[0].clone()))
    }

    /// Zero-argument callable that always yields `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(0, move |_| Ok(value.clone()))
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        if args.len() != self.arity {
            return Err(RuntimeError::ArityMismatch {
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.func)(args)
    }

    pub fn call1(&self, arg: Value) -> Result<Value, RuntimeError> {
        self.call(std::slice::from_ref(&arg))
    }

    pub fn call0(&self) -> Result<Value, RuntimeError> {
        self.call(&[])
    }

    /// Address of the shared allocation; stable for the callable's lifetime.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.func) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        self.id() == other.id()
    }

    /// Non-owning handle, for a function body that refers to itself.
    pub fn downgrade(&self) -> WeakCallable {
        WeakCallable {
            func: Arc::downgrade(&self.func),
            arity: self.arity,
        }
    }
}

/// Weak counterpart of [`Callable`]; upgrading yields the same identity.
#[derive(Clone)]
pub struct WeakCallable {
    func: Weak<NativeFn>,
    arity: usize,
}

impl WeakCallable {
    pub fn upgrade(&self) -> Option<Callable> {
        self.func.upgrade().map(|func| Callable {
            func,
            arity: self.arity,
        })
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn/{} #{:x}>", self.arity, self.id())
    }
}
