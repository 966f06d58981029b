#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use purefn::{
    Callable, Engine, EngineConfig, FunctionDefinition, RuntimeError, Value,
    ast::{Expression, Parameter, Ty},
};

pub fn engine(threads: usize) -> Engine {
    Engine::new(EngineConfig::default().with_threads(threads)).expect("worker pool")
}

pub fn as_u64(result: Result<Value, RuntimeError>) -> u64 {
    match result {
        Ok(Value::UInt64(v)) => v,
        other => panic!("expected a u64 result, got {:?}", other),
    }
}

pub fn wrapping_fib(n: u64) -> u64 {
    let (mut a, mut b) = (1u64, 1u64);
    for _ in 2..n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// Counts how often each argument reached a function body.
#[derive(Clone, Default)]
pub struct Visits(Arc<Mutex<HashMap<u64, usize>>>);

impl Visits {
    pub fn of(&self, n: u64) -> usize {
        self.0.lock().get(&n).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.lock().values().sum()
    }

    /// Two-argument native probe; two arguments keep it out of the cache.
    fn probe(&self) -> Callable {
        let visits = self.0.clone();
        Callable::new(2, move |args| {
            let n = u64::try_from(args[0].clone())?;
            *visits.lock().entry(n).or_default() += 1;
            Ok(Value::Unit)
        })
    }
}

/// Fibonacci that records every body execution in `visits`.
pub fn counted_fibonacci(visits: &Visits) -> FunctionDefinition {
    let probe = Expression::constant_typed(
        Value::Function(visits.probe()),
        Ty::pure_func(vec![Ty::UInt64, Ty::UInt64], Ty::Unit),
    );
    FunctionDefinition::new("fib", Ty::func1(Ty::UInt64, Ty::UInt64), move |fib| {
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            Expression::call(
                Expression::parameter(fib),
                Expression::subtract(Expression::parameter(&n), Expression::constant(k)),
            )
        };
        Expression::lambda(
            vec![n.clone()],
            Expression::block(
                vec![],
                vec![
                    Expression::invoke(
                        probe,
                        vec![Expression::parameter(&n), Expression::constant(0u64)],
                    ),
                    Expression::condition(
                        Expression::less_than_or_equal(
                            Expression::parameter(&n),
                            Expression::constant(2u64),
                        ),
                        Expression::constant(1u64),
                        Expression::add(at(1), at(2)),
                    ),
                ],
            ),
        )
    })
}
