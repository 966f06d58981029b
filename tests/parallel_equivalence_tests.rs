mod common;

use common::engine;
use purefn::{
    FunctionDefinition, RuntimeError, Value,
    ast::{BinaryOp, Expression, Parameter, Ty},
};

/// `f(n) = n <= base ? leaf(n) : f(n - 1) <op> f(n - 2)` over `u64 -> ret`.
fn split_recursion(
    op: BinaryOp,
    ret: Ty,
    base: u64,
    leaf: impl Fn(Expression) -> Expression,
) -> FunctionDefinition {
    FunctionDefinition::new("f", Ty::func1(Ty::UInt64, ret), |f| {
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            Expression::call(
                Expression::parameter(f),
                Expression::subtract(Expression::parameter(&n), Expression::constant(k)),
            )
        };
        Expression::lambda(
            vec![n.clone()],
            Expression::condition(
                Expression::less_than_or_equal(
                    Expression::parameter(&n),
                    Expression::constant(base),
                ),
                leaf(Expression::parameter(&n)),
                Expression::binary(op, at(1), at(2)),
            ),
        )
    })
}

fn results(definition: &FunctionDefinition, range: std::ops::RangeInclusive<u64>) -> Vec<[Value; 2]> {
    let sequential = engine(4)
        .build_recursive(definition, false, false)
        .unwrap();
    let parallel = engine(4).build_recursive(definition, false, true).unwrap();
    assert!(parallel.stats().parallel > 0, "nothing was parallelized");
    range
        .map(|n| [sequential.call(n).unwrap(), parallel.call(n).unwrap()])
        .collect()
}

fn assert_equivalent(definition: &FunctionDefinition, range: std::ops::RangeInclusive<u64>) {
    for (i, [sequential, parallel]) in results(definition, range).into_iter().enumerate() {
        assert_eq!(sequential, parallel, "results diverge at index {}", i);
    }
}

#[test]
fn addition() {
    let definition = split_recursion(BinaryOp::Add, Ty::UInt64, 2, |_| Expression::constant(1u64));
    assert_equivalent(&definition, 1..=20);
}

#[test]
fn wrapping_multiplication() {
    let definition = split_recursion(BinaryOp::Multiply, Ty::UInt64, 2, |n| {
        Expression::add(n, Expression::constant(2u64))
    });
    assert_equivalent(&definition, 1..=20);
}

#[test]
fn equality() {
    let definition = split_recursion(BinaryOp::Equal, Ty::Bool, 1, |n| {
        Expression::equal(n, Expression::constant(0u64))
    });
    assert_equivalent(&definition, 0..=16);
}

#[test]
fn bitwise_or() {
    let definition = split_recursion(BinaryOp::Or, Ty::UInt64, 2, |n| {
        Expression::binary(BinaryOp::LeftShift, Expression::constant(1u64), n)
    });
    assert_equivalent(&definition, 1..=16);
}

#[test]
fn works_with_caching_too() {
    let definition = split_recursion(BinaryOp::Add, Ty::UInt64, 2, |_| Expression::constant(1u64));
    let engine = engine(4);
    let both = engine.build_recursive(&definition, true, true).unwrap();
    assert_eq!(both.stats().parallel, 1);
    assert_eq!(both.stats().memoized, 2);
    assert_eq!(both.call(50u64), Ok(Value::UInt64(12_586_269_025)));
}

#[test]
fn single_worker_falls_back_to_sequential() {
    let definition = split_recursion(BinaryOp::Add, Ty::UInt64, 2, |_| Expression::constant(1u64));
    let engine = engine(1);
    let fib = engine.build_recursive(&definition, false, true).unwrap();
    assert_eq!(fib.call(15u64), Ok(Value::UInt64(610)));
    assert_eq!(engine.pool().available(), 1);
}

/// `h(0) = false`, `h(1)` divides by zero, `h(n) = h(n - 2) && h(n - 1)`.
fn guarded() -> FunctionDefinition {
    FunctionDefinition::new("h", Ty::func1(Ty::UInt64, Ty::Bool), |h| {
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            Expression::call(
                Expression::parameter(h),
                Expression::subtract(Expression::parameter(&n), Expression::constant(k)),
            )
        };
        let failing = Expression::equal(
            Expression::binary(
                BinaryOp::Divide,
                Expression::constant(1u64),
                Expression::subtract(Expression::parameter(&n), Expression::constant(1u64)),
            ),
            Expression::constant(0u64),
        );
        Expression::lambda(
            vec![n.clone()],
            Expression::condition(
                Expression::equal(Expression::parameter(&n), Expression::constant(0u64)),
                Expression::constant(false),
                Expression::condition(
                    Expression::equal(Expression::parameter(&n), Expression::constant(1u64)),
                    failing,
                    Expression::binary(BinaryOp::AndAlso, at(2), at(1)),
                ),
            ),
        )
    })
}

#[test]
fn parallel_and_also_does_not_short_circuit() {
    for threads in [1, 4] {
        let engine = engine(threads);
        let sequential = engine.build_recursive(&guarded(), false, false).unwrap();
        assert_eq!(sequential.call(2u64), Ok(Value::Bool(false)));

        let parallel = engine.build_recursive(&guarded(), false, true).unwrap();
        assert_eq!(
            parallel.call(2u64),
            Err(RuntimeError::DivisionByZero),
            "threads={}",
            threads
        );
    }
}
