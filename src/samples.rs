//! Ready-made definitions used by the demo binary, benchmarks and tests.

use crate::{
    ast::{
        expression::{Expression, Parameter},
        ty::Ty,
    },
    compiler::FunctionDefinition,
};

fn u64_const(v: u64) -> Expression {
    Expression::constant(v)
}

fn call(callee: Expression, argument: Expression) -> Expression {
    Expression::call(callee, argument)
}

/// `fib(n) = n <= 2 ? 1 : fib(n - 1) + fib(n - 2)` over `u64`.
pub fn fibonacci() -> FunctionDefinition {
    FunctionDefinition::new("fib", Ty::func1(Ty::UInt64, Ty::UInt64), |fib| {
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            call(
                Expression::parameter(fib),
                Expression::subtract(Expression::parameter(&n), u64_const(k)),
            )
        };
        Expression::lambda(
            vec![n.clone()],
            Expression::condition(
                Expression::less_than_or_equal(Expression::parameter(&n), u64_const(2)),
                u64_const(1),
                Expression::add(at(1), at(2)),
            ),
        )
    })
}

/// Fibonacci whose recursive sum is only split across workers above
/// `cutoff`; below it each call is padded with `+ 0`, which keeps the sum
/// from having two bare invocations as operands.
pub fn fibonacci_with_cutoff(cutoff: u64) -> FunctionDefinition {
    FunctionDefinition::new("fib", Ty::func1(Ty::UInt64, Ty::UInt64), |fib| {
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            call(
                Expression::parameter(fib),
                Expression::subtract(Expression::parameter(&n), u64_const(k)),
            )
        };
        let padded = |k: u64| Expression::add(at(k), u64_const(0));
        Expression::lambda(
            vec![n.clone()],
            Expression::condition(
                Expression::less_than_or_equal(Expression::parameter(&n), u64_const(2)),
                u64_const(1),
                Expression::condition(
                    Expression::less_than_or_equal(Expression::parameter(&n), u64_const(cutoff)),
                    Expression::add(padded(1), padded(2)),
                    Expression::add(at(1), at(2)),
                ),
            ),
        )
    })
}

/// `fact(n) = n <= 1 ? 1 : n * fact(n - 1)` with overflow checking.
pub fn factorial() -> FunctionDefinition {
    FunctionDefinition::new("fact", Ty::func1(Ty::UInt64, Ty::UInt64), |fact| {
        let n = Parameter::new("n", Ty::UInt64);
        Expression::lambda(
            vec![n.clone()],
            Expression::condition(
                Expression::less_than_or_equal(Expression::parameter(&n), u64_const(1)),
                u64_const(1),
                Expression::multiply_checked(
                    Expression::parameter(&n),
                    call(
                        Expression::parameter(fact),
                        Expression::subtract(Expression::parameter(&n), u64_const(1)),
                    ),
                ),
            ),
        )
    })
}

/// Curried `add(x)(y) = x + y` over `i32`.
pub fn add() -> FunctionDefinition {
    let inner = Ty::func1(Ty::Int32, Ty::Int32);
    FunctionDefinition::new("add", Ty::func1(Ty::Int32, inner), |_| {
        let x = Parameter::new("x", Ty::Int32);
        let y = Parameter::new("y", Ty::Int32);
        Expression::lambda(
            vec![x.clone()],
            Expression::lambda(
                vec![y.clone()],
                Expression::add(Expression::parameter(&x), Expression::parameter(&y)),
            ),
        )
    })
}

/// Curried Fibonacci seeded with `x`: `weird_fib(x)(n) = n <= 2 ? x :
/// weird_fib(x)(n - 1) + weird_fib(x)(n - 2)`, split across workers above
/// `cutoff` like [`fibonacci_with_cutoff`].
pub fn weird_fib(cutoff: u64) -> FunctionDefinition {
    let inner = Ty::func1(Ty::UInt64, Ty::UInt64);
    FunctionDefinition::new("weird_fib", Ty::func1(Ty::UInt64, inner), |me| {
        let x = Parameter::new("x", Ty::UInt64);
        let n = Parameter::new("n", Ty::UInt64);
        let at = |k: u64| {
            call(
                call(Expression::parameter(me), Expression::parameter(&x)),
                Expression::subtract(Expression::parameter(&n), u64_const(k)),
            )
        };
        let padded = |k: u64| Expression::add(at(k), u64_const(0));
        Expression::lambda(
            vec![x.clone()],
            Expression::lambda(
                vec![n.clone()],
                Expression::condition(
                    Expression::less_than_or_equal(Expression::parameter(&n), u64_const(2)),
                    Expression::parameter(&x),
                    Expression::condition(
                        Expression::less_than_or_equal(Expression::parameter(&n), u64_const(cutoff)),
                        Expression::add(padded(1), padded(2)),
                        Expression::add(at(1), at(2)),
                    ),
                ),
            ),
        )
    })
}

/// Native reference implementation.
pub fn native_fibonacci(n: u64) -> u64 {
    if n <= 2 {
        1
    } else {
        native_fibonacci(n - 1).wrapping_add(native_fibonacci(n - 2))
    }
}
