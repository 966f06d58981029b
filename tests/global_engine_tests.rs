//! The free functions share one process-wide engine, so everything touching
//! it lives in a single test.

use purefn::{
    CompileError, FunctionDefinition, Value,
    ast::{Expression, Parameter, Ty},
    engine, samples,
};

fn impure() -> FunctionDefinition {
    let counter = Value::record(Ty::class("Counter"), vec![("count", Value::UInt64(1))]);
    FunctionDefinition::new("f", Ty::func1(Ty::UInt64, Ty::UInt64), move |_| {
        let n = Parameter::new("n", Ty::UInt64);
        Expression::lambda(
            vec![n.clone()],
            Expression::add(
                Expression::parameter(&n),
                Expression::member(
                    Expression::constant_typed(counter, Ty::class("Counter")),
                    "count",
                    Ty::UInt64,
                ),
            ),
        )
    })
}

#[test]
fn free_functions_share_the_global_engine() {
    let fib = purefn::build_recursive(&samples::fibonacci(), true, true).unwrap();
    assert_eq!(fib.call(40u64), Ok(Value::UInt64(102334155)));
    assert!(engine::global().cache().entry_count() >= 40);

    purefn::reset_cache();
    assert_eq!(engine::global().cache().entry_count(), 0);

    let plain = purefn::recursive_lambda(&samples::fibonacci()).unwrap();
    assert_eq!(plain.call(20u64), Ok(Value::UInt64(6765)));
    assert_eq!(engine::global().cache().entry_count(), 0);

    let answer = purefn::build_constant(&Expression::multiply(
        Expression::constant(6i64),
        Expression::constant(7i64),
    ))
    .unwrap();
    assert_eq!(answer.call0(), Ok(Value::Int64(42)));

    assert!(!purefn::allow_impure_without_caching());
    assert!(matches!(
        purefn::build_recursive(&impure(), false, true),
        Err(CompileError::PurityViolation { .. })
    ));
    purefn::set_allow_impure_without_caching(true);
    let f = purefn::build_recursive(&impure(), false, true).unwrap();
    assert_eq!(f.call(1u64), Ok(Value::UInt64(2)));
    purefn::set_allow_impure_without_caching(false);
    assert!(!purefn::allow_impure_without_caching());
}
