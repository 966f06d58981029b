mod common;

use common::{Visits, as_u64, counted_fibonacci, engine};
use purefn::{
    Callable, FunctionDefinition, Value,
    ast::{Expression, Parameter, Ty},
};

#[test]
fn each_argument_is_computed_once() {
    let engine = engine(2);
    let visits = Visits::default();
    let fib = engine
        .build_recursive(&counted_fibonacci(&visits), true, false)
        .unwrap();

    assert_eq!(as_u64(fib.call(15u64)), 610);
    for n in 1..=15 {
        assert_eq!(visits.of(n), 1, "fib({}) body ran more than once", n);
    }

    assert_eq!(as_u64(fib.call(15u64)), 610);
    assert_eq!(as_u64(fib.call(12u64)), 144);
    assert_eq!(visits.total(), 15);
}

#[test]
fn uncached_function_recomputes() {
    let engine = engine(2);
    let visits = Visits::default();
    let fib = engine
        .build_recursive(&counted_fibonacci(&visits), false, false)
        .unwrap();
    assert_eq!(as_u64(fib.call(10u64)), 55);
    assert_eq!(visits.of(10), 1);
    assert_eq!(visits.of(1), 21);
    assert_eq!(engine.cache().entry_count(), 0);
}

#[test]
fn functions_do_not_share_entries() {
    let engine = engine(2);
    let (first_visits, second_visits) = (Visits::default(), Visits::default());
    let first = engine
        .build_recursive(&counted_fibonacci(&first_visits), true, false)
        .unwrap();
    let second = engine
        .build_recursive(&counted_fibonacci(&second_visits), true, false)
        .unwrap();

    assert_eq!(as_u64(first.call(10u64)), 55);
    assert!(engine.cache().contains(first.callable(), &Value::UInt64(10)));
    assert!(!engine.cache().contains(second.callable(), &Value::UInt64(10)));

    assert_eq!(as_u64(second.call(10u64)), 55);
    assert_eq!(second_visits.total(), 10);
    assert_eq!(engine.cache().function_count(), 2);
}

#[test]
fn reset_forces_recomputation() {
    let engine = engine(2);
    let visits = Visits::default();
    let fib = engine
        .build_recursive(&counted_fibonacci(&visits), true, false)
        .unwrap();

    fib.call(10u64).unwrap();
    assert_eq!(visits.total(), 10);
    engine.reset_cache();
    assert_eq!(engine.cache().entry_count(), 0);

    fib.call(10u64).unwrap();
    for n in 1..=10 {
        assert_eq!(visits.of(n), 2);
    }
}

#[test]
fn engines_have_separate_caches() {
    let (a, b) = (engine(1), engine(1));
    let visits = Visits::default();
    let definition = counted_fibonacci(&visits);
    let on_a = a.build_recursive(&definition, true, false).unwrap();
    let on_b = b.build_recursive(&definition, true, false).unwrap();

    on_a.call(8u64).unwrap();
    on_b.call(8u64).unwrap();
    assert_eq!(visits.of(8), 2);
    a.reset_cache();
    assert_eq!(b.cache().entry_count(), 8);
}

#[test]
fn stats_count_hits_and_misses() {
    let engine = engine(1);
    let fib = engine
        .build_recursive(&purefn::samples::fibonacci(), true, false)
        .unwrap();
    fib.call(10u64).unwrap();
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, 10);
    assert!(stats.hits > 0);

    engine.reset_cache();
    assert_eq!(engine.cache_stats().hits, 0);
}

/// `run(g) = g()` over zero-argument `i32` functions.
fn run_thunk() -> FunctionDefinition {
    let thunk = Ty::func(vec![], Ty::Int32);
    FunctionDefinition::new("run", Ty::func1(thunk.clone(), Ty::Int32), |_| {
        let g = Parameter::new("g", thunk);
        Expression::lambda(
            vec![g.clone()],
            Expression::invoke(Expression::parameter(&g), vec![]),
        )
    })
}

#[test]
fn fresh_function_arguments_get_fresh_results() {
    let engine = engine(1);
    let run = engine.build_recursive(&run_thunk(), true, false).unwrap();
    for i in 0..200 {
        let thunk = Value::Function(Callable::constant(Value::Int32(i)));
        assert_eq!(run.call(thunk), Ok(Value::Int32(i)), "iteration {}", i);
    }
    assert_eq!(engine.cache().entry_count(), 200);
}
