use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;

use crate::{
    ast::operator::BinaryOp,
    runtime::{
        error::RuntimeError,
        parallel::{ParallelEvaluator, combine},
        pool::WorkerPool,
        value::Value,
    },
};

fn evaluator(threads: usize) -> ParallelEvaluator {
    ParallelEvaluator::new(Arc::new(WorkerPool::new(threads).unwrap()))
}

#[test]
fn reserve_and_release_slots() {
    let pool = WorkerPool::new(2).unwrap();
    {
        let _held = pool.try_reserve(2).expect("two free slots");
        assert_eq!(pool.available(), 0);
        assert!(pool.try_reserve(1).is_none());
    }
    assert_eq!(pool.available(), 2);
}

#[test]
fn reserve_with_spare_keeps_one_slot_free() {
    let pool = WorkerPool::new(3).unwrap();
    assert!(WorkerPool::new(2).unwrap().try_reserve_with_spare(2).is_none());
    {
        let _held = pool.try_reserve_with_spare(2).expect("three free slots");
        assert_eq!(pool.available(), 1);
    }
    assert_eq!(pool.available(), 3);
}

#[test]
fn splits_only_with_more_than_two_free_slots() {
    for (threads, free_while_left_runs) in [(2, 2), (3, 1)] {
        let evaluator = evaluator(threads);
        let seen = AtomicUsize::new(usize::MAX);
        evaluator
            .evaluate::<_, _, RuntimeError>(
                BinaryOp::Add,
                || {
                    seen.store(evaluator.pool().available(), Ordering::SeqCst);
                    Ok(Value::Int32(1))
                },
                || Ok(Value::Int32(2)),
            )
            .unwrap();
        assert_eq!(
            seen.load(Ordering::SeqCst),
            free_while_left_runs,
            "threads = {}",
            threads
        );
    }
}

#[test]
fn adds_in_parallel() {
    let evaluator = evaluator(4);
    let result = evaluator
        .evaluate::<_, _, RuntimeError>(
            BinaryOp::Add,
            || Ok(Value::UInt64(40)),
            || Ok(Value::UInt64(2)),
        )
        .unwrap();
    assert_eq!(result, Value::UInt64(42));
    assert_eq!(evaluator.pool().available(), 4);
}

#[test]
fn falls_back_to_sequential_without_capacity() {
    let evaluator = evaluator(1);
    let order = Mutex::new(Vec::new());

    let result = evaluator
        .evaluate::<_, _, RuntimeError>(
            BinaryOp::Subtract,
            || {
                order.lock().push("left");
                Ok(Value::Int64(10))
            },
            || {
                order.lock().push("right");
                Ok(Value::Int64(3))
            },
        )
        .unwrap();

    assert_eq!(result, Value::Int64(7));
    assert_eq!(*order.lock(), vec!["left", "right"]);
}

#[test]
fn short_circuit_operators_evaluate_both_sides() {
    for threads in [1, 4] {
        let evaluator = evaluator(threads);
        let right_runs = AtomicUsize::new(0);

        let result = evaluator
            .evaluate::<_, _, RuntimeError>(
                BinaryOp::AndAlso,
                || Ok(Value::Bool(false)),
                || {
                    right_runs.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Bool(true))
                },
            )
            .unwrap();

        assert_eq!(result, Value::Bool(false));
        assert_eq!(right_runs.load(Ordering::SeqCst), 1, "threads = {}", threads);
    }
}

#[test]
fn unchecked_combination_wraps() {
    let result = combine(BinaryOp::Multiply, &Value::Int32(i32::MAX), &Value::Int32(2)).unwrap();
    assert_eq!(result, Value::Int32(-2));
}

#[test]
fn checked_combination_overflows() {
    let evaluator = evaluator(4);
    let err = evaluator
        .evaluate::<_, _, RuntimeError>(
            BinaryOp::AddChecked,
            || Ok(Value::UInt64(u64::MAX)),
            || Ok(Value::UInt64(1)),
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::ArithmeticOverflow { .. }));
}

#[test]
fn operand_errors_propagate() {
    let evaluator = evaluator(4);
    let err = evaluator
        .evaluate::<_, _, RuntimeError>(
            BinaryOp::Add,
            || Err(RuntimeError::DivisionByZero),
            || Ok(Value::Int32(1)),
        )
        .unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero);
    assert_eq!(evaluator.pool().available(), 4);
}

#[test]
fn unsupported_operator_is_rejected() {
    let err = combine(BinaryOp::Modulo, &Value::Int32(5), &Value::Int32(3)).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnsupportedOperator {
            operator: BinaryOp::Modulo
        }
    );

    let evaluator = evaluator(4);
    let err = evaluator
        .evaluate::<_, _, RuntimeError>(
            BinaryOp::LeftShift,
            || Ok(Value::Int32(1)),
            || Ok(Value::Int32(1)),
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedOperator { .. }));
}
