use std::sync::Arc;

use crate::{
    ast::operator::BinaryOp,
    runtime::{error::RuntimeError, ops, pool::WorkerPool, value::Value},
};

/// Slots needed to split one binary operation. Splitting also requires one
/// more free slot, so a pool of two workers always runs inline.
const PARALLEL_SLOTS: usize = 2;

/// Runtime combinator behind `Parallel` nodes.
///
/// Both operands are evaluated before combining, so `AndAlso` and `OrElse`
/// lose their short-circuit behaviour here: the right operand always runs,
/// even when the left one already decides the result. Only pure operands
/// are ever routed through this path, so the extra evaluation is
/// unobservable apart from its cost.
#[derive(Clone)]
pub struct ParallelEvaluator {
    pool: Arc<WorkerPool>,
}

impl ParallelEvaluator {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Evaluates `left` and `right`, concurrently when more than two slots
    /// are free, otherwise left then right on the calling thread, and
    /// combines them.
    pub fn evaluate<L, R, E>(&self, op: BinaryOp, left: L, right: R) -> Result<Value, E>
    where
        L: FnOnce() -> Result<Value, E> + Send,
        R: FnOnce() -> Result<Value, E> + Send,
        E: From<RuntimeError> + Send,
    {
        if !op.is_parallelizable() {
            return Err(RuntimeError::UnsupportedOperator { operator: op }.into());
        }

        let (l, r) = match self.pool.try_reserve_with_spare(PARALLEL_SLOTS) {
            Some(_reservation) => {
                let (l, r) = self.pool.join(left, right);
                (l?, r?)
            }
            None => {
                log::trace!("no free worker slots, evaluating `{}` sequentially", op);
                let l = left()?;
                (l, right()?)
            }
        };

        Ok(combine(op, &l, &r)?)
    }
}

/// Combines two evaluated operands exactly as the sequential operator would,
/// minus short-circuiting.
pub fn combine(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if !op.is_parallelizable() {
        return Err(RuntimeError::UnsupportedOperator { operator: op });
    }
    ops::binary(op, left, right)
}
