use std::{
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::runtime::{arg_key::ArgKey, callable::Callable, value::Value};

/// Map key wrapping a callable by identity. Holding the callable keeps its
/// allocation alive, so an address is never reused while its entries exist.
#[derive(Clone)]
struct FunctionKey(Callable);

impl PartialEq for FunctionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl Eq for FunctionKey {}

impl Hash for FunctionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id().hash(state);
    }
}

type ResultTable = DashMap<ArgKey, Value>;

#[derive(Default)]
struct Generation {
    functions: DashMap<FunctionKey, Arc<ResultTable>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized results keyed by (function identity, argument).
///
/// Entries are written once and never overwritten or evicted. `reset`
/// swaps in a fresh generation; computations already running against the
/// old generation finish there and their results are dropped with it.
pub struct MemoCache {
    current: RwLock<Arc<Generation>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Generation::default())),
        }
    }

    fn generation(&self) -> Arc<Generation> {
        self.current.read().clone()
    }

    /// Returns the stored result for `function(argument)`, or runs
    /// `compute` and stores its result.
    ///
    /// Concurrent first calls for one key may each run `compute`; the first
    /// result stored wins and is what every caller gets back. Errors are
    /// returned to the caller and never stored.
    pub fn lookup_or_compute<E, F>(
        &self,
        function: &Callable,
        argument: &Value,
        compute: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        let generation = self.generation();
        let key = argument.arg_key();
        let table = generation
            .functions
            .entry(FunctionKey(function.clone()))
            .or_default()
            .clone();

        let cached = table.get(&key).map(|hit| hit.value().clone());
        if let Some(value) = cached {
            generation.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("cache hit: {:?}({})", function, key);
            return Ok(value);
        }

        generation.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute()?;
        let stored = table.entry(key).or_insert(value).value().clone();
        Ok(stored)
    }

    /// Whether a result is stored for `function(argument)`.
    pub fn contains(&self, function: &Callable, argument: &Value) -> bool {
        self.generation()
            .functions
            .get(&FunctionKey(function.clone()))
            .is_some_and(|table| table.contains_key(&argument.arg_key()))
    }

    /// Number of functions with a registered result table.
    pub fn function_count(&self) -> usize {
        self.generation().functions.len()
    }

    /// Number of stored results across all functions.
    pub fn entry_count(&self) -> usize {
        self.generation()
            .functions
            .iter()
            .map(|table| table.value().len())
            .sum()
    }

    pub fn stats(&self) -> CacheStats {
        let generation = self.generation();
        CacheStats {
            hits: generation.hits.load(Ordering::Relaxed),
            misses: generation.misses.load(Ordering::Relaxed),
        }
    }

    /// Replaces the whole cache with an empty one.
    pub fn reset(&self) {
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(Generation::default()));
        log::debug!(
            "memoization cache reset ({} function table(s) dropped)",
            previous.functions.len()
        );
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::new()
    }
}
