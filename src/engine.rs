//! Entry points for building pure functions.
//!
//! An [`Engine`] owns one memoization cache and one worker pool. Functions
//! built by an engine read and write only that engine's cache, so separate
//! engines never observe each other's results. The free functions in this
//! module delegate to a lazily created process-wide engine.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use once_cell::sync::Lazy;
use rayon::ThreadPoolBuildError;

use crate::{
    ast::expression::Expression,
    compiler::{self, FunctionDefinition, PureFunction, errors::CompileError, lower::Services},
    rewrite::RewriteOptions,
    runtime::{
        cache::{CacheStats, MemoCache},
        callable::Callable,
        parallel::ParallelEvaluator,
        pool::WorkerPool,
    },
};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Worker threads; `None` sizes the pool to the machine.
    pub threads: Option<usize>,
    pub allow_impure_without_caching: bool,
}

impl EngineConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_allow_impure_without_caching(mut self, allow: bool) -> Self {
        self.allow_impure_without_caching = allow;
        self
    }
}

pub struct Engine {
    services: Services,
    allow_impure_without_caching: AtomicBool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = match config.threads {
            Some(threads) => WorkerPool::new(threads)?,
            None => WorkerPool::with_default_size()?,
        };
        log::debug!("engine started with {} worker thread(s)", pool.capacity());
        Ok(Self {
            services: Services {
                cache: Arc::new(MemoCache::new()),
                parallel: Arc::new(ParallelEvaluator::new(Arc::new(pool))),
            },
            allow_impure_without_caching: AtomicBool::new(config.allow_impure_without_caching),
        })
    }

    /// Compiles `definition` with memoization and/or parallel evaluation.
    /// Purity checking is always on.
    pub fn build_recursive(
        &self,
        definition: &FunctionDefinition,
        caching: bool,
        threading: bool,
    ) -> Result<PureFunction, CompileError> {
        let options = RewriteOptions::optimized(caching, threading)
            .with_allow_impure_without_caching(self.allow_impure_without_caching());
        compiler::compile(definition, options, &self.services)
    }

    /// Plain recursive closure: no caching, no threading, no purity check.
    pub fn recursive_lambda(
        &self,
        definition: &FunctionDefinition,
    ) -> Result<PureFunction, CompileError> {
        compiler::compile(definition, RewriteOptions::default(), &self.services)
    }

    pub fn build_constant(&self, expr: &Expression) -> Result<Callable, CompileError> {
        compiler::build_constant(expr, &self.services)
    }

    /// Drops every memoized result of this engine.
    pub fn reset_cache(&self) {
        self.services.cache.reset();
    }

    pub fn cache(&self) -> &MemoCache {
        &self.services.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.services.cache.stats()
    }

    pub fn pool(&self) -> &WorkerPool {
        self.services.parallel.pool()
    }

    /// Applies to functions built after the call.
    pub fn set_allow_impure_without_caching(&self, allow: bool) {
        self.allow_impure_without_caching
            .store(allow, Ordering::Relaxed);
    }

    pub fn allow_impure_without_caching(&self) -> bool {
        self.allow_impure_without_caching.load(Ordering::Relaxed)
    }
}

static GLOBAL: Lazy<Engine> = Lazy::new(|| {
    Engine::new(EngineConfig::default()).expect("failed to start the default worker pool")
});

/// The process-wide engine behind the free functions.
pub fn global() -> &'static Engine {
    &GLOBAL
}

pub fn build_recursive(
    definition: &FunctionDefinition,
    caching: bool,
    threading: bool,
) -> Result<PureFunction, CompileError> {
    GLOBAL.build_recursive(definition, caching, threading)
}

pub fn recursive_lambda(definition: &FunctionDefinition) -> Result<PureFunction, CompileError> {
    GLOBAL.recursive_lambda(definition)
}

pub fn build_constant(expr: &Expression) -> Result<Callable, CompileError> {
    GLOBAL.build_constant(expr)
}

pub fn reset_cache() {
    GLOBAL.reset_cache();
}

pub fn set_allow_impure_without_caching(allow: bool) {
    GLOBAL.set_allow_impure_without_caching(allow);
}

pub fn allow_impure_without_caching() -> bool {
    GLOBAL.allow_impure_without_caching()
}
