pub mod errors;
pub mod lower;
pub mod scope;

use std::{fmt, sync::Arc};

use crate::{
    ast::{
        expression::{Expression, Parameter},
        reduce::reduce,
        stats::{TreeStats, tree_stats},
        ty::Ty,
    },
    compiler::{
        errors::CompileError,
        lower::{Lowering, Services},
        scope::SelfSlot,
    },
    rewrite::{RewriteOptions, Rewriter},
    runtime::{cache::MemoCache, callable::Callable, error::RuntimeError, value::Value},
};

/// A recursive function body together with the placeholder it uses to
/// refer to itself.
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    name: String,
    placeholder: Parameter,
    body: Expression,
}

impl FunctionDefinition {
    /// Creates the placeholder of type `ty` and passes it to `body`, which
    /// builds the function as a lambda.
    ///
    /// ```
    /// use purefn::{ast::{Expression, Ty}, compiler::FunctionDefinition};
    ///
    /// let countdown = FunctionDefinition::new("countdown", Ty::func1(Ty::UInt64, Ty::UInt64), |me| {
    ///     let n = purefn::ast::Parameter::new("n", Ty::UInt64);
    ///     Expression::lambda(
    ///         vec![n.clone()],
    ///         Expression::condition(
    ///             Expression::equal(Expression::parameter(&n), Expression::constant(0u64)),
    ///             Expression::constant(0u64),
    ///             Expression::call(
    ///                 Expression::parameter(me),
    ///                 Expression::subtract(Expression::parameter(&n), Expression::constant(1u64)),
    ///             ),
    ///         ),
    ///     )
    /// });
    /// assert_eq!(countdown.name(), "countdown");
    /// ```
    pub fn new(
        name: impl Into<String>,
        ty: Ty,
        body: impl FnOnce(&Parameter) -> Expression,
    ) -> Self {
        let name = name.into();
        let placeholder = Parameter::new(name.clone(), ty);
        let body = body(&placeholder);
        Self {
            name,
            placeholder,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placeholder(&self) -> &Parameter {
        &self.placeholder
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }
}

/// Compiled form of a [`FunctionDefinition`].
pub struct PureFunction {
    name: String,
    callable: Callable,
    /// Set when built with caching; top-level calls then go through it too.
    cache: Option<Arc<MemoCache>>,
    tree: Expression,
    stats: TreeStats,
}

impl PureFunction {
    pub fn call(&self, argument: impl Into<Value>) -> Result<Value, RuntimeError> {
        let argument = argument.into();
        match &self.cache {
            Some(cache) => cache.lookup_or_compute(&self.callable, &argument, || {
                self.callable.call1(argument.clone())
            }),
            None => self.callable.call1(argument),
        }
    }

    pub fn call_with(&self, arguments: &[Value]) -> Result<Value, RuntimeError> {
        self.callable.call(arguments)
    }

    /// The function itself; this is also the identity its memoized results
    /// are stored under.
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// The rewritten and reduced tree that was lowered.
    pub fn tree(&self) -> &Expression {
        &self.tree
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PureFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PureFunction")
            .field("name", &self.name)
            .field("callable", &self.callable)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Rewrites, reduces and lowers `definition`.
///
/// The rewritten body is evaluated once, producing the function value. The
/// bound self variable is then initialized to that value, so recursive calls
/// and top-level calls go through the same callable and, with caching, the
/// same cache entries.
pub fn compile(
    definition: &FunctionDefinition,
    options: RewriteOptions,
    services: &Services,
) -> Result<PureFunction, CompileError> {
    if !matches!(definition.body, Expression::Lambda { .. }) {
        return Err(CompileError::UnsupportedConstruct {
            construct: definition.body.kind_name(),
            reason: "cannot be a function definition body; expected a lambda",
        });
    }

    let bound = definition.placeholder.fresh_like();
    let rewritten = Rewriter::new(&definition.placeholder, &bound, options)
        .rewrite(definition.body.clone())?;
    let tree = reduce(rewritten);
    let stats = tree_stats(&tree);
    log::debug!(
        "compiled `{}` ({:?}): {} nodes, {} memoized, {} parallel",
        definition.name,
        options,
        stats.nodes,
        stats.memoized,
        stats.parallel
    );

    let slot = SelfSlot::default();
    let code = Lowering::new(services, Some((&bound, Arc::clone(&slot)))).lower(&tree)?;
    let callable = lower::run(&code)?.as_callable()?.clone();
    // The slot is fresh, so this is its only initialization.
    let _ = slot.set(callable.downgrade());

    Ok(PureFunction {
        name: definition.name.clone(),
        callable,
        cache: options.caching.then(|| Arc::clone(&services.cache)),
        tree,
        stats,
    })
}

/// Evaluates `expr` once and returns a zero-argument function yielding the
/// result.
pub fn build_constant(expr: &Expression, services: &Services) -> Result<Callable, CompileError> {
    let tree = reduce(expr.clone());
    let code = Lowering::new(services, None).lower(&tree)?;
    let value = lower::run(&code)?;
    log::debug!("built constant function yielding {}", value);
    Ok(Callable::constant(value))
}
