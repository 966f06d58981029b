pub mod ast;
pub mod compiler;
pub mod curry;
pub mod diagnostics;
pub mod engine;
pub mod rewrite;
pub mod runtime;
pub mod samples;

pub use compiler::{FunctionDefinition, PureFunction, errors::CompileError};
pub use engine::{
    Engine, EngineConfig, allow_impure_without_caching, build_constant, build_recursive,
    recursive_lambda, reset_cache, set_allow_impure_without_caching,
};
pub use runtime::{callable::Callable, error::RuntimeError, value::Value};
