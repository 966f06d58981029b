//! Lowering of expression trees into nested closures.
//!
//! Each node becomes a [`Code`] closure that evaluates it against the
//! current frame. Variables are resolved to `(depth, index)` slots while
//! lowering, so nothing is looked up by name at run time. Jumps
//! (`Goto`, `Loop` exits) travel as [`Flow::Jump`] through the `Err` channel
//! until the block, label or loop owning the target catches them.

use std::sync::Arc;

use crate::{
    ast::{
        expression::{Expression, LabelTarget, Parameter},
        operator::{BinaryOp, UnaryOp},
        ty::Ty,
    },
    compiler::{
        errors::CompileError,
        scope::{Binding, ScopeChain, SelfSlot},
    },
    runtime::{
        cache::MemoCache,
        callable::{Callable, WeakCallable},
        error::RuntimeError,
        frame::{Env, Frame},
        ops,
        parallel::ParallelEvaluator,
        value::Value,
    },
};

pub type Code = Arc<dyn Fn(&Env) -> Result<Value, Flow> + Send + Sync>;

/// Non-local exit from a lowered expression.
#[derive(Debug, Clone)]
pub enum Flow {
    Error(RuntimeError),
    Jump { target: LabelTarget, value: Value },
}

impl Flow {
    /// A jump that reached a function boundary has no target left.
    pub fn into_error(self) -> RuntimeError {
        match self {
            Flow::Error(err) => err,
            Flow::Jump { target, .. } => RuntimeError::UnhandledJump { label: target.name },
        }
    }
}

impl From<RuntimeError> for Flow {
    fn from(err: RuntimeError) -> Self {
        Flow::Error(err)
    }
}

/// Shared runtime state lowered code reaches into.
#[derive(Clone)]
pub struct Services {
    pub cache: Arc<MemoCache>,
    pub parallel: Arc<ParallelEvaluator>,
}

fn code<F>(f: F) -> Code
where
    F: Fn(&Env) -> Result<Value, Flow> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Initial value of a freshly declared variable.
fn default_value(ty: &Ty) -> Value {
    match ty {
        Ty::Bool => Value::Bool(false),
        Ty::Int32 => Value::Int32(0),
        Ty::Int64 => Value::Int64(0),
        Ty::UInt64 => Value::UInt64(0),
        Ty::Float64 => Value::Float64(0.0),
        _ => Value::Unit,
    }
}

pub struct Lowering<'s> {
    services: &'s Services,
    scopes: ScopeChain,
}

impl<'s> Lowering<'s> {
    /// `recursion` names the parameter that stands for the function being
    /// built, if any.
    pub fn new(services: &'s Services, recursion: Option<(&Parameter, SelfSlot)>) -> Self {
        Self {
            services,
            scopes: ScopeChain::new(recursion),
        }
    }

    pub fn lower(&mut self, expr: &Expression) -> Result<Code, CompileError> {
        match expr {
            Expression::Constant { value, .. } => {
                let value = value.clone();
                Ok(code(move |_| Ok(value.clone())))
            }
            Expression::Parameter(parameter) => self.lower_parameter(parameter),
            Expression::Unary { op, operand, ty } => {
                let operand = self.lower(operand)?;
                let (op, ty) = (*op, ty.clone());
                Ok(match op {
                    UnaryOp::Convert | UnaryOp::ConvertChecked => {
                        let checked = op == UnaryOp::ConvertChecked;
                        code(move |env| Ok(ops::convert(&operand(env)?, &ty, checked)?))
                    }
                    _ => code(move |env| Ok(ops::unary(op, &operand(env)?, &ty)?)),
                })
            }
            Expression::Binary {
                op, left, right, ..
            } => {
                let left = self.lower(left)?;
                let right = self.lower(right)?;
                Ok(lower_binary(*op, left, right))
            }
            Expression::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => {
                let test = self.lower(test)?;
                let if_true = self.lower(if_true)?;
                let if_false = self.lower(if_false)?;
                Ok(code(move |env| {
                    if test(env)?.as_bool()? {
                        if_true(env)
                    } else {
                        if_false(env)
                    }
                }))
            }
            Expression::Invoke {
                callee, arguments, ..
            } => {
                let callee = self.lower(callee)?;
                let arguments = self.lower_all(arguments)?;
                Ok(code(move |env| {
                    let function = callee(env)?;
                    let function = function.as_callable()?;
                    let args = arguments
                        .iter()
                        .map(|argument| argument(env))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(function.call(&args)?)
                }))
            }
            Expression::Member { object, member, .. } => {
                let object = self.lower(object)?;
                let member = member.clone();
                Ok(code(move |env| read_member(&object(env)?, &member)))
            }
            Expression::Block {
                variables,
                expressions,
                ..
            } => self.lower_block(variables, expressions),
            Expression::Loop {
                body,
                break_label,
                continue_label,
                ..
            } => {
                let body = self.lower(body)?;
                let break_id = break_label.as_ref().map(|l| l.id);
                let continue_id = continue_label.as_ref().map(|l| l.id);
                Ok(code(move |env| loop {
                    match body(env) {
                        Ok(_) => {}
                        Err(Flow::Jump { target, value }) if Some(target.id) == break_id => {
                            return Ok(value);
                        }
                        Err(Flow::Jump { target, .. }) if Some(target.id) == continue_id => {}
                        Err(flow) => return Err(flow),
                    }
                }))
            }
            Expression::Label { target, default } => {
                let default = match default {
                    Some(default) => Some(self.lower(default)?),
                    None => None,
                };
                let id = target.id;
                Ok(code(move |env| {
                    let Some(default) = &default else {
                        return Ok(Value::Unit);
                    };
                    match default(env) {
                        Err(Flow::Jump { target, value }) if target.id == id => Ok(value),
                        other => other,
                    }
                }))
            }
            Expression::Goto { target, value, .. } => {
                let value = match value {
                    Some(value) => Some(self.lower(value)?),
                    None => None,
                };
                let target = target.clone();
                Ok(code(move |env| {
                    let value = match &value {
                        Some(value) => value(env)?,
                        None => Value::Unit,
                    };
                    Err(Flow::Jump {
                        target: target.clone(),
                        value,
                    })
                }))
            }
            Expression::Lambda {
                parameters, body, ..
            } => {
                self.scopes.push(parameters);
                let body = self.lower(body);
                self.scopes.pop();
                Ok(lower_lambda(parameters.len(), body?))
            }
            Expression::Assign { variable, value } => {
                let value = self.lower(value)?;
                match self.scopes.resolve(variable) {
                    Some(Binding::Slot { depth, index }) => Ok(code(move |env| {
                        let value = value(env)?;
                        env.set(depth, index, value.clone());
                        Ok(value)
                    })),
                    Some(Binding::SelfRef(_)) => Err(CompileError::UnsupportedConstruct {
                        construct: "assign",
                        reason: "cannot rebind the function's own self reference",
                    }),
                    None => Err(CompileError::UnboundParameter {
                        name: variable.name.clone(),
                    }),
                }
            }
            Expression::Memoize {
                callee, argument, ..
            } => {
                let callee = self.lower(callee)?;
                let argument = self.lower(argument)?;
                let cache = self.services.cache.clone();
                Ok(code(move |env| {
                    let function = callee(env)?;
                    let function = function.as_callable()?;
                    let argument = argument(env)?;
                    cache.lookup_or_compute(function, &argument, || {
                        function.call1(argument.clone()).map_err(Flow::from)
                    })
                }))
            }
            Expression::Parallel {
                op, left, right, ..
            } => {
                let left = self.lower(left)?;
                let right = self.lower(right)?;
                let parallel = self.services.parallel.clone();
                let op = *op;
                Ok(code(move |env| {
                    parallel.evaluate(op, || left(env), || right(env))
                }))
            }
        }
    }

    fn lower_all(&mut self, exprs: &[Expression]) -> Result<Vec<Code>, CompileError> {
        exprs.iter().map(|e| self.lower(e)).collect()
    }

    fn lower_parameter(&self, parameter: &Parameter) -> Result<Code, CompileError> {
        match self.scopes.resolve(parameter) {
            Some(Binding::Slot { depth, index }) => Ok(code(move |env| Ok(env.get(depth, index)))),
            Some(Binding::SelfRef(slot)) => Ok(code(move |_| {
                // Unset only while the body itself is being evaluated.
                Ok(slot
                    .get()
                    .and_then(WeakCallable::upgrade)
                    .map(Value::Function)
                    .unwrap_or(Value::Unit))
            })),
            None => Err(CompileError::UnboundParameter {
                name: parameter.name.clone(),
            }),
        }
    }

    fn lower_block(
        &mut self,
        variables: &[Parameter],
        expressions: &[Expression],
    ) -> Result<Code, CompileError> {
        let has_frame = !variables.is_empty();
        if has_frame {
            self.scopes.push(variables);
        }
        let lowered = self.lower_all(expressions);
        if has_frame {
            self.scopes.pop();
        }
        let steps = lowered?;

        let labels: Vec<(u32, usize)> = expressions
            .iter()
            .enumerate()
            .filter_map(|(index, e)| match e {
                Expression::Label { target, .. } => Some((target.id, index)),
                _ => None,
            })
            .collect();
        let defaults: Vec<Value> = variables.iter().map(|v| default_value(&v.ty)).collect();

        Ok(code(move |env| {
            let frame;
            let env = if has_frame {
                frame = Frame::enclosed(env, defaults.iter().cloned());
                &frame
            } else {
                env
            };

            let mut pc = 0;
            let mut last = Value::Unit;
            let mut resumed: Option<Value> = None;
            while pc < steps.len() {
                // A label reached by a jump yields the jump's value.
                let result = match resumed.take() {
                    Some(value) => Ok(value),
                    None => steps[pc](env),
                };
                match result {
                    Ok(value) => {
                        last = value;
                        pc += 1;
                    }
                    Err(Flow::Jump { target, value }) => {
                        match labels.iter().find(|(id, _)| *id == target.id) {
                            Some(&(_, index)) => {
                                pc = index;
                                resumed = Some(value);
                            }
                            None => return Err(Flow::Jump { target, value }),
                        }
                    }
                    Err(flow) => return Err(flow),
                }
            }
            Ok(last)
        }))
    }
}

fn lower_binary(op: BinaryOp, left: Code, right: Code) -> Code {
    match op {
        BinaryOp::AndAlso => code(move |env| {
            if !left(env)?.as_bool()? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(right(env)?.as_bool()?))
        }),
        BinaryOp::OrElse => code(move |env| {
            if left(env)?.as_bool()? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(right(env)?.as_bool()?))
        }),
        _ => code(move |env| {
            let l = left(env)?;
            let r = right(env)?;
            Ok(ops::binary(op, &l, &r)?)
        }),
    }
}

fn lower_lambda(arity: usize, body: Code) -> Code {
    code(move |env| {
        let env = env.clone();
        let body = body.clone();
        Ok(Value::Function(Callable::new(arity, move |args| {
            let frame = Frame::enclosed(&env, args.iter().cloned());
            body(&frame).map_err(Flow::into_error)
        })))
    })
}

fn read_member(object: &Value, member: &str) -> Result<Value, Flow> {
    let found = match object {
        Value::Record(record) => record.field(member).cloned(),
        _ => None,
    };
    found.ok_or_else(|| {
        let type_name = match object {
            Value::Record(record) => record.ty().to_string(),
            other => other.type_name().to_string(),
        };
        Flow::Error(RuntimeError::MissingMember {
            member: member.to_string(),
            type_name,
        })
    })
}

/// Evaluates lowered code outside any function.
pub fn run(code: &Code) -> Result<Value, RuntimeError> {
    code(&Frame::root()).map_err(Flow::into_error)
}
