use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{ast::expression::Parameter, runtime::callable::WeakCallable};

/// Late-bound reference from a function body to the function itself.
///
/// Filled once the body has been evaluated into a callable. Holding it weakly
/// keeps the function from owning itself.
pub type SelfSlot = Arc<OnceCell<WeakCallable>>;

#[derive(Clone)]
pub enum Binding {
    /// Frame slot, `depth` parent links up from the current frame.
    Slot { depth: usize, index: usize },
    SelfRef(SelfSlot),
}

/// Compile-time mirror of the runtime frame chain.
///
/// Every lambda pushes a scope; a block pushes one only when it declares
/// variables, matching when the lowered code allocates a frame.
pub struct ScopeChain {
    scopes: Vec<Vec<u32>>,
    recursion: Option<(u32, SelfSlot)>,
}

impl ScopeChain {
    pub fn new(recursion: Option<(&Parameter, SelfSlot)>) -> Self {
        Self {
            scopes: Vec::new(),
            recursion: recursion.map(|(parameter, slot)| (parameter.id, slot)),
        }
    }

    pub fn push(&mut self, variables: &[Parameter]) {
        self.scopes.push(variables.iter().map(|v| v.id).collect());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn resolve(&self, parameter: &Parameter) -> Option<Binding> {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if let Some(index) = scope.iter().rposition(|&id| id == parameter.id) {
                return Some(Binding::Slot { depth, index });
            }
        }
        match &self.recursion {
            Some((id, slot)) if *id == parameter.id => Some(Binding::SelfRef(slot.clone())),
            _ => None,
        }
    }
}
