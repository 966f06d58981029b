use std::sync::Arc;

use parking_lot::RwLock;

use crate::runtime::value::Value;

/// Shared handle to the innermost frame; lambdas capture it by clone.
pub type Env = Arc<Frame>;

/// Variable slots for one lambda call or one evaluation of a block that
/// declares variables.
///
/// Slots are addressed by `(depth, index)` pairs resolved at compile time:
/// `depth` counts parent links to follow, `index` picks the slot.
pub struct Frame {
    slots: Box<[RwLock<Value>]>,
    parent: Option<Env>,
}

impl Frame {
    pub fn root() -> Env {
        Arc::new(Self {
            slots: Box::new([]),
            parent: None,
        })
    }

    pub fn enclosed(parent: &Env, values: impl IntoIterator<Item = Value>) -> Env {
        Arc::new(Self {
            slots: values.into_iter().map(RwLock::new).collect(),
            parent: Some(parent.clone()),
        })
    }

    fn ancestor(&self, depth: usize) -> &Frame {
        let mut frame = self;
        for _ in 0..depth {
            match &frame.parent {
                Some(parent) => frame = parent,
                None => break,
            }
        }
        frame
    }

    pub fn get(&self, depth: usize, index: usize) -> Value {
        self.ancestor(depth).slots[index].read().clone()
    }

    pub fn set(&self, depth: usize, index: usize, value: Value) {
        *self.ancestor(depth).slots[index].write() = value;
    }
}
