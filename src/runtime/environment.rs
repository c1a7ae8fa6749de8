use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::Value;
use std::collections::HashMap;

#[derive(Default)]
struct Scope {
    bindings: HashMap<String, Value>,
}

/// Chain of lexical scopes. The bottom scope is the process-wide root
/// ("global") scope; each call pushes one frame on top of it.
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Walks from the innermost scope toward the root, returning the
    /// first binding found.
    pub fn lookup(&self, name: &str) -> RuntimeResult<Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.bindings.get(name) {
                return Ok(value.clone());
            }
        }
        Err(RuntimeError::NameNotFound {
            name: name.to_string(),
        })
    }

    /// Shadow-on-write: only ever touches the innermost scope, even when
    /// an outer scope already binds the name.
    pub fn bind(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Registration into the root scope; function and class definitions
    /// are globally visible regardless of where they execute.
    pub fn bind_root(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    /// Pushes a call frame pre-populated with parameter bindings and
    /// returns the depth to hand back to `restore`.
    pub fn push_frame(&mut self, bindings: HashMap<String, Value>) -> usize {
        let depth = self.scopes.len();
        self.scopes.push(Scope { bindings });
        depth
    }

    /// Truncates back to a saved depth. Callers invoke this on every
    /// exit path, so a failing body cannot leak its frame.
    pub fn restore(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
