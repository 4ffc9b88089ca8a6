//! Scoped symbol table.

use istudio_front::NodeId;
use std::collections::HashMap;

/// A stack of lexical scopes mapping names to their declaring node.
///
/// There is always at least one scope; the outermost scope cannot be
/// popped.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, NodeId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost scope. The outermost scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `name` in the innermost scope.
    ///
    /// Returns `false` when the name is already declared there; the
    /// original declaration wins.
    pub fn insert(&mut self, name: impl Into<String>, id: NodeId) -> bool {
        let scope = self.scopes.last_mut().unwrap_or_else(|| unreachable!());
        let name = name.into();
        if scope.contains_key(&name) {
            return false;
        }
        scope.insert(name, id);
        true
    }

    /// Resolves `name`, searching from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
