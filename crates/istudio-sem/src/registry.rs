//! Function registry.
//!
//! Signatures are stored in declaration order and indexed by both name
//! and declaring node. On a duplicate declaration the first entry wins.

use crate::types::Type;
use istudio_front::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One declared parameter of a function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    pub node_id: NodeId,
    pub ty: Type,
}

/// The inferred signature of one declared function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub node_id: NodeId,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Type,
}

/// All function signatures declared by one module, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    entries: Vec<FunctionSignature>,
    by_name: HashMap<String, usize>,
    by_node: HashMap<NodeId, usize>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `signature`.
    ///
    /// Returns the index of the registered entry and whether the
    /// declaration was new. A duplicate name keeps the first entry.
    pub fn declare(&mut self, signature: FunctionSignature) -> (usize, bool) {
        if let Some(&existing) = self.by_name.get(&signature.name) {
            return (existing, false);
        }
        let index = self.entries.len();
        self.by_name.insert(signature.name.clone(), index);
        self.by_node.insert(signature.node_id, index);
        self.entries.push(signature);
        (index, true)
    }

    /// Looks up a signature by function name.
    pub fn lookup(&self, name: &str) -> Option<&FunctionSignature> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Looks up a signature by its declaring node.
    pub fn lookup_node(&self, id: NodeId) -> Option<&FunctionSignature> {
        self.by_node.get(&id).map(|&index| &self.entries[index])
    }

    /// Index of the signature declared by `id`, if any.
    pub fn index_of_node(&self, id: NodeId) -> Option<usize> {
        self.by_node.get(&id).copied()
    }

    /// The signature at `index`.
    pub fn get(&self, index: usize) -> Option<&FunctionSignature> {
        self.entries.get(index)
    }

    /// Mutable access to the signature at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FunctionSignature> {
        self.entries.get_mut(index)
    }

    /// Every signature, in declaration order.
    pub fn entries(&self) -> &[FunctionSignature] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Type, TypeKind};

    fn signature(name: &str, node_id: NodeId) -> FunctionSignature {
        FunctionSignature {
            name: name.to_string(),
            node_id,
            parameters: Vec::new(),
            return_type: Type::unknown(),
        }
    }

    #[test]
    fn declarations_keep_order() {
        let mut registry = FunctionRegistry::new();
        registry.declare(signature("add", 1));
        registry.declare(signature("triple", 5));

        let names: Vec<&str> = registry.entries().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["add", "triple"]);
    }

    #[test]
    fn duplicate_declaration_keeps_the_first() {
        let mut registry = FunctionRegistry::new();
        let (first, inserted) = registry.declare(signature("add", 1));
        assert!(inserted);

        let (second, inserted) = registry.declare(signature("add", 9));
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("add").unwrap().node_id, 1);
    }

    #[test]
    fn lookup_by_name_and_node() {
        let mut registry = FunctionRegistry::new();
        registry.declare(signature("greet", 3));

        assert!(registry.lookup("greet").is_some());
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.lookup_node(3).unwrap().name, "greet");
        assert!(registry.lookup_node(4).is_none());
    }

    #[test]
    fn mutation_through_index() {
        let mut registry = FunctionRegistry::new();
        let (index, _) = registry.declare(signature("add", 1));
        registry.get_mut(index).unwrap().return_type = Type::new(TypeKind::Integer);
        assert_eq!(
            registry.lookup("add").unwrap().return_type.kind,
            TypeKind::Integer
        );
    }
}
