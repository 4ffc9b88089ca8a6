//! The semantic type model.

use istudio_front::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of types inference can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    #[default]
    Unknown,
    Void,
    Integer,
    Float,
    Bool,
    String,
    Function,
}

impl TypeKind {
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Unknown => "unknown",
            TypeKind::Void => "void",
            TypeKind::Integer => "integer",
            TypeKind::Float => "float",
            TypeKind::Bool => "bool",
            TypeKind::String => "string",
            TypeKind::Function => "function",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An inferred type.
///
/// Function types carry a `reference` to their declaring [`NodeId`]; two
/// function types agree only when they reference the same declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    pub reference: Option<NodeId>,
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            reference: None,
        }
    }

    pub fn unknown() -> Self {
        Self::new(TypeKind::Unknown)
    }

    pub fn function(reference: NodeId) -> Self {
        Self {
            kind: TypeKind::Function,
            reference: Some(reference),
        }
    }

    pub fn is_known(&self) -> bool {
        self.kind != TypeKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_type_is_unknown() {
        let ty = Type::default();
        assert_eq!(ty.kind, TypeKind::Unknown);
        assert!(ty.reference.is_none());
        assert!(!ty.is_known());
    }

    #[test]
    fn function_types_reference_their_declaration() {
        let ty = Type::function(7);
        assert_eq!(ty.kind, TypeKind::Function);
        assert_eq!(ty.reference, Some(7));
    }

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(TypeKind::Integer.to_string(), "integer");
        assert_eq!(TypeKind::Void.to_string(), "void");
    }

    #[test]
    fn type_serializes_to_json() {
        let ty = Type::function(7);
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, r#"{"kind":"Function","reference":7}"#);
        let restored: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, restored);
    }
}
