//! Arena-backed abstract syntax tree.
//!
//! Nodes live in an [`AstContext`] and refer to each other by [`NodeId`]
//! in creation order. A node's `value` holds whatever text the kind needs:
//! the operator for binary and unary expressions, the lexeme for literals
//! and identifiers, `"let"`/`"mut"` for bindings, `"pub"` for public
//! functions, and the module name for a named module.

use istudio_support::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its [`AstContext`].
pub type NodeId = usize;

/// The grammatical class of an AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AstKind {
    Unknown,
    Module,
    Function,
    Declaration,
    Expression,
    AssignmentExpr,
    BinaryExpr,
    UnaryExpr,
    LiteralExpr,
    IdentifierExpr,
    CallExpr,
    ArgumentList,
    GroupExpr,
    BlockStmt,
    LetStmt,
    ReturnStmt,
    ExpressionStmt,
}

impl AstKind {
    /// The name used by AST dumps.
    pub fn name(self) -> &'static str {
        match self {
            AstKind::Unknown => "Unknown",
            AstKind::Module => "Module",
            AstKind::Function => "Function",
            AstKind::Declaration => "Declaration",
            AstKind::Expression => "Expression",
            AstKind::AssignmentExpr => "AssignmentExpr",
            AstKind::BinaryExpr => "BinaryExpr",
            AstKind::UnaryExpr => "UnaryExpr",
            AstKind::LiteralExpr => "LiteralExpr",
            AstKind::IdentifierExpr => "IdentifierExpr",
            AstKind::CallExpr => "CallExpr",
            AstKind::ArgumentList => "ArgumentList",
            AstKind::GroupExpr => "GroupExpr",
            AstKind::BlockStmt => "BlockStmt",
            AstKind::LetStmt => "LetStmt",
            AstKind::ReturnStmt => "ReturnStmt",
            AstKind::ExpressionStmt => "ExpressionStmt",
        }
    }
}

impl fmt::Display for AstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: AstKind,
    pub span: Span,
    pub value: String,
    pub children: Vec<NodeId>,
}

/// Owns every node of one parse.
#[derive(Clone, Debug, Default)]
pub struct AstContext {
    nodes: Vec<AstNode>,
}

impl AstContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node with an empty value and returns its id.
    pub fn create_node(&mut self, kind: AstKind, span: Span) -> NodeId {
        self.create_node_with_value(kind, span, String::new())
    }

    /// Creates a node carrying `value` and returns its id.
    pub fn create_node_with_value(
        &mut self,
        kind: AstKind,
        span: Span,
        value: impl Into<String>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(AstNode {
            id,
            kind,
            span,
            value: value.into(),
            children: Vec::new(),
        });
        id
    }

    /// The node for `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not produced by this context.
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    /// Mutable access to the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not produced by this context.
    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id]
    }

    /// The node for `id`, if it exists.
    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
