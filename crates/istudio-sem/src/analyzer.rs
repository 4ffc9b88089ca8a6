//! Type inference over the AST.
//!
//! The analyzer walks a module, declares symbols and functions, and
//! records a type for every node it visits in a [`TypeTable`]. It never
//! aborts: problems become diagnostics and inference continues with
//! `Unknown` where nothing better is known.

use crate::error::{SemError, SemResult};
use crate::registry::{FunctionParameter, FunctionRegistry, FunctionSignature};
use crate::symbols::SymbolTable;
use crate::types::{Type, TypeKind};
use istudio_front::{AstContext, AstKind, AstNode, NodeId};
use istudio_support::{Diagnostic, DiagnosticCode, DiagnosticReporter, Span};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

fn is_bool_literal(value: &str) -> bool {
    value == "true" || value == "false"
}

fn is_number_literal(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let mut seen_decimal = false;
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            continue;
        }
        if ch == '.' && !seen_decimal {
            seen_decimal = true;
            continue;
        }
        return false;
    }
    true
}

fn is_float_literal(value: &str) -> bool {
    value.contains('.')
}

fn pick_known(lhs: Type, rhs: Type) -> Type {
    if lhs.is_known() {
        lhs
    } else {
        rhs
    }
}

/// Inference results keyed by node id.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TypeTable {
    types: HashMap<NodeId, Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }

    /// The recorded type for `id`, or `Unknown` when none was recorded.
    pub fn get(&self, id: NodeId) -> Type {
        self.types.get(&id).copied().unwrap_or_default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Everything one analysis run produces.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub types: TypeTable,
    pub functions: FunctionRegistry,
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Whether any error-class diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.code.is_error())
    }
}

struct ActiveFunction {
    signature: Option<usize>,
    inferred_return: Type,
    saw_return: bool,
}

/// Walks one module and infers types for its nodes.
pub struct SemanticAnalyzer<'a> {
    ast: &'a AstContext,
    reporter: DiagnosticReporter,
    symbols: SymbolTable,
    functions: FunctionRegistry,
    types: TypeTable,
    function_stack: Vec<ActiveFunction>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(ast: &'a AstContext) -> Self {
        Self {
            ast,
            reporter: DiagnosticReporter::new(),
            symbols: SymbolTable::new(),
            functions: FunctionRegistry::new(),
            types: TypeTable::new(),
            function_stack: Vec::new(),
        }
    }

    /// Analyzes the subtree rooted at `root`.
    ///
    /// # Panics
    ///
    /// Panics when `root` was not produced by this analyzer's context.
    pub fn analyze(&mut self, root: NodeId) {
        debug!(root, "semantic analysis");
        self.types.clear();
        self.symbols = SymbolTable::new();
        self.functions = FunctionRegistry::new();
        self.analyze_node(root);
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.reporter.diagnostics()
    }

    /// Consumes the analyzer, yielding its results.
    pub fn finish(self) -> Analysis {
        Analysis {
            types: self.types,
            functions: self.functions,
            diagnostics: self.reporter.into_diagnostics(),
        }
    }

    fn analyze_node(&mut self, id: NodeId) {
        let node = self.ast.node(id);
        match node.kind {
            AstKind::Module => self.analyze_module(node),
            AstKind::Function => self.analyze_function(node),
            AstKind::BlockStmt => self.analyze_block(node),
            AstKind::LetStmt => self.analyze_let(node),
            AstKind::ReturnStmt => self.analyze_return(node),
            AstKind::ExpressionStmt => self.analyze_expression_statement(node),
            _ => {}
        }
    }

    fn analyze_module(&mut self, node: &AstNode) {
        for &child in &node.children {
            self.analyze_node(child);
        }
        self.types.set(node.id, Type::unknown());
    }

    fn analyze_block(&mut self, node: &AstNode) {
        self.symbols.push_scope();
        for &child in &node.children {
            self.analyze_node(child);
        }
        self.symbols.pop_scope();
        self.types.set(node.id, Type::unknown());
    }

    fn analyze_function(&mut self, node: &AstNode) {
        if node.children.is_empty() {
            self.types.set(node.id, Type::function(node.id));
            return;
        }

        let name_node = self.ast.node(node.children[0]);
        let name = name_node.value.clone();
        self.declare_symbol(&name, name_node.id, name_node.span);

        let function_type = Type::function(node.id);
        self.types.set(name_node.id, function_type);
        self.types.set(node.id, function_type);

        let mut parameters = Vec::new();
        let mut next_index = 1;
        if node.children.len() > 1 {
            let potential_params = self.ast.node(node.children[1]);
            if potential_params.kind == AstKind::ArgumentList {
                for &param_id in &potential_params.children {
                    let param_node = self.ast.node(param_id);
                    parameters.push(FunctionParameter {
                        name: param_node.value.clone(),
                        node_id: param_node.id,
                        ty: Type::unknown(),
                    });
                }
                next_index = 2;
            }
        }

        let (entry, inserted) = self.functions.declare(FunctionSignature {
            name: name.clone(),
            node_id: node.id,
            parameters,
            return_type: Type::unknown(),
        });
        if !inserted {
            self.reporter.report(
                DiagnosticCode::SemDuplicateSymbol,
                format!("duplicate function '{name}'"),
                name_node.span,
            );
        }

        self.function_stack.push(ActiveFunction {
            signature: Some(entry),
            inferred_return: Type::unknown(),
            saw_return: false,
        });

        self.symbols.push_scope();
        let declared: Vec<(String, NodeId, Type)> = self.functions.get(entry).map_or_else(
            Vec::new,
            |signature| {
                signature
                    .parameters
                    .iter()
                    .map(|param| (param.name.clone(), param.node_id, param.ty))
                    .collect()
            },
        );
        for (param_name, param_id, param_type) in declared {
            let span = self.ast.node(param_id).span;
            self.declare_symbol(&param_name, param_id, span);
            self.types.set(param_id, param_type);
        }

        for &child in &node.children[next_index..] {
            self.analyze_node(child);
        }

        self.symbols.pop_scope();

        let active = self
            .function_stack
            .pop()
            .unwrap_or_else(|| unreachable!("function stack was pushed above"));

        let mut return_type = active.inferred_return;
        if !active.saw_return && return_type.kind == TypeKind::Unknown {
            return_type = Type::new(TypeKind::Void);
        }
        let param_types: Vec<Type> = self.functions.get(entry).map_or_else(Vec::new, |sig| {
            sig.parameters
                .iter()
                .map(|param| self.types.get(param.node_id))
                .collect()
        });
        if let Some(signature) = self.functions.get_mut(entry) {
            signature.return_type = return_type;
            for (param, ty) in signature.parameters.iter_mut().zip(param_types) {
                param.ty = ty;
            }
        }
    }

    fn analyze_let(&mut self, node: &AstNode) {
        if node.children.is_empty() {
            self.types.set(node.id, Type::unknown());
            return;
        }

        let name_node = self.ast.node(node.children[0]);
        let name = name_node.value.clone();
        let name_id = name_node.id;
        let name_span = name_node.span;
        self.declare_symbol(&name, name_id, name_span);

        let init_type = if node.children.len() > 1 {
            self.analyze_expression(node.children[1])
        } else {
            Type::unknown()
        };

        self.types.set(name_id, init_type);
        self.types.set(node.id, init_type);
    }

    fn analyze_return(&mut self, node: &AstNode) {
        let mut return_type = if let Some(&value) = node.children.first() {
            self.analyze_expression(value)
        } else {
            Type::new(TypeKind::Void)
        };
        self.types.set(node.id, return_type);

        if let Some(active) = self.function_stack.last() {
            if let Some(index) = active.signature {
                if let Some(signature) = self.functions.get(index) {
                    let declared = signature.return_type;
                    let message =
                        format!("return type mismatch for function '{}'", signature.name);
                    let unified = self.unify_types(declared, return_type, node.span, &message);
                    if let Some(signature) = self.functions.get_mut(index) {
                        signature.return_type = unified;
                    }
                    return_type = unified;
                }
            }
        }
        self.update_current_function_return(return_type, node);
    }

    fn analyze_expression_statement(&mut self, node: &AstNode) {
        if let Some(&child) = node.children.first() {
            let expr_type = self.analyze_expression(child);
            self.types.set(node.id, expr_type);
        } else {
            self.types.set(node.id, Type::unknown());
        }
    }

    fn analyze_expression(&mut self, id: NodeId) -> Type {
        let node = self.ast.node(id);
        match node.kind {
            AstKind::IdentifierExpr => self.analyze_identifier(node),
            AstKind::LiteralExpr => self.analyze_literal(node),
            AstKind::BinaryExpr => self.analyze_binary(node),
            AstKind::AssignmentExpr => self.analyze_assignment(node),
            AstKind::UnaryExpr => self.analyze_unary(node),
            AstKind::GroupExpr => self.analyze_group(node),
            AstKind::CallExpr => self.analyze_call(node),
            _ => {
                for &child in &node.children {
                    self.analyze_expression(child);
                }
                let result = Type::unknown();
                self.types.set(node.id, result);
                result
            }
        }
    }

    fn analyze_identifier(&mut self, node: &AstNode) -> Type {
        let Some(symbol_id) = self.symbols.lookup(&node.value) else {
            self.reporter.report(
                DiagnosticCode::SemUnknownIdentifier,
                format!("use of undeclared symbol '{}'", node.value),
                node.span,
            );
            let ty = Type::unknown();
            self.types.set(node.id, ty);
            return ty;
        };

        let decl_type = self.types.get(symbol_id);
        self.types.set(node.id, decl_type);
        decl_type
    }

    fn analyze_literal(&mut self, node: &AstNode) -> Type {
        let value = node.value.as_str();
        let mut result = Type::unknown();

        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            result.kind = TypeKind::String;
        } else if is_bool_literal(value) {
            result.kind = TypeKind::Bool;
        } else if is_number_literal(value) {
            result.kind = if is_float_literal(value) {
                TypeKind::Float
            } else {
                TypeKind::Integer
            };
        }

        self.types.set(node.id, result);
        result
    }

    fn analyze_binary(&mut self, node: &AstNode) -> Type {
        if node.children.len() < 2 {
            let result = Type::unknown();
            self.types.set(node.id, result);
            return result;
        }

        let left = self.analyze_expression(node.children[0]);
        let right = self.analyze_expression(node.children[1]);
        let message = format!("type mismatch in '{}' expression", node.value);
        let unified = self.unify_types(left, right, node.span, &message);

        // Comparisons and logical operators produce Bool regardless of
        // their operand type.
        let result = match node.value.as_str() {
            "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => Type::new(TypeKind::Bool),
            _ => unified,
        };
        self.types.set(node.id, result);
        result
    }

    fn analyze_assignment(&mut self, node: &AstNode) -> Type {
        if node.children.len() < 2 {
            let result = Type::unknown();
            self.types.set(node.id, result);
            return result;
        }

        let lhs_id = node.children[0];
        let rhs_id = node.children[1];
        let mut left = self.analyze_expression(lhs_id);
        let right = self.analyze_expression(rhs_id);
        self.unify_types(left, right, node.span, "type mismatch in assignment");

        let lhs_node = self.ast.node(lhs_id);
        if lhs_node.kind == AstKind::IdentifierExpr {
            if let Some(decl_id) = self.symbols.lookup(&lhs_node.value) {
                let decl_type = self.types.get(decl_id);
                let message = format!("assignment to '{}'", lhs_node.value);
                let unified = self.unify_types(decl_type, right, lhs_node.span, &message);
                self.types.set(decl_id, unified);
                self.types.set(lhs_id, unified);
                left = unified;
            }
        }

        let result = pick_known(right, left);
        self.types.set(node.id, result);
        result
    }

    fn analyze_unary(&mut self, node: &AstNode) -> Type {
        let Some(&operand_id) = node.children.first() else {
            let result = Type::unknown();
            self.types.set(node.id, result);
            return result;
        };
        let operand = self.analyze_expression(operand_id);
        self.types.set(node.id, operand);
        operand
    }

    fn analyze_group(&mut self, node: &AstNode) -> Type {
        let Some(&inner_id) = node.children.first() else {
            let result = Type::unknown();
            self.types.set(node.id, result);
            return result;
        };
        let inner = self.analyze_expression(inner_id);
        self.types.set(node.id, inner);
        inner
    }

    fn analyze_call(&mut self, node: &AstNode) -> Type {
        let Some(&callee_id) = node.children.first() else {
            let result = Type::unknown();
            self.types.set(node.id, result);
            return result;
        };

        let callee_type = self.analyze_expression(callee_id);
        let argument_types: Vec<Type> = node.children[1..]
            .iter()
            .map(|&arg| self.analyze_expression(arg))
            .collect();

        let mut result = Type::unknown();
        if callee_type.kind == TypeKind::Function {
            if let Some(index) = callee_type
                .reference
                .and_then(|reference| self.functions.index_of_node(reference))
            {
                let (callee_name, params): (String, Vec<(String, NodeId)>) = {
                    let signature = &self.functions.entries()[index];
                    (
                        signature.name.clone(),
                        signature
                            .parameters
                            .iter()
                            .map(|param| (param.name.clone(), param.node_id))
                            .collect(),
                    )
                };

                if params.len() != argument_types.len() {
                    self.reporter.report(
                        DiagnosticCode::SemArgumentCountMismatch,
                        format!(
                            "expected {} argument(s) but got {} when calling '{}'",
                            params.len(),
                            argument_types.len(),
                            callee_name
                        ),
                        node.span,
                    );
                }

                let limit = params.len().min(argument_types.len());
                for (i, (param_name, param_id)) in params.iter().take(limit).enumerate() {
                    let param_type = self.types.get(*param_id);
                    let arg_span = self.ast.node(node.children[1 + i]).span;
                    let message =
                        format!("argument type mismatch for parameter '{param_name}'");
                    let unified =
                        self.unify_types(param_type, argument_types[i], arg_span, &message);
                    self.types.set(*param_id, unified);
                    if let Some(signature) = self.functions.get_mut(index) {
                        signature.parameters[i].ty = unified;
                    }
                }

                if let Some(signature) = self.functions.get(index) {
                    result = signature.return_type;
                }
            }
        }

        self.types.set(node.id, result);
        result
    }

    fn declare_symbol(&mut self, name: &str, id: NodeId, span: Span) {
        if !self.symbols.insert(name, id) {
            self.reporter.report(
                DiagnosticCode::SemDuplicateSymbol,
                format!("duplicate symbol '{name}'"),
                span,
            );
        }
    }

    fn update_current_function_return(&mut self, return_type: Type, node: &AstNode) {
        let Some(top) = self.function_stack.len().checked_sub(1) else {
            return;
        };

        if return_type.kind != TypeKind::Void {
            self.function_stack[top].saw_return = true;
        }

        let signature_index = self.function_stack[top].signature;
        if return_type.kind == TypeKind::Unknown {
            self.function_stack[top].inferred_return = Type::unknown();
            if let Some(signature) = signature_index.and_then(|i| self.functions.get_mut(i)) {
                signature.return_type = Type::unknown();
            }
            return;
        }

        let conflict_message = match signature_index.and_then(|i| self.functions.get(i)) {
            Some(signature) => {
                format!("conflicting return types in function '{}'", signature.name)
            }
            None => "conflicting return types".to_string(),
        };

        let inferred = self.function_stack[top].inferred_return;
        let unified = self.unify_types(inferred, return_type, node.span, &conflict_message);
        self.function_stack[top].inferred_return = unified;
        if let Some(signature) = signature_index.and_then(|i| self.functions.get_mut(i)) {
            signature.return_type = unified;
        }
    }

    fn unify_types(&mut self, lhs: Type, rhs: Type, span: Span, context: &str) -> Type {
        if lhs.kind == TypeKind::Unknown {
            return rhs;
        }
        if rhs.kind == TypeKind::Unknown {
            return lhs;
        }

        if lhs.kind == rhs.kind {
            if lhs.kind == TypeKind::Function && lhs.reference != rhs.reference {
                self.reporter
                    .report(DiagnosticCode::SemTypeMismatch, context, span);
                return Type::unknown();
            }
            return lhs;
        }

        self.reporter
            .report(DiagnosticCode::SemTypeMismatch, context, span);
        Type::unknown()
    }
}

/// Analyzes `root`, which must be a `Module` node.
pub fn analyze_module(ast: &AstContext, root: NodeId) -> SemResult<Analysis> {
    let kind = ast.node(root).kind;
    if kind != AstKind::Module {
        return Err(SemError::NotAModule(kind));
    }
    let mut analyzer = SemanticAnalyzer::new(ast);
    analyzer.analyze(root);
    Ok(analyzer.finish())
}
