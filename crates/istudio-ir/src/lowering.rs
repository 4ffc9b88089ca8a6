//! AST to IR lowering.
//!
//! Lowering builds one IR function per entry in the analysis' function
//! registry: the signature from the inferred types, the body from the
//! function's block. Intermediate results get synthesized names (`t0`,
//! `t1`, ...); `let`-bound values take the binding's name as their
//! instruction result. Module-level statements outside functions are not
//! lowered.

use crate::error::{LowerError, LowerResult};
use crate::module::{IrFunction, IrModule, IrParameter, IrValue};
use crate::types::IrType;
use istudio_front::{AstContext, AstKind, NodeId};
use istudio_sem::{Analysis, FunctionSignature, Type, TypeKind};
use std::collections::{HashMap, HashSet};
use tracing::debug;

fn map_type(ty: Type) -> IrType {
    match ty.kind {
        TypeKind::Void => IrType::void(),
        TypeKind::Integer => IrType::i64(),
        TypeKind::Float => IrType::f64(),
        TypeKind::Bool => IrType::bool(),
        TypeKind::String => IrType::string(),
        TypeKind::Function => IrType::generic("fn"),
        TypeKind::Unknown => IrType::void(),
    }
}

struct FunctionLowerer<'a> {
    ast: &'a AstContext,
    function: IrFunction,
    env: HashMap<String, String>,
    temps: HashSet<String>,
    next_temp: usize,
}

impl<'a> FunctionLowerer<'a> {
    fn new(ast: &'a AstContext, signature: &FunctionSignature) -> Self {
        let mut function = IrFunction::new(&signature.name, map_type(signature.return_type));
        let mut env = HashMap::new();
        for param in &signature.parameters {
            function
                .parameters
                .push(IrParameter::new(&param.name, map_type(param.ty)));
            env.insert(param.name.clone(), param.name.clone());
        }
        Self {
            ast,
            function,
            env,
            temps: HashSet::new(),
            next_temp: 0,
        }
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        self.temps.insert(name.clone());
        name
    }

    fn lower_statement(&mut self, id: NodeId) -> LowerResult<()> {
        let node = self.ast.node(id);
        match node.kind {
            AstKind::BlockStmt => {
                for &child in &node.children {
                    self.lower_statement(child)?;
                }
                Ok(())
            }
            AstKind::LetStmt => {
                let name = self.ast.node(node.children[0]).value.clone();
                let operand = if node.children.len() > 1 {
                    self.lower_expression(node.children[1])?
                } else {
                    String::new()
                };
                let bound = self.bind(&name, operand);
                self.env.insert(name, bound);
                Ok(())
            }
            AstKind::ReturnStmt => {
                let operands = match node.children.first() {
                    Some(&value) => vec![self.lower_expression(value)?],
                    None => Vec::new(),
                };
                self.function
                    .push_instruction(IrValue::new("", "ret", operands));
                Ok(())
            }
            AstKind::ExpressionStmt => {
                if let Some(&child) = node.children.first() {
                    self.lower_expression(child)?;
                }
                Ok(())
            }
            kind => Err(LowerError::UnsupportedNode {
                kind,
                span: node.span,
            }),
        }
    }

    /// Gives a `let`-bound value its binding's name.
    ///
    /// When the initializer produced a fresh instruction, the instruction
    /// result is renamed; an initializer that was already a name (a
    /// parameter or earlier binding) becomes an alias.
    fn bind(&mut self, name: &str, operand: String) -> String {
        if self.temps.contains(&operand) {
            if let Some(last) = self.function.instructions.last_mut() {
                if last.result == operand {
                    last.result = name.to_string();
                    self.temps.remove(&operand);
                    return name.to_string();
                }
            }
        }
        operand
    }

    fn lower_expression(&mut self, id: NodeId) -> LowerResult<String> {
        let node = self.ast.node(id);
        match node.kind {
            AstKind::LiteralExpr => {
                let result = self.fresh_temp();
                self.function.push_instruction(IrValue::new(
                    result.clone(),
                    "const",
                    vec![node.value.clone()],
                ));
                Ok(result)
            }
            AstKind::IdentifierExpr => {
                self.env
                    .get(&node.value)
                    .cloned()
                    .ok_or_else(|| LowerError::UnknownSymbol {
                        name: node.value.clone(),
                        span: node.span,
                    })
            }
            AstKind::GroupExpr => self.lower_expression(node.children[0]),
            AstKind::BinaryExpr => {
                let op = match node.value.as_str() {
                    "+" => "add",
                    "-" => "sub",
                    "*" => "mul",
                    "/" => "div",
                    "%" => "mod",
                    other => {
                        return Err(LowerError::UnsupportedOperator {
                            operator: other.to_string(),
                            span: node.span,
                        })
                    }
                };
                let lhs = self.lower_expression(node.children[0])?;
                let rhs = self.lower_expression(node.children[1])?;
                let result = self.fresh_temp();
                self.function
                    .push_instruction(IrValue::new(result.clone(), op, vec![lhs, rhs]));
                Ok(result)
            }
            AstKind::UnaryExpr => match node.value.as_str() {
                "-" => {
                    let operand = self.lower_expression(node.children[0])?;
                    let result = self.fresh_temp();
                    self.function.push_instruction(IrValue::new(
                        result.clone(),
                        "neg",
                        vec![operand],
                    ));
                    Ok(result)
                }
                "+" => self.lower_expression(node.children[0]),
                other => Err(LowerError::UnsupportedOperator {
                    operator: other.to_string(),
                    span: node.span,
                }),
            },
            AstKind::CallExpr => {
                let callee = self.ast.node(node.children[0]);
                if callee.kind != AstKind::IdentifierExpr {
                    return Err(LowerError::IndirectCall { span: node.span });
                }
                let mut operands = vec![callee.value.clone()];
                for &arg in &node.children[1..] {
                    operands.push(self.lower_expression(arg)?);
                }
                let result = self.fresh_temp();
                self.function
                    .push_instruction(IrValue::new(result.clone(), "call", operands));
                Ok(result)
            }
            kind => Err(LowerError::UnsupportedNode {
                kind,
                span: node.span,
            }),
        }
    }

    fn finish(self) -> IrFunction {
        self.function
    }
}

/// Lowers an analyzed module into IR.
///
/// One IR function is built per registry entry, in declaration order.
pub fn lower_module(
    ast: &AstContext,
    analysis: &Analysis,
    module_name: impl Into<String>,
) -> LowerResult<IrModule> {
    let mut module = IrModule::new(module_name);
    debug!(module = module.name(), "lowering to IR");

    for signature in analysis.functions.entries() {
        let mut lowerer = FunctionLowerer::new(ast, signature);

        let node = ast.node(signature.node_id);
        let mut body_start = 1;
        if node
            .children
            .get(1)
            .is_some_and(|&child| ast.node(child).kind == AstKind::ArgumentList)
        {
            body_start = 2;
        }
        for &child in node.children.get(body_start..).unwrap_or(&[]) {
            lowerer.lower_statement(child)?;
        }

        module.add_function(lowerer.finish());
    }

    Ok(module)
}
