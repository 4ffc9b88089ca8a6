//! Recursive-descent parser with Pratt-style binary precedence.
//!
//! Grammar accepted at module level:
//!
//! ```text
//! module    := [ "module" IDENT [";"] ] item*
//! item      := function | statement
//! function  := [ "pub" ] "fn" IDENT "(" [ IDENT ("," IDENT)* ] ")" block
//! statement := "let" [ "mut" ] IDENT "=" expr ";"
//!            | "return" [ expr ] ";"
//!            | block
//!            | expr ";"
//! ```
//!
//! Expressions use precedence climbing. Assignment (`=`) is
//! right-associative at the lowest level; unary `!`, `-`, and `+` bind
//! tighter than every binary operator.

use crate::ast::{AstContext, AstKind, NodeId};
use crate::error::{FrontError, FrontResult};
use crate::token::{Token, TokenKind, TokenStream};
use istudio_support::Span;

const ASSIGNMENT_PRECEDENCE: i32 = 1;
// Above '*', '/', '%' so unary operators take only their operand.
const UNARY_PRECEDENCE: i32 = 8;

fn precedence_of(token: &Token) -> i32 {
    if token.kind != TokenKind::Symbol {
        return -1;
    }
    match token.lexeme.as_str() {
        "=" => ASSIGNMENT_PRECEDENCE,
        "||" => 2,
        "&&" => 3,
        "==" | "!=" => 4,
        "<" | ">" | "<=" | ">=" => 5,
        "+" | "-" => 6,
        "*" | "/" | "%" => 7,
        _ => -1,
    }
}

fn is_assignment_operator(token: &Token) -> bool {
    token.kind == TokenKind::Symbol
        && matches!(token.lexeme.as_str(), "=" | "+=" | "-=" | "*=" | "/=")
}

fn is_unary_prefix(token: &Token) -> bool {
    token.kind == TokenKind::Symbol && matches!(token.lexeme.as_str(), "!" | "-" | "+")
}

fn span_covering(tokens: &TokenStream) -> Span {
    match (tokens.tokens.first(), tokens.tokens.last()) {
        (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
        _ => Span::default(),
    }
}

/// Parses one token stream into an [`AstContext`].
pub struct Parser<'a> {
    tokens: &'a TokenStream,
    context: &'a mut AstContext,
    index: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenStream, context: &'a mut AstContext) -> Self {
        Self {
            tokens,
            context,
            index: 0,
        }
    }

    /// Parses a whole module: an optional `module` header followed by
    /// functions and statements until end of input.
    pub fn parse_module(&mut self) -> FrontResult<NodeId> {
        let module_id = self
            .context
            .create_node(AstKind::Module, span_covering(self.tokens));

        if self.check_keyword("module") {
            self.advance();
            let (name, _) = self.consume_identifier("expected module name after 'module'")?;
            self.match_symbol(";");
            self.context.node_mut(module_id).value = name;
        }

        while !self.at_end() {
            let item = if self.at_function() {
                self.parse_function()?
            } else {
                self.parse_statement()?
            };
            self.context.node_mut(module_id).children.push(item);
        }

        Ok(module_id)
    }

    /// Parses a single expression.
    pub fn parse_expression(&mut self) -> FrontResult<NodeId> {
        self.parse_expression_min(ASSIGNMENT_PRECEDENCE)
    }

    fn at_function(&self) -> bool {
        if self.check_keyword("fn") {
            return true;
        }
        self.check_keyword("pub")
            && matches!(self.peek(1), Some(token) if token.is_keyword("fn"))
    }

    fn parse_function(&mut self) -> FrontResult<NodeId> {
        let is_public = self.match_keyword("pub");
        let fn_span = self.consume_keyword("fn", "expected 'fn'")?;

        let (name, name_span) = self.consume_identifier("expected function name after 'fn'")?;
        let name_id = self
            .context
            .create_node_with_value(AstKind::IdentifierExpr, name_span, name);

        let open = self.consume_symbol("(", "expected '(' after function name")?;
        let params_id = self.context.create_node(AstKind::ArgumentList, open);
        if !self.check_symbol(")") {
            loop {
                let (param, param_span) = self.consume_identifier("expected parameter name")?;
                let param_id = self.context.create_node_with_value(
                    AstKind::IdentifierExpr,
                    param_span,
                    param,
                );
                self.context.node_mut(params_id).children.push(param_id);
                if !self.match_symbol(",") {
                    break;
                }
            }
        }
        let close = self.consume_symbol(")", "expected ')' after parameters")?;
        self.context.node_mut(params_id).span = open.merge(close);

        let body = self.parse_block_statement()?;
        let body_span = self.context.node(body).span;

        let marker = if is_public { "pub" } else { "" };
        let fn_id = self.context.create_node_with_value(
            AstKind::Function,
            fn_span.merge(body_span),
            marker,
        );
        let node = self.context.node_mut(fn_id);
        node.children.push(name_id);
        node.children.push(params_id);
        node.children.push(body);
        Ok(fn_id)
    }

    fn parse_statement(&mut self) -> FrontResult<NodeId> {
        if self.check_keyword("let") {
            return self.parse_let_statement();
        }
        if self.check_keyword("return") {
            return self.parse_return_statement();
        }
        if self.check_symbol("{") {
            return self.parse_block_statement();
        }

        let expr = self.parse_expression()?;
        let semi = self.consume_symbol(";", "expected ';' after expression")?;
        let span = self.context.node(expr).span.merge(semi);
        let stmt = self.context.create_node(AstKind::ExpressionStmt, span);
        self.context.node_mut(stmt).children.push(expr);
        Ok(stmt)
    }

    fn parse_block_statement(&mut self) -> FrontResult<NodeId> {
        let open = self.consume_symbol("{", "expected '{'")?;
        let block_id = self.context.create_node(AstKind::BlockStmt, open);

        while !self.at_end() && !self.check_symbol("}") {
            let stmt = self.parse_statement()?;
            self.context.node_mut(block_id).children.push(stmt);
        }

        let close = self.consume_symbol("}", "expected '}' to close block")?;
        self.context.node_mut(block_id).span = open.merge(close);
        Ok(block_id)
    }

    fn parse_let_statement(&mut self) -> FrontResult<NodeId> {
        let let_span = self.consume_keyword("let", "expected 'let'")?;
        let is_mutable = self.match_keyword("mut");

        let (name, name_span) = self.consume_identifier("expected identifier after 'let'")?;
        let name_id = self
            .context
            .create_node_with_value(AstKind::IdentifierExpr, name_span, name);

        self.consume_symbol("=", "expected '=' in let binding")?;
        let initializer = self.parse_expression()?;
        let semi = self.consume_symbol(";", "expected ';' after let binding")?;

        let marker = if is_mutable { "mut" } else { "let" };
        let let_id = self.context.create_node_with_value(
            AstKind::LetStmt,
            let_span.merge(semi),
            marker,
        );
        let node = self.context.node_mut(let_id);
        node.children.push(name_id);
        node.children.push(initializer);
        Ok(let_id)
    }

    fn parse_return_statement(&mut self) -> FrontResult<NodeId> {
        let return_span = self.consume_keyword("return", "expected 'return'")?;
        let value = if self.check_symbol(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let semi = self.consume_symbol(";", "expected ';' after return")?;

        let return_id = self
            .context
            .create_node(AstKind::ReturnStmt, return_span.merge(semi));
        if let Some(value) = value {
            self.context.node_mut(return_id).children.push(value);
        }
        Ok(return_id)
    }

    fn parse_expression_min(&mut self, min_precedence: i32) -> FrontResult<NodeId> {
        let mut left = self.parse_prefix_expression()?;

        while !self.at_end() {
            let op = self.current();
            let precedence = precedence_of(op);
            if precedence < min_precedence {
                break;
            }

            let operator = op.lexeme.clone();
            let is_assignment = is_assignment_operator(op);
            self.advance();

            let next_min = if is_assignment {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expression_min(next_min)?;

            let span = self
                .context
                .node(left)
                .span
                .merge(self.context.node(right).span);
            let kind = if is_assignment {
                AstKind::AssignmentExpr
            } else {
                AstKind::BinaryExpr
            };
            let expr = self.context.create_node_with_value(kind, span, operator);
            let node = self.context.node_mut(expr);
            node.children.push(left);
            node.children.push(right);
            left = expr;
        }

        Ok(left)
    }

    fn parse_prefix_expression(&mut self) -> FrontResult<NodeId> {
        if self.at_end() {
            return Err(FrontError::UnexpectedEndOfInput);
        }

        if is_unary_prefix(self.current()) {
            let operator = self.current().lexeme.clone();
            let op_span = self.current().span;
            self.advance();

            let operand = self.parse_expression_min(UNARY_PRECEDENCE)?;
            let span = op_span.merge(self.context.node(operand).span);
            let expr = self
                .context
                .create_node_with_value(AstKind::UnaryExpr, span, operator);
            self.context.node_mut(expr).children.push(operand);
            return Ok(expr);
        }

        let primary = self.parse_primary_expression()?;
        self.parse_call_expression(primary)
    }

    fn parse_primary_expression(&mut self) -> FrontResult<NodeId> {
        if self.at_end() {
            return Err(FrontError::UnexpectedEndOfInput);
        }

        let token = self.current();
        let kind = token.kind;
        let lexeme = token.lexeme.clone();
        let span = token.span;
        self.advance();

        match kind {
            TokenKind::Identifier => Ok(self.context.create_node_with_value(
                AstKind::IdentifierExpr,
                span,
                lexeme,
            )),
            TokenKind::Number | TokenKind::StringLiteral | TokenKind::Keyword => {
                Ok(self
                    .context
                    .create_node_with_value(AstKind::LiteralExpr, span, lexeme))
            }
            TokenKind::Symbol if lexeme == "(" => {
                let expr = self.parse_expression()?;
                let closing = self.consume_symbol(")", "expected ')' after expression")?;
                let group = self
                    .context
                    .create_node(AstKind::GroupExpr, span.merge(closing));
                self.context.node_mut(group).children.push(expr);
                Ok(group)
            }
            _ => Err(FrontError::syntax(
                "unexpected token in primary expression",
                span,
            )),
        }
    }

    fn parse_call_expression(&mut self, callee: NodeId) -> FrontResult<NodeId> {
        let mut current_callee = callee;
        let mut current_span = self.context.node(callee).span;

        while self.match_symbol("(") {
            let mut args = Vec::new();
            if !self.check_symbol(")") {
                loop {
                    args.push(self.parse_expression()?);
                    if !self.match_symbol(",") {
                        break;
                    }
                }
            }

            let close = self.consume_symbol(")", "expected ')' after arguments")?;
            let span = current_span.merge(close);
            let call = self.context.create_node(AstKind::CallExpr, span);
            let node = self.context.node_mut(call);
            node.children.push(current_callee);
            node.children.extend(args);

            current_callee = call;
            current_span = span;
        }

        Ok(current_callee)
    }

    // ── Token cursor helpers ────────────────────────────────────────────

    fn check_keyword(&self, keyword: &str) -> bool {
        !self.at_end() && self.current().is_keyword(keyword)
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_keyword(&mut self, keyword: &str, message: &str) -> FrontResult<Span> {
        if !self.check_keyword(keyword) {
            return Err(self.unexpected(message));
        }
        let span = self.current().span;
        self.advance();
        Ok(span)
    }

    fn check_symbol(&self, symbol: &str) -> bool {
        !self.at_end() && self.current().is_symbol(symbol)
    }

    fn match_symbol(&mut self, symbol: &str) -> bool {
        if self.check_symbol(symbol) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_symbol(&mut self, symbol: &str, message: &str) -> FrontResult<Span> {
        if !self.check_symbol(symbol) {
            return Err(self.unexpected(message));
        }
        let span = self.current().span;
        self.advance();
        Ok(span)
    }

    fn consume_identifier(&mut self, message: &str) -> FrontResult<(String, Span)> {
        if self.at_end() || self.current().kind != TokenKind::Identifier {
            return Err(self.unexpected(message));
        }
        let token = self.current();
        let result = (token.lexeme.clone(), token.span);
        self.advance();
        Ok(result)
    }

    fn unexpected(&self, message: &str) -> FrontError {
        match self.tokens.get(self.index) {
            Some(token) => FrontError::syntax(message, token.span),
            None => FrontError::UnexpectedEndOfInput,
        }
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.index += 1;
        }
    }

    fn current(&self) -> &Token {
        &self.tokens.tokens[self.index]
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len() || self.current().kind == TokenKind::EndOfFile
    }
}

/// Parses `tokens` as a module into `context`.
pub fn parse_module(tokens: &TokenStream, context: &mut AstContext) -> FrontResult<NodeId> {
    Parser::new(tokens, context).parse_module()
}

/// Parses `tokens` as a single expression into `context`.
pub fn parse_expression(tokens: &TokenStream, context: &mut AstContext) -> FrontResult<NodeId> {
    Parser::new(tokens, context).parse_expression()
}
