//! Tokens, trivia, and the lexer configuration.

use istudio_support::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The syntactic class of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Number,
    StringLiteral,
    Keyword,
    Symbol,
    EndOfFile,
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "Identifier",
            TokenKind::Number => "Number",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::Keyword => "Keyword",
            TokenKind::Symbol => "Symbol",
            TokenKind::EndOfFile => "EndOfFile",
            TokenKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Classes of source text that carry no syntax but are worth keeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriviaKind {
    Whitespace,
    Comment,
}

/// A run of whitespace or a comment, attached to the token that follows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trivia {
    pub kind: TriviaKind,
    /// Raw source text of the run.
    pub text: String,
    pub span: Span,
}

/// A lexed token with the trivia that preceded it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text; string literals keep their quotes.
    pub lexeme: String,
    pub span: Span,
    /// Trivia between the previous token and this one.
    pub leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Whether this token is the keyword `word`.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }

    /// Whether this token is the symbol `symbol`.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme == symbol
    }
}

/// Controls which trivia the lexer keeps.
#[derive(Clone, Copy, Debug)]
pub struct LexerConfig {
    pub capture_whitespace: bool,
    pub capture_comments: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            capture_whitespace: false,
            capture_comments: true,
        }
    }
}

/// The complete token sequence for one source text.
///
/// Always ends with an `EndOfFile` token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
