//! Lexer for IStudio source text.
//!
//! Produces a [`TokenStream`] whose spans are byte ranges into the input.
//! Comments (and whitespace, when enabled) are kept as trivia attached to
//! the next token; trivia after the last token attaches to the `EndOfFile`
//! token.

use crate::token::{LexerConfig, Token, TokenKind, TokenStream, Trivia, TriviaKind};
use istudio_support::{DiagnosticCode, DiagnosticReporter, Span};

const KEYWORDS: &[&str] = &[
    "module", "fn", "pub", "let", "mut", "struct", "enum", "ct", "return",
];

const COMPOUND_SYMBOLS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "::", "->", "=>", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", ">>=",
];

// Bytes that can begin a symbol token. Anything else outside the
// identifier, number, string, and whitespace classes lexes as Unknown.
const SYMBOL_STARTS: &[u8] = b"(){}[],;:.=+-*/%!<>&|^";

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_identifier_continue(byte: u8) -> bool {
    is_identifier_start(byte) || byte.is_ascii_digit()
}

// Matches C's isspace: ASCII whitespace plus vertical tab.
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn is_compound_symbol(symbol: &str) -> bool {
    COMPOUND_SYMBOLS.contains(&symbol)
}

/// Streaming lexer over one source text.
pub struct Lexer<'a> {
    source: &'a str,
    config: LexerConfig,
    position: usize,
    pending_leading: Vec<Trivia>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, config: LexerConfig) -> Self {
        Self {
            source,
            config,
            position: 0,
            pending_leading: Vec::new(),
        }
    }

    /// Lexes the whole input. The returned stream always ends with an
    /// `EndOfFile` token spanning `[len, len)`.
    pub fn lex(mut self) -> TokenStream {
        let mut tokens = Vec::new();

        while self.position < self.source.len() {
            self.skip_whitespace();
            if self.position >= self.source.len() {
                break;
            }

            if self.source[self.position..].starts_with("//") {
                let start = self.position;
                self.position += 2;
                while let Some(byte) = self.peek_byte() {
                    if byte == b'\n' {
                        break;
                    }
                    self.position += 1;
                }
                self.capture_trivia(TriviaKind::Comment, start, self.position);
                continue;
            }

            let byte = self.byte_at(self.position);
            let token = if is_identifier_start(byte) {
                self.read_identifier()
            } else if byte.is_ascii_digit() {
                self.read_number()
            } else if byte == b'"' {
                self.read_string()
            } else if SYMBOL_STARTS.contains(&byte) {
                self.read_symbol()
            } else {
                self.read_unknown()
            };
            tokens.push(token);
        }

        let end = self.source.len();
        tokens.push(Token {
            kind: TokenKind::EndOfFile,
            lexeme: String::new(),
            span: Span::empty_at(end),
            leading_trivia: std::mem::take(&mut self.pending_leading),
        });

        TokenStream { tokens }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        self.position += 1;
        while self.position < self.source.len()
            && is_identifier_continue(self.byte_at(self.position))
        {
            self.position += 1;
        }

        let mut token = self.make_token(TokenKind::Identifier, start);
        if is_keyword(&token.lexeme) {
            token.kind = TokenKind::Keyword;
        }
        token
    }

    fn read_number(&mut self) -> Token {
        let start = self.position;
        while self.position < self.source.len() && self.byte_at(self.position).is_ascii_digit() {
            self.position += 1;
        }
        if self.peek_byte() == Some(b'.') {
            self.position += 1;
            while self.position < self.source.len()
                && self.byte_at(self.position).is_ascii_digit()
            {
                self.position += 1;
            }
        }

        self.make_token(TokenKind::Number, start)
    }

    fn read_string(&mut self) -> Token {
        let start = self.position;
        self.position += 1; // opening quote
        while let Some(byte) = self.peek_byte() {
            if byte == b'"' {
                break;
            }
            if byte == b'\\' && self.position + 1 < self.source.len() {
                self.position += 2;
                continue;
            }
            self.position += 1;
        }

        if self.position < self.source.len() {
            self.position += 1; // closing quote
        }

        self.make_token(TokenKind::StringLiteral, start)
    }

    fn read_symbol(&mut self) -> Token {
        let start = self.position;
        self.position += 1;
        while self.position < self.source.len() {
            let next = self.byte_at(self.position);
            if !next.is_ascii() {
                break;
            }
            let candidate = &self.source[start..self.position + 1];
            if !is_compound_symbol(candidate) {
                break;
            }
            self.position += 1;
        }

        self.make_token(TokenKind::Symbol, start)
    }

    fn read_unknown(&mut self) -> Token {
        let start = self.position;
        let width = self.source[start..]
            .chars()
            .next()
            .map_or(1, |ch| ch.len_utf8());
        self.position = start + width;
        self.make_token(TokenKind::Unknown, start)
    }

    fn skip_whitespace(&mut self) {
        let start = self.position;
        while self.position < self.source.len() && is_space(self.byte_at(self.position)) {
            self.position += 1;
        }
        if self.position > start && self.config.capture_whitespace {
            self.pending_leading
                .push(self.make_trivia(TriviaKind::Whitespace, start, self.position));
        }
    }

    fn capture_trivia(&mut self, kind: TriviaKind, start: usize, end: usize) {
        let keep = match kind {
            TriviaKind::Whitespace => self.config.capture_whitespace,
            TriviaKind::Comment => self.config.capture_comments,
        };
        if keep {
            self.pending_leading.push(self.make_trivia(kind, start, end));
        }
    }

    fn make_trivia(&self, kind: TriviaKind, start: usize, end: usize) -> Trivia {
        Trivia {
            kind,
            text: self.source[start..end].to_string(),
            span: Span::new(start, end),
        }
    }

    fn make_token(&mut self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            lexeme: self.source[start..self.position].to_string(),
            span: Span::new(start, self.position),
            leading_trivia: std::mem::take(&mut self.pending_leading),
        }
    }

    fn byte_at(&self, index: usize) -> u8 {
        self.source.as_bytes()[index]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }
}

/// Lexes `source` with `config`.
pub fn lex(source: &str, config: LexerConfig) -> TokenStream {
    Lexer::new(source, config).lex()
}

/// Reports every `Unknown` token in `stream` as a lexer diagnostic.
pub fn report_unknown_tokens(stream: &TokenStream, reporter: &mut DiagnosticReporter) {
    for token in stream {
        if token.kind == TokenKind::Unknown {
            reporter.report(
                DiagnosticCode::LexUnknownToken,
                format!("unknown token '{}'", token.lexeme),
                token.span,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tokenizes_keywords_identifiers_and_symbols() {
        let source = "module demo\nfn main() {\n  return 42\n}\n";
        let stream = lex(source, LexerConfig::default());
        assert!(!stream.is_empty());

        let first = &stream.tokens[0];
        assert_eq!(first.kind, TokenKind::Keyword);
        assert_eq!(first.lexeme, "module");

        assert_eq!(stream.tokens[1].lexeme, "demo");
        assert_eq!(stream.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
        assert!(stream.iter().any(|t| t.kind == TokenKind::Identifier));
        assert!(stream.iter().any(|t| t.kind == TokenKind::Symbol));
    }

    #[test]
    fn captures_trivia_when_enabled() {
        let source = "  let x = 1\n// trailing comment\n";
        let config = LexerConfig {
            capture_whitespace: true,
            capture_comments: true,
        };
        let stream = lex(source, config);
        assert!(stream.len() >= 2);

        let first = &stream.tokens[0];
        assert_eq!(first.kind, TokenKind::Keyword);
        assert_eq!(first.lexeme, "let");
        assert_eq!(first.leading_trivia.len(), 1);
        assert_eq!(first.leading_trivia[0].kind, TriviaKind::Whitespace);
        assert_eq!(first.leading_trivia[0].text, "  ");

        let eof = stream.last().unwrap();
        assert_eq!(eof.kind, TokenKind::EndOfFile);
        assert!(eof
            .leading_trivia
            .iter()
            .any(|trivia| trivia.kind == TriviaKind::Comment));
    }

    #[test]
    fn comments_attach_to_next_token_by_default() {
        let source = "// heading\nlet x = 1;";
        let stream = lex(source, LexerConfig::default());
        let first = &stream.tokens[0];
        assert_eq!(first.lexeme, "let");
        assert_eq!(first.leading_trivia.len(), 1);
        assert_eq!(first.leading_trivia[0].kind, TriviaKind::Comment);
        assert_eq!(first.leading_trivia[0].text, "// heading");
    }

    #[test]
    fn compound_symbols_lex_greedily() {
        let stream = lex("a >>= b == c -> d", LexerConfig::default());
        let symbols: Vec<&str> = stream
            .iter()
            .filter(|t| t.kind == TokenKind::Symbol)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(symbols, vec![">>=", "==", "->"]);
    }

    #[test]
    fn numbers_take_at_most_one_decimal_point() {
        let stream = lex("3.14.15", LexerConfig::default());
        assert_eq!(stream.tokens[0].kind, TokenKind::Number);
        assert_eq!(stream.tokens[0].lexeme, "3.14");
        assert_eq!(stream.tokens[1].lexeme, ".");
        assert_eq!(stream.tokens[2].lexeme, "15");
    }

    #[test]
    fn string_literal_keeps_quotes_and_skips_escapes() {
        let stream = lex(r#"let s = "he \"said\"";"#, LexerConfig::default());
        let literal = stream
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .unwrap();
        assert_eq!(literal.lexeme, r#""he \"said\"""#);
    }

    #[test]
    fn unterminated_string_runs_to_end_of_input() {
        let stream = lex("\"open", LexerConfig::default());
        assert_eq!(stream.tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(stream.tokens[0].lexeme, "\"open");
        assert_eq!(stream.tokens[0].span, Span::new(0, 5));
    }

    #[test]
    fn unexpected_bytes_lex_as_unknown() {
        let stream = lex("let x = @;", LexerConfig::default());
        let unknown = stream
            .iter()
            .find(|t| t.kind == TokenKind::Unknown)
            .unwrap();
        assert_eq!(unknown.lexeme, "@");

        let mut reporter = DiagnosticReporter::new();
        report_unknown_tokens(&stream, &mut reporter);
        assert_eq!(reporter.len(), 1);
        assert_eq!(
            reporter.diagnostics()[0].code,
            DiagnosticCode::LexUnknownToken
        );
    }

    #[test]
    fn empty_input_yields_single_eof() {
        let stream = lex("", LexerConfig::default());
        assert_eq!(stream.len(), 1);
        let eof = &stream.tokens[0];
        assert_eq!(eof.kind, TokenKind::EndOfFile);
        assert_eq!(eof.span, Span::new(0, 0));
    }

    proptest! {
        #[test]
        fn stream_always_ends_with_eof(source in ".{0,120}") {
            let stream = lex(&source, LexerConfig::default());
            prop_assert!(stream.len() >= 1);
            prop_assert_eq!(stream.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
        }

        #[test]
        fn spans_are_ordered_and_in_bounds(source in "[ -~]{0,120}") {
            let stream = lex(&source, LexerConfig::default());
            let mut cursor = 0usize;
            for token in &stream {
                prop_assert!(token.span.start >= cursor);
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= source.len());
                cursor = token.span.end;
            }
        }

        #[test]
        fn lexemes_match_source_slices(source in "[ -~]{0,120}") {
            let stream = lex(&source, LexerConfig::default());
            for token in &stream {
                if token.kind != TokenKind::EndOfFile {
                    prop_assert_eq!(
                        token.lexeme.as_str(),
                        &source[token.span.start..token.span.end]
                    );
                }
            }
        }
    }
}
