//! Diagnostic codes and the reporter shared by all compiler phases.
//!
//! Codes are grouped by phase: 0 for generic notes, 1000-1999 for the
//! lexer, 2000-2999 for semantic analysis. The numeric values are stable
//! so downstream tooling can match on them.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric code identifying a class of diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Informational note attached to another diagnostic or the module.
    GenericNote,
    /// The lexer encountered a byte it has no rule for.
    LexUnknownToken,
    /// A symbol was declared twice in the same scope.
    SemDuplicateSymbol,
    /// An identifier was used without a declaration in scope.
    SemUnknownIdentifier,
    /// Two types that must agree do not.
    SemTypeMismatch,
    /// A call supplied the wrong number of arguments.
    SemArgumentCountMismatch,
}

impl DiagnosticCode {
    /// The stable numeric value for this code.
    pub fn value(self) -> u32 {
        match self {
            DiagnosticCode::GenericNote => 0,
            DiagnosticCode::LexUnknownToken => 1000,
            DiagnosticCode::SemDuplicateSymbol => 2000,
            DiagnosticCode::SemUnknownIdentifier => 2001,
            DiagnosticCode::SemTypeMismatch => 2002,
            DiagnosticCode::SemArgumentCountMismatch => 2003,
        }
    }

    /// Whether the code describes an error rather than a note.
    pub fn is_error(self) -> bool {
        !matches!(self, DiagnosticCode::GenericNote)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.value())
    }
}

/// A single finding produced by a compiler phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Code identifying the class of finding.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// Source range the finding points at, when one exists.
    pub span: Option<Span>,
    /// Supplementary notes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without a source location.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attaches a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Appends a supplementary note.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.code.is_error() { "error" } else { "note" };
        write!(f, "{}[{}]: {}", severity, self.code, self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

/// Collects diagnostics in the order phases report them.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic pointing at `span`.
    pub fn report(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::new(code, message).with_span(span));
    }

    /// Records an already-built diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Everything reported so far, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any error-class diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.code.is_error())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Discards everything reported so far.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Consumes the reporter, yielding the collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_stable_values() {
        assert_eq!(DiagnosticCode::GenericNote.value(), 0);
        assert_eq!(DiagnosticCode::LexUnknownToken.value(), 1000);
        assert_eq!(DiagnosticCode::SemDuplicateSymbol.value(), 2000);
        assert_eq!(DiagnosticCode::SemUnknownIdentifier.value(), 2001);
        assert_eq!(DiagnosticCode::SemTypeMismatch.value(), 2002);
        assert_eq!(DiagnosticCode::SemArgumentCountMismatch.value(), 2003);
    }

    #[test]
    fn reporter_preserves_order() {
        let mut reporter = DiagnosticReporter::new();
        reporter.report(
            DiagnosticCode::SemDuplicateSymbol,
            "duplicate symbol 'x'",
            Span::new(4, 5),
        );
        reporter.report(
            DiagnosticCode::SemUnknownIdentifier,
            "use of undeclared symbol 'y'",
            Span::new(9, 10),
        );

        let all = reporter.diagnostics();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, DiagnosticCode::SemDuplicateSymbol);
        assert_eq!(all[1].code, DiagnosticCode::SemUnknownIdentifier);
        assert!(reporter.has_errors());
    }

    #[test]
    fn notes_are_not_errors() {
        let mut reporter = DiagnosticReporter::new();
        reporter.push(Diagnostic::new(DiagnosticCode::GenericNote, "fyi"));
        assert!(!reporter.has_errors());
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn display_includes_code_and_span() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::SemTypeMismatch,
            "type mismatch in '+' expression",
        )
        .with_span(Span::new(12, 17));
        assert_eq!(
            diagnostic.to_string(),
            "error[2002]: type mismatch in '+' expression at [12, 17)"
        );
    }

    #[test]
    fn clear_resets_reporter() {
        let mut reporter = DiagnosticReporter::new();
        reporter.report(DiagnosticCode::LexUnknownToken, "unknown token", Span::new(0, 1));
        reporter.clear();
        assert!(reporter.is_empty());
    }

    #[test]
    fn diagnostic_serializes_to_json() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::SemUnknownIdentifier,
            "use of undeclared symbol 'y'",
        )
        .with_span(Span::new(7, 8));
        let json = serde_json::to_string(&diagnostic).unwrap();
        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(diagnostic, restored);
    }
}
