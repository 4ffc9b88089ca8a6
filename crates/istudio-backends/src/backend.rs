//! The backend abstraction.

use crate::error::BackendResult;
use istudio_ir::IrModule;
use serde::{Deserialize, Serialize};

/// Identifies the concrete target a backend emits for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: String,
    pub version: String,
}

impl TargetProfile {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// One emitted file: a relative path and its full contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// A code generation target.
pub trait Backend {
    /// Name the target is registered and selected by.
    fn name(&self) -> &str;

    /// Emits `module` for `profile`.
    ///
    /// Unrepresentable constructs become comments in the output rather
    /// than errors.
    fn emit(&self, module: &IrModule, profile: &TargetProfile) -> BackendResult<Vec<GeneratedFile>>;
}

/// Sanitizes a module name into a file stem: lowercase alphanumerics,
/// runs of anything else collapsed to a single `_`.
pub(crate) fn sanitize_file_stem(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
    }
    if result.is_empty() {
        return "module".to_string();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_lowercases_and_collapses() {
        assert_eq!(sanitize_file_stem("SampleModule"), "samplemodule");
        assert_eq!(sanitize_file_stem("math basics!"), "math_basics_");
        assert_eq!(sanitize_file_stem("a--b"), "a_b");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_file_stem(""), "module");
        assert_eq!(sanitize_file_stem("!!!"), "module");
    }
}
