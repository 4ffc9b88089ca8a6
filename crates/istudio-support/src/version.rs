//! Build version reporting.

/// The crate version baked in at build time.
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The product banner used by the CLI and the language server.
pub fn version_string() -> String {
    format!("IStudio {}", version())
}
