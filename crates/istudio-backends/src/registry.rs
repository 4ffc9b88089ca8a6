//! Backend registry.

use crate::backend::{Backend, GeneratedFile, TargetProfile};
use crate::error::{BackendError, BackendResult};
use istudio_ir::IrModule;

/// Holds registered backends in registration order.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, backend: Box<dyn Backend>) {
        self.backends.push(backend);
    }

    /// The backend registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|backend| backend.name() == name)
            .map(|backend| backend.as_ref())
    }

    /// Registered target names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Emits `module` with the backend registered under `target`.
    pub fn emit(
        &self,
        target: &str,
        module: &IrModule,
        profile: &TargetProfile,
    ) -> BackendResult<Vec<GeneratedFile>> {
        let backend = self
            .lookup(target)
            .ok_or_else(|| BackendError::UnknownTarget(target.to_string()))?;
        backend.emit(module, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::CppBackend;
    use crate::rust::RustBackend;

    fn registry() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register(Box::new(CppBackend::default()));
        registry.register(Box::new(RustBackend::default()));
        registry
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["cpp", "rust"]);
    }

    #[test]
    fn lookup_finds_registered_backends() {
        let registry = registry();
        assert!(registry.lookup("cpp").is_some());
        assert!(registry.lookup("rust").is_some());
        assert!(registry.lookup("java").is_none());
    }

    #[test]
    fn emit_rejects_unknown_targets() {
        let registry = registry();
        let module = IrModule::new("demo");
        let profile = TargetProfile::new("java", "21");
        let error = registry.emit("java", &module, &profile).unwrap_err();
        assert!(matches!(error, BackendError::UnknownTarget(name) if name == "java"));
    }
}
