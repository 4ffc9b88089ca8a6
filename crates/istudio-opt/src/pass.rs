//! The pass abstraction and the manager that sequences passes.

use istudio_ir::IrModule;
use tracing::debug;

/// An IR-to-IR transformation.
///
/// Passes rewrite the module in place and cannot fail; a pass that finds
/// nothing to do leaves the module unchanged.
pub trait Pass {
    /// Name of this pass for logging.
    fn name(&self) -> &str;

    /// Rewrites `module`.
    fn run(&mut self, module: &mut IrModule);
}

/// Runs registered passes in registration order.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn run(&mut self, module: &mut IrModule) {
        for pass in &mut self.passes {
            debug!(pass = pass.name(), module = module.name(), "running pass");
            pass.run(module);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use istudio_ir::{IrFunction, IrType};

    struct RenamePass {
        suffix: &'static str,
    }

    impl Pass for RenamePass {
        fn name(&self) -> &str {
            "rename"
        }

        fn run(&mut self, module: &mut IrModule) {
            for function in module.functions_mut() {
                function.name.push_str(self.suffix);
            }
        }
    }

    #[test]
    fn passes_run_in_registration_order() {
        let mut module = IrModule::new("demo");
        module.add_function(IrFunction::new("f", IrType::void()));

        let mut manager = PassManager::new();
        manager.add_pass(Box::new(RenamePass { suffix: "_a" }));
        manager.add_pass(Box::new(RenamePass { suffix: "_b" }));
        manager.run(&mut module);

        assert_eq!(module.functions()[0].name, "f_a_b");
    }

    #[test]
    fn empty_manager_is_a_no_op() {
        let mut module = IrModule::new("demo");
        let mut manager = PassManager::new();
        assert!(manager.is_empty());
        manager.run(&mut module);
        assert!(module.functions().is_empty());
    }
}
