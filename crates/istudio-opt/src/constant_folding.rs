//! Constant folding.
//!
//! Per function: `const` instructions with a parseable integer operand
//! are normalized into folded-constant form, and two-operand arithmetic
//! over known constants is replaced by its result. Division folds only
//! when the divisor is non-zero. Everything else stays untouched.

use crate::pass::Pass;
use istudio_ir::{IrModule, IrValue};
use std::collections::HashMap;

/// Folds integer constant expressions within each function.
#[derive(Debug, Default)]
pub struct ConstantFoldingPass;

impl ConstantFoldingPass {
    pub fn new() -> Self {
        Self
    }
}

fn mark_constant(inst: &mut IrValue, constant: i64) {
    inst.op = "const".into();
    inst.operands.clear();
    inst.is_constant = true;
    inst.constant_value = constant;
}

fn parse_literal(inst: &IrValue) -> Option<i64> {
    inst.operands.first()?.parse().ok()
}

impl Pass for ConstantFoldingPass {
    fn name(&self) -> &str {
        "constant-folding"
    }

    fn run(&mut self, module: &mut IrModule) {
        for function in module.functions_mut() {
            let mut constants: HashMap<String, i64> = HashMap::new();
            for inst in &mut function.instructions {
                if inst.is_constant {
                    constants.insert(inst.result.clone(), inst.constant_value);
                    continue;
                }

                if inst.op == "const" {
                    if let Some(literal) = parse_literal(inst) {
                        mark_constant(inst, literal);
                        constants.insert(inst.result.clone(), literal);
                    }
                    continue;
                }

                if inst.operands.len() != 2 {
                    continue;
                }

                let (Some(&lhs), Some(&rhs)) = (
                    constants.get(&inst.operands[0]),
                    constants.get(&inst.operands[1]),
                ) else {
                    continue;
                };

                let result = match inst.op.as_str() {
                    "add" => lhs.wrapping_add(rhs),
                    "sub" => lhs.wrapping_sub(rhs),
                    "mul" => lhs.wrapping_mul(rhs),
                    "div" if rhs != 0 => lhs.wrapping_div(rhs),
                    _ => continue,
                };

                mark_constant(inst, result);
                constants.insert(inst.result.clone(), result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use istudio_ir::{IrFunction, IrType};

    fn function_with(instructions: Vec<IrValue>) -> IrModule {
        let mut module = IrModule::new("demo");
        let function = module.add_function(IrFunction::new("f", IrType::i64()));
        for inst in instructions {
            function.push_instruction(inst);
        }
        module
    }

    fn fold(module: &mut IrModule) {
        ConstantFoldingPass::new().run(module);
    }

    #[test]
    fn normalizes_const_literals() {
        let mut module = function_with(vec![IrValue::new("t0", "const", vec!["7".into()])]);
        fold(&mut module);

        let inst = &module.functions()[0].instructions[0];
        assert!(inst.is_constant);
        assert_eq!(inst.constant_value, 7);
        assert!(inst.operands.is_empty());
    }

    #[test]
    fn folds_arithmetic_over_known_constants() {
        let mut module = function_with(vec![
            IrValue::new("t0", "const", vec!["2".into()]),
            IrValue::new("t1", "const", vec!["3".into()]),
            IrValue::new("t2", "add", vec!["t0".into(), "t1".into()]),
            IrValue::new("t3", "mul", vec!["t2".into(), "t1".into()]),
        ]);
        fold(&mut module);

        let instructions = &module.functions()[0].instructions;
        assert!(instructions[2].is_constant);
        assert_eq!(instructions[2].constant_value, 5);
        assert!(instructions[3].is_constant);
        assert_eq!(instructions[3].constant_value, 15);
    }

    #[test]
    fn division_by_zero_is_left_alone() {
        let mut module = function_with(vec![
            IrValue::new("t0", "const", vec!["1".into()]),
            IrValue::new("t1", "const", vec!["0".into()]),
            IrValue::new("t2", "div", vec!["t0".into(), "t1".into()]),
        ]);
        fold(&mut module);

        let inst = &module.functions()[0].instructions[2];
        assert!(!inst.is_constant);
        assert_eq!(inst.op, "div");
    }

    #[test]
    fn unknown_operands_stop_folding() {
        let mut module = function_with(vec![
            IrValue::new("t0", "const", vec!["2".into()]),
            IrValue::new("t1", "add", vec!["t0".into(), "x".into()]),
        ]);
        fold(&mut module);

        assert!(!module.functions()[0].instructions[1].is_constant);
    }

    #[test]
    fn non_integer_const_operands_are_untouched() {
        let mut module = function_with(vec![IrValue::new(
            "t0",
            "const",
            vec!["\"Hello, \"".into()],
        )]);
        fold(&mut module);

        let inst = &module.functions()[0].instructions[0];
        assert!(!inst.is_constant);
        assert_eq!(inst.operands, vec!["\"Hello, \""]);
    }

    #[test]
    fn already_folded_constants_seed_the_map() {
        let mut module = function_with(vec![
            IrValue::constant("t0", 10),
            IrValue::new("t1", "const", vec!["4".into()]),
            IrValue::new("t2", "sub", vec!["t0".into(), "t1".into()]),
        ]);
        fold(&mut module);

        let inst = &module.functions()[0].instructions[2];
        assert!(inst.is_constant);
        assert_eq!(inst.constant_value, 6);
    }

    #[test]
    fn calls_and_rets_are_untouched() {
        let mut module = function_with(vec![
            IrValue::new("t0", "call", vec!["add".into(), "1".into(), "2".into()]),
            IrValue::new("", "ret", vec!["t0".into()]),
        ]);
        fold(&mut module);

        let instructions = &module.functions()[0].instructions;
        assert_eq!(instructions[0].op, "call");
        assert_eq!(instructions[1].op, "ret");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn folding_preserves_instruction_count(a: i64, b: i64) {
                let mut module = function_with(vec![
                    IrValue::new("t0", "const", vec![a.to_string()]),
                    IrValue::new("t1", "const", vec![b.to_string()]),
                    IrValue::new("t2", "add", vec!["t0".into(), "t1".into()]),
                    IrValue::new("", "ret", vec!["t2".into()]),
                ]);
                fold(&mut module);
                prop_assert_eq!(module.functions()[0].instructions.len(), 4);
            }

            #[test]
            fn folded_arithmetic_wraps_like_the_host(a: i64, b: i64) {
                let mut module = function_with(vec![
                    IrValue::new("t0", "const", vec![a.to_string()]),
                    IrValue::new("t1", "const", vec![b.to_string()]),
                    IrValue::new("t2", "add", vec!["t0".into(), "t1".into()]),
                    IrValue::new("t3", "sub", vec!["t0".into(), "t1".into()]),
                    IrValue::new("t4", "mul", vec!["t0".into(), "t1".into()]),
                ]);
                fold(&mut module);

                let instructions = &module.functions()[0].instructions;
                prop_assert_eq!(instructions[2].constant_value, a.wrapping_add(b));
                prop_assert_eq!(instructions[3].constant_value, a.wrapping_sub(b));
                prop_assert_eq!(instructions[4].constant_value, a.wrapping_mul(b));
            }

            #[test]
            fn folding_is_idempotent(a: i64, b: i64) {
                let mut module = function_with(vec![
                    IrValue::new("t0", "const", vec![a.to_string()]),
                    IrValue::new("t1", "const", vec![b.to_string()]),
                    IrValue::new("t2", "add", vec!["t0".into(), "t1".into()]),
                ]);
                fold(&mut module);
                let once = module.clone();
                fold(&mut module);
                prop_assert_eq!(
                    module.functions()[0].instructions.clone(),
                    once.functions()[0].instructions.clone()
                );
            }
        }
    }
}
