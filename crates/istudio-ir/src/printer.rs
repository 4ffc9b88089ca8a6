//! Text form of an IR module.

use crate::module::{IrModule, IrValue};
use std::fmt::Write;

fn print_instruction(out: &mut String, inst: &IrValue) {
    out.push_str("  ");
    if !inst.result.is_empty() {
        out.push_str(&inst.result);
        out.push_str(" = ");
    }
    if inst.is_constant {
        let _ = write!(out, "const {}", inst.constant_value);
    } else {
        out.push_str(&inst.op);
        if !inst.operands.is_empty() {
            out.push(' ');
            out.push_str(&inst.operands.join(", "));
        }
    }
    out.push_str(";\n");
}

/// Renders every function of `module` in the IR text form.
pub fn print_module(module: &IrModule) -> String {
    let mut out = String::new();
    for function in module.functions() {
        let _ = writeln!(out, "function {} {{", function.name);
        for inst in &function.instructions {
            print_instruction(&mut out, inst);
        }
        out.push_str("}\n");
    }
    out
}
