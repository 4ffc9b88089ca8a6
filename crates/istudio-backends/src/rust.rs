//! Rust code generation.
//!
//! Emits one `.rs` file per module, structured like the C++ emitter:
//! structs first, then functions translated from the instruction stream.
//! A body ending in `ret` becomes a tail expression; unrepresentable
//! constructs become comments, as in the C++ backend.

use crate::backend::{sanitize_file_stem, Backend, GeneratedFile, TargetProfile};
use crate::error::BackendResult;
use istudio_ir::{IrFunction, IrModule, IrParameter, IrStruct, IrType, IrTypeKind, IrValue};
use std::fmt::Write;
use tracing::debug;

/// Knobs for the Rust emitter.
#[derive(Clone, Debug)]
pub struct RustBackendOptions {
    /// Module doc comment placed at the top of the file, when non-empty.
    pub module_comment: String,
    pub file_suffix: String,
}

impl Default for RustBackendOptions {
    fn default() -> Self {
        Self {
            module_comment: String::new(),
            file_suffix: ".rs".to_string(),
        }
    }
}

/// The Rust target.
#[derive(Debug, Default)]
pub struct RustBackend {
    options: RustBackendOptions,
}

impl RustBackend {
    pub fn new(options: RustBackendOptions) -> Self {
        Self { options }
    }
}

impl Backend for RustBackend {
    fn name(&self) -> &str {
        "rust"
    }

    fn emit(
        &self,
        module: &IrModule,
        _profile: &TargetProfile,
    ) -> BackendResult<Vec<GeneratedFile>> {
        debug!(module = module.name(), "emitting Rust");
        let path = format!(
            "{}{}",
            sanitize_file_stem(module.name()),
            self.options.file_suffix
        );
        let contents = build_file(module, &self.options);
        Ok(vec![GeneratedFile::new(path, contents)])
    }
}

fn type_to_string(ty: &IrType) -> String {
    match ty.kind {
        IrTypeKind::Void => "()".to_string(),
        IrTypeKind::I32 => "i32".to_string(),
        IrTypeKind::I64 => "i64".to_string(),
        IrTypeKind::F32 => "f32".to_string(),
        IrTypeKind::F64 => "f64".to_string(),
        IrTypeKind::Bool => "bool".to_string(),
        IrTypeKind::String => "String".to_string(),
        IrTypeKind::Generic => ty.name.clone(),
        IrTypeKind::Struct => {
            let mut out = ty.name.clone();
            if !ty.type_arguments.is_empty() {
                out.push('<');
                let rendered: Vec<String> = ty.type_arguments.iter().map(type_to_string).collect();
                out.push_str(&rendered.join(", "));
                out.push('>');
            }
            out
        }
    }
}

fn contains_kind(ty: &IrType, kinds: &[IrTypeKind]) -> bool {
    kinds.contains(&ty.kind)
        || ty
            .type_arguments
            .iter()
            .any(|argument| contains_kind(argument, kinds))
}

fn derive_list(record: &IrStruct) -> String {
    let has_string = record
        .fields
        .iter()
        .any(|field| contains_kind(&field.ty, &[IrTypeKind::String]));
    let has_float = record
        .fields
        .iter()
        .any(|field| contains_kind(&field.ty, &[IrTypeKind::F32, IrTypeKind::F64]));

    let mut derives = vec!["Debug", "Clone"];
    if !has_string {
        derives.push("Copy");
    }
    derives.push("PartialEq");
    if !has_float {
        derives.push("Eq");
    }
    derives.join(", ")
}

fn generic_list(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

fn emit_struct(record: &IrStruct, out: &mut String) {
    let _ = writeln!(out, "#[derive({})]", derive_list(record));
    if !record.is_public {
        out.push_str("// internal\n");
    }
    let visibility = if record.is_public { "pub " } else { "" };
    let _ = writeln!(
        out,
        "{visibility}struct {}{} {{",
        record.name,
        generic_list(&record.template_params)
    );
    for field in &record.fields {
        let _ = writeln!(out, "    pub {}: {},", field.name, type_to_string(&field.ty));
    }
    out.push_str("}\n\n");
}

enum BodyLine {
    Statement(String),
    Tail(String),
}

fn translate_instruction(inst: &IrValue) -> BodyLine {
    use BodyLine::Statement;

    if inst.is_constant {
        if inst.result.is_empty() {
            return Statement("// constant value discarded (no target)".to_string());
        }
        return Statement(format!("let {} = {};", inst.result, inst.constant_value));
    }

    match inst.op.as_str() {
        "ret" | "return" => match inst.operands.first() {
            Some(value) => BodyLine::Tail(value.clone()),
            None => BodyLine::Tail(String::new()),
        },
        "const" => match inst.operands.first() {
            Some(value) if inst.result.is_empty() => Statement(format!("let _ = {value};")),
            Some(value) => Statement(format!("let {} = {value};", inst.result)),
            None => Statement("// const missing operand".to_string()),
        },
        "add" | "sub" | "mul" | "div" | "mod" => {
            if inst.operands.len() != 2 {
                return Statement(format!("// unsupported operand count for '{}'", inst.op));
            }
            let symbol = match inst.op.as_str() {
                "add" => "+",
                "sub" => "-",
                "mul" => "*",
                "div" => "/",
                _ => "%",
            };
            let binding = if inst.result.is_empty() {
                "let _".to_string()
            } else {
                format!("let {}", inst.result)
            };
            Statement(format!(
                "{binding} = {} {symbol} {};",
                inst.operands[0], inst.operands[1]
            ))
        }
        "neg" => {
            if inst.operands.len() != 1 {
                return Statement("// neg expects one operand".to_string());
            }
            let binding = if inst.result.is_empty() {
                "let _".to_string()
            } else {
                format!("let {}", inst.result)
            };
            Statement(format!("{binding} = -{};", inst.operands[0]))
        }
        "call" => {
            if inst.operands.is_empty() {
                return Statement("// call missing callee".to_string());
            }
            let call = format!("{}({})", inst.operands[0], inst.operands[1..].join(", "));
            if inst.result.is_empty() {
                Statement(format!("{call};"))
            } else {
                Statement(format!("let {} = {call};", inst.result))
            }
        }
        other => Statement(format!("// unsupported op '{other}'")),
    }
}

fn emit_function(function: &IrFunction, out: &mut String) {
    let params: Vec<String> = function
        .parameters
        .iter()
        .map(|param: &IrParameter| format!("{}: {}", param.name, type_to_string(&param.ty)))
        .collect();
    let arrow = if function.return_type.kind == IrTypeKind::Void {
        String::new()
    } else {
        format!(" -> {}", type_to_string(&function.return_type))
    };
    let _ = writeln!(
        out,
        "pub fn {}{}({}){arrow} {{",
        function.name,
        generic_list(&function.template_params),
        params.join(", ")
    );

    if function.instructions.is_empty() {
        out.push_str("    todo!()\n}\n\n");
        return;
    }

    let last = function.instructions.len() - 1;
    for (index, inst) in function.instructions.iter().enumerate() {
        match translate_instruction(inst) {
            BodyLine::Statement(line) => {
                let _ = writeln!(out, "    {line}");
            }
            BodyLine::Tail(value) => {
                if index == last {
                    if !value.is_empty() {
                        let _ = writeln!(out, "    {value}");
                    }
                } else if value.is_empty() {
                    out.push_str("    return;\n");
                } else {
                    let _ = writeln!(out, "    return {value};");
                }
            }
        }
    }
    out.push_str("}\n\n");
}

fn build_file(module: &IrModule, options: &RustBackendOptions) -> String {
    let mut out = String::new();
    if !options.module_comment.is_empty() {
        let _ = writeln!(out, "//! {}\n", options.module_comment);
    }

    for record in module.structs() {
        emit_struct(record, &mut out);
    }
    for function in module.functions() {
        emit_function(function, &mut out);
    }
    out
}
