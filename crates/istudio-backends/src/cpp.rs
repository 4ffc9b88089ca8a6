//! C++ code generation.
//!
//! Emits a header/source pair per module: template structs and function
//! declarations in the header, function definitions translated from the
//! instruction stream in the source. Includes are collected from the
//! types the module actually uses.

use crate::backend::{sanitize_file_stem, Backend, GeneratedFile, TargetProfile};
use crate::error::BackendResult;
use istudio_ir::{IrFunction, IrModule, IrParameter, IrStruct, IrType, IrTypeKind, IrValue};
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::debug;

/// Knobs for the C++ emitter.
#[derive(Clone, Debug)]
pub struct CppBackendOptions {
    pub namespace_name: String,
    pub header_suffix: String,
    pub source_suffix: String,
    pub emit_header: bool,
    pub emit_source: bool,
}

impl Default for CppBackendOptions {
    fn default() -> Self {
        Self {
            namespace_name: "istudio::generated".to_string(),
            header_suffix: ".hpp".to_string(),
            source_suffix: ".cpp".to_string(),
            emit_header: true,
            emit_source: true,
        }
    }
}

/// The C++ target.
#[derive(Debug, Default)]
pub struct CppBackend {
    options: CppBackendOptions,
}

impl CppBackend {
    pub fn new(options: CppBackendOptions) -> Self {
        Self { options }
    }
}

impl Backend for CppBackend {
    fn name(&self) -> &str {
        "cpp"
    }

    fn emit(
        &self,
        module: &IrModule,
        _profile: &TargetProfile,
    ) -> BackendResult<Vec<GeneratedFile>> {
        debug!(module = module.name(), "emitting C++");
        let mut emitter = CppEmitter::new(module, &self.options);
        Ok(emitter.emit())
    }
}

struct CppEmitter<'a> {
    module: &'a IrModule,
    options: &'a CppBackendOptions,
    includes: BTreeSet<&'static str>,
    header_filename: String,
    source_filename: String,
}

impl<'a> CppEmitter<'a> {
    fn new(module: &'a IrModule, options: &'a CppBackendOptions) -> Self {
        let stem = sanitize_file_stem(module.name());
        Self {
            module,
            options,
            includes: BTreeSet::new(),
            header_filename: format!("{stem}{}", options.header_suffix),
            source_filename: format!("{stem}{}", options.source_suffix),
        }
    }

    fn emit(&mut self) -> Vec<GeneratedFile> {
        self.collect_includes();

        let mut files = Vec::new();
        if self.options.emit_header {
            let contents = self.build_header();
            files.push(GeneratedFile::new(self.header_filename.clone(), contents));
        }
        if self.options.emit_source {
            let contents = self.build_source();
            files.push(GeneratedFile::new(self.source_filename.clone(), contents));
        }
        files
    }

    fn collect_includes_for_type(&mut self, ty: &IrType) {
        match ty.kind {
            IrTypeKind::I32 | IrTypeKind::I64 => {
                self.includes.insert("<cstdint>");
            }
            IrTypeKind::String => {
                self.includes.insert("<string>");
            }
            _ => {}
        }
        for argument in &ty.type_arguments {
            self.collect_includes_for_type(argument);
        }
    }

    fn collect_includes(&mut self) {
        let module = self.module;
        for record in module.structs() {
            for field in &record.fields {
                self.collect_includes_for_type(&field.ty);
            }
        }
        for function in module.functions() {
            self.collect_includes_for_type(&function.return_type);
            for param in &function.parameters {
                self.collect_includes_for_type(&param.ty);
            }
        }
    }

    fn type_to_string(&self, ty: &IrType) -> String {
        match ty.kind {
            IrTypeKind::Void => "void".to_string(),
            IrTypeKind::I32 => "std::int32_t".to_string(),
            IrTypeKind::I64 => "std::int64_t".to_string(),
            IrTypeKind::F32 => "float".to_string(),
            IrTypeKind::F64 => "double".to_string(),
            IrTypeKind::Bool => "bool".to_string(),
            IrTypeKind::String => "std::string".to_string(),
            IrTypeKind::Generic => ty.name.clone(),
            IrTypeKind::Struct => {
                let mut out = ty.name.clone();
                if !ty.type_arguments.is_empty() {
                    out.push('<');
                    let rendered: Vec<String> = ty
                        .type_arguments
                        .iter()
                        .map(|argument| self.type_to_string(argument))
                        .collect();
                    out.push_str(&rendered.join(", "));
                    out.push('>');
                }
                out
            }
        }
    }

    fn format_template_parameters(params: &[String]) -> String {
        if params.is_empty() {
            return String::new();
        }
        let rendered: Vec<String> = params.iter().map(|p| format!("typename {p}")).collect();
        format!("template <{}>\n", rendered.join(", "))
    }

    fn format_parameter_list(&self, params: &[IrParameter]) -> String {
        let rendered: Vec<String> = params
            .iter()
            .map(|param| format!("{} {}", self.type_to_string(&param.ty), param.name))
            .collect();
        rendered.join(", ")
    }

    fn emit_struct(&self, record: &IrStruct, out: &mut String) {
        out.push_str(&Self::format_template_parameters(&record.template_params));
        if !record.is_public {
            out.push_str("// internal\n");
        }
        let _ = writeln!(out, "struct {} {{", record.name);
        for field in &record.fields {
            let _ = writeln!(out, "  {} {};", self.type_to_string(&field.ty), field.name);
        }
        out.push_str("};\n\n");
    }

    fn emit_function_declaration(&self, function: &IrFunction, out: &mut String) {
        out.push_str(&Self::format_template_parameters(&function.template_params));
        let _ = writeln!(
            out,
            "{} {}({});\n",
            self.type_to_string(&function.return_type),
            function.name,
            self.format_parameter_list(&function.parameters)
        );
    }

    fn translate_binary(inst: &IrValue, symbol: &str) -> String {
        if inst.operands.len() != 2 {
            return format!("// unsupported operand count for '{}'", inst.op);
        }
        let assignment = if inst.result.is_empty() {
            String::new()
        } else {
            format!("auto {} = ", inst.result)
        };
        format!(
            "{assignment}{} {symbol} {};",
            inst.operands[0], inst.operands[1]
        )
    }

    fn translate_instructions(function: &IrFunction) -> Vec<String> {
        let mut lines = Vec::with_capacity(function.instructions.len());

        for inst in &function.instructions {
            if inst.is_constant {
                if inst.result.is_empty() {
                    lines.push("// constant value discarded (no target)".to_string());
                } else {
                    lines.push(format!("auto {} = {};", inst.result, inst.constant_value));
                }
                continue;
            }

            match inst.op.as_str() {
                "ret" | "return" => {
                    if let Some(value) = inst.operands.first() {
                        lines.push(format!("return {value};"));
                    } else {
                        lines.push("return;".to_string());
                    }
                }
                "const" => {
                    if let Some(value) = inst.operands.first() {
                        if inst.result.is_empty() {
                            lines.push(format!("{value};"));
                        } else {
                            lines.push(format!("auto {} = {value};", inst.result));
                        }
                    } else {
                        lines.push("// const missing operand".to_string());
                    }
                }
                "add" => lines.push(Self::translate_binary(inst, "+")),
                "sub" => lines.push(Self::translate_binary(inst, "-")),
                "mul" => lines.push(Self::translate_binary(inst, "*")),
                "div" => lines.push(Self::translate_binary(inst, "/")),
                "mod" => lines.push(Self::translate_binary(inst, "%")),
                "neg" => {
                    if inst.operands.len() != 1 {
                        lines.push("// neg expects one operand".to_string());
                    } else if inst.result.is_empty() {
                        lines.push(format!("-{};", inst.operands[0]));
                    } else {
                        lines.push(format!("auto {} = -{};", inst.result, inst.operands[0]));
                    }
                }
                "call" => {
                    if inst.operands.is_empty() {
                        lines.push("// call missing callee".to_string());
                        continue;
                    }
                    let assignment = if inst.result.is_empty() {
                        String::new()
                    } else {
                        format!("auto {} = ", inst.result)
                    };
                    lines.push(format!(
                        "{assignment}{}({});",
                        inst.operands[0],
                        inst.operands[1..].join(", ")
                    ));
                }
                other => lines.push(format!("// unsupported op '{other}'")),
            }
        }

        if lines.is_empty() {
            lines.push("// TODO: provide implementation".to_string());
        }

        lines
    }

    fn emit_function_definition(&self, function: &IrFunction, out: &mut String) {
        out.push_str(&Self::format_template_parameters(&function.template_params));
        let _ = writeln!(
            out,
            "{} {}({}) {{",
            self.type_to_string(&function.return_type),
            function.name,
            self.format_parameter_list(&function.parameters)
        );
        for line in Self::translate_instructions(function) {
            let _ = writeln!(out, "  {line}");
        }
        out.push_str("}\n\n");
    }

    fn open_namespace(&self, out: &mut String) {
        if !self.options.namespace_name.is_empty() {
            let _ = writeln!(out, "namespace {} {{\n", self.options.namespace_name);
        }
    }

    fn close_namespace(&self, out: &mut String) {
        if !self.options.namespace_name.is_empty() {
            let _ = writeln!(out, "}}  // namespace {}", self.options.namespace_name);
        }
    }

    fn build_header(&self) -> String {
        let mut out = String::new();
        out.push_str("#pragma once\n\n");
        if !self.includes.is_empty() {
            for include in &self.includes {
                let _ = writeln!(out, "#include {include}");
            }
            out.push('\n');
        }

        self.open_namespace(&mut out);
        for record in self.module.structs() {
            self.emit_struct(record, &mut out);
        }
        for function in self.module.functions() {
            self.emit_function_declaration(function, &mut out);
        }
        self.close_namespace(&mut out);
        out
    }

    fn build_source(&self) -> String {
        let mut out = String::new();
        if self.options.emit_header {
            let _ = writeln!(out, "#include \"{}\"\n", self.header_filename);
        } else {
            for include in &self.includes {
                let _ = writeln!(out, "#include {include}");
            }
            out.push('\n');
        }

        self.open_namespace(&mut out);
        for function in self.module.functions() {
            self.emit_function_definition(function, &mut out);
        }
        self.close_namespace(&mut out);
        out
    }
}
