//! The IR module model.
//!
//! An [`IrModule`] holds the structs and functions one compilation
//! produced. Function bodies are flat instruction lists in an SSA-ish
//! named form.

use crate::types::IrType;
use serde::{Deserialize, Serialize};

/// One named instruction.
///
/// `op` names the operation (`const`, `add`, `sub`, `mul`, `div`, `mod`,
/// `neg`, `call`, `ret`), `operands` its inputs by name or literal text.
/// Folded constants carry their value in `constant_value` with
/// `is_constant` set and `operands` cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrValue {
    pub result: String,
    pub op: String,
    pub operands: Vec<String>,
    pub is_constant: bool,
    pub constant_value: i64,
}

impl IrValue {
    pub fn new(result: impl Into<String>, op: impl Into<String>, operands: Vec<String>) -> Self {
        Self {
            result: result.into(),
            op: op.into(),
            operands,
            is_constant: false,
            constant_value: 0,
        }
    }

    /// An already-folded constant.
    pub fn constant(result: impl Into<String>, value: i64) -> Self {
        Self {
            result: result.into(),
            op: "const".into(),
            operands: Vec::new(),
            is_constant: true,
            constant_value: value,
        }
    }
}

/// A function parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrParameter {
    pub name: String,
    pub ty: IrType,
}

impl IrParameter {
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A struct field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrField {
    pub name: String,
    pub ty: IrType,
}

impl IrField {
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A (possibly templated) struct definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrStruct {
    pub name: String,
    pub template_params: Vec<String>,
    pub fields: Vec<IrField>,
    pub is_public: bool,
}

impl IrStruct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_params: Vec::new(),
            fields: Vec::new(),
            is_public: true,
        }
    }
}

/// A (possibly templated) function with its instruction list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrFunction {
    pub name: String,
    pub return_type: IrType,
    pub template_params: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub instructions: Vec<IrValue>,
}

impl IrFunction {
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            return_type,
            template_params: Vec::new(),
            parameters: Vec::new(),
            instructions: Vec::new(),
        }
    }

    /// Appends an instruction and returns a handle to it.
    pub fn push_instruction(&mut self, value: IrValue) -> &mut IrValue {
        self.instructions.push(value);
        self.instructions
            .last_mut()
            .unwrap_or_else(|| unreachable!("pushed above"))
    }
}

/// Everything one compilation produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrModule {
    name: String,
    structs: Vec<IrStruct>,
    functions: Vec<IrFunction>,
}

impl IrModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structs: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn add_struct(&mut self, value: IrStruct) -> &mut IrStruct {
        self.structs.push(value);
        self.structs
            .last_mut()
            .unwrap_or_else(|| unreachable!("pushed above"))
    }

    pub fn structs(&self) -> &[IrStruct] {
        &self.structs
    }

    pub fn structs_mut(&mut self) -> &mut Vec<IrStruct> {
        &mut self.structs
    }

    pub fn add_function(&mut self, function: IrFunction) -> &mut IrFunction {
        self.functions.push(function);
        self.functions
            .last_mut()
            .unwrap_or_else(|| unreachable!("pushed above"))
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut Vec<IrFunction> {
        &mut self.functions
    }

    /// Looks up a function by name.
    pub fn function(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

impl Default for IrModule {
    fn default() -> Self {
        Self::new("module")
    }
}
