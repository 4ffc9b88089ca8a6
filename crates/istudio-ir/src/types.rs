//! The IR type model.

use serde::{Deserialize, Serialize};

/// The kinds of types the IR knows about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrTypeKind {
    #[default]
    Void,
    I32,
    I64,
    F32,
    F64,
    Bool,
    String,
    Struct,
    Generic,
}

/// A type as backends see it.
///
/// `name` is only meaningful for `Struct` and `Generic` kinds;
/// `type_arguments` only for `Struct`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrType {
    pub kind: IrTypeKind,
    pub name: String,
    pub type_arguments: Vec<IrType>,
}

impl IrType {
    fn builtin(kind: IrTypeKind) -> Self {
        Self {
            kind,
            name: String::new(),
            type_arguments: Vec::new(),
        }
    }

    pub fn void() -> Self {
        Self::builtin(IrTypeKind::Void)
    }

    pub fn i32() -> Self {
        Self::builtin(IrTypeKind::I32)
    }

    pub fn i64() -> Self {
        Self::builtin(IrTypeKind::I64)
    }

    pub fn f32() -> Self {
        Self::builtin(IrTypeKind::F32)
    }

    pub fn f64() -> Self {
        Self::builtin(IrTypeKind::F64)
    }

    pub fn bool() -> Self {
        Self::builtin(IrTypeKind::Bool)
    }

    pub fn string() -> Self {
        Self::builtin(IrTypeKind::String)
    }

    pub fn struct_of(name: impl Into<String>, type_arguments: Vec<IrType>) -> Self {
        Self {
            kind: IrTypeKind::Struct,
            name: name.into(),
            type_arguments,
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            kind: IrTypeKind::Generic,
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn is_struct(&self) -> bool {
        self.kind == IrTypeKind::Struct
    }

    pub fn is_generic(&self) -> bool {
        self.kind == IrTypeKind::Generic
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self.kind, IrTypeKind::Struct | IrTypeKind::Generic)
    }
}
