//! Writes the transformed IR as render function source.
//! Hoists and the render body are written into separate sections
//! first so only helpers that are actually used get imported.

mod code_writer;

pub use code_writer::CodeWriter;

use crate::{ir::IrRoot, SourceLocation};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptMode {
    /// `import { .. } from "vue"` + `export function render`
    Module { runtime_module_name: String },
    /// `const { .. } = Vue` + `return function render`
    Function { runtime_global_name: String },
}

impl Default for ScriptMode {
    fn default() -> Self {
        Self::Module {
            runtime_module_name: "vue".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CodeGenerateOption {
    pub mode: ScriptMode,
    /// prefix of identifiers resolved on the render context
    pub expression_prefix: String,
    pub source_map: bool,
}

impl Default for CodeGenerateOption {
    fn default() -> Self {
        Self {
            mode: ScriptMode::default(),
            expression_prefix: "_ctx.".into(),
            source_map: false,
        }
    }
}

impl CodeGenerateOption {
    /// unprefixed identifiers are resolved by `with (_ctx)`
    pub fn use_with_scope(&self) -> bool {
        matches!(self.mode, ScriptMode::Function { .. }) && self.expression_prefix.is_empty()
    }
}

/// A generated position and the template range it came from.
/// Line and column are 1-based, like [`crate::Position`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Mapping {
    pub generated_line: usize,
    pub generated_column: usize,
    pub source: SourceLocation,
}

#[derive(Debug)]
pub struct GenerateResult {
    pub code: String,
    pub mappings: Option<Vec<Mapping>>,
}

pub trait CodeGenerator<'a> {
    type Output;
    /// generate will take optimized ir and output
    /// desired code format
    fn generate(&self, ir: &IrRoot<'a>) -> Self::Output;
}

/// Generator for the browser render function.
#[derive(Default)]
pub struct RenderGenerator {
    pub option: CodeGenerateOption,
}

impl RenderGenerator {
    pub fn new(option: CodeGenerateOption) -> Self {
        Self { option }
    }
}

impl<'a> CodeGenerator<'a> for RenderGenerator {
    type Output = GenerateResult;
    fn generate(&self, ir: &IrRoot<'a>) -> GenerateResult {
        CodeWriter::new(ir, &self.option).generate_root()
    }
}
