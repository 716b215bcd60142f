//! Entry points chaining every stage of the pipeline.
//! Each call builds fresh stages and a fresh error collector,
//! so compilations share no state.
use super::{
    codegen::{CodeGenerateOption, CodeGenerator, GenerateResult, Mapping, RenderGenerator, ScriptMode},
    error::{CompilationError, CompilationErrorKind, Severity, VecErrorHandler},
    ir::IrRoot,
    parser::{AstRoot, ParseOption, Parser, WhitespaceStrategy},
    scanner::{ScanOption, Scanner, Token},
    transformer::{TransformOption, Transformer},
    util::no,
    SourceLocation,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone)]
pub struct CompileOption {
    /// Only the variant is read here. The runtime name it carries is
    /// replaced by `runtime_module_name` or `runtime_global_name`.
    pub mode: ScriptMode,
    pub hoist_static: bool,
    /// cache event handlers in the render cache
    pub cache_bindings: bool,
    pub delimiters: (String, String),
    pub is_custom_element: fn(&str) -> bool,
    pub expression_prefix: String,
    pub preserve_comments: bool,
    pub whitespace: WhitespaceStrategy,
    pub source_map: bool,
    /// module specifier in `Module` mode, overrides the one in `mode`
    pub runtime_module_name: String,
    /// global object in `Function` mode, overrides the one in `mode`
    pub runtime_global_name: String,
}

impl Default for CompileOption {
    fn default() -> Self {
        Self {
            mode: ScriptMode::default(),
            hoist_static: true,
            cache_bindings: false,
            delimiters: ("{{".into(), "}}".into()),
            is_custom_element: no,
            expression_prefix: "_ctx.".into(),
            preserve_comments: false,
            whitespace: WhitespaceStrategy::Condense,
            source_map: false,
            runtime_module_name: "vue".into(),
            runtime_global_name: "Vue".into(),
        }
    }
}

impl CompileOption {
    pub fn scanning(&self) -> ScanOption {
        ScanOption {
            delimiters: self.delimiters.clone(),
            ..Default::default()
        }
    }
    pub fn parsing(&self) -> ParseOption {
        ParseOption {
            whitespace: self.whitespace,
            preserve_comments: self.preserve_comments,
            is_custom_element: self.is_custom_element,
            ..Default::default()
        }
    }
    pub fn transforming(&self) -> TransformOption {
        TransformOption {
            hoist_static: self.hoist_static,
            cache_bindings: self.cache_bindings,
        }
    }
    pub fn generating(&self) -> CodeGenerateOption {
        let mode = match &self.mode {
            ScriptMode::Module { .. } => ScriptMode::Module {
                runtime_module_name: self.runtime_module_name.clone(),
            },
            ScriptMode::Function { .. } => ScriptMode::Function {
                runtime_global_name: self.runtime_global_name.clone(),
            },
        };
        CodeGenerateOption {
            mode,
            expression_prefix: self.expression_prefix.clone(),
            source_map: self.source_map,
        }
    }
}

/// A reported problem, flattened for consumers that do not
/// want to depend on the error kind enum.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// byte range in the template
    pub range: Range<usize>,
    pub location: SourceLocation,
}

impl From<CompilationError> for Diagnostic {
    fn from(e: CompilationError) -> Self {
        Self {
            severity: e.severity(),
            message: e.to_string(),
            range: Range::from(&e.location),
            location: e.location,
        }
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CompileOutput {
    pub code: String,
    pub source_map: Option<Vec<Mapping>>,
    /// every recovered problem, in report order
    pub diagnostics: Vec<Diagnostic>,
}

/// The stages of one compilation, sharing one error collector.
pub struct BaseCompiler {
    option: CompileOption,
    errors: VecErrorHandler,
}

impl BaseCompiler {
    pub fn new(option: CompileOption) -> Self {
        Self {
            option,
            errors: VecErrorHandler::default(),
        }
    }

    pub fn scan<'a>(&self, source: &'a str) -> impl Iterator<Item = Token<'a>> {
        Scanner::new(self.option.scanning()).scan(source, self.errors.clone())
    }

    pub fn parse<'a, Ts>(&self, tokens: Ts) -> AstRoot<'a>
    where
        Ts: Iterator<Item = Token<'a>>,
    {
        Parser::new(self.option.parsing()).parse(tokens, self.errors.clone())
    }

    pub fn transform<'a>(&self, ast: AstRoot<'a>) -> IrRoot<'a> {
        Transformer::new(self.option.transforming()).transform(ast, self.errors.clone())
    }

    pub fn generate(&self, ir: &IrRoot) -> GenerateResult {
        RenderGenerator::new(self.option.generating()).generate(ir)
    }

    pub fn compile(&self, source: &str) -> CompileOutput {
        let tokens = self.scan(source);
        let ast = self.parse(tokens);
        let ir = self.transform(ast);
        let GenerateResult { code, mappings } = self.generate(&ir);
        CompileOutput {
            code,
            source_map: mappings,
            diagnostics: self.take_diagnostics(),
        }
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .take_errors()
            .into_iter()
            .map(Diagnostic::from)
            .collect()
    }
}

pub fn compile(source: &str, option: &CompileOption) -> CompileOutput {
    BaseCompiler::new(option.clone()).compile(source)
}

/// Compiles raw bytes. Invalid UTF-8 is the only fatal error.
pub fn compile_bytes(
    source: &[u8],
    option: &CompileOption,
) -> Result<CompileOutput, CompilationError> {
    let source = std::str::from_utf8(source).map_err(|e| {
        let offset = e.valid_up_to();
        let mut error = CompilationError::new(CompilationErrorKind::InvalidEncoding)
            .with_additional_message(format!(" Invalid byte at offset {}.", offset));
        error.location.start.offset = offset;
        error.location.end.offset = offset + e.error_len().unwrap_or(0);
        error
    })?;
    Ok(compile(source, option))
}
