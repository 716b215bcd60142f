use compiler::{
    compiler::BaseCompiler,
    error::{CompilationErrorKind, ErrorHandler, VecErrorHandler},
    ir::IrRoot,
    parser::{AstRoot, ParseOption, Parser},
    scanner::{ScanOption, Scanner, TokenKind},
    transformer::{TransformOption, Transformer},
    CompileOption,
};
use rslint_parser::{parse_module, parse_text};

#[derive(Clone)]
pub struct TestErrorHandler;
impl ErrorHandler for TestErrorHandler {}

pub fn base_scan(s: &str) -> Vec<TokenKind<'_>> {
    Scanner::new(ScanOption::default())
        .scan(s, TestErrorHandler)
        .map(|t| t.kind)
        .collect()
}

pub fn base_parse(s: &str) -> AstRoot<'_> {
    let tokens = Scanner::new(ScanOption::default()).scan(s, TestErrorHandler);
    Parser::new(ParseOption::default()).parse(tokens, TestErrorHandler)
}

pub fn base_transform(s: &str) -> IrRoot<'_> {
    transform_with(s, TransformOption::default())
}

pub fn transform_with(s: &str, option: TransformOption) -> IrRoot<'_> {
    Transformer::new(option).transform(base_parse(s), TestErrorHandler)
}

/// kinds of every error reported by the three stages, in report order
pub fn get_errors(s: &str) -> Vec<CompilationErrorKind> {
    let eh = VecErrorHandler::default();
    let tokens = Scanner::new(ScanOption::default()).scan(s, eh.clone());
    let ast = Parser::new(ParseOption::default()).parse(tokens, eh.clone());
    Transformer::new(TransformOption::default()).transform(ast, eh.clone());
    eh.take_errors().into_iter().map(|e| e.kind).collect()
}

pub fn base_compile(s: &str) -> String {
    compile_with(s, CompileOption::default())
}

pub fn compile_with(s: &str, option: CompileOption) -> String {
    let out = BaseCompiler::new(option).compile(s);
    out.code
}

/// generated module code must be accepted by a js parser
pub fn assert_valid_module(code: &str) {
    let parsed = parse_module(code, 0);
    assert!(parsed.errors().is_empty(), "{}", code);
}

/// function mode code returns at top level, so wrap it first
pub fn assert_valid_function(code: &str) {
    let wrapped = format!("function wrapper() {{ {} }}", code);
    let parsed = parse_text(&wrapped, 0);
    assert!(parsed.errors().is_empty(), "{}", code);
}

/// every `_name(` call in the output must be an imported helper
/// or a local declared with `const`
pub fn assert_helpers_declared(code: &str) {
    let preamble = code.lines().next().unwrap_or("");
    let list = preamble
        .strip_prefix("import { ")
        .or_else(|| preamble.strip_prefix("const { "))
        .and_then(|rest| rest.split(" }").next())
        .unwrap_or("");
    let imported: Vec<&str> = list
        .split(", ")
        .filter_map(|entry| entry.rsplit(|c| c == ' ' || c == ':').next())
        .filter(|name| !name.is_empty())
        .collect();
    let bytes = code.as_bytes();
    let is_ident = |b: u8| b == b'_' || b == b'$' || b.is_ascii_alphanumeric();
    for (start, _) in code.match_indices('_') {
        if start > 0 && (is_ident(bytes[start - 1]) || bytes[start - 1] == b'.') {
            continue;
        }
        let len = code[start..]
            .bytes()
            .position(|b| !is_ident(b))
            .unwrap_or(code.len() - start);
        let name = &code[start..start + len];
        if code[start + len..].starts_with('(') {
            let declared = imported.contains(&name) || code.contains(&format!("const {} = ", name));
            assert!(declared, "`{}` is used but not declared in\n{}", name, code);
        }
    }
}
