use super::{emit_diagnostics, CliInput};
use anyhow::Result;
use compiler::{
    compiler::BaseCompiler,
    error::ErrorHandler,
    scanner::Scanner,
};
use serde::Serialize;
use serde_yaml::to_writer;
use std::io::{self, Write};

/// errors of a dump-only scan are reported by the real one
struct Silent;
impl ErrorHandler for Silent {}

fn dump<T: Serialize>(title: &str, value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    writeln!(lock, "============== {} ==============", title)?;
    to_writer(&mut lock, value)?;
    writeln!(lock, "=========== End of {} ===========", title)?;
    Ok(())
}

pub fn compile_to_stdout(input: CliInput) -> Result<()> {
    let CliInput {
        name,
        source,
        option,
        show,
    } = input;
    if show.dump_scan {
        let scanner = Scanner::new(option.scanning());
        let tokens: Vec<_> = scanner.scan(&source, Silent).collect();
        dump("Tokens", &tokens)?;
    }
    let compiler = BaseCompiler::new(option);

    let tokens = compiler.scan(&source);
    let ast = compiler.parse(tokens);
    if show.dump_parse {
        dump("AST", &ast)?;
    }

    let ir = compiler.transform(ast);
    if show.dump_transform {
        dump("IR", &ir)?;
    }

    let result = compiler.generate(&ir);
    emit_diagnostics(&name, &source, &compiler.take_diagnostics())?;
    print!("{}", result.code);
    if let (true, Some(mappings)) = (show.dump_source_map, &result.mappings) {
        dump("Source Map", mappings)?;
    }
    Ok(())
}
