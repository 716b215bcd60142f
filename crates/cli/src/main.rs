use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use compiler::{
    codegen::ScriptMode, compile_bytes, parser::WhitespaceStrategy, CompileOption, Diagnostic,
};

use std::fs;
use std::io::{self, Read};

use cli::{absolute_path, compile_to_stdout, emit_diagnostics, get_delimiters, CliInput, ShowOption};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// import helpers and export render
    Module,
    /// destructure helpers from a global and return render
    Function,
}

/// A simple CLI app for quick debugging the compiler internal.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// The file to compile. Stdin will be compiled if no file is provided.
    input_file_name: Option<String>,

    /// opening and closing delimiters separated by one space
    #[arg(short, long, default_value = "{{ }}")]
    delimiters: String,

    #[arg(short, long, value_enum, default_value_t = Mode::Module)]
    mode: Mode,

    /// do not hoist static subtrees
    #[arg(long)]
    no_hoist: bool,

    /// cache event handlers in the render cache
    #[arg(long)]
    cache_handlers: bool,

    /// prefix of identifiers on the render context, `_ctx.` by default
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long)]
    preserve_comments: bool,

    #[arg(long)]
    preserve_whitespace: bool,

    /// print position mappings after the code
    #[arg(long)]
    source_map: bool,

    #[arg(long)]
    dump_scan: bool,

    #[arg(long)]
    dump_parse: bool,

    #[arg(long)]
    dump_transform: bool,
}

impl Opts {
    fn compile_option(&self) -> Result<CompileOption> {
        let default = CompileOption::default();
        let mode = match self.mode {
            Mode::Module => ScriptMode::Module {
                runtime_module_name: default.runtime_module_name.clone(),
            },
            Mode::Function => ScriptMode::Function {
                runtime_global_name: default.runtime_global_name.clone(),
            },
        };
        let whitespace = if self.preserve_whitespace {
            WhitespaceStrategy::Preserve
        } else {
            WhitespaceStrategy::Condense
        };
        Ok(CompileOption {
            mode,
            hoist_static: !self.no_hoist,
            cache_bindings: self.cache_handlers,
            delimiters: get_delimiters(self.delimiters.clone())?,
            expression_prefix: self.prefix.clone().unwrap_or(default.expression_prefix.clone()),
            preserve_comments: self.preserve_comments,
            whitespace,
            source_map: self.source_map,
            ..default
        })
    }

    fn show_option(&self) -> ShowOption {
        ShowOption {
            dump_scan: self.dump_scan,
            dump_parse: self.dump_parse,
            dump_transform: self.dump_transform,
            dump_source_map: self.source_map,
        }
    }
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let option = opts.compile_option()?;
    let (name, bytes) = if let Some(file_name) = &opts.input_file_name {
        let ab_path = absolute_path(file_name)?;
        (file_name.clone(), fs::read(ab_path)?)
    } else {
        let mut buf = vec![];
        io::stdin().read_to_end(&mut buf)?;
        ("<stdin>".to_owned(), buf)
    };
    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            let bytes = e.into_bytes();
            if let Err(err) = compile_bytes(&bytes, &option) {
                let lossy = String::from_utf8_lossy(&bytes);
                emit_diagnostics(&name, &lossy, &[Diagnostic::from(err)])?;
            }
            bail!("{} is not valid UTF-8", name);
        }
    };
    compile_to_stdout(CliInput {
        name,
        source,
        option,
        show: opts.show_option(),
    })
}
