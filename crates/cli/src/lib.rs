use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use compiler::CompileOption;
use path_clean::PathClean;

mod cli;
mod pretty_error;

pub use cli::compile_to_stdout;
pub use pretty_error::emit_diagnostics;

/// Which intermediate stages to dump as yaml.
#[derive(Default, Clone, Copy)]
pub struct ShowOption {
    pub dump_scan: bool,
    pub dump_parse: bool,
    pub dump_transform: bool,
    pub dump_source_map: bool,
}

pub struct CliInput {
    /// file name used in diagnostics
    pub name: String,
    pub source: String,
    pub option: CompileOption,
    pub show: ShowOption,
}

pub fn absolute_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    }
    .clean();

    Ok(absolute_path)
}

pub fn get_delimiters(delimiters: String) -> Result<(String, String)> {
    let split_delimiter = delimiters.split_once(' ');
    match split_delimiter {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => bail!("The delimiter argument should be split by one whitespace"),
    }
}
