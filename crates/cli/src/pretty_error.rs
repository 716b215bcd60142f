use anyhow::Result;
use codespan_reporting::{
    diagnostic::{Diagnostic as Report, Label, Severity as Level},
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use compiler::{error::Severity, Diagnostic};

fn report_of(d: &Diagnostic) -> Report<()> {
    let level = match d.severity {
        Severity::Warning => Level::Warning,
        Severity::Error => Level::Error,
        Severity::Fatal => Level::Bug,
    };
    let start = d.location.start;
    Report::new(level)
        .with_message(&d.message)
        .with_labels(vec![Label::primary((), d.range.clone())
            .with_message(format!("at {}:{}", start.line, start.column))])
}

/// Renders diagnostics on stderr, pointing at the template source.
pub fn emit_diagnostics(name: &str, source: &str, diagnostics: &[Diagnostic]) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    let file = SimpleFile::new(name, source);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    let mut lock = writer.lock();
    for d in diagnostics {
        term::emit(&mut lock, &config, &file, &report_of(d))?;
    }
    Ok(())
}
