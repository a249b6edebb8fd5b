//! Rewrite and check command implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::*;
use lathe::errors::{line_col, print_diagnostic};
use lathe::{Configuration, PassReport, Registry, Walker};
use lathe_ast::{emit_string, parse_unit, Diagnostic};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cli::MessageFormat;

const EXTENSION: &str = "sexp";

/// One input file and where its output goes relative to an output root.
#[derive(Debug)]
struct Input {
    path: PathBuf,
    relative: PathBuf,
}

/// Where rewritten units go.
pub enum Destination {
    Stdout,
    InPlace,
    Directory(PathBuf),
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: String,
    line: usize,
    column: usize,
    severity: &'static str,
    message: &'a str,
}

#[derive(Default)]
struct Totals {
    units: usize,
    failed: usize,
    warnings: usize,
}

pub fn rewrite_units(
    config: &Configuration,
    paths: &[PathBuf],
    format: MessageFormat,
    destination: Destination,
) -> Result<()> {
    let inputs = collect_inputs(paths)?;
    let mut totals = Totals::default();
    let show_headers = inputs.len() > 1;

    for input in &inputs {
        let Some(output) = process(config, input, format, &mut totals)? else {
            continue;
        };
        match &destination {
            Destination::Stdout => {
                if show_headers {
                    println!("; {}", input.path.display());
                }
                print!("{}", output);
            }
            Destination::InPlace => {
                fs::write(&input.path, &output)
                    .with_context(|| format!("Failed to write {}", input.path.display()))?;
            }
            Destination::Directory(dir) => {
                let target = dir.join(&input.relative);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&target, &output)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                info!(path = %target.display(), "wrote unit");
            }
        }
    }

    finish(&totals, format)
}

pub fn check_units(config: &Configuration, paths: &[PathBuf], format: MessageFormat) -> Result<()> {
    let inputs = collect_inputs(paths)?;
    let mut totals = Totals::default();

    for input in &inputs {
        process(config, input, format, &mut totals)?;
    }

    if format == MessageFormat::Human && totals.failed == 0 {
        eprintln!(
            "{} {} unit(s) checked, {} warning(s)",
            "✓".green().bold(),
            totals.units,
            totals.warnings
        );
    }
    finish(&totals, format)
}

fn finish(totals: &Totals, format: MessageFormat) -> Result<()> {
    if totals.failed > 0 {
        if format == MessageFormat::Human {
            eprintln!(
                "{} {} of {} unit(s) not emitted",
                "✗".red().bold(),
                totals.failed,
                totals.units
            );
        }
        bail!("{} unit(s) had errors", totals.failed);
    }
    Ok(())
}

/// Parse, run the pass and report. Returns the emitted unit, or `None` when
/// the unit had errors.
fn process(
    config: &Configuration,
    input: &Input,
    format: MessageFormat,
    totals: &mut Totals,
) -> Result<Option<String>> {
    let source = fs::read_to_string(&input.path)
        .with_context(|| format!("Failed to read {}", input.path.display()))?;
    totals.units += 1;

    let mut ast = match parse_unit(&source) {
        Ok(ast) => ast,
        Err(e) => {
            totals.failed += 1;
            report_parse_error(&input.path, &e, format);
            return Ok(None);
        }
    };

    let report: PassReport = Walker::run(Registry::builtin(), &mut ast, config);
    debug!(path = %input.path.display(), ?report, "pass finished");

    for diagnostic in ast.diagnostics() {
        report_diagnostic(&input.path, &source, diagnostic, format);
    }
    totals.warnings += report.warnings;

    if !report.succeeded() {
        totals.failed += 1;
        return Ok(None);
    }
    Ok(Some(format!("{}\n", emit_string(&ast))))
}

fn report_diagnostic(path: &Path, source: &str, diagnostic: &Diagnostic, format: MessageFormat) {
    match format {
        MessageFormat::Human => print_diagnostic(path, source, diagnostic),
        MessageFormat::Json => {
            let (line, column) = line_col(source, diagnostic.span.lo);
            emit_json(&JsonDiagnostic {
                file: path.display().to_string(),
                line,
                column,
                severity: diagnostic.severity.as_str(),
                message: &diagnostic.message,
            });
        }
    }
}

fn report_parse_error(path: &Path, error: &lathe_ast::ParseError, format: MessageFormat) {
    let message = error.to_string();
    let (line, column) = error.position().map_or((0, 0), |pos| (pos.line, pos.column));
    match format {
        MessageFormat::Human => {
            eprintln!("{}: {}: {}", path.display().to_string().bold(), "error".red().bold(), message)
        }
        MessageFormat::Json => emit_json(&JsonDiagnostic {
            file: path.display().to_string(),
            line,
            column,
            severity: "error",
            message: &message,
        }),
    }
}

fn emit_json(diagnostic: &JsonDiagnostic<'_>) {
    match serde_json::to_string(diagnostic) {
        Ok(line) => eprintln!("{}", line),
        Err(e) => lathe::errors::print_warning(&format!("Failed to serialize diagnostic: {}", e)),
    }
}

/// Expand directories into their `*.sexp` files, sorted by path.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<Input> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == EXTENSION))
                .map(|e| Input {
                    relative: e.path().strip_prefix(path).unwrap_or(e.path()).to_path_buf(),
                    path: e.into_path(),
                })
                .collect();
            found.sort_by(|a, b| a.path.cmp(&b.path));
            inputs.extend(found);
        } else if path.is_file() {
            let relative = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
            inputs.push(Input { path: path.clone(), relative });
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    debug!(count = inputs.len(), "collected inputs");
    Ok(inputs)
}
