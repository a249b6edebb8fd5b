//! Error and diagnostic printing

use std::path::Path;

use colored::*;
use lathe_ast::{Diagnostic, Severity};

/// Print a formatted error message
pub fn print_error(context: &str, error: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("  {}", error.to_string().red());

    // Show chain of causes
    let mut current = error.source();
    while let Some(cause) = current {
        eprintln!("  {} {}", "Caused by:".dimmed(), cause.to_string().dimmed());
        current = std::error::Error::source(cause);
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// 1-based line and column of a byte offset into `source`.
pub fn line_col(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

/// Print one diagnostic as `path:line:col: severity: message`.
pub fn print_diagnostic(path: &Path, source: &str, diagnostic: &Diagnostic) {
    let location = if diagnostic.span.is_dummy() {
        path.display().to_string()
    } else {
        let (line, column) = line_col(source, diagnostic.span.lo);
        format!("{}:{}:{}", path.display(), line, column)
    };
    let severity = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
    };
    eprintln!("{}: {}: {}", location.bold(), severity, diagnostic.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "(a\n  (b c)\n)";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 5), (2, 3));
        assert_eq!(line_col(source, 100), (3, 2));
    }
}
