//! Flag-usage policy for marker features.

use lathe_ast::{Ast, NodeId};
use tracing::debug;

use crate::config::{ConfigKey, Configuration, FlagUsage, EXPERIMENTAL_FLAG_USAGE};

pub const EXPERIMENTAL_LABEL: &str = "any lathe.experimental feature";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Allowed,
    Warned,
    Rejected,
}

impl GateOutcome {
    pub fn proceeds(&self) -> bool {
        !matches!(self, GateOutcome::Rejected)
    }
}

/// Check the configured usage policy for an experimental feature and
/// report on `marker` accordingly.
///
/// The feature's own key and the experimental umbrella key are both read.
/// `ERROR` on either wins over `WARNING`; between equal severities the
/// feature's own key (and `feature_label`) is reported.
pub fn check(
    ast: &mut Ast,
    marker: NodeId,
    config: &Configuration,
    key: &ConfigKey<FlagUsage>,
    feature_label: &str,
) -> GateOutcome {
    let specific = match read(ast, marker, config, key) {
        Ok(value) => value,
        Err(()) => return GateOutcome::Rejected,
    };
    let umbrella = match read(ast, marker, config, &EXPERIMENTAL_FLAG_USAGE) {
        Ok(value) => value,
        Err(()) => return GateOutcome::Rejected,
    };

    let flagged = match (specific, umbrella) {
        (Some(FlagUsage::Error), _) => Some((FlagUsage::Error, feature_label)),
        (_, Some(FlagUsage::Error)) => Some((FlagUsage::Error, EXPERIMENTAL_LABEL)),
        (Some(FlagUsage::Warning), _) => Some((FlagUsage::Warning, feature_label)),
        (_, Some(FlagUsage::Warning)) => Some((FlagUsage::Warning, EXPERIMENTAL_LABEL)),
        _ => None,
    };

    let outcome = match flagged {
        None => GateOutcome::Allowed,
        Some((severity, label)) => {
            let message = format!("Use of {} is flagged according to lathe configuration.", label);
            if severity == FlagUsage::Error {
                ast.report_error(marker, message);
                GateOutcome::Rejected
            } else {
                ast.report_warning(marker, message);
                GateOutcome::Warned
            }
        }
    };

    debug!(key = key.name(), ?outcome, "policy checked");
    outcome
}

/// Unreadable values are reported on the marker.
fn read(
    ast: &mut Ast,
    marker: NodeId,
    config: &Configuration,
    key: &ConfigKey<FlagUsage>,
) -> Result<Option<FlagUsage>, ()> {
    config.get(key).map_err(|e| ast.report_error(marker, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALL_ARGS_FINAL_FLAG_USAGE;
    use lathe_ast::{Severity, Span};

    fn gate(toml: &str) -> (GateOutcome, Ast) {
        let config = Configuration::from_toml_str(toml).unwrap();
        let mut ast = Ast::new(Span::DUMMY);
        let root = ast.root();
        let outcome = check(&mut ast, root, &config, &ALL_ARGS_FINAL_FLAG_USAGE, "@AllArgsFinal");
        (outcome, ast)
    }

    #[test]
    fn test_unset_is_allowed_silently() {
        let (outcome, ast) = gate("");
        assert_eq!(outcome, GateOutcome::Allowed);
        assert!(ast.diagnostics().is_empty());
    }

    #[test]
    fn test_allow_is_silent() {
        let (outcome, ast) = gate(r#"lathe.allArgsFinal.flagUsage = "ALLOW""#);
        assert_eq!(outcome, GateOutcome::Allowed);
        assert!(ast.diagnostics().is_empty());
    }

    #[test]
    fn test_warning() {
        let (outcome, ast) = gate(r#"lathe.allArgsFinal.flagUsage = "WARNING""#);
        assert_eq!(outcome, GateOutcome::Warned);
        assert_eq!(ast.diagnostics().len(), 1);
        assert_eq!(ast.diagnostics()[0].severity, Severity::Warning);
        assert_eq!(
            ast.diagnostics()[0].message,
            "Use of @AllArgsFinal is flagged according to lathe configuration."
        );
    }

    #[test]
    fn test_error() {
        let (outcome, ast) = gate(r#"lathe.allArgsFinal.flagUsage = "ERROR""#);
        assert_eq!(outcome, GateOutcome::Rejected);
        assert!(!outcome.proceeds());
        assert_eq!(ast.diagnostics().len(), 1);
        assert_eq!(ast.diagnostics()[0].severity, Severity::Error);
    }

    #[test]
    fn test_umbrella_key_uses_umbrella_label() {
        let (outcome, ast) = gate(r#"lathe.experimental.flagUsage = "WARNING""#);
        assert_eq!(outcome, GateOutcome::Warned);
        assert!(ast.diagnostics()[0].message.contains(EXPERIMENTAL_LABEL));
    }

    #[test]
    fn test_umbrella_error_beats_specific_warning() {
        let (outcome, ast) = gate(
            r#"
lathe.allArgsFinal.flagUsage = "WARNING"
lathe.experimental.flagUsage = "ERROR"
"#,
        );
        assert_eq!(outcome, GateOutcome::Rejected);
        assert_eq!(ast.diagnostics().len(), 1);
        assert!(ast.diagnostics()[0].message.contains(EXPERIMENTAL_LABEL));
    }

    #[test]
    fn test_invalid_value_rejects() {
        let (outcome, ast) = gate(r#"lathe.allArgsFinal.flagUsage = "LOUD""#);
        assert_eq!(outcome, GateOutcome::Rejected);
        assert!(ast.has_errors());
        assert!(ast.diagnostics()[0].message.contains("lathe.allArgsFinal.flagUsage"));
    }
}
