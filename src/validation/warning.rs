//! Diagnostic types for grammar lint results.

use std::fmt;

/// Diagnostic codes reported by [`validate_grammar`](super::validate_grammar).
pub mod codes {
    /// An emitted function name has no definition in the fragment template.
    pub const MISSING_FUNCTION: &str = "randomart::validate::missing-function";
    /// A rule cannot be reached from the start symbol or the fallback rule.
    pub const UNREACHABLE_RULE: &str = "randomart::validate::unreachable-rule";
    /// An alternative has zero weight and is never sampled.
    pub const ZERO_WEIGHT: &str = "randomart::validate::zero-weight";
}

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, one of [`codes`].
    pub code: &'static str,
    pub message: String,
    /// Suggested fix, if any.
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            help: None,
        }
    }

    /// Attach help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " (help: {})", help)?;
        }
        Ok(())
    }
}

/// Diagnostics collected for one grammar.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics of one severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }

    /// Diagnostics carrying `code`.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }

    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    /// Check if the grammar produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl IntoIterator for ValidationResult {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl Extend<Diagnostic> for ValidationResult {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert!(result.is_clean());
        assert!(!result.has_errors());
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_counts_by_severity() {
        let mut result = ValidationResult::new();
        result.push(Diagnostic::error(codes::MISSING_FUNCTION, "get_q"));
        result.push(Diagnostic::warning(codes::ZERO_WEIGHT, "never chosen"));
        result.push(Diagnostic::warning(codes::UNREACHABLE_RULE, "rule B"));

        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 2);
        assert_eq!(result.with_code(codes::ZERO_WEIGHT).count(), 1);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::error(codes::MISSING_FUNCTION, "Function get_q() is not defined")
            .with_help("Define it in the fragment template");
        assert_eq!(
            d.to_string(),
            "error[randomart::validate::missing-function]: Function get_q() is not defined \
             (help: Define it in the fragment template)"
        );
    }

    #[test]
    fn test_extend_and_into_iter() {
        let mut result = ValidationResult::new();
        result.extend(vec![
            Diagnostic::warning(codes::ZERO_WEIGHT, "a"),
            Diagnostic::warning(codes::ZERO_WEIGHT, "b"),
        ]);
        let messages: Vec<String> = result.into_iter().map(|d| d.message).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }
}
