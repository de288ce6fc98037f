//! User-facing issues.
//!
//! Diagnostics from the translation pass, source parse failures and catalog
//! problems all end up as an [`Issue`] carrying everything the reporter
//! needs: where it happened, what happened, and how bad it is.

use std::{cmp::Ordering, fmt};

use crate::core::{
    diagnostics::{Diagnostic, Level},
    error::PatchError,
    parsers::catalog::CatalogWarning,
};

// ============================================================
// Severity and Rule
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    /// Only shown with `--verbose`.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Severity::Info,
            Level::Warning => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Transformed,
    Untranslated,
    MissingPluralKey,
    NonLiteralArgument,
    PlaceholderReference,
    ParseError,
    CatalogError,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Transformed => write!(f, "transformed"),
            Rule::Untranslated => write!(f, "untranslated"),
            Rule::MissingPluralKey => write!(f, "missing-plural-key"),
            Rule::NonLiteralArgument => write!(f, "non-literal-argument"),
            Rule::PlaceholderReference => write!(f, "placeholder-reference"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::CatalogError => write!(f, "catalog-error"),
        }
    }
}

// ============================================================
// Issue
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub file_path: String,
    /// Locale the file was being localized for, when it matters.
    pub locale: Option<String>,
    /// 1-based; `None` for file-level issues.
    pub line: Option<usize>,
    /// The offending source line, shown as context.
    pub source_line: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub rule: Rule,
    pub hint: Option<&'static str>,
}

impl Issue {
    pub fn from_diagnostic(file_path: &str, source: &str, diagnostic: &Diagnostic) -> Self {
        let (rule, hint) = match diagnostic {
            Diagnostic::Transformed { .. } => (Rule::Transformed, None),
            Diagnostic::Untranslated { .. } => (
                Rule::Untranslated,
                Some("add the key to the locale's catalog"),
            ),
            Diagnostic::MissingPluralKey { .. } => (
                Rule::MissingPluralKey,
                Some("add a plural entry for this key; the call is left as is"),
            ),
            Diagnostic::NonLiteralArgument { .. } => (
                Rule::NonLiteralArgument,
                Some("only string literals can be translated at build time"),
            ),
        };
        let line = diagnostic.line();
        Self {
            file_path: file_path.to_string(),
            locale: None,
            line,
            source_line: line.and_then(|line| source_line(source, line)),
            message: diagnostic.to_string(),
            severity: diagnostic.level().into(),
            rule,
            hint,
        }
    }

    pub fn from_patch_error(file_path: &str, error: &PatchError) -> Self {
        Self::file_error(
            file_path,
            error.to_string(),
            Rule::PlaceholderReference,
            Some("fix the catalog entry; no output was written for this file"),
        )
    }

    pub fn parse_error(file_path: &str, error: &anyhow::Error) -> Self {
        Self::file_error(file_path, format!("{:#}", error), Rule::ParseError, None)
    }

    pub fn from_catalog_warning(warning: &CatalogWarning) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::file_error(
                &warning.file_path,
                warning.error.clone(),
                Rule::CatalogError,
                None,
            )
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    fn file_error(
        file_path: &str,
        message: String,
        rule: Rule,
        hint: Option<&'static str>,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            locale: None,
            line: None,
            source_line: None,
            message,
            severity: Severity::Error,
            rule,
            hint,
        }
    }
}

fn source_line(source: &str, line: usize) -> Option<String> {
    source
        .lines()
        .nth(line.checked_sub(1)?)
        .map(|text| text.trim_end().to_string())
}

// Sort by file, then line (file-level issues first), then severity.
impl Ord for Issue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file_path
            .cmp(&other.file_path)
            .then_with(|| self.line.cmp(&other.line))
            .then_with(|| self.locale.cmp(&other.locale))
            .then_with(|| self.severity.cmp(&other.severity))
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
