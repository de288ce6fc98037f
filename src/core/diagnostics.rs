//! Diagnostic events emitted by the translation pass.
//!
//! The pass never prints. Callers hand in a [`DiagnosticSink`] and decide
//! what to do with the events (the CLI turns them into issues).

use std::fmt;

/// Translation function recognized at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationFn {
    /// `tr(msg, ...args)`
    Tr,
    /// `trc(context, msg, ...args)`
    Trc,
    /// `trn(singular, plural, count, ...args)`
    Trn,
    /// `marktr(msg)`, a compile-time marker only
    Marktr,
}

impl TranslationFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tr" => Some(TranslationFn::Tr),
            "trc" => Some(TranslationFn::Trc),
            "trn" => Some(TranslationFn::Trn),
            "marktr" => Some(TranslationFn::Marktr),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TranslationFn::Tr => "tr",
            TranslationFn::Trc => "trc",
            TranslationFn::Trn => "trn",
            TranslationFn::Marktr => "marktr",
        }
    }
}

impl fmt::Display for TranslationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A call site was rewritten (or removed, for `marktr`).
    Transformed {
        function: TranslationFn,
        line: Option<usize>,
    },
    /// `tr`/`trc` key absent from the table; the source text is kept.
    Untranslated { key: String, line: Option<usize> },
    /// `trn` key absent from the table; the call is left untouched.
    MissingPluralKey { key: String, line: Option<usize> },
    /// A message slot did not hold a string literal; the call is left untouched.
    NonLiteralArgument {
        function: TranslationFn,
        index: usize,
        /// Kind of the offending argument, `None` when it is missing.
        found: Option<&'static str>,
        line: Option<usize>,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::Transformed { .. } | Diagnostic::Untranslated { .. } => Level::Info,
            Diagnostic::MissingPluralKey { .. } | Diagnostic::NonLiteralArgument { .. } => {
                Level::Warning
            }
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::Transformed { line, .. }
            | Diagnostic::Untranslated { line, .. }
            | Diagnostic::MissingPluralKey { line, .. }
            | Diagnostic::NonLiteralArgument { line, .. } => *line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Transformed { function, .. } => {
                write!(f, "inlined translation method {}()", function)
            }
            Diagnostic::Untranslated { key, .. } => {
                write!(f, "no translation for \"{}\", keeping source text", key)
            }
            Diagnostic::MissingPluralKey { key, .. } => {
                write!(f, "unsupported plural text \"{}\"", key)
            }
            Diagnostic::NonLiteralArgument {
                function,
                index,
                found,
                ..
            } => match found {
                Some(kind) => write!(
                    f,
                    "expected a string literal as argument {} of {}(), found {}",
                    index + 1,
                    function,
                    kind
                ),
                None => write!(
                    f,
                    "expected a string literal as argument {} of {}(), found nothing",
                    index + 1,
                    function
                ),
            },
        }
    }
}

/// Receiver of diagnostics produced during a pass.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}
