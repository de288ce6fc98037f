use std::path::PathBuf;

use crate::issues::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Build,
    Check,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Check(CheckSummary),
    Init(InitSummary),
}

/// Per-locale counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSummary {
    pub locale: String,
    /// Entries in the merged translation table.
    pub translations: usize,
    /// Files with at least one rewritten call site.
    pub patched: usize,
    /// Files whose output was withheld.
    pub failed: usize,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub out_dir: PathBuf,
    pub locales: Vec<LocaleSummary>,
    pub written: usize,
}

#[derive(Debug)]
pub struct CheckSummary {
    pub locales: Vec<LocaleSummary>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running trinline commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
    /// Every issue found, sorted, info-level included.
    pub issues: Vec<Issue>,
    /// Number of source files that were localized per locale.
    pub source_files: usize,
}
