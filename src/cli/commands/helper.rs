use super::{CommandKind, CommandResult, CommandSummary, LocaleSummary};
use crate::{
    core::{LocalizeContext, LocalizedFile},
    issues::{Issue, Severity},
};

/// Output of the localization pipeline for one locale.
pub struct LocaleRun {
    pub summary: LocaleSummary,
    pub files: Vec<LocalizedFile>,
    pub issues: Vec<Issue>,
}

/// Build the table for `locale` and localize every source file with it.
pub fn run_locale(ctx: &LocalizeContext, locale: &str) -> LocaleRun {
    let build = ctx.table_for(locale);
    let mut issues: Vec<Issue> = build
        .warnings
        .iter()
        .map(Issue::from_catalog_warning)
        .collect();

    let mut files = ctx.localize(&build.table);
    let mut summary = LocaleSummary {
        locale: locale.to_string(),
        translations: build.table.len(),
        ..Default::default()
    };
    for file in &mut files {
        if file.patched {
            summary.patched += 1;
        }
        if file.output.is_none() {
            summary.failed += 1;
        }
        issues.extend(file.issues.drain(..).map(|issue| issue.with_locale(locale)));
    }

    LocaleRun {
        summary,
        files,
        issues,
    }
}

pub fn finish(
    kind: CommandKind,
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    source_files: usize,
    exit_on_errors: bool,
) -> CommandResult {
    issues.sort();
    // Catalog problems of a shared base language show up once per locale.
    issues.dedup();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warning_count = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        exit_on_errors,
        issues,
        source_files,
    }
}
