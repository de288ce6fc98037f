//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style. Kept out of `core` so the engine can be
//! used as a library without printing side effects.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use super::commands::{
    BuildSummary, CheckSummary, CommandResult, CommandSummary, InitSummary, LocaleSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format.
///
/// Info-level issues are only shown when `verbose` is set.
pub fn report_to<W: Write>(issues: &[Issue], verbose: bool, writer: &mut W) {
    let mut visible: Vec<&Issue> = issues
        .iter()
        .filter(|issue| verbose || issue.severity != Severity::Info)
        .collect();
    if visible.is_empty() {
        return;
    }
    visible.sort();

    let max_line_width = visible
        .iter()
        .filter_map(|issue| issue.line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for issue in &visible {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&visible, writer);
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().blue(),
    }
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_label(issue.severity),
        issue.message,
        issue.rule.to_string().dimmed().cyan()
    );

    match issue.line {
        Some(line) => {
            let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), issue.file_path, line);
        }
        None => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), issue.file_path);
        }
    }

    if let (Some(line), Some(source_line)) = (issue.line, &issue.source_line) {
        let caret = match issue.severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
            Severity::Info => "^".blue(),
        };
        let indent = &source_line[..source_line.len() - source_line.trim_start().len()];

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret,
            width = max_line_width,
            padding = UnicodeWidthStr::width(indent)
        );
    }

    if let Some(ref locale) = issue.locale {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "locale:".bold(),
            locale,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[&Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

// ============================================================
// Command output
// ============================================================

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    report_to(&result.issues, verbose, writer);

    match &result.summary {
        CommandSummary::Build(summary) => print_build(summary, writer),
        CommandSummary::Check(summary) => print_check(result, summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn print_locale<W: Write>(summary: &LocaleSummary, writer: &mut W) {
    let mark = if summary.failed > 0 {
        FAILURE_MARK.red()
    } else {
        SUCCESS_MARK.green()
    };
    let _ = writeln!(
        writer,
        "{} {}: {} {}, {} {} localized, {} failed",
        mark,
        summary.locale.bold(),
        summary.translations,
        if summary.translations == 1 {
            "translation"
        } else {
            "translations"
        },
        summary.patched,
        if summary.patched == 1 { "file" } else { "files" },
        summary.failed
    );
}

fn print_build<W: Write>(summary: &BuildSummary, writer: &mut W) {
    for locale in &summary.locales {
        print_locale(locale, writer);
    }
    let _ = writeln!(
        writer,
        "Wrote {} {} to {}",
        summary.written,
        if summary.written == 1 { "file" } else { "files" },
        summary.out_dir.display()
    );
}

fn print_check<W: Write>(result: &CommandResult, summary: &CheckSummary, writer: &mut W) {
    if several_locales(summary) {
        for locale in &summary.locales {
            print_locale(locale, writer);
        }
    }
    if result.error_count == 0 && result.warning_count == 0 {
        let locales: Vec<&str> = summary
            .locales
            .iter()
            .map(|locale| locale.locale.as_str())
            .collect();
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {} for {} - no issues found",
                result.source_files,
                if result.source_files == 1 {
                    "file"
                } else {
                    "files"
                },
                locales.join(", ")
            )
            .green()
        );
    }
}

/// Per-locale lines are only worth printing when there is more than one.
fn several_locales(summary: &CheckSummary) -> bool {
    summary.locales.len() > 1
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(ref error) = summary.error {
        eprintln!("{} {}", "error:".bold().red(), error);
    }
}
