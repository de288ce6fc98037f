use anyhow::Result;

use super::{
    super::args::CheckCommand,
    CheckSummary, CommandKind, CommandResult, CommandSummary,
    helper::{finish, run_locale},
};
use crate::core::LocalizeContext;

/// Localize every locale in memory and collect the issues; nothing is written.
pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = LocalizeContext::new(&cmd.common)?;

    let mut issues = Vec::new();
    let mut locales = Vec::new();
    for locale in ctx.locales(&cmd.locales) {
        let run = run_locale(&ctx, &locale);
        issues.extend(run.issues);
        locales.push(run.summary);
    }

    Ok(finish(
        CommandKind::Check,
        CommandSummary::Check(CheckSummary { locales }),
        issues,
        ctx.files.len(),
        true,
    ))
}
