//! Build command - write localized sources.
//!
//! Every source file is localized once per locale and written to
//! `<outDir>/<locale>/<path below sourceRoot>`. Files that fail (parse error
//! or broken placeholder) are not written; the rest of the tree still is.

use std::fs;

use anyhow::{Context, Result};

use super::{
    super::args::BuildCommand,
    BuildSummary, CommandKind, CommandResult, CommandSummary,
    helper::{finish, run_locale},
};
use crate::core::LocalizeContext;

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let ctx = LocalizeContext::new(&cmd.common)?;
    let out_dir = ctx.out_dir(cmd.out_dir.as_deref());

    let mut issues = Vec::new();
    let mut locales = Vec::new();
    let mut written = 0;

    for locale in ctx.locales(&cmd.locales) {
        let run = run_locale(&ctx, &locale);
        let locale_dir = out_dir.join(&locale);

        for file in &run.files {
            let Some(ref output) = file.output else {
                continue;
            };
            let target = locale_dir.join(&file.relative_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(&target, output)
                .with_context(|| format!("Failed to write file: {}", target.display()))?;
            written += 1;
        }

        issues.extend(run.issues);
        locales.push(run.summary);
    }

    Ok(finish(
        CommandKind::Build,
        CommandSummary::Build(BuildSummary {
            out_dir,
            locales,
            written,
        }),
        issues,
        ctx.files.len(),
        true,
    ))
}
