use std::{
    collections::BTreeSet,
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        file_scanner::scan_files,
        parsers::{
            catalog::{CatalogFile, TableBuild, build_table, discover_catalogs, normalize_locale},
            js::parse_js_source,
        },
        patch::{has_text, patch},
        printer::print,
        table::Table,
    },
    issues::Issue,
};

/// One source file after localization.
#[derive(Debug)]
pub struct LocalizedFile {
    pub path: PathBuf,
    /// Path below the source root, used to lay out the output tree.
    pub relative_path: PathBuf,
    /// `None` when the file failed and no output may be written for it.
    pub output: Option<String>,
    /// Whether any call site was rewritten.
    pub patched: bool,
    pub issues: Vec<Issue>,
}

/// Project-wide state shared by `build` and `check`.
///
/// Configuration priority, highest first: CLI arguments, the
/// `.trinlinerc.json` file, built-in defaults.
pub struct LocalizeContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,
    /// Directory relative config paths are resolved against.
    pub root_dir: PathBuf,
    /// Base directory of the source tree (`sourceRoot`).
    pub source_dir: PathBuf,
    pub catalogs_dir: PathBuf,
    /// Source files to localize, sorted.
    pub files: BTreeSet<PathBuf>,
    /// Catalog files below `catalogs_dir`, sorted by path.
    pub catalogs: Vec<CatalogFile>,
    pub verbose: bool,
}

impl LocalizeContext {
    /// Load configuration, scan source files and discover catalogs.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or the catalogs directory
    /// doesn't exist.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;
        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(ref catalogs_root) = common_args.catalogs_root {
            config.catalogs_root = catalogs_root.to_string_lossy().to_string();
        }

        let source_dir = resolve_dir(&root_dir, &config.source_root);
        let catalogs_dir = match common_args.catalogs_root {
            Some(ref catalogs_root) => catalogs_root.clone(),
            None => resolve_dir(&root_dir, &config.catalogs_root),
        };

        let (scan_result, catalogs) = rayon::join(
            || {
                scan_files(
                    &source_dir,
                    &config.includes,
                    &config.ignores,
                    config.ignore_test_files,
                    verbose,
                )
            },
            || discover_catalogs(&catalogs_dir),
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            source_dir,
            catalogs_dir,
            files: scan_result.files,
            catalogs: catalogs?,
            verbose,
        })
    }

    /// Locales to process: `overrides` when given, else the configured ones.
    pub fn locales(&self, overrides: &[String]) -> Vec<String> {
        let locales = if overrides.is_empty() {
            &self.config.locales
        } else {
            overrides
        };
        let mut seen = BTreeSet::new();
        locales
            .iter()
            .map(|locale| normalize_locale(locale.trim()))
            .filter(|locale| !locale.is_empty() && seen.insert(locale.clone()))
            .collect()
    }

    /// Output directory, `override_dir` taking precedence over `outDir`.
    pub fn out_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => resolve_dir(&self.root_dir, &self.config.out_dir),
        }
    }

    /// Build the translation table for `locale`.
    pub fn table_for(&self, locale: &str) -> TableBuild {
        let build = build_table(&self.catalogs, locale);
        if self.verbose {
            eprintln!(
                "Note: {} translation(s) loaded for {}",
                build.table.len(),
                locale
            );
        }
        build
    }

    /// Localize every source file with `table`, in parallel.
    ///
    /// Results are in source path order.
    pub fn localize(&self, table: &Table) -> Vec<LocalizedFile> {
        let files: Vec<&PathBuf> = self.files.iter().collect();
        files
            .par_iter()
            .map(|path| self.localize_file(path, table))
            .collect()
    }

    fn localize_file(&self, path: &Path, table: &Table) -> LocalizedFile {
        let file_path = path.to_string_lossy().to_string();
        let mut file = LocalizedFile {
            path: path.to_path_buf(),
            relative_path: path
                .strip_prefix(&self.source_dir)
                .unwrap_or(path)
                .to_path_buf(),
            output: None,
            patched: false,
            issues: Vec::new(),
        };

        let code = match fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", file_path))
        {
            Ok(code) => code,
            Err(e) => {
                file.issues.push(Issue::parse_error(&file_path, &e));
                return file;
            }
        };

        let mut parsed = match parse_js_source(code.clone(), &file_path) {
            Ok(parsed) => parsed,
            Err(e) => {
                if self.verbose {
                    eprintln!("Warning: {} - {}", file_path, e);
                }
                file.issues.push(Issue::parse_error(&file_path, &e));
                return file;
            }
        };

        // Nothing to translate: keep the bytes as they are.
        if !has_text(&parsed.tree, parsed.root) {
            file.output = Some(code);
            return file;
        }

        let mut diagnostics = Vec::new();
        match patch(&mut parsed.tree, parsed.root, table, &mut diagnostics) {
            Ok(()) => {
                file.output = Some(print(&parsed.tree, parsed.root));
                file.patched = true;
            }
            Err(e) => file.issues.push(Issue::from_patch_error(&file_path, &e)),
        }
        file.issues.extend(
            diagnostics
                .iter()
                .map(|diagnostic| Issue::from_diagnostic(&file_path, &code, diagnostic)),
        );
        file
    }
}

/// Resolve a config path against `root`, dropping `.` components.
fn resolve_dir(root: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    dir.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .fold(root.to_path_buf(), |acc, component| acc.join(component))
}
