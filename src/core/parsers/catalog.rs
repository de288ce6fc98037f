//! Translation catalogs on disk.
//!
//! Catalog files live anywhere below the catalogs root and are named after
//! their locale: `de.json`, `de-AT.po`, `pt_BR.json`. JSON catalogs are a
//! flat object mapping keys to strings, or to an object of plural category
//! texts for `trn` keys. `.po` catalogs are handled by [`super::po`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use super::po::parse_po_catalog;
use crate::core::table::{Catalog, Entry, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Po,
}

impl CatalogFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(CatalogFormat::Json),
            "po" => Some(CatalogFormat::Po),
            _ => None,
        }
    }
}

/// A catalog file found below the catalogs root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub locale: String,
    pub path: PathBuf,
    pub format: CatalogFormat,
}

/// A problem found while loading catalogs. The key or file is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWarning {
    pub file_path: String,
    pub error: String,
}

/// A table plus everything that went wrong while loading its catalogs.
#[derive(Debug, Default)]
pub struct TableBuild {
    pub table: Table,
    pub warnings: Vec<CatalogWarning>,
}

/// `pt_BR` and `pt-BR` name the same locale.
pub fn normalize_locale(locale: &str) -> String {
    locale.replace('_', "-")
}

/// `de` for `de-AT`, `None` for a bare language.
pub fn base_language(locale: &str) -> Option<&str> {
    locale
        .split_once(['-', '_'])
        .map(|(language, _)| language)
        .filter(|language| !language.is_empty())
}

/// Find every catalog below `root`, ordered by path.
pub fn discover_catalogs(root: &Path) -> Result<Vec<CatalogFile>> {
    if !root.is_dir() {
        bail!("Catalogs directory not found: {}", root.display());
    }

    let mut files: Vec<CatalogFile> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            let format = CatalogFormat::from_path(&path)?;
            let locale = normalize_locale(path.file_stem()?.to_str()?);
            Some(CatalogFile {
                locale,
                path,
                format,
            })
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Read and parse one catalog file.
pub fn load_catalog(file: &CatalogFile) -> Result<(Catalog, Vec<CatalogWarning>)> {
    match file.format {
        CatalogFormat::Json => {
            let content = fs::read_to_string(&file.path)
                .with_context(|| format!("Failed to read catalog: {:?}", file.path))?;
            parse_json_catalog(&content, &file.path.to_string_lossy())
        }
        CatalogFormat::Po => Ok((parse_po_catalog(&file.path, &file.locale)?, Vec::new())),
    }
}

pub fn parse_json_catalog(
    content: &str,
    file_path: &str,
) -> Result<(Catalog, Vec<CatalogWarning>)> {
    let json: Value = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse JSON catalog: {}", file_path))?;
    let Value::Object(map) = json else {
        bail!("Expected a JSON object in {}", file_path);
    };

    let mut catalog = Catalog::new();
    let mut warnings = Vec::new();
    for (key, value) in map {
        // `@metadata` and friends.
        if key.starts_with('@') {
            continue;
        }
        match json_entry(&value) {
            Some(entry) => catalog.insert(key, entry),
            None => warnings.push(CatalogWarning {
                file_path: file_path.to_string(),
                error: format!(
                    "key \"{}\": expected a string or an object of plural forms",
                    key
                ),
            }),
        }
    }
    Ok((catalog, warnings))
}

fn json_entry(value: &Value) -> Option<Entry> {
    match value {
        Value::String(text) => Some(Entry::Text(text.clone())),
        Value::Object(forms) if !forms.is_empty() => forms
            .iter()
            .map(|(category, text)| Some((category.clone(), text.as_str()?.to_string())))
            .collect::<Option<Vec<_>>>()
            .map(Entry::Plural),
        _ => None,
    }
}

/// Build the table for `locale` from `files`.
///
/// Catalogs of the bare language form the base mapping, the locale's own
/// catalogs are merged over it in path order. Files are parsed in parallel
/// and merged serially.
pub fn build_table(files: &[CatalogFile], locale: &str) -> TableBuild {
    let locale = normalize_locale(locale);
    let mut warnings = Vec::new();

    let base = base_language(&locale).map(|language| {
        let catalogs = load_locale(files, language, &mut warnings);
        Table::build(language, &catalogs, None)
    });
    let sources = load_locale(files, &locale, &mut warnings);
    let table = Table::build(locale, &sources, base.as_ref().map(Table::entries));

    TableBuild { table, warnings }
}

fn load_locale(
    files: &[CatalogFile],
    locale: &str,
    warnings: &mut Vec<CatalogWarning>,
) -> Vec<Catalog> {
    let results: Vec<_> = files
        .par_iter()
        .filter(|file| file.locale == locale)
        .map(|file| (file, load_catalog(file)))
        .collect();

    let mut catalogs = Vec::with_capacity(results.len());
    for (file, result) in results {
        match result {
            Ok((catalog, file_warnings)) => {
                warnings.extend(file_warnings);
                catalogs.push(catalog);
            }
            Err(e) => warnings.push(CatalogWarning {
                file_path: file.path.to_string_lossy().to_string(),
                error: format!("{:#}", e),
            }),
        }
    }
    catalogs
}
