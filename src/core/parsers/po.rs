//! Gettext `.po` catalogs.
//!
//! Files are read with `polib`. Plural forms are numbered in gettext and
//! named in the table, so `msgstr[N]` is mapped to the N-th CLDR plural
//! category used by the catalog's language.

use std::path::Path;

use anyhow::{Result, anyhow};
use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use polib::{message::MessageView, po_file};

use crate::core::table::{Catalog, Entry, context_key, plural_key};

/// Categories used when the language has no plural rules.
const FALLBACK_CATEGORIES: &[&str] = &["one", "other"];

/// Plural categories used by `locale`, in CLDR order.
///
/// Each category is probed with numbers that select it in at least one
/// language; a category is kept when one of them selects it here.
pub fn plural_categories(locale: &str) -> Vec<&'static str> {
    let Ok(parsed) = locale.replace('_', "-").parse::<Locale>() else {
        return FALLBACK_CATEGORIES.to_vec();
    };
    let Ok(rules) = PluralRules::try_new(parsed.into(), PluralRuleType::Cardinal.into()) else {
        return FALLBACK_CATEGORIES.to_vec();
    };

    let samples: [(PluralCategory, &[usize]); 6] = [
        (PluralCategory::Zero, &[0]),
        (PluralCategory::One, &[1, 21, 31, 41]),
        (PluralCategory::Two, &[2, 22, 32]),
        (PluralCategory::Few, &[3, 4, 23, 24]),
        (PluralCategory::Many, &[5, 11, 101]),
        (PluralCategory::Other, &[6, 7, 8, 9, 10, 25, 100, 1000]),
    ];

    samples
        .iter()
        .filter(|(category, values)| {
            values
                .iter()
                .any(|&value| rules.category_for(value) == *category)
        })
        .map(|(category, _)| category_name(*category))
        .collect()
}

fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Read a `.po` file into a catalog.
///
/// The header, fuzzy entries and entries without a translation are skipped.
/// Plural forms beyond the language's categories are dropped.
pub fn parse_po_catalog(path: &Path, locale: &str) -> Result<Catalog> {
    let po = po_file::parse(path)
        .map_err(|e| anyhow!("Failed to parse .po catalog {:?}: {:?}", path, e))?;
    let categories = plural_categories(locale);
    let mut catalog = Catalog::new();

    for message in po.messages() {
        if message.msgid().is_empty() || message.flags().is_fuzzy() {
            continue;
        }
        if let Some((key, entry)) = message_entry(message, &categories) {
            catalog.insert(key, entry);
        }
    }
    Ok(catalog)
}

fn message_entry(message: &dyn MessageView, categories: &[&str]) -> Option<(String, Entry)> {
    let id = message.msgid();
    if message.is_plural() {
        let plural = message.msgid_plural().ok()?;
        let forms: Vec<(String, String)> = message
            .msgstr_plural()
            .ok()?
            .iter()
            .zip(categories)
            .filter(|(text, _)| !text.is_empty())
            .map(|(text, category)| (category.to_string(), text.clone()))
            .collect();
        if forms.is_empty() {
            return None;
        }
        return Some((plural_key(id, plural), Entry::Plural(forms)));
    }

    let text = message.msgstr().ok().filter(|text| !text.is_empty())?;
    let key = match message.msgctxt() {
        "" => id.to_string(),
        context => context_key(id, context),
    };
    Some((key, Entry::from(text)))
}
