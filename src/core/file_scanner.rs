use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Patterns without wildcards are literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning source files.
pub struct ScanResult {
    /// Sorted, so output and reports are deterministic.
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid glob pattern '{}': {}",
                                "warning:".bold().yellow(),
                                inc,
                                e
                            );
                        }
                    }
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else if verbose {
                    eprintln!(
                        "{} Include path does not exist: {}",
                        "warning:".bold().yellow(),
                        path.display()
                    );
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file() && is_source_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| {
                f.strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_source_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("app.js")).unwrap();
        File::create(dir.path().join("utils.mjs")).unwrap();
        File::create(dir.path().join("types.ts")).unwrap();
        File::create(dir.path().join("style.css")).unwrap();
        File::create(dir.path().join("de.json")).unwrap();

        let result = scan_files(dir.path(), &[], &[], false, false);

        assert_eq!(names(&result, dir.path()), vec!["app.js", "types.ts", "utils.mjs"]);
    }

    #[test]
    fn test_scan_with_includes_and_ignores() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("vendor")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        File::create(src.join("app.js")).unwrap();
        File::create(src.join("vendor/lib.js")).unwrap();
        File::create(dir.path().join("lib/utils.js")).unwrap();

        let result = scan_files(
            dir.path(),
            &["src".to_owned()],
            &["src/vendor".to_owned()],
            false,
            false,
        );

        assert_eq!(names(&result, dir.path()), vec!["src/app.js"]);
    }

    #[test]
    fn test_scan_with_glob_ignore() {
        let dir = tempdir().unwrap();
        let node_modules = dir.path().join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        File::create(node_modules.join("lib.js")).unwrap();
        File::create(dir.path().join("app.js")).unwrap();

        let result = scan_files(
            dir.path(),
            &[],
            &["**/node_modules/**".to_owned()],
            false,
            false,
        );

        assert_eq!(names(&result, dir.path()), vec!["app.js"]);
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("app.js")).unwrap();
        File::create(dir.path().join("app.test.js")).unwrap();
        let tests_dir = dir.path().join("__tests__");
        fs::create_dir(&tests_dir).unwrap();
        File::create(tests_dir.join("helper.js")).unwrap();

        let ignored = scan_files(dir.path(), &[], &[], true, false);
        assert_eq!(names(&ignored, dir.path()), vec!["app.js"]);

        let kept = scan_files(dir.path(), &[], &[], false, false);
        assert_eq!(kept.files.len(), 3);
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let components = dir.path().join("src").join("components");
        fs::create_dir_all(&components).unwrap();
        File::create(components.join("button.js")).unwrap();

        let result = scan_files(
            dir.path(),
            &["src".to_owned(), "src/components".to_owned()],
            &[],
            false,
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("packages/a/src")).unwrap();
        fs::create_dir_all(dir.path().join("packages/b/src")).unwrap();
        File::create(dir.path().join("packages/a/src/index.js")).unwrap();
        File::create(dir.path().join("packages/b/src/index.ts")).unwrap();
        File::create(dir.path().join("root.js")).unwrap();

        let result = scan_files(dir.path(), &["packages/*/src".to_owned()], &[], false, false);

        assert_eq!(
            names(&result, dir.path()),
            vec!["packages/a/src/index.js", "packages/b/src/index.ts"]
        );
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("app.js")));
        assert!(is_source_file(Path::new("app.tsx")));
        assert!(is_source_file(Path::new("app.cjs")));
        assert!(!is_source_file(Path::new("de.po")));
        assert!(!is_source_file(Path::new("README.md")));
    }
}
