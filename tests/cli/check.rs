use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_check_clean_project() -> Result<()> {
    let test = CliTest::with_files(&[
        (".trinlinerc.json", r#"{ "locales": ["de"] }"#),
        ("translations/de.json", r#"{ "Save": "Speichern" }"#),
        ("src/app.js", "button(tr(\"Save\"));\n"),
    ])?;

    let (code, stdout, _) = run(&mut test.check_command())?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Checked 1 source file for de - no issues found"));
    assert!(!test.root().join("build").exists());

    Ok(())
}

#[test]
fn test_check_reports_warnings() -> Result<()> {
    let test = CliTest::with_files(&[
        (".trinlinerc.json", r#"{ "locales": ["de"] }"#),
        ("translations/de.json", "{}"),
        (
            "src/app.js",
            "const a = trn(\"1 file\", \"%1 files\", n);\nconst b = tr(message);\n",
        ),
    ])?;

    let (code, stdout, _) = run(&mut test.check_command())?;

    // Warnings alone do not fail the check.
    assert_eq!(code, 0);
    assert!(stdout.contains("warning: unsupported plural text \"1 file[N:%1 files]\""));
    assert!(stdout.contains("missing-plural-key"));
    assert!(stdout.contains("non-literal-argument"));
    assert!(stdout.contains("2 problems (0 errors, 2 warnings)"));
    assert!(stdout.contains("= locale: de"));

    Ok(())
}

#[test]
fn test_check_verbose_shows_untranslated() -> Result<()> {
    let test = CliTest::with_files(&[
        ("translations/en.json", "{}"),
        ("src/app.js", "show(tr(\"Welcome\"));\n"),
    ])?;

    let (_, quiet, _) = run(&mut test.check_command())?;
    assert!(!quiet.contains("untranslated"));

    let mut cmd = test.check_command();
    cmd.arg("-v");
    let (code, verbose, _) = run(&mut cmd)?;

    assert_eq!(code, 0);
    assert!(verbose.contains("info: no translation for \"Welcome\", keeping source text"));
    assert!(verbose.contains("--> "));

    Ok(())
}

#[test]
fn test_check_parse_error_fails() -> Result<()> {
    let test = CliTest::with_files(&[
        ("translations/en.json", "{}"),
        ("src/app.js", "show(tr(\"Welcome\";\n"),
    ])?;

    let (code, stdout, _) = run(&mut test.check_command())?;

    assert_eq!(code, 1);
    assert!(stdout.contains("parse-error"));

    Ok(())
}

#[test]
fn test_check_catalog_warning() -> Result<()> {
    let test = CliTest::with_files(&[
        ("i18n/en.json", r#"{ "count": 3 }"#),
        ("src/app.js", "show(1);\n"),
    ])?;

    let mut cmd = test.check_command();
    cmd.args(["--catalogs-root", "i18n"]);
    let (code, stdout, _) = run(&mut cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("catalog-error"));
    assert!(stdout.contains("key \"count\""));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;
    let mut cmd = test.command();
    cmd.arg("--help");

    let (code, stdout, _) = run(&mut cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.contains("build"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("init"));

    Ok(())
}
