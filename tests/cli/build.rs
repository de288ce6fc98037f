use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

const CONFIG: &str = r#"{ "locales": ["de"] }"#;

#[test]
fn test_build_inlines_translations() -> Result<()> {
    let test = CliTest::with_files(&[
        (".trinlinerc.json", CONFIG),
        (
            "translations/de.json",
            r#"{
                "Hello": "Hallo",
                "Open %1": "%1 öffnen",
                "File[C:menu]": "Datei",
                "1 file[N:%1 files]": { "one": "1 Datei", "other": "%1 Dateien" }
            }"#,
        ),
        (
            "src/app.js",
            r#"// entry point
const greeting = tr("Hello");
const menu = trc("menu", "File");
open(tr("Open %1", name));
label(trn("1 file", "%1 files", count));
"#,
        ),
    ])?;

    let (code, stdout, stderr) = run(&mut test.build_command())?;

    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        test.read_file("build/de/src/app.js")?,
        r#"// entry point
const greeting = "Hallo";
const menu = "Datei";
open(name + " öffnen");
label(trnc({ one: "1 Datei", other: "%1 Dateien" }, count));
"#
    );
    assert!(stdout.contains("de: 4 translations, 1 file localized, 0 failed"));
    assert!(stdout.contains("Wrote 1 file to"));

    Ok(())
}

#[test]
fn test_build_copies_files_without_text() -> Result<()> {
    let source = "export const answer = 42; /* keep   spacing */\n";
    let test = CliTest::with_files(&[
        (".trinlinerc.json", CONFIG),
        ("translations/de.json", "{}"),
        ("src/util/math.js", source),
    ])?;

    let (code, _, _) = run(&mut test.build_command())?;

    assert_eq!(code, 0);
    assert_eq!(test.read_file("build/de/src/util/math.js")?, source);

    Ok(())
}

#[test]
fn test_build_removes_marktr() -> Result<()> {
    let test = CliTest::with_files(&[
        (".trinlinerc.json", CONFIG),
        ("translations/de.json", "{}"),
        ("src/app.js", "marktr(\"Later\");\nshow(tr(\"Now\"));\n"),
    ])?;

    let (code, _, _) = run(&mut test.build_command())?;

    assert_eq!(code, 0);
    let output = test.read_file("build/de/src/app.js")?;
    assert!(!output.contains("marktr"));
    assert!(output.contains("show(\"Now\")"));

    Ok(())
}

#[test]
fn test_build_withholds_broken_file() -> Result<()> {
    let test = CliTest::with_files(&[
        (".trinlinerc.json", CONFIG),
        ("translations/de.json", r#"{ "Hi %1": "Hallo %1 und %2" }"#),
        ("src/broken.js", "say(tr(\"Hi %1\", name));\n"),
        ("src/fine.js", "say(tr(\"Bye\"));\n"),
    ])?;

    let (code, stdout, _) = run(&mut test.build_command())?;

    assert_eq!(code, 1);
    assert!(!test.root().join("build/de/src/broken.js").exists());
    assert_eq!(test.read_file("build/de/src/fine.js")?, "say(\"Bye\");\n");
    assert!(stdout.contains("placeholder-reference"));
    assert!(stdout.contains("invalid positional value %2"));

    Ok(())
}

#[test]
fn test_build_locale_and_out_dir_flags() -> Result<()> {
    let test = CliTest::with_files(&[
        ("translations/de.json", r#"{ "Hello": "Hallo" }"#),
        (
            "translations/de-AT.po",
            "msgid \"\"\nmsgstr \"\"\n\"Language: de_AT\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Servus\"\n",
        ),
        ("translations/fr.json", r#"{ "Hello": "Bonjour" }"#),
        ("src/app.js", "show(tr(\"Hello\"));\n"),
    ])?;

    let mut cmd = test.build_command();
    cmd.args(["--locale", "de-AT", "--locale", "fr", "--out-dir", "dist"]);
    let (code, _, stderr) = run(&mut cmd)?;

    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(test.read_file("dist/de-AT/src/app.js")?, "show(\"Servus\");\n");
    assert_eq!(test.read_file("dist/fr/src/app.js")?, "show(\"Bonjour\");\n");
    assert!(!test.root().join("dist/de").exists());

    Ok(())
}

#[test]
fn test_build_without_catalogs_is_an_error() -> Result<()> {
    let test = CliTest::with_files(&[("src/app.js", "tr(\"x\");\n")])?;

    let (code, _, stderr) = run(&mut test.build_command())?;

    assert_eq!(code, 2);
    assert!(stderr.contains("Catalogs directory not found"));

    Ok(())
}
