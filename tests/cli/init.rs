use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("init"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Created .trinlinerc.json"));

    let content = test.read_file(".trinlinerc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    for field in ["includes", "catalogsRoot", "locales", "outDir"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}'", field);
    }
    assert!(content.contains("\n  "), "Config should be pretty-printed");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".trinlinerc.json", "{}")?;

    let (code, _, stderr) = run(test.command().arg("init"))?;

    assert_eq!(code, 1);
    assert!(stderr.contains(".trinlinerc.json already exists"));
    assert_eq!(test.read_file(".trinlinerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    run(test.command().arg("init"))?;

    test.write_file("src/app.js", "export const x = 1;\n")?;
    test.write_file("translations/en.json", "{}")?;

    let (code, _, stderr) = run(&mut test.check_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);

    Ok(())
}
