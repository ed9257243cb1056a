//! CLI contract tests.

use std::io::Write;
use std::process::Output;

use assert_cmd::Command;
use tempfile::{NamedTempFile, TempDir};

struct Env {
    dir: TempDir,
    setrans: NamedTempFile,
}

fn env() -> Result<Env, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut setrans = NamedTempFile::new()?;
    writeln!(setrans, "s0 = SystemLow")?;
    writeln!(setrans, "s0:c90,c99 = CUI//LEI/INV # Investigation")?;
    setrans.flush()?;
    Ok(Env { dir, setrans })
}

fn run(env: &Env, args: &[&str]) -> Result<Output, Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("labelgate")?
        .args(args)
        .env("LABELGATE_CONFIG_PATH", env.dir.path().join("labelgate.toml"))
        .env("LABELGATE_SETRANS_PATH", env.setrans.path())
        .env_remove("LABELGATE_LOG_DIR")
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_prints_canonical_form() -> Result<(), Box<dyn std::error::Error>> {
    let env = env()?;
    let output = run(&env, &["check", "user_u:user_r:user_t:s0:c3,c2,c1"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "user_u:user_r:user_t:s0:c1.c3\n");
    Ok(())
}

#[test]
fn check_rejects_malformed_context() -> Result<(), Box<dyn std::error::Error>> {
    let env = env()?;
    let output = run(&env, &["check", "user_u:user_r:user_t"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn dominates_reports_through_exit_code() -> Result<(), Box<dyn std::error::Error>> {
    let env = env()?;
    let high = "staff_u:staff_r:staff_t:s2:c1,c2";
    let low = "system_u:object_r:etc_t:s1:c1";

    let yes = run(&env, &["dominates", high, low])?;
    assert!(yes.status.success());
    assert!(stdout(&yes).contains(" dominates "));

    let no = run(&env, &["dominates", low, high])?;
    assert!(!no.status.success());
    assert!(stdout(&no).contains("does not dominate"));
    Ok(())
}

#[test]
fn translate_uses_configured_table() -> Result<(), Box<dyn std::error::Error>> {
    let env = env()?;
    let hit = run(&env, &["translate", "s0:c99,c90"])?;
    assert!(hit.status.success());
    assert_eq!(stdout(&hit), "CUI//LEI/INV\n");

    let miss = run(&env, &["translate", "s0:c5"])?;
    assert_eq!(stdout(&miss), "s0:c5\n");
    Ok(())
}

#[test]
fn marking_lists_levels() -> Result<(), Box<dyn std::error::Error>> {
    let env = env()?;
    let output = run(&env, &["marking", "CUI//LEI/INV"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "s0:c90,c99  # Investigation\n");

    let unknown = run(&env, &["marking", "Nope"])?;
    assert!(!unknown.status.success());
    Ok(())
}
