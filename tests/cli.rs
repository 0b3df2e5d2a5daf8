//! End-to-end tests driving the `folio` binary.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn folio() -> Command {
    Command::new(env!("CARGO_BIN_EXE_folio"))
}

#[test]
fn missing_config_exits_nonzero_without_output() {
    let dir = TempDir::new().unwrap();

    let output = folio().current_dir(dir.path()).arg("build").output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("not found"));
    assert!(!dir.path().join("www").exists());
}

#[test]
fn config_override_is_used() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    fs::create_dir_all(site.join("docs")).unwrap();
    fs::write(site.join("docs/intro.md"), "---\ntitle: Intro\n---\nHello\n").unwrap();
    fs::write(site.join("custom.toml"), "[build]\ninput = \"docs\"\noutput = \"public\"\n").unwrap();

    let status = folio()
        .current_dir(dir.path())
        .args(["--quiet", "-c", "site/custom.toml"])
        .status()
        .unwrap();

    assert!(status.success());
    let html = fs::read_to_string(site.join("public/intro.html")).unwrap();
    assert!(html.contains("Hello"));
}

#[test]
fn init_then_build() {
    let dir = TempDir::new().unwrap();

    let status = folio().current_dir(dir.path()).args(["init", "blog"]).status().unwrap();
    assert!(status.success());

    let status = folio()
        .current_dir(dir.path().join("blog"))
        .args(["build", "--minify"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("blog/www/index.html").exists());

    // A second init in the same place refuses to overwrite
    let status = folio().current_dir(dir.path()).args(["init", "blog"]).status().unwrap();
    assert!(!status.success());
}
