use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const MANIFEST: &str = r#"{
  "name": "app",
  "private": true,
  "dependencies": {
    "vue": "^3.4.0"
  },
  "devDependencies": {
    "@vue/compiler-sfc": "^3.4.0",
    "vite": "^5.0.0"
  }
}
"#;

fn project(lockfile: Option<&str>) -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), MANIFEST).unwrap();
    if let Some(lockfile) = lockfile {
        std::fs::write(dir.path().join(lockfile), "").unwrap();
    }
    dir
}

fn install_vue(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("install-vue"));
    cmd.current_dir(dir)
        .env_remove("INSTALL_VUE_CHANNEL")
        .env_remove("INSTALL_VUE_PACKAGE_MANAGER")
        .env_remove("GITHUB_TOKEN");
    cmd
}

fn read_manifest(dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.join("package.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_commit_with_yarn() {
    let dir = project(Some("yarn.lock"));

    install_vue(dir.path())
        .args(["--channel", "commit", "664d2e5"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated package.json for yarn dependency overrides",
        ))
        .stdout(predicate::str::contains(
            "Done! Don't forget to run yarn install later.",
        ));

    let manifest = read_manifest(dir.path());
    let resolutions = manifest["resolutions"].as_object().unwrap();
    assert_eq!(resolutions.len(), 11);
    assert_eq!(
        resolutions["vue"],
        "https://pkg.pr.new/vuejs/core/vue@664d2e5"
    );
    assert_eq!(
        resolutions["@vue/runtime-dom"],
        "https://pkg.pr.new/vuejs/core/@vue/runtime-dom@664d2e5"
    );
    // yarn leaves direct dependencies alone
    assert_eq!(manifest["dependencies"]["vue"], "^3.4.0");
}

#[test]
fn test_alpha_with_npm() {
    let dir = project(Some("package-lock.json"));

    install_vue(dir.path())
        .args(["--channel", "alpha"])
        .write_stdin("n\n")
        .assert()
        .success();

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["overrides"]["vue"], "alpha");
    assert_eq!(manifest["overrides"]["@vue/compat"], "alpha");
    assert_eq!(manifest["dependencies"]["vue"], "alpha");
    assert_eq!(manifest["devDependencies"]["@vue/compiler-sfc"], "alpha");
    assert_eq!(manifest["devDependencies"]["vite"], "^5.0.0");

    // Key order of the original document is kept
    let raw = std::fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(raw.find("\"name\"").unwrap() < raw.find("\"overrides\"").unwrap());
    assert!(raw.ends_with("}\n"));
}

#[test]
fn test_version_with_pnpm() {
    let dir = project(Some("pnpm-lock.yaml"));

    install_vue(dir.path())
        .args(["--channel", "version", "3.5.3"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated pnpm-workspace.yaml"));

    let doc = std::fs::read_to_string(dir.path().join("pnpm-workspace.yaml")).unwrap();
    assert!(doc.starts_with("overrides:\n  'vue': '3.5.3'\n"));
    assert!(doc.contains("  '@vue/server-renderer': '3.5.3'\n"));
    assert!(doc.ends_with("peerDependencyRules:\n  allowAny:\n    - 'vue'\n"));

    // pnpm reads overrides from the workspace file only
    assert_eq!(
        std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        MANIFEST
    );
}

#[test]
fn test_pnpm_warns_about_replaced_sections() {
    let dir = project(Some("pnpm-lock.yaml"));
    std::fs::write(
        dir.path().join("pnpm-workspace.yaml"),
        "packages:\n  - 'packages/*'\noverrides:\n  'vue': '3.4.0'\n",
    )
    .unwrap();

    install_vue(dir.path())
        .args(["--channel", "alpha"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: pnpm-workspace.yaml is regenerated and its existing packages section(s) will be removed",
        ));

    let doc = std::fs::read_to_string(dir.path().join("pnpm-workspace.yaml")).unwrap();
    assert!(doc.starts_with("overrides:\n  'vue': 'alpha'\n"));
}

#[test]
fn test_edge_uses_latest_commit() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/vuejs/core/branches/main")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "main", "commit": {"sha": "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678"}}"#)
        .expect(1)
        .create();

    let dir = project(Some("bun.lockb"));

    install_vue(dir.path())
        .args(["--channel", "edge", "--api-url"])
        .arg(server.url())
        .write_stdin("n\n")
        .assert()
        .success();

    mock.assert();
    let manifest = read_manifest(dir.path());
    assert_eq!(
        manifest["overrides"]["vue"],
        "https://pkg.pr.new/vuejs/core/vue@a1b2c3d"
    );
    assert_eq!(
        manifest["dependencies"]["vue"],
        "https://pkg.pr.new/vuejs/core/vue@a1b2c3d"
    );
}

#[test]
fn test_edge_api_failure() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/repos/vuejs/core/branches/main")
        .with_status(500)
        .create();

    let dir = project(Some("yarn.lock"));

    install_vue(dir.path())
        .args(["--channel", "edge", "--api-url"])
        .arg(server.url())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch latest commit"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        MANIFEST
    );
}

#[test]
fn test_exact_pins_dist_tag() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/vue/beta")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "vue", "version": "3.6.0-beta.1"}"#)
        .create();

    let dir = project(Some("package-lock.json"));

    install_vue(dir.path())
        .args(["--channel", "beta", "--exact", "--registry-url"])
        .arg(server.url())
        .env("GITHUB_TOKEN", "ghp_secret")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found beta version 3.6.0-beta.1"));

    mock.assert();

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["overrides"]["vue"], "3.6.0-beta.1");
}

#[test]
fn test_version_channel_requires_argument() {
    let dir = project(Some("yarn.lock"));

    install_vue(dir.path())
        .args(["--channel", "version"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Please provide a version to install"));
}

#[test]
fn test_missing_manifest() {
    let dir = tempdir().unwrap();

    install_vue(dir.path())
        .args(["--channel", "alpha"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot find package.json"));
}

#[test]
fn test_closed_stdin_cancels() {
    // No lockfile: the package manager prompt hits end of input
    let dir = project(None);

    install_vue(dir.path())
        .args(["--channel", "alpha"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        MANIFEST
    );
}

#[test]
fn test_select_package_manager_by_name() {
    let dir = project(None);

    install_vue(dir.path())
        .args(["--channel", "rc"])
        .write_stdin("yarn\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cannot infer which package manager to use",
        ));

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["resolutions"]["vue"], "rc");
}

#[test]
fn test_package_manager_flag() {
    let dir = project(Some("yarn.lock"));

    install_vue(dir.path())
        .args(["--channel", "canary", "-p", "npm"])
        .write_stdin("n\n")
        .assert()
        .success();

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest["overrides"]["vue"], "npm:@vue/canary@latest");
    assert_eq!(
        manifest["overrides"]["@vue/reactivity"],
        "npm:@vue/reactivity-canary@latest"
    );
}

#[test]
fn test_unsupported_package_manager() {
    let dir = project(Some("yarn.lock"));

    install_vue(dir.path())
        .args(["-p", "deno"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported package manager: deno"));
}
