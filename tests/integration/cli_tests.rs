//! Integration tests for the fwgen CLI.
//!
//! Each test runs the binary inside its own temporary directory, so the
//! default relative output paths never touch the repository.

#![allow(deprecated)] // cargo_bin is deprecated but works fine for standard builds

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RULES: &str = r#"
rules:
  - name: ssh
    type: ingress
    from_port: 22
    to_port: 22
    protocol: tcp
    cidr_blocks:
      - "10.0.0.0/24"
    description: "SSH from the office"
  - name: ssh-alt
    type: ingress
    from_port: 22
    to_port: 22
    protocol: tcp
    cidr_blocks:
      - "10.0.0.0/24"
    description: "SSH to the forwarded port"
    lxc_forward: 8022
  - name: ping
    type: ingress
    from_port: -1
    to_port: -1
    protocol: icmp
    cidr_blocks:
      - "0.0.0.0/0"
    description: "ICMP echo"
  - name: games
    type: ingress
    from_port: 27000
    to_port: 27015
    protocol: udp
    cidr_blocks:
      - "192.168.1.0/24"
      - "192.168.2.0/24"
    description: "Game servers"
  - name: all-out
    type: egress
    from_port: 0
    to_port: 65535
    protocol: tcp
    cidr_blocks:
      - "0.0.0.0/0"
    description: "Outbound traffic"
"#;

fn fwgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fwgen").unwrap();
    cmd.current_dir(dir).env_remove("FWGEN_CONFIG");
    cmd
}

fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("firewall.yaml"), RULES).unwrap();
    temp_dir
}

// ============================================================================
// Help and Version tests
// ============================================================================

#[test]
fn test_help_shows_all_options() {
    let temp_dir = TempDir::new().unwrap();
    fwgen(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--terraform"))
        .stdout(predicate::str::contains("--script"))
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--no-profile"))
        .stdout(predicate::str::contains("--container"))
        .stdout(predicate::str::contains("--security-group"))
        .stdout(predicate::str::contains("--no-color"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"));
}

#[test]
fn test_version() {
    let temp_dir = TempDir::new().unwrap();
    fwgen(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let temp_dir = workspace();
    fwgen(temp_dir.path())
        .args(["--verbose", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// ============================================================================
// Generation with default paths
// ============================================================================

#[test]
fn test_defaults_write_all_outputs() {
    let temp_dir = workspace();

    fwgen(temp_dir.path())
        .arg("--no-color")
        .assert()
        .success()
        .stderr(predicate::str::contains("Written:"));

    assert!(temp_dir.path().join("sg_rules.tf").exists());
    assert!(temp_dir.path().join("firewall.sh").exists());
    assert!(temp_dir.path().join("firewall-profile.yaml").exists());
}

#[test]
fn test_terraform_contains_every_rule_in_order() {
    let temp_dir = workspace();
    fwgen(temp_dir.path()).assert().success();

    let terraform = fs::read_to_string(temp_dir.path().join("sg_rules.tf")).unwrap();
    let names = ["ssh", "ssh-alt", "ping", "games", "all-out"];

    assert_eq!(
        terraform
            .matches("resource \"aws_security_group_rule\"")
            .count(),
        names.len()
    );

    let positions: Vec<usize> = names
        .iter()
        .map(|name| {
            terraform
                .find(&format!("\"aws_security_group_rule\" \"{}\"", name))
                .unwrap()
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(terraform.contains("protocol          = \"icmp\""));
    assert!(terraform.contains("security_group_id = data.aws_security_group.northflier.id"));
    assert!(terraform.contains(r#"cidr_blocks       = ["192.168.1.0/24", "192.168.2.0/24"]"#));
}

#[test]
fn test_script_contains_proxy_commands() {
    let temp_dir = workspace();
    fwgen(temp_dir.path()).assert().success();

    let script = fs::read_to_string(temp_dir.path().join("firewall.sh")).unwrap();

    assert_eq!(
        script,
        "#!/usr/bin/env bash\n\
         lxc config device add csls ssh proxy listen=tcp:10.0.0.0:22 connect=tcp:127.0.0.1:22\n\
         lxc config device add csls ssh-alt proxy listen=tcp:10.0.0.0:22 connect=tcp:127.0.0.1:8022\n\
         lxc config device add csls games proxy listen=udp:192.168.1.0:27000-27015 connect=udp:127.0.0.1:27000-27015\n"
    );
}

#[cfg(unix)]
#[test]
fn test_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = workspace();
    fwgen(temp_dir.path()).assert().success();

    let mode = fs::metadata(temp_dir.path().join("firewall.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn test_profile_contains_devices() {
    let temp_dir = workspace();
    fwgen(temp_dir.path()).assert().success();

    let profile = fs::read_to_string(temp_dir.path().join("firewall-profile.yaml")).unwrap();

    assert!(profile.starts_with("devices:\n"));
    assert!(profile.contains("  ssh-alt:\n    connect: tcp:127.0.0.1:8022\n    listen: tcp:10.0.0.0:22\n    type: proxy\n"));
    assert!(!profile.contains("ping"));
    assert!(!profile.contains("all-out"));
    assert!(profile.ends_with("name: csls\n"));
}

#[test]
fn test_output_is_reproducible() {
    let temp_dir = workspace();
    let files = ["sg_rules.tf", "firewall.sh", "firewall-profile.yaml"];

    fwgen(temp_dir.path()).assert().success();
    let first: Vec<String> = files
        .iter()
        .map(|f| fs::read_to_string(temp_dir.path().join(f)).unwrap())
        .collect();

    fwgen(temp_dir.path()).assert().success();
    let second: Vec<String> = files
        .iter()
        .map(|f| fs::read_to_string(temp_dir.path().join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_custom_paths_and_names() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("rules.yml"), RULES).unwrap();

    fwgen(temp_dir.path())
        .args([
            "-c",
            "rules.yml",
            "-t",
            "out.tf",
            "-s",
            "proxy.sh",
            "-p",
            "lxd.yaml",
            "--container",
            "web01",
            "-g",
            "edge",
        ])
        .assert()
        .success();

    let terraform = fs::read_to_string(temp_dir.path().join("out.tf")).unwrap();
    assert!(terraform.contains("data.aws_security_group.edge.id"));

    let script = fs::read_to_string(temp_dir.path().join("proxy.sh")).unwrap();
    assert!(script.contains("lxc config device add web01 ssh proxy"));

    let profile = fs::read_to_string(temp_dir.path().join("lxd.yaml")).unwrap();
    assert!(profile.ends_with("name: web01\n"));
}

#[test]
fn test_config_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("env-rules.yaml"), RULES).unwrap();

    Command::cargo_bin("fwgen")
        .unwrap()
        .current_dir(temp_dir.path())
        .env("FWGEN_CONFIG", "env-rules.yaml")
        .assert()
        .success();

    assert!(temp_dir.path().join("sg_rules.tf").exists());
}

#[test]
fn test_no_profile_flag() {
    let temp_dir = workspace();

    fwgen(temp_dir.path())
        .arg("--no-profile")
        .assert()
        .success();

    assert!(temp_dir.path().join("firewall.sh").exists());
    assert!(!temp_dir.path().join("firewall-profile.yaml").exists());
}

#[test]
fn test_quiet_suppresses_info() {
    let temp_dir = workspace();

    fwgen(temp_dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("Written:").not());
}

#[test]
fn test_verbose_reports_skipped_rules() {
    let temp_dir = workspace();

    fwgen(temp_dir.path())
        .args(["--verbose", "--no-color"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping icmp ingress rule 'ping'"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_rule_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    fwgen(temp_dir.path())
        .arg("--no-color")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to open rule file"));

    assert!(!temp_dir.path().join("sg_rules.tf").exists());
}

#[test]
fn test_malformed_rule_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("firewall.yaml"),
        "rules:\n  - { name: ssh, type: ingress, from_port: twenty-two, to_port: 22, protocol: tcp }\n",
    )
    .unwrap();

    fwgen(temp_dir.path())
        .arg("--no-color")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse rule file"))
        .stderr(predicate::str::contains("rules[0]: field 'from_port' must be an integer"));
}

#[test]
fn test_proxy_rule_without_cidr_fails_after_terraform() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("firewall.yaml"),
        "rules:\n  - { name: ssh, type: ingress, from_port: 22, to_port: 22, protocol: tcp, cidr_blocks: [], description: SSH }\n",
    )
    .unwrap();

    fwgen(temp_dir.path())
        .arg("--no-color")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rule 'ssh' has no CIDR block"));

    assert!(temp_dir.path().join("sg_rules.tf").exists());
    assert!(!temp_dir.path().join("firewall.sh").exists());
}

#[test]
fn test_invalid_container_name_fails() {
    let temp_dir = workspace();

    fwgen(temp_dir.path())
        .args(["--no-color", "--container", "my box"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
