// Runs the built binary against a scratch base directory.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Base dir with the shipped defaults but no data/ directory.
fn base_without_data(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("defaults")).unwrap();
    fs::copy("defaults/draft.toml", tmp.join("defaults/draft.toml")).unwrap();
    tmp
}

#[test]
fn order_runs_without_a_tier_list() {
    let tmp = base_without_data("arcs_cli_order_only");
    let output = Command::new(env!("CARGO_BIN_EXE_arcs-draft"))
        .arg("--dir")
        .arg(&tmp)
        .args(["order", "--players", "3", "--policy", "snake"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("snake order for 3 players: 3 2 1 1 2 3"), "{stdout}");

    // Commands that draw cards still need the tier list.
    let tiers = Command::new(env!("CARGO_BIN_EXE_arcs-draft"))
        .arg("--dir")
        .arg(&tmp)
        .arg("tiers")
        .output()
        .unwrap();
    assert!(!tiers.status.success());

    let _ = fs::remove_dir_all(&tmp);
}

#[test]
fn unknown_order_policy_is_rejected() {
    let tmp = base_without_data("arcs_cli_bad_policy");
    let output = Command::new(env!("CARGO_BIN_EXE_arcs-draft"))
        .arg("--dir")
        .arg(&tmp)
        .args(["order", "--policy", "random"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("random"));

    let _ = fs::remove_dir_all(&tmp);
}
