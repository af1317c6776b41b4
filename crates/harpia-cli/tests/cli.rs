//! CLI integration tests.
//! Each test writes into its own temp directory via HARPIA_OUTPUT_DIR.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn harpia_cmd(out_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("harpia").unwrap();
    cmd.env("HARPIA_OUTPUT_DIR", out_dir.path());
    cmd
}

fn generate_json(out_dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = harpia_cmd(out_dir)
        .arg("generate")
        .args(args)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn generate_writes_named_table() {
    let dir = TempDir::new().unwrap();
    harpia_cmd(&dir)
        .args(["generate", "--preset", "pyramid", "--frames", "50", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("topology:       tetrahedron"))
        .stdout(predicate::str::contains("frames:         50"))
        .stdout(predicate::str::contains("resets_fenix:"))
        .stdout(predicate::str::contains("sha256:"));

    let path = dir.path().join("dataset_tetrahedron_50frames.csv");
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().count(), 51);
    assert!(text.starts_with("frame_index,time,global_chaos,mean_gain,oracle_flux,point_0_x"));
}

#[test]
fn ring_file_name_carries_point_count() {
    let dir = TempDir::new().unwrap();
    harpia_cmd(&dir)
        .args(["generate", "--points", "6", "--frames", "10", "--seed", "1"])
        .assert()
        .success();
    assert!(dir.path().join("dataset_ring6_10frames.csv").exists());
}

#[test]
fn same_seed_same_digest() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let args = ["--preset", "cube", "--frames", "200", "--seed", "42"];
    let first = generate_json(&a, &args);
    let second = generate_json(&b, &args);
    assert_eq!(first["sha256"], second["sha256"]);
    assert_eq!(first["stats"]["resets_fenix"], second["stats"]["resets_fenix"]);

    let other = generate_json(&TempDir::new().unwrap(), &["--preset", "cube", "--frames", "200", "--seed", "43"]);
    assert_ne!(first["sha256"], other["sha256"]);
}

#[test]
fn verify_accepts_digest_and_prefix() {
    let dir = TempDir::new().unwrap();
    let report = generate_json(&dir, &["--frames", "30", "--seed", "5"]);
    let file = report["file"].as_str().unwrap();
    let digest = report["sha256"].as_str().unwrap();

    harpia_cmd(&dir)
        .args(["verify", file, digest])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok "));

    harpia_cmd(&dir)
        .args(["verify", file, &digest[..16].to_uppercase()])
        .assert()
        .success();
}

#[test]
fn verify_rejects_tampered_file() {
    let dir = TempDir::new().unwrap();
    let report = generate_json(&dir, &["--frames", "30", "--seed", "5"]);
    let file = report["file"].as_str().unwrap();
    let digest = report["sha256"].as_str().unwrap().to_string();

    let mut text = std::fs::read_to_string(file).unwrap();
    text.push_str("\n");
    std::fs::write(file, text).unwrap();

    harpia_cmd(&dir)
        .args(["verify", file, &digest])
        .assert()
        .failure()
        .stderr(predicate::str::contains("digest mismatch"));
}

#[test]
fn inspect_reports_topology_and_edges() {
    let dir = TempDir::new().unwrap();
    let report = generate_json(&dir, &["--preset", "cube", "--frames", "25", "--seed", "9"]);
    let file = report["file"].as_str().unwrap();

    harpia_cmd(&dir)
        .args(["inspect", file])
        .assert()
        .success()
        .stdout(predicate::str::contains("frames:   25"))
        .stdout(predicate::str::contains("points:   8"))
        .stdout(predicate::str::contains("topology: cube"))
        .stdout(predicate::str::contains("edges:    12"))
        .stdout(predicate::str::contains("edge_mean:"));
}

#[test]
fn inspect_keeps_requested_ring_topology() {
    let dir = TempDir::new().unwrap();
    let report = generate_json(
        &dir,
        &["--points", "4", "--topology", "ring", "--frames", "15", "--seed", "4"],
    );
    assert_eq!(report["topology"], "ring4");
    let file = report["file"].as_str().unwrap();

    harpia_cmd(&dir)
        .args(["inspect", file])
        .assert()
        .success()
        .stdout(predicate::str::contains("topology: ring4"))
        .stdout(predicate::str::contains("edges:    0"))
        .stdout(predicate::str::contains("edge_mean:").not());
}

#[test]
fn inspect_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.csv");
    std::fs::write(&path, "not,a,table\n").unwrap();
    harpia_cmd(&dir)
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid data"));
}

#[test]
fn topology_mismatch_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    harpia_cmd(&dir)
        .args(["generate", "--points", "5", "--topology", "cube", "--frames", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs exactly 8 points"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn zero_frames_rejected() {
    let dir = TempDir::new().unwrap();
    harpia_cmd(&dir)
        .args(["generate", "--frames", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame_count must be positive"));
}

#[test]
fn config_file_layers_under_flags() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("run.toml");
    std::fs::write(&config, "preset = \"pyramid\"\nframe_count = 20\nseed = 3\n").unwrap();

    let from_file = generate_json(&dir, &["--config", config.to_str().unwrap()]);
    assert_eq!(from_file["topology"], "tetrahedron");
    assert_eq!(from_file["frames"], 20);

    let overridden = generate_json(
        &dir,
        &["--config", config.to_str().unwrap(), "--frames", "35", "--no-gain"],
    );
    assert_eq!(overridden["frames"], 35);
    assert!(dir.path().join("dataset_tetrahedron_35frames.csv").exists());
}

#[test]
fn unknown_config_key_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "frames = 20\n").unwrap();
    harpia_cmd(&dir)
        .args(["generate", "--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn batch_writes_every_preset() {
    let dir = TempDir::new().unwrap();
    harpia_cmd(&dir)
        .args(["batch", "--frames", "40", "--seed", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("topology:       tetrahedron"))
        .stdout(predicate::str::contains("topology:       cube"));

    assert!(dir.path().join("dataset_tetrahedron_40frames.csv").exists());
    assert!(dir.path().join("dataset_cube_40frames.csv").exists());
}

#[test]
fn explicit_out_dir_beats_environment() {
    let env_dir = TempDir::new().unwrap();
    let explicit = TempDir::new().unwrap();
    harpia_cmd(&env_dir)
        .args(["generate", "--frames", "10", "--seed", "2", "--out-dir"])
        .arg(explicit.path())
        .assert()
        .success();
    assert!(explicit.path().join("dataset_cube_10frames.csv").exists());
    assert!(!env_dir.path().join("dataset_cube_10frames.csv").exists());
}
