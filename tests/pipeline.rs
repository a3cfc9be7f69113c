//! End-to-end runs of the binary against a fake Python toolchain.

#![cfg(unix)]

mod common;

use common::{BROKEN_SCRIPT, FakeToolchain};
use predicates::prelude::*;
use std::fs;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[test]
fn clean_root_builds_and_publishes() {
    let fake = FakeToolchain::new();

    fake.command()
        .assert()
        .code(0)
        .stdout(predicate::str::contains("video_pillar_crop.exe"))
        .stderr(predicate::str::contains("ffmpeg"));

    assert!(fake.published().is_file());
    assert_eq!(
        fs::read(fake.published()).unwrap(),
        fs::read(fake.packaged()).unwrap()
    );
    assert_eq!(fake.tools_invoked(), vec!["python", "pip", "pyinstaller"]);

    let invocations = fake.invocations();
    assert!(invocations[0].starts_with("python -m venv"));
    assert_eq!(
        invocations[1],
        "pip install --upgrade pip pyinstaller pillow numpy"
    );
    assert!(invocations[2].contains("--onefile"));
    assert!(invocations[2].contains("--console"));
    assert!(invocations[2].contains("--name video_pillar_crop"));
}

#[test]
fn second_run_reuses_environment() {
    let fake = FakeToolchain::new();
    fake.command().assert().code(0);
    let modified = fs::metadata(fake.env_dir()).unwrap().modified().unwrap();
    fake.clear_log();

    fake.command().assert().code(0);

    assert_eq!(fake.tools_invoked(), vec!["pip", "pyinstaller"]);
    assert_eq!(
        fs::metadata(fake.env_dir()).unwrap().modified().unwrap(),
        modified
    );
}

#[test]
fn missing_interpreter_exits_1_without_side_effects() {
    let fake = FakeToolchain::new();

    fake.command_without_python()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no Python interpreter found"));

    assert!(!fake.env_dir().exists());
    assert!(fake.invocations().is_empty());
    assert!(!fake.root.join("dist").exists());
}

#[test]
fn unknown_python_override_exits_1() {
    let fake = FakeToolchain::new();

    fake.command()
        .env("PILLAR_BUILD_PYTHON", "no-such-python-3a7f")
        .assert()
        .code(1);

    assert!(!fake.env_dir().exists());
}

#[test]
fn install_failure_exits_2_and_keeps_environment() {
    let fake = FakeToolchain::new();
    fake.command().assert().code(0);
    let modified = fs::metadata(fake.env_dir()).unwrap().modified().unwrap();
    fs::remove_file(fake.published()).unwrap();
    fake.clear_log();

    fake.command()
        .env("FAKE_PIP_FAIL", "1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "ERROR: Could not find a version that satisfies the requirement pyinstaller (network unreachable)",
        ));

    assert_eq!(fake.tools_invoked(), vec!["pip"]);
    assert_eq!(
        fs::metadata(fake.env_dir()).unwrap().modified().unwrap(),
        modified
    );
    assert!(!fake.published().exists());
}

#[test]
fn broken_script_exits_3_and_leaves_publish_dir_alone() {
    let fake = FakeToolchain::new();
    fake.write_script(BROKEN_SCRIPT);

    fake.command()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SyntaxError: invalid syntax"));

    assert_eq!(fake.tools_invoked(), vec!["python", "pip", "pyinstaller"]);
    assert!(!fake.root.join("dist_windows").exists());
}

#[test]
fn broken_script_does_not_replace_earlier_publish() {
    let fake = FakeToolchain::new();
    fake.command().assert().code(0);
    let before = fs::read(fake.published()).unwrap();
    fake.write_script(BROKEN_SCRIPT);

    fake.command().assert().code(3);

    assert_eq!(fs::read(fake.published()).unwrap(), before);
}

#[test]
fn missing_script_exits_3_without_running_packager() {
    let fake = FakeToolchain::new();
    fs::remove_file(fake.root.join("video_pillar_crop.py")).unwrap();

    fake.command()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("application script not found"));

    assert_eq!(fake.tools_invoked(), vec!["python", "pip"]);
}

#[test]
fn missing_packaged_artifact_exits_4() {
    let fake = FakeToolchain::new();

    fake.command()
        .env("FAKE_PYI_NO_OUTPUT", "1")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("packaged executable not found"));

    assert!(!fake.published().exists());
}

#[test]
fn republishing_leaves_single_identical_file() {
    let fake = FakeToolchain::new();
    fake.command().assert().code(0);
    fake.command().assert().code(0);

    let entries: Vec<_> = fs::read_dir(fake.root.join("dist_windows"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["video_pillar_crop.exe"]);
    assert_eq!(
        fs::read(fake.published()).unwrap(),
        fs::read(fake.packaged()).unwrap()
    );
}

#[test]
fn config_file_renames_artifact() {
    let fake = FakeToolchain::new();
    fs::write(
        fake.root.join("pillar-build.toml"),
        "name = \"cropper\"\npackages = [\"pyinstaller\"]\n",
    )
    .unwrap();

    fake.command().assert().code(0);

    assert!(fake.root.join("dist_windows").join("cropper.exe").is_file());
    assert!(
        fake.invocations()
            .contains(&"pip install --upgrade pyinstaller".to_string())
    );
}

#[test]
fn ctrl_c_during_install_exits_130_and_stops_the_run() {
    let fake = FakeToolchain::new();
    let mut child = fake
        .process()
        .env("FAKE_PIP_SLEEP", "30")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let reached_pip = fake.wait_for_tool("pip", Duration::from_secs(20));
    let signalled = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    let started = Instant::now();
    let status = child.wait().unwrap();

    assert!(reached_pip, "pip never started");
    assert!(signalled.success());
    assert_eq!(status.code(), Some(130));
    // pip sleeps for 30s; returning early means it was killed, not awaited.
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(fake.tools_invoked(), vec!["python", "pip"]);
    assert!(!fake.packaged().exists());
    assert!(!fake.published().exists());
}

