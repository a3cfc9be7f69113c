//! Fake Python toolchain for driving the binary end to end.
//!
//! The fake system interpreter creates a `build_venv` whose `pip` and
//! `pyinstaller` are shell scripts. Every tool appends its command line to a log
//! file so tests can check which processes ran and in what order.
//!
//! Knobs (environment variables read by the fake tools):
//! - `FAKE_PIP_FAIL` - pip reports a network error and exits 1
//! - `FAKE_PIP_SLEEP` - pip sleeps this many seconds instead of installing
//! - `FAKE_PYI_NO_OUTPUT` - pyinstaller exits 0 without writing the executable
//! - a script containing `SYNTAX ERROR` makes pyinstaller exit 1

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const SYSTEM_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Python 3.12.0"
  exit 0
fi
echo "python $*" >> "$FAKE_LOG"
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  for tool in python pip pyinstaller; do
    cp "$FAKE_TOOLS/$tool" "$3/bin/$tool"
    chmod +x "$3/bin/$tool"
  done
  exit 0
fi
exit 1
"#;

const VENV_PYTHON: &str = r#"#!/bin/sh
echo "venv-python $*" >> "$FAKE_LOG"
exit 0
"#;

const PIP: &str = r#"#!/bin/sh
echo "pip $*" >> "$FAKE_LOG"
if [ -n "$FAKE_PIP_FAIL" ]; then
  echo "ERROR: Could not find a version that satisfies the requirement pyinstaller (network unreachable)" >&2
  exit 1
fi
if [ -n "$FAKE_PIP_SLEEP" ]; then
  exec sleep "$FAKE_PIP_SLEEP"
fi
echo "Successfully installed $*"
exit 0
"#;

const PYINSTALLER: &str = r#"#!/bin/sh
echo "pyinstaller $*" >> "$FAKE_LOG"
dist=""
name=""
script=""
while [ $# -gt 0 ]; do
  case "$1" in
    --distpath) dist="$2"; shift 2 ;;
    --name) name="$2"; shift 2 ;;
    --workpath|--specpath) shift 2 ;;
    --*) shift ;;
    *) script="$1"; shift ;;
  esac
done
if grep -q "SYNTAX ERROR" "$script"; then
  echo "  File \"$script\", line 1" >&2
  echo "SyntaxError: invalid syntax" >&2
  exit 1
fi
if [ -n "$FAKE_PYI_NO_OUTPUT" ]; then
  exit 0
fi
mkdir -p "$dist"
printf 'fake-executable:%s' "$name" > "$dist/$name"
exit 0
"#;

pub const VALID_SCRIPT: &str = "print('pillar crop')\n";
pub const BROKEN_SCRIPT: &str = "SYNTAX ERROR here(\n";

/// Temporary root plus fake tools.
pub struct FakeToolchain {
    _dir: tempfile::TempDir,
    pub root: PathBuf,
    pub bin: PathBuf,
    pub tools: PathBuf,
    pub empty_bin: PathBuf,
    pub log: PathBuf,
}

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

impl FakeToolchain {
    /// Root containing a valid application script.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();
        let root = base.join("project");
        let bin = base.join("bin");
        let tools = base.join("tools");
        let empty_bin = base.join("empty-bin");
        for d in [&root, &bin, &tools, &empty_bin] {
            fs::create_dir_all(d).unwrap();
        }

        write_executable(&bin.join("python3"), SYSTEM_PYTHON);
        write_executable(&tools.join("python"), VENV_PYTHON);
        write_executable(&tools.join("pip"), PIP);
        write_executable(&tools.join("pyinstaller"), PYINSTALLER);
        fs::write(root.join("video_pillar_crop.py"), VALID_SCRIPT).unwrap();

        let log = base.join("invocations.log");
        Self {
            _dir: dir,
            root,
            bin,
            tools,
            empty_bin,
            log,
        }
    }

    /// Binary command with the fake interpreter first on PATH.
    pub fn command(&self) -> assert_cmd::Command {
        let path = format!("{}:/usr/bin:/bin", self.bin.display());
        self.command_with_path(&path)
    }

    /// Binary command whose PATH holds no interpreter at all.
    pub fn command_without_python(&self) -> assert_cmd::Command {
        let path = self.empty_bin.display().to_string();
        self.command_with_path(&path)
    }

    /// Unstarted binary process, for tests that signal it while it runs.
    pub fn process(&self) -> std::process::Command {
        use assert_cmd::cargo::CommandCargoExt;

        let path = format!("{}:/usr/bin:/bin", self.bin.display());
        let mut cmd = std::process::Command::cargo_bin("pillar_crop_bundler").unwrap();
        cmd.env("PATH", path)
            .env("FAKE_LOG", &self.log)
            .env("FAKE_TOOLS", &self.tools)
            .env("PILLAR_BUILD_ROOT", &self.root)
            .env_remove("PILLAR_BUILD_PYTHON")
            .env_remove("FAKE_PIP_FAIL")
            .env_remove("FAKE_PIP_SLEEP")
            .env_remove("FAKE_PYI_NO_OUTPUT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn command_with_path(&self, path: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("pillar_crop_bundler").unwrap();
        cmd.env("PATH", path)
            .env("FAKE_LOG", &self.log)
            .env("FAKE_TOOLS", &self.tools)
            .env("PILLAR_BUILD_ROOT", &self.root)
            .env_remove("PILLAR_BUILD_PYTHON")
            .env_remove("FAKE_PIP_FAIL")
            .env_remove("FAKE_PIP_SLEEP")
            .env_remove("FAKE_PYI_NO_OUTPUT")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Waits until `tool` shows up in the invocation log.
    pub fn wait_for_tool(&self, tool: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.tools_invoked().iter().any(|t| t == tool) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    /// Logged tool invocations, one per line.
    pub fn invocations(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Tool names (first word) of the logged invocations.
    pub fn tools_invoked(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .filter_map(|line| line.split_whitespace().next().map(str::to_string))
            .collect()
    }

    pub fn clear_log(&self) {
        let _ = fs::remove_file(&self.log);
    }

    pub fn env_dir(&self) -> PathBuf {
        self.root.join("build_venv")
    }

    pub fn packaged(&self) -> PathBuf {
        self.root.join("dist").join("video_pillar_crop")
    }

    pub fn published(&self) -> PathBuf {
        self.root.join("dist_windows").join("video_pillar_crop.exe")
    }

    pub fn write_script(&self, contents: &str) {
        fs::write(self.root.join("video_pillar_crop.py"), contents).unwrap();
    }
}
