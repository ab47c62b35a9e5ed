//! Helpers shared by the specs: a temporary project and a fluent runner.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;

use tempfile::TempDir;

/// Config with version control off, so specs never touch git.
const NO_GIT_CONFIG: &str = "project = \"specs\"\n\n[git]\nenabled = false\n";

/// The `craizy` binary under test.
///
/// `CRAIZY_BIN` wins when set. Otherwise the binary is looked up next to
/// this test executable (`target/<profile>/craizy`, which a workspace-wide
/// `cargo test` builds first) and, failing that, built once into
/// `target/specs-bin` so a lone `cargo test --test specs` still works.
fn binary() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        if let Some(path) = std::env::var_os("CRAIZY_BIN") {
            return PathBuf::from(path);
        }
        let name = format!("craizy{}", std::env::consts::EXE_SUFFIX);
        let exe = std::env::current_exe().expect("test executable path");
        // target/<profile>/deps/specs-<hash>
        let profile_dir = exe.parent().and_then(Path::parent).expect("target profile dir");
        let sibling = profile_dir.join(&name);
        if sibling.exists() {
            return sibling;
        }

        let target_dir = profile_dir.parent().unwrap_or(profile_dir).join("specs-bin");
        let status = std::process::Command::new(env!("CARGO"))
            .args(["build", "--quiet", "--package", "craizy", "--bin", "craizy", "--target-dir"])
            .arg(&target_dir)
            .current_dir(env!("CARGO_MANIFEST_DIR"))
            .status()
            .expect("cargo runs");
        assert!(status.success(), "building the craizy binary failed");
        target_dir.join("debug").join(name)
    })
}

/// Command for the binary with an isolated environment.
fn command(cwd: Option<&Path>, tmux_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(binary());
    cmd.env_remove("CRAIZY_CONFIG")
        .env_remove("CRAIZY_LOG")
        .env_remove("TMUX")
        .env("TMUX_TMPDIR", tmux_dir)
        .env("NO_COLOR", "1");
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd
}

/// Runner outside any project, for help and version output.
pub fn cli() -> Runner {
    let scratch = TempDir::new().unwrap();
    Runner { cmd: command(None, scratch.path()), _scratch: Some(scratch) }
}

pub struct Runner {
    cmd: assert_cmd::Command,
    _scratch: Option<TempDir>,
}

impl Runner {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Ran {
        let output = self.cmd.output().unwrap();
        assert!(output.status.success(), "expected success\n{}", describe(&output));
        Ran { output }
    }

    pub fn fails(mut self) -> Ran {
        let output = self.cmd.output().unwrap();
        assert!(!output.status.success(), "expected failure\n{}", describe(&output));
        Ran { output }
    }
}

pub struct Ran {
    output: Output,
}

impl Ran {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}\n{}", describe(&self.output));
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}\n{}", describe(&self.output));
        self
    }
}

fn describe(output: &Output) -> String {
    format!(
        "status: {:?}\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Temporary project directory with version control disabled.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let project = Self { dir: TempDir::new().unwrap() };
        project.file(".craizy/config.toml", NO_GIT_CONFIG);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state(&self, rel: &str) -> PathBuf {
        self.path().join(".craizy").join(rel)
    }

    pub fn file(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).unwrap()
    }

    /// Runner inside this project
    pub fn craizy(&self) -> Runner {
        Runner { cmd: command(Some(self.path()), &self.state("tmux")), _scratch: None }
    }
}
