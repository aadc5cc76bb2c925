//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Rule file equivalent to the compiled-in table.
pub const BUILTIN_RULES_TOML: &str = r#"
[[rules]]
owner = "PWM_fan"
first_match = [
    { when = { module = "Temperature" }, emit = "USERMOD_DALLASTEMPERATURE" },
    { when = { module = "sht" }, emit = "USERMOD_SHT" },
    { when = { all = [{ module = "PWM_fan" }, { none_of = ["Temperature", "sht"] }] }, reject = "PWM_fan usermod requires Temperature or sht to be enabled" },
]

[[rules]]
owner = "seven_segment_display_reloaded"
when = { module = "SN_Photoresistor" }
emit = "USERMOD_SN_PHOTORESISTOR"

[[rules]]
owner = "seven_segment_display_reloaded"
when = { module = "BH1750_v2" }
emit = "USERMOD_BH1750"

[[rules]]
owner = "usermod_v2_rotary_encoder_ui_ALT"
when = { any_of = ["four_line_display_ALT", "usermod_v2_four_line_display_ALT"] }
emit = "USERMOD_FOUR_LINE_DISPLAY"
"#;

/// Extra rule contributed by a custom usermod.
pub const EXTRA_RULES_TOML: &str = r#"
[[rules]]
owner = "my_usermod"
when = { module = "my_usermod" }
emit = "USERMOD_MINE"
"#;

/// Path to the usermod-resolver binary
pub fn resolver_bin() -> &'static str {
    env!("CARGO_BIN_EXE_usermod-resolver")
}

/// Temporary directory holding an isolated config file.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Creates an environment with no config file yet.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Creates an environment whose config file has the given content.
    pub fn with_config(content: &str) -> Self {
        let env = Self::new();
        fs::write(env.config_path(), content).expect("Failed to write config");
        env
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Config file passed with `--config`.
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Writes a file under the temporary directory and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Command running the binary against this environment's config file.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(resolver_bin());
        cmd.arg("--config").arg(self.config_path());
        cmd.args(args);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Runs the binary and collects its output.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }
}

/// Standard output as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Standard error as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
