//! Web UI asset bundling that runs before firmware compilation.
//!
//! The bundler installs the UI's npm packages and runs its build script.
//! A missing Node.js installation is not fatal: the step is skipped with a
//! warning and the previously generated assets are compiled as they are.
//! A failing npm step, on the other hand, fails the build.

use crate::config::BundlerConfig;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Result of a bundling run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// `npm ci` and `npm run build` both succeeded.
    Built,
    /// Bundling was skipped; the reason has already been logged.
    Skipped {
        /// Why nothing was run
        reason: String,
    },
}

/// Bundling failure that must stop the build.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// A step ran and exited unsuccessfully.
    #[error("{step} failed ({})", describe_exit(.code))]
    StepFailed {
        /// Command line of the failing step
        step: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
    },
    /// A step could not be started.
    #[error("Failed to run {step}: {source}")]
    Spawn {
        /// Command line of the step
        step: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    /// Exit code to propagate as the build's own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StepFailed { code: Some(code), .. } => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}

/// Runs the npm build of the web UI.
#[derive(Debug, Clone)]
pub struct AssetBundler {
    web_dir: PathBuf,
    node: String,
    npm: String,
}

impl AssetBundler {
    /// Creates a bundler using the configured tool names.
    pub fn with_tools(web_dir: impl Into<PathBuf>, tools: &BundlerConfig) -> Self {
        Self {
            web_dir: web_dir.into(),
            node: tools.node.clone(),
            npm: tools.npm.clone(),
        }
    }

    /// Directory the npm commands run in.
    pub fn web_dir(&self) -> &Path {
        &self.web_dir
    }

    /// Checks whether the Node.js executable can be launched.
    pub fn node_available(&self) -> bool {
        Command::new(&self.node)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    /// Installs packages and runs the UI build.
    ///
    /// Returns [`BundleOutcome::Skipped`] if Node.js is unavailable or the web
    /// directory has no `package.json`.
    pub fn run(&self) -> Result<BundleOutcome, BundleError> {
        if !self.node_available() {
            let reason = format!(
                "Node.js ('{}') is not installed or missing from PATH; web UI assets will not be rebuilt",
                self.node
            );
            warn!("{reason}");
            return Ok(BundleOutcome::Skipped { reason });
        }

        let manifest = self.web_dir.join("package.json");
        if !manifest.is_file() {
            let reason = format!("No package.json found in {}", self.web_dir.display());
            warn!("{reason}");
            return Ok(BundleOutcome::Skipped { reason });
        }

        info!("Installing node packages");
        self.run_step(&["ci"])?;

        info!("Bundling web UI assets");
        self.run_step(&["run", "build"])?;

        info!("Web UI bundle complete");
        Ok(BundleOutcome::Built)
    }

    fn run_step(&self, args: &[&str]) -> Result<(), BundleError> {
        let step = format!("{} {}", self.npm, args.join(" "));

        // npm output goes to stderr; stdout carries the resolved defines
        let status = Command::new(&self.npm)
            .args(args)
            .current_dir(&self.web_dir)
            .stdout(Stdio::from(io::stderr()))
            .status()
            .map_err(|source| BundleError::Spawn {
                step: step.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BundleError::StepFailed {
                step,
                code: status.code(),
            })
        }
    }
}
