//! Dependency checking for the pre-build environment.
//!
//! This module detects the external tools the pre-build steps shell out to
//! and validates the project files they read.
//!
//! # Example
//!
//! ```rust
//! use usermod_resolver::doctor::{DependencyChecker, ToolStatus};
//! use std::path::Path;
//!
//! let checker = DependencyChecker::new();
//! let statuses = checker.check_all(Path::new("."), None);
//!
//! for status in &statuses {
//!     match status.status {
//!         ToolStatus::Available => println!("✓ {}: {}", status.name, status.message),
//!         ToolStatus::Missing => println!("✗ {}: {}", status.name, status.message),
//!         ToolStatus::Unknown => println!("? {}: {}", status.name, status.message),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Missing tools return `ToolStatus::Missing` with a hint
//! - Command execution errors return `ToolStatus::Unknown` with error details
//! - Parsing failures return `ToolStatus::Unknown` rather than panicking

use crate::config::BundlerConfig;
use crate::resolver::load_rules;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Status of a single dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    /// Dependency is present and working
    Available,
    /// Dependency is not found or not working
    Missing,
    /// Could not determine status
    Unknown,
}

/// Result of checking a single dependency.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    /// Name of the dependency (e.g., "Node.js", "Rule file")
    pub name: String,
    /// Status of the dependency
    pub status: ToolStatus,
    /// Version string if detected (e.g., "20.11.0")
    pub version: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new dependency status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            version,
            message: message.into(),
        }
    }

    /// Creates a status for an available tool with a detected version.
    #[must_use]
    pub fn available(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version_str = version.into();
        Self::new(
            name,
            ToolStatus::Available,
            Some(version_str.clone()),
            format!("Found version {version_str}"),
        )
    }

    /// Creates a status for a present, versionless dependency.
    #[must_use]
    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Available, None, message)
    }

    /// Creates a status for a missing dependency.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Missing, None, message)
    }

    /// Creates a status for an unknown dependency state.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Unknown, None, message)
    }
}

/// Names reported by [`DependencyChecker::check_all`].
pub const NODE: &str = "Node.js";
/// npm check name.
pub const NPM: &str = "npm";
/// Web UI directory check name.
pub const WEB_UI: &str = "Web UI";
/// Rule file check name.
pub const RULE_FILE: &str = "Rule file";
/// Config file check name, reported only when the file cannot be parsed.
pub const CONFIG: &str = "Config";

/// Checker for the pre-build environment.
#[derive(Debug, Clone, Default)]
pub struct DependencyChecker {
    tools: BundlerConfig,
}

impl DependencyChecker {
    /// Creates a checker looking for `node` and `npm` on PATH.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker for the configured tool names.
    #[must_use]
    pub fn with_tools(tools: BundlerConfig) -> Self {
        Self { tools }
    }

    /// Checks all dependencies and returns their status.
    pub fn check_all(&self, web_dir: &Path, rules_file: Option<&Path>) -> Vec<DependencyStatus> {
        vec![
            self.check_node(),
            self.check_npm(),
            self.check_web_ui(web_dir),
            self.check_rule_file(rules_file),
        ]
    }

    /// Checks if Node.js is installed by running `node --version`.
    pub fn check_node(&self) -> DependencyStatus {
        self.check_tool(
            NODE,
            &self.tools.node,
            "Not found in PATH. Web UI assets will not be rebuilt",
        )
    }

    /// Checks if npm is installed by running `npm --version`.
    pub fn check_npm(&self) -> DependencyStatus {
        self.check_tool(
            NPM,
            &self.tools.npm,
            "Not found in PATH. Usually installed together with Node.js",
        )
    }

    fn check_tool(&self, name: &str, command: &str, missing_hint: &str) -> DependencyStatus {
        match Self::run_version_command(command) {
            Ok(output) => {
                if let Some(version) = Self::parse_version(&output) {
                    DependencyStatus::available(name, version)
                } else {
                    DependencyStatus::unknown(
                        name,
                        format!("Found but could not parse version: {}", output.trim()),
                    )
                }
            }
            Err(e) => {
                if Self::is_command_not_found(&e) {
                    DependencyStatus::missing(name, missing_hint)
                } else {
                    DependencyStatus::unknown(name, format!("Error checking: {e}"))
                }
            }
        }
    }

    /// Checks that the web UI directory holds a `package.json`.
    pub fn check_web_ui(&self, web_dir: &Path) -> DependencyStatus {
        if !web_dir.is_dir() {
            return DependencyStatus::missing(
                WEB_UI,
                format!("Directory does not exist: {}", web_dir.display()),
            );
        }

        let manifest = web_dir.join("package.json");
        if manifest.is_file() {
            DependencyStatus::ok(WEB_UI, format!("package.json at {}", manifest.display()))
        } else {
            DependencyStatus::missing(
                WEB_UI,
                format!("No package.json in {}", web_dir.display()),
            )
        }
    }

    /// Checks that the configured rule file parses.
    ///
    /// No rule file means the compiled-in rules are used, which is fine.
    pub fn check_rule_file(&self, path: Option<&Path>) -> DependencyStatus {
        let Some(path) = path else {
            return DependencyStatus::ok(RULE_FILE, "Not configured, using built-in rules");
        };

        match load_rules(path) {
            Ok(table) => DependencyStatus::ok(
                RULE_FILE,
                format!("{} entries in {}", table.len(), path.display()),
            ),
            Err(e) => DependencyStatus::missing(RULE_FILE, format!("{e:#}")),
        }
    }

    /// Runs `<command> --version`, returning stdout or stderr if stdout is empty.
    fn run_version_command(command: &str) -> Result<String> {
        let output = Command::new(command)
            .arg("--version")
            .output()
            .with_context(|| format!("Failed to execute '{command}'"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let result = if stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            stdout.to_string()
        };

        Ok(result)
    }

    /// Parses a version number out of tool output.
    ///
    /// Examples:
    /// - "v20.11.0" -> Some("20.11.0")
    /// - "10.2.4" -> Some("10.2.4")
    fn parse_version(output: &str) -> Option<String> {
        output
            .split_whitespace()
            .map(|word| word.trim_start_matches('v'))
            .find(|word| {
                let parts: Vec<&str> = word.split('.').collect();
                parts.len() >= 2
                    && parts
                        .iter()
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            })
            .map(String::from)
    }

    /// Checks if an error indicates a command was not found.
    fn is_command_not_found(error: &anyhow::Error) -> bool {
        error.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }
}
