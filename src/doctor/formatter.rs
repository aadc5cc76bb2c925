//! Output formatting for dependency check results.
//!
//! Terminal output uses ✓/✗/⚠ markers with platform-specific installation
//! hints. JSON output is meant for CI scripts.

use crate::doctor::checker::{CONFIG, NODE, NPM, RULE_FILE, WEB_UI};
use crate::doctor::{DependencyStatus, ToolStatus};
use serde::{Deserialize, Serialize};

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON output
    Json,
}

/// Platform used to pick installation instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS
    MacOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// Unknown platform
    Unknown,
}

impl Platform {
    /// Detects the current platform from OS configuration.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Returns the platform name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        }
    }
}

/// JSON output structure for doctor results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Overall health status
    pub status: String,
    /// Number of successful checks
    pub passed: usize,
    /// Number of failed checks
    pub failed: usize,
    /// Number of unknown checks
    pub unknown: usize,
    /// Individual dependency results
    pub dependencies: Vec<JsonDependency>,
    /// Platform information
    pub platform: String,
}

/// JSON representation of a single dependency check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDependency {
    /// Dependency name
    pub name: String,
    /// Status (available, missing, unknown)
    pub status: String,
    /// Version string if detected
    pub version: Option<String>,
    /// Status message
    pub message: String,
    /// Installation instructions if missing
    pub installation_hint: Option<String>,
}

struct Counts {
    passed: usize,
    failed: usize,
    unknown: usize,
}

impl Counts {
    fn of(statuses: &[DependencyStatus]) -> Self {
        let count = |wanted: ToolStatus| statuses.iter().filter(|s| s.status == wanted).count();
        Self {
            passed: count(ToolStatus::Available),
            failed: count(ToolStatus::Missing),
            unknown: count(ToolStatus::Unknown),
        }
    }
}

/// Formatter for dependency check results.
pub struct DoctorFormatter {
    format: OutputFormat,
    platform: Platform,
}

impl DoctorFormatter {
    /// Creates a new formatter with specified output format.
    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            platform: Platform::detect(),
        }
    }

    /// Creates a terminal formatter for a fixed platform.
    #[must_use]
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform,
        }
    }

    /// Formats dependency check results.
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => self.format_terminal(statuses),
            OutputFormat::Json => self.format_json(statuses),
        }
    }

    fn format_terminal(&self, statuses: &[DependencyStatus]) -> String {
        let mut output = String::new();
        let counts = Counts::of(statuses);

        output.push_str("Pre-build Environment Status\n");
        output.push_str("════════════════════════════\n\n");

        for status in statuses {
            let (symbol, status_text) = match status.status {
                ToolStatus::Available => ("✓", "OK"),
                ToolStatus::Missing => ("✗", "MISSING"),
                ToolStatus::Unknown => ("⚠", "UNKNOWN"),
            };

            // ✓ Node.js ............. OK (v20.11.0)
            let name_width: usize = 20;
            let dots = ".".repeat(name_width.saturating_sub(status.name.len()));
            output.push_str(&format!("{symbol} {} {dots} {status_text}", status.name));
            if let Some(version) = &status.version {
                output.push_str(&format!(" (v{version})"));
            }
            output.push('\n');

            if status.status == ToolStatus::Missing {
                if let Some(hint) = self.installation_hint(&status.name) {
                    output.push_str(&format!("    Install: {hint}\n"));
                }
            }

            if status.status == ToolStatus::Available {
                output.push('\n');
            } else {
                for line in status.message.lines() {
                    output.push_str(&format!("    {line}\n"));
                }
                output.push('\n');
            }
        }

        output.push_str("────────────────────────────\n");
        output.push_str(&format!("Summary: {} passed", counts.passed));
        if counts.failed > 0 {
            output.push_str(&format!(", {} failed", counts.failed));
        }
        if counts.unknown > 0 {
            output.push_str(&format!(", {} unknown", counts.unknown));
        }
        output.push('\n');

        if counts.failed == 0 && counts.unknown == 0 {
            output.push_str("\n✓ Environment is ready for pre-build steps.\n");
        } else if counts.failed > 0 {
            output.push_str("\n✗ Some checks failed\n");
            output.push_str("  Usermod resolution still works; missing Node.js only skips UI bundling.\n");
        } else {
            output.push_str("\n⚠ Some checks could not be completed\n");
        }

        output
    }

    fn format_json(&self, statuses: &[DependencyStatus]) -> String {
        let counts = Counts::of(statuses);

        let overall_status = if counts.failed == 0 && counts.unknown == 0 {
            "ready"
        } else if counts.failed > 0 {
            "missing_dependencies"
        } else {
            "warnings"
        };

        let dependencies = statuses
            .iter()
            .map(|s| JsonDependency {
                name: s.name.clone(),
                status: match s.status {
                    ToolStatus::Available => "available",
                    ToolStatus::Missing => "missing",
                    ToolStatus::Unknown => "unknown",
                }
                .to_string(),
                version: s.version.clone(),
                message: s.message.clone(),
                installation_hint: if s.status == ToolStatus::Missing {
                    self.installation_hint(&s.name)
                } else {
                    None
                },
            })
            .collect();

        let json_output = JsonOutput {
            status: overall_status.to_string(),
            passed: counts.passed,
            failed: counts.failed,
            unknown: counts.unknown,
            dependencies,
            platform: self.platform.name().to_string(),
        };

        serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }

    fn installation_hint(&self, name: &str) -> Option<String> {
        match name {
            NODE | NPM => Some(self.node_install_instructions().to_string()),
            WEB_UI => Some("Set paths.web_dir to the directory containing package.json".to_string()),
            RULE_FILE => Some("Fix the rule file or unset paths.rules_file".to_string()),
            CONFIG => Some("Fix the TOML syntax or delete the config file".to_string()),
            _ => None,
        }
    }

    fn node_install_instructions(&self) -> &'static str {
        match self.platform {
            Platform::MacOs => "brew install node",
            Platform::Linux => "sudo apt-get install nodejs npm  (Debian/Ubuntu)",
            Platform::Windows => "winget install OpenJS.NodeJS",
            Platform::Unknown => "Install Node.js from https://nodejs.org",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_statuses() -> Vec<DependencyStatus> {
        vec![
            DependencyStatus::available(NODE, "20.11.0"),
            DependencyStatus::missing(NPM, "Not found in PATH"),
            DependencyStatus::ok(WEB_UI, "package.json at ./package.json"),
            DependencyStatus::unknown(RULE_FILE, "Could not determine status"),
        ]
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::MacOs.name(), "macOS");
        assert_eq!(Platform::Linux.name(), "Linux");
        assert_eq!(Platform::Windows.name(), "Windows");
        assert_eq!(Platform::Unknown.name(), "Unknown");
    }

    #[test]
    fn test_format_terminal() {
        let formatter = DoctorFormatter::with_platform(Platform::MacOs);
        let output = formatter.format_results(&sample_statuses());

        assert!(output.contains("Pre-build Environment Status"));
        assert!(output.contains("✓ Node.js"));
        assert!(output.contains("(v20.11.0)"));
        assert!(output.contains("✗ npm"));
        assert!(output.contains("Install: brew install node"));
        assert!(output.contains("Summary: 2 passed, 1 failed, 1 unknown"));
    }

    #[test]
    fn test_format_terminal_all_ready() {
        let formatter = DoctorFormatter::with_platform(Platform::Linux);
        let output = formatter.format_results(&[DependencyStatus::available(NODE, "20.0.0")]);
        assert!(output.contains("Environment is ready"));
    }

    #[test]
    fn test_format_json() {
        let formatter = DoctorFormatter::with_format(OutputFormat::Json);
        let output = formatter.format_results(&sample_statuses());

        let parsed: JsonOutput = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.status, "missing_dependencies");
        assert_eq!(parsed.passed, 2);
        assert_eq!(parsed.failed, 1);
        assert_eq!(parsed.unknown, 1);
        assert_eq!(parsed.dependencies.len(), 4);
        assert!(parsed.dependencies[1].installation_hint.is_some());
        assert!(parsed.dependencies[0].installation_hint.is_none());
    }
}
