//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use crate::resolver::{load_rules, ModuleSet, RuleTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding the web UI `package.json`
    pub web_dir: PathBuf,
    /// Optional TOML rule file with project-specific usermod rules
    pub rules_file: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            web_dir: PathBuf::from("."),
            rules_file: None,
        }
    }
}

/// Firmware build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Whitespace-separated usermods, same syntax as the `custom_usermods` project option
    pub custom_usermods: String,
    /// Run the web UI bundler as part of `prebuild`
    pub bundle_ui: bool,
    /// Use only the rule file, ignoring the compiled-in rules
    pub replace_builtin_rules: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            custom_usermods: String::new(),
            bundle_ui: true,
            replace_builtin_rules: false,
        }
    }
}

/// External tool names used by the asset bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Node.js executable
    pub node: String,
    /// npm executable
    pub npm: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            node: "node".to_string(),
            npm: "npm".to_string(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/UsermodResolver/config.toml`
/// - macOS: `~/Library/Application Support/UsermodResolver/config.toml`
/// - Windows: `%APPDATA%\UsermodResolver\config.toml`
///
/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Build settings
    pub build: BuildConfig,
    /// Bundler tool names
    pub bundler: BundlerConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("UsermodResolver");

        Ok(config_dir)
    }

    /// Gets the full path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` without validating the values it holds.
    ///
    /// Used by diagnostics that report on a configuration `load_from` rejects.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using temp file + rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - the rule file exists (if set)
    /// - bundler tool names are not blank
    pub fn validate(&self) -> Result<()> {
        if let Some(rules_file) = &self.paths.rules_file {
            if !rules_file.is_file() {
                anyhow::bail!("Rule file does not exist: {}", rules_file.display());
            }
        }

        if self.bundler.node.trim().is_empty() {
            anyhow::bail!("bundler.node must name an executable");
        }
        if self.bundler.npm.trim().is_empty() {
            anyhow::bail!("bundler.npm must name an executable");
        }

        Ok(())
    }

    /// Usermods configured for the build.
    pub fn module_set(&self) -> ModuleSet {
        ModuleSet::parse(&self.build.custom_usermods)
    }

    /// The rule table in effect: compiled-in rules followed by the rule file,
    /// or the rule file alone when `replace_builtin_rules` is set.
    pub fn rule_table(&self) -> Result<RuleTable> {
        let mut table = if self.build.replace_builtin_rules {
            RuleTable::new()
        } else {
            RuleTable::builtin()
        };

        match &self.paths.rules_file {
            Some(path) => table.extend(load_rules(path)?),
            None if self.build.replace_builtin_rules => {
                anyhow::bail!("replace_builtin_rules is set but no rule file is configured")
            }
            None => {}
        }

        Ok(table)
    }
}
