//! Configuration management CLI commands.

use crate::cli::common::{CliContext, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Whitespace-separated usermods enabled for the build
    #[arg(long, value_name = "LIST")]
    usermods: Option<String>,

    /// Web UI directory containing package.json
    #[arg(long, value_name = "DIR")]
    web_dir: Option<PathBuf>,

    /// TOML rule file evaluated after the built-in rules
    #[arg(long, value_name = "FILE")]
    rules_file: Option<PathBuf>,

    /// Whether prebuild bundles the web UI
    #[arg(long, value_name = "BOOL")]
    bundle_ui: Option<bool>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    paths: PathsOutput,
    build: BuildOutput,
    bundler: BundlerOutput,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    web_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules_file: Option<String>,
}

#[derive(Serialize, Debug)]
struct BuildOutput {
    custom_usermods: Vec<String>,
    bundle_ui: bool,
    replace_builtin_rules: bool,
}

#[derive(Serialize, Debug)]
struct BundlerOutput {
    node: String,
    npm: String,
}

impl From<&Config> for ConfigOutput {
    fn from(config: &Config) -> Self {
        Self {
            paths: PathsOutput {
                web_dir: config.paths.web_dir.to_string_lossy().to_string(),
                rules_file: config
                    .paths
                    .rules_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
            },
            build: BuildOutput {
                custom_usermods: config.module_set().iter().map(String::from).collect(),
                bundle_ui: config.build.bundle_ui,
                replace_builtin_rules: config.build.replace_builtin_rules,
            },
            bundler: BundlerOutput {
                node: config.bundler.node.clone(),
                npm: config.bundler.npm.clone(),
            },
        }
    }
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(ctx),
            ConfigCommand::Set(args) => args.execute(ctx),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let config = ctx.load_config()?;

        if self.json {
            let json = serde_json::to_string_pretty(&ConfigOutput::from(&config)).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        if self.usermods.is_none()
            && self.web_dir.is_none()
            && self.rules_file.is_none()
            && self.bundle_ui.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --usermods, --web-dir, --rules-file, or --bundle-ui",
            ));
        }

        let mut config = ctx.load_config()?;
        self.apply(&mut config)?;
        ctx.save_config(&config)?;

        println!("Configuration updated successfully.");
        Ok(())
    }

    fn apply(&self, config: &mut Config) -> CliResult<()> {
        if let Some(usermods) = &self.usermods {
            config.build.custom_usermods.clone_from(usermods);
        }

        if let Some(path) = &self.web_dir {
            if !path.is_dir() {
                return Err(CliError::validation(format!(
                    "Web UI directory does not exist: {}",
                    path.display()
                )));
            }
            config.paths.web_dir.clone_from(path);
        }

        if let Some(path) = &self.rules_file {
            crate::resolver::load_rules(path)
                .map_err(|e| CliError::validation(format!("Invalid rule file: {e:#}")))?;
            config.paths.rules_file = Some(path.clone());
        }

        if let Some(bundle_ui) = self.bundle_ui {
            config.build.bundle_ui = bundle_ui;
        }

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("Usermod Resolver Configuration");
    println!("==============================");
    println!();

    println!("Paths:");
    println!("  Web UI Directory: {}", config.paths.web_dir.display());
    if let Some(rules_file) = &config.paths.rules_file {
        println!("  Rule File: {}", rules_file.display());
    } else {
        println!("  Rule File: (built-in rules only)");
    }
    println!();

    println!("Build:");
    let usermods = config.module_set();
    if usermods.is_empty() {
        println!("  Usermods: (none)");
    } else {
        println!("  Usermods: {usermods}");
    }
    println!("  Bundle UI: {}", config.build.bundle_ui);
    println!("  Replace Built-in Rules: {}", config.build.replace_builtin_rules);
    println!();

    println!("Bundler:");
    println!("  Node: {}", config.bundler.node);
    println!("  npm: {}", config.bundler.npm);
    println!();
}
