//! Doctor command for pre-build environment checks.

use crate::cli::common::{CliContext, CliError, CliResult};
use crate::config::Config;
use crate::doctor::checker::CONFIG;
use crate::doctor::{
    DependencyChecker, DependencyStatus, DoctorFormatter, OutputFormat, ToolStatus,
};
use clap::Args;

/// Check the pre-build environment
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let statuses = collect_statuses(ctx);

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };

        let formatter = DoctorFormatter::with_format(format);
        println!("{}", formatter.format_results(&statuses));

        if statuses.iter().any(|s| s.status == ToolStatus::Missing) {
            Err(CliError::validation("Some checks failed"))
        } else {
            Ok(())
        }
    }
}

/// Runs every check against the configured paths and tools.
///
/// The config is read without validation so that a stale rule file shows up
/// as a failed check. An unparseable config is its own failed check, and the
/// remaining checks then run with defaults.
fn collect_statuses(ctx: &CliContext) -> Vec<DependencyStatus> {
    let (config, config_status) = match ctx.read_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(DependencyStatus::missing(CONFIG, e.message))),
    };

    let checker = DependencyChecker::with_tools(config.bundler.clone());
    let checks = checker.check_all(&config.paths.web_dir, config.paths.rules_file.as_deref());

    config_status.into_iter().chain(checks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::checker::RULE_FILE;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stale_rule_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let gone = temp_dir.path().join("gone.toml");
        fs::write(
            &config_path,
            format!("[paths]\nrules_file = {:?}\n", gone.to_str().unwrap()),
        )
        .unwrap();

        let statuses = collect_statuses(&CliContext::new(Some(config_path)));
        let rule_file = statuses.iter().find(|s| s.name == RULE_FILE).unwrap();
        assert_eq!(rule_file.status, ToolStatus::Missing);
        assert!(statuses.iter().all(|s| s.name != CONFIG));
    }

    #[test]
    fn test_unparseable_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[paths\n").unwrap();

        let statuses = collect_statuses(&CliContext::new(Some(config_path)));
        assert_eq!(statuses[0].name, CONFIG);
        assert_eq!(statuses[0].status, ToolStatus::Missing);
        assert_eq!(statuses.len(), 5);
    }
}
