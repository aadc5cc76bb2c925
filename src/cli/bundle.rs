//! Bundle command: builds the web UI assets.

use crate::bundler::{AssetBundler, BundleError, BundleOutcome};
use crate::cli::common::{CliContext, CliError, CliResult};
use crate::config::Config;
use clap::Args;
use std::path::PathBuf;

/// Build the web UI assets with npm
#[derive(Debug, Clone, Args)]
pub struct BundleArgs {
    /// Directory containing the UI's package.json (defaults to paths.web_dir)
    #[arg(long, value_name = "DIR")]
    pub web_dir: Option<PathBuf>,
}

impl BundleArgs {
    /// Execute the bundle command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let config = ctx.load_config()?;
        run_bundler(&config, self.web_dir.clone())
    }
}

/// Runs the bundler, printing the outcome.
///
/// A skipped bundle is not an error. A failing npm step exits with npm's own
/// status.
pub(crate) fn run_bundler(config: &Config, web_dir: Option<PathBuf>) -> CliResult<()> {
    let web_dir = web_dir.unwrap_or_else(|| config.paths.web_dir.clone());
    let bundler = AssetBundler::with_tools(web_dir, &config.bundler);

    match bundler.run() {
        Ok(BundleOutcome::Built) => {
            eprintln!("✓ Web UI bundled in {}", bundler.web_dir().display());
            Ok(())
        }
        Ok(BundleOutcome::Skipped { reason }) => {
            eprintln!("⚠ Web UI bundling skipped: {reason}");
            Ok(())
        }
        Err(err) => Err(bundle_error(&err)),
    }
}

fn bundle_error(err: &BundleError) -> CliError {
    CliError::status(err.exit_code(), format!("Web UI build failed: {err}"))
}
