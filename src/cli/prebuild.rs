//! Prebuild command: the full step run before firmware compilation.

use crate::cli::bundle::run_bundler;
use crate::cli::common::{CliContext, CliResult, RuleArgs};
use crate::cli::resolve::{render, resolve_modules, selected_modules, FlagFormat};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Resolve usermod dependencies, then bundle the web UI
#[derive(Debug, Clone, Args)]
pub struct PrebuildArgs {
    /// Whitespace-separated usermods (defaults to build.custom_usermods from the config)
    #[arg(short, long, value_name = "LIST")]
    pub usermods: Option<String>,

    #[command(flatten)]
    rules: RuleArgs,

    /// Directory containing the UI's package.json (defaults to paths.web_dir)
    #[arg(long, value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Skip web UI bundling
    #[arg(long)]
    pub no_bundle: bool,

    /// Output format for the resolved defines
    #[arg(long, value_enum, default_value_t = FlagFormat::Defines)]
    pub format: FlagFormat,
}

impl PrebuildArgs {
    /// Execute the prebuild command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let mut config = ctx.load_config()?;
        self.rules.apply(&mut config);

        // A rejected usermod set stops the build before anything is bundled.
        let modules = selected_modules(&config, self.usermods.as_deref());
        let resolution = resolve_modules(&config, &modules)?;

        if self.no_bundle || !config.build.bundle_ui {
            info!("Web UI bundling disabled");
        } else {
            run_bundler(&config, self.web_dir.clone())?;
        }

        print!("{}", render(&modules, &resolution, self.format)?);
        Ok(())
    }
}
