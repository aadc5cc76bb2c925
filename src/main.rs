//! Usermod Resolver - pre-build step for usermod firmware builds
//!
//! Turns the enabled usermods into preprocessor defines, stops the build when
//! a usermod is missing its prerequisite, and bundles the web UI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usermod_resolver::cli::{
    BundleArgs, CliContext, ConfigArgs, DoctorArgs, PrebuildArgs, ResolveArgs, RulesArgs,
};

/// Usermod dependency resolver and pre-build runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long = "config", global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve enabled usermods into preprocessor defines
    Resolve(ResolveArgs),
    /// List the usermod dependency rules
    Rules(RulesArgs),
    /// Build the web UI assets with npm
    Bundle(BundleArgs),
    /// Resolve usermod dependencies, then bundle the web UI
    Prebuild(PrebuildArgs),
    /// Check the pre-build environment
    Doctor(DoctorArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CliContext::new(cli.config_file);
    let result = match &cli.command {
        Commands::Resolve(args) => args.execute(&ctx),
        Commands::Rules(args) => args.execute(&ctx),
        Commands::Bundle(args) => args.execute(&ctx),
        Commands::Prebuild(args) => args.execute(&ctx),
        Commands::Doctor(args) => args.execute(&ctx),
        Commands::Config(args) => args.execute(&ctx),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
