//! CLI command handlers.
//!
//! Each subcommand is an `Args` struct with an `execute` method returning
//! [`CliResult`], so `main` only maps errors to exit codes.

pub mod bundle;
pub mod common;
pub mod config;
pub mod doctor;
pub mod prebuild;
pub mod resolve;
pub mod rules;

// Re-export types used by main.rs and tests
pub use bundle::BundleArgs;
pub use common::{CliContext, CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use prebuild::PrebuildArgs;
pub use resolve::{FlagFormat, ResolveArgs};
pub use rules::RulesArgs;
