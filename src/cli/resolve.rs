//! Resolve command: usermods to preprocessor defines.

use crate::cli::common::{CliContext, CliError, CliResult, RuleArgs};
use crate::config::Config;
use crate::resolver::{ModuleSet, Resolution, Resolver};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

/// How resolved defines are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FlagFormat {
    /// One define name per line
    #[default]
    Defines,
    /// One `-DNAME` compiler flag per line
    Flags,
    /// JSON document with the usermods and defines
    Json,
}

/// Resolve enabled usermods into preprocessor defines
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Whitespace-separated usermods (defaults to build.custom_usermods from the config)
    #[arg(short, long, value_name = "LIST")]
    pub usermods: Option<String>,

    #[command(flatten)]
    rules: RuleArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = FlagFormat::Defines)]
    pub format: FlagFormat,
}

impl ResolveArgs {
    /// Execute the resolve command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let mut config = ctx.load_config()?;
        self.rules.apply(&mut config);

        let modules = selected_modules(&config, self.usermods.as_deref());
        let resolution = resolve_modules(&config, &modules)?;

        print!("{}", render(&modules, &resolution, self.format)?);
        Ok(())
    }
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    modules: &'a ModuleSet,
    flags: &'a Resolution,
}

/// Usermods from the command line, or the configured ones.
pub(crate) fn selected_modules(config: &Config, usermods: Option<&str>) -> ModuleSet {
    usermods.map_or_else(|| config.module_set(), ModuleSet::parse)
}

/// Runs the resolver over the configured rule table.
///
/// A rejection becomes a validation error so the build stops with exit code 1.
pub(crate) fn resolve_modules(config: &Config, modules: &ModuleSet) -> CliResult<Resolution> {
    let table = config
        .rule_table()
        .map_err(|e| CliError::io(format!("Failed to load rules: {e:#}")))?;

    let unknown: Vec<&str> = {
        let known = table.known_modules();
        modules
            .iter()
            .filter(|name| !known.iter().any(|k| k.as_str() == *name))
            .collect()
    };
    if !unknown.is_empty() {
        debug!(usermods = %unknown.join(" "), "usermods without dependency rules");
    }

    let resolution = Resolver::new(table).resolve(modules).map_err(|e| {
        CliError::validation(format!("{} (rule from usermod '{}')", e.reason(), e.owner()))
    })?;

    info!(
        usermods = modules.len(),
        defines = resolution.len(),
        "Resolved usermod dependencies"
    );
    Ok(resolution)
}

/// Renders a resolution in the requested format, newline-terminated.
pub(crate) fn render(
    modules: &ModuleSet,
    resolution: &Resolution,
    format: FlagFormat,
) -> CliResult<String> {
    let mut output = String::new();

    match format {
        FlagFormat::Defines => {
            for flag in resolution.flags() {
                output.push_str(&format!("{flag}\n"));
            }
        }
        FlagFormat::Flags => {
            for flag in resolution.flags() {
                output.push_str(&format!("-D{flag}\n"));
            }
        }
        FlagFormat::Json => {
            let json = serde_json::to_string_pretty(&ResolveOutput {
                modules,
                flags: resolution,
            })
            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            output.push_str(&json);
            output.push('\n');
        }
    }

    Ok(output)
}
