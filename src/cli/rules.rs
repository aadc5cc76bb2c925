//! Rules command: lists the dependency rule table in effect.

use crate::cli::common::{CliContext, CliError, CliResult, RuleArgs};
use crate::resolver::{Effect, Rule, RuleBody, RuleEntry, RuleTable};
use clap::Args;
use serde::Serialize;

/// List the usermod dependency rules
#[derive(Debug, Clone, Args)]
pub struct RulesArgs {
    #[command(flatten)]
    rules: RuleArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RulesArgs {
    /// Execute the rules command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let mut config = ctx.load_config()?;
        self.rules.apply(&mut config);

        let table = config
            .rule_table()
            .map_err(|e| CliError::io(format!("Failed to load rules: {e:#}")))?;

        if self.json {
            let json = serde_json::to_string_pretty(&RulesOutput::from(&table))
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        } else {
            print!("{}", format_table(&table));
        }

        Ok(())
    }
}

#[derive(Serialize, Debug)]
struct RulesOutput {
    entries: Vec<EntryOutput>,
    known_modules: Vec<String>,
}

#[derive(Serialize, Debug)]
struct EntryOutput {
    owner: String,
    kind: &'static str,
    rules: Vec<RuleOutput>,
}

#[derive(Serialize, Debug)]
struct RuleOutput {
    when: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    emit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reject: Option<String>,
}

impl From<&RuleTable> for RulesOutput {
    fn from(table: &RuleTable) -> Self {
        Self {
            entries: table.entries().iter().map(EntryOutput::from).collect(),
            known_modules: table.known_modules(),
        }
    }
}

impl From<&RuleEntry> for EntryOutput {
    fn from(entry: &RuleEntry) -> Self {
        Self {
            owner: entry.owner.clone(),
            kind: kind_name(&entry.body),
            rules: entry.rules().iter().map(RuleOutput::from).collect(),
        }
    }
}

impl From<&Rule> for RuleOutput {
    fn from(rule: &Rule) -> Self {
        let (emit, reject) = match &rule.effect {
            Effect::EmitFlag(flag) => (Some(flag.to_string()), None),
            Effect::Reject(message) => (None, Some(message.clone())),
        };
        Self {
            when: rule.trigger.to_string(),
            emit,
            reject,
        }
    }
}

const fn kind_name(body: &RuleBody) -> &'static str {
    match body {
        RuleBody::Independent(_) => "independent",
        RuleBody::FirstMatch(_) => "first_match",
    }
}

fn format_table(table: &RuleTable) -> String {
    let mut output = String::new();

    for entry in table.entries() {
        output.push_str(&format!("{} ({})\n", entry.owner, kind_name(&entry.body)));
        for (index, rule) in entry.rules().iter().enumerate() {
            match entry.body {
                RuleBody::FirstMatch(_) => {
                    output.push_str(&format!("  {}. {rule}\n", index + 1));
                }
                RuleBody::Independent(_) => {
                    output.push_str(&format!("  {rule}\n"));
                }
            }
        }
    }

    output.push_str(&format!(
        "\n{} entries, usermods: {}\n",
        table.len(),
        table.known_modules().join(" ")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_builtin_table() {
        let output = format_table(&RuleTable::builtin());

        assert!(output.contains("PWM_fan (first_match)"));
        assert!(output.contains("  1. when Temperature -> emit USERMOD_DALLASTEMPERATURE"));
        assert!(output.contains("  3. when PWM_fan and none of [Temperature, sht] -> reject"));
        assert!(output.contains("seven_segment_display_reloaded (independent)"));
        assert!(output.contains("4 entries"));
    }

    #[test]
    fn test_json_view() {
        let output = RulesOutput::from(&RuleTable::builtin());

        assert_eq!(output.entries.len(), 4);
        assert_eq!(output.entries[0].kind, "first_match");
        assert_eq!(output.entries[0].rules.len(), 3);
        assert_eq!(
            output.entries[0].rules[2].reject.as_deref(),
            Some("PWM_fan usermod requires Temperature or sht to be enabled")
        );
        assert!(output.entries[3].rules[0].emit.is_some());
        assert!(output.known_modules.iter().any(|m| m == "PWM_fan"));
    }
}
