//! Rule tables stored as TOML.
//!
//! # Format
//!
//! ```toml
//! [[rules]]
//! owner = "PWM_fan"
//! first_match = [
//!     { when = { module = "Temperature" }, emit = "USERMOD_DALLASTEMPERATURE" },
//!     { when = { module = "sht" }, emit = "USERMOD_SHT" },
//!     { when = { all = [{ module = "PWM_fan" }, { none_of = ["Temperature", "sht"] }] }, reject = "PWM_fan usermod requires Temperature or sht to be enabled" },
//! ]
//!
//! [[rules]]
//! owner = "usermod_v2_rotary_encoder_ui_ALT"
//! when = { any_of = ["four_line_display_ALT", "usermod_v2_four_line_display_ALT"] }
//! emit = "USERMOD_FOUR_LINE_DISPLAY"
//! ```
//!
//! Entries keep their file order. An entry has either `when` plus one of
//! `emit`/`reject`, or a non-empty `first_match` list.

use super::rule::{CapabilityFlag, Effect, Rule, RuleEntry, RuleTable, Trigger};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    owner: String,
    when: Option<Trigger>,
    emit: Option<String>,
    reject: Option<String>,
    first_match: Option<Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    when: Trigger,
    emit: Option<String>,
    reject: Option<String>,
}

/// Reads a rule table from a TOML file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;

    parse_rules(&content).with_context(|| format!("Invalid rule file: {}", path.display()))
}

/// Parses a rule table from TOML text.
pub fn parse_rules(content: &str) -> Result<RuleTable> {
    let file: RuleFile = toml::from_str(content).context("Failed to parse rules TOML")?;

    file.rules
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let owner = raw.owner.clone();
            convert_entry(raw).with_context(|| format!("rule #{} (owner '{}')", idx + 1, owner))
        })
        .collect()
}

fn convert_entry(raw: RawEntry) -> Result<RuleEntry> {
    if raw.owner.trim().is_empty() {
        bail!("owner must not be empty");
    }

    match (raw.when, raw.first_match) {
        (Some(trigger), None) => {
            let rule = convert_rule(trigger, raw.emit, raw.reject)?;
            Ok(RuleEntry::independent(raw.owner, rule))
        }
        (None, Some(alternatives)) => {
            if raw.emit.is_some() || raw.reject.is_some() {
                bail!("'emit' and 'reject' belong inside 'first_match' alternatives");
            }
            if alternatives.is_empty() {
                bail!("'first_match' must list at least one alternative");
            }

            let rules = alternatives
                .into_iter()
                .enumerate()
                .map(|(idx, alt)| {
                    convert_rule(alt.when, alt.emit, alt.reject)
                        .with_context(|| format!("alternative #{}", idx + 1))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(RuleEntry::first_match(raw.owner, rules))
        }
        (Some(_), Some(_)) => bail!("'when' and 'first_match' are mutually exclusive"),
        (None, None) => bail!("expected either 'when' or 'first_match'"),
    }
}

fn convert_rule(trigger: Trigger, emit: Option<String>, reject: Option<String>) -> Result<Rule> {
    validate_trigger(&trigger)?;

    let effect = match (emit, reject) {
        (Some(flag), None) => Effect::EmitFlag(CapabilityFlag::new(flag)?),
        (None, Some(reason)) => {
            if reason.trim().is_empty() {
                bail!("'reject' reason must not be empty");
            }
            Effect::Reject(reason)
        }
        (Some(_), Some(_)) => bail!("'emit' and 'reject' are mutually exclusive"),
        (None, None) => bail!("expected either 'emit' or 'reject'"),
    };

    Ok(Rule { trigger, effect })
}

fn validate_trigger(trigger: &Trigger) -> Result<()> {
    match trigger {
        Trigger::Module(name) => validate_name(name),
        Trigger::AnyOf(names) | Trigger::NoneOf(names) => {
            if names.is_empty() {
                bail!("trigger '{trigger}' lists no usermods");
            }
            names.iter().try_for_each(|name| validate_name(name))
        }
        Trigger::AllOf(triggers) => {
            if triggers.is_empty() {
                bail!("'all' trigger must contain at least one condition");
            }
            triggers.iter().try_for_each(validate_trigger)
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        bail!("'{name}' is not a usable usermod name");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::rule::RuleBody;

    #[test]
    fn test_parse_independent_rule() {
        let table = parse_rules(
            r#"
            [[rules]]
            owner = "seven_segment_display_reloaded"
            when = { module = "BH1750_v2" }
            emit = "USERMOD_BH1750"
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        let entry = &table.entries()[0];
        assert_eq!(entry.owner, "seven_segment_display_reloaded");
        assert_eq!(
            entry.body,
            RuleBody::Independent(Rule::emit(
                Trigger::module("BH1750_v2"),
                CapabilityFlag::new("USERMOD_BH1750").unwrap()
            ))
        );
    }

    #[test]
    fn test_parse_nested_trigger() {
        let table = parse_rules(
            r#"
            [[rules]]
            owner = "PWM_fan"
            when = { all = [{ module = "PWM_fan" }, { none_of = ["Temperature", "sht"] }] }
            reject = "needs a sensor"
            "#,
        )
        .unwrap();

        assert_eq!(
            table.entries()[0].rules()[0].trigger,
            Trigger::missing_prerequisite("PWM_fan", ["Temperature", "sht"])
        );
    }

    #[test]
    fn test_empty_document_is_empty_table() {
        assert!(parse_rules("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_emit_and_reject_together() {
        let err = parse_rules(
            r#"
            [[rules]]
            owner = "a"
            when = { module = "a" }
            emit = "A"
            reject = "no"
            "#,
        )
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("rule #1 (owner 'a')"), "{message}");
        assert!(message.contains("mutually exclusive"), "{message}");
    }

    #[test]
    fn test_rejects_invalid_flag() {
        let err = parse_rules(
            r#"
            [[rules]]
            owner = "ok"
            when = { module = "ok" }
            emit = "OK"

            [[rules]]
            owner = "bad"
            when = { module = "bad" }
            emit = "NOT-A-DEFINE"
            "#,
        )
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("rule #2 (owner 'bad')"), "{message}");
        assert!(message.contains("NOT-A-DEFINE"), "{message}");
    }

    #[test]
    fn test_rejects_empty_first_match() {
        let err = parse_rules(
            r#"
            [[rules]]
            owner = "a"
            first_match = []
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("at least one alternative"));
    }

    #[test]
    fn test_rejects_empty_alias_list() {
        let err = parse_rules(
            r#"
            [[rules]]
            owner = "a"
            when = { any_of = [] }
            emit = "A"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("lists no usermods"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(parse_rules(
            r#"
            [[rules]]
            owner = "a"
            when = { module = "a" }
            emit = "A"
            priority = 3
            "#,
        )
        .is_err());
    }

    #[test]
    fn test_rejects_missing_when() {
        let err = parse_rules(
            r#"
            [[rules]]
            owner = "a"
            emit = "A"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("either 'when' or 'first_match'"));
    }
}
