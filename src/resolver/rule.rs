//! Declarative dependency rules.
//!
//! A [`RuleTable`] is an ordered list of [`RuleEntry`] values, each contributed
//! by one usermod (its *owner*). An entry is either a single independent
//! [`Rule`] or an ordered group of alternatives where the first satisfied
//! trigger wins.

use super::modules::ModuleSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Error returned when a token cannot be used as a preprocessor define.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid preprocessor identifier")]
pub struct InvalidFlag(pub String);

/// A preprocessor define injected into the firmware build.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CapabilityFlag(String);

impl CapabilityFlag {
    /// Creates a flag, checking that the token is a valid C identifier.
    pub fn new(token: impl Into<String>) -> Result<Self, InvalidFlag> {
        let token = token.into();
        if IDENTIFIER.is_match(&token) {
            Ok(Self(token))
        } else {
            Err(InvalidFlag(token))
        }
    }

    /// Flags from the compiled-in table. Validity is covered by tests.
    pub(crate) fn from_static(token: &'static str) -> Self {
        debug_assert!(IDENTIFIER.is_match(token), "invalid built-in flag {token}");
        Self(token.to_string())
    }

    /// Returns the define name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CapabilityFlag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Predicate over the enabled usermods.
///
/// In rule files a trigger is an inline table with exactly one key, e.g.
/// `{ module = "PWM_fan" }` or `{ any_of = ["a", "b"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The named usermod is enabled.
    Module(String),
    /// At least one of the aliases is enabled.
    AnyOf(Vec<String>),
    /// None of the listed usermods is enabled.
    NoneOf(Vec<String>),
    /// Every nested trigger holds.
    #[serde(rename = "all")]
    AllOf(Vec<Trigger>),
}

impl Trigger {
    /// Matches a single usermod name.
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module(name.into())
    }

    /// Matches if any alias is enabled.
    pub fn any_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(names.into_iter().map(Into::into).collect())
    }

    /// Matches if none of the names is enabled.
    pub fn none_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NoneOf(names.into_iter().map(Into::into).collect())
    }

    /// Conjunction of triggers.
    pub fn all_of(triggers: impl IntoIterator<Item = Trigger>) -> Self {
        Self::AllOf(triggers.into_iter().collect())
    }

    /// `dependent` is enabled and none of the acceptable `prerequisites` is.
    pub fn missing_prerequisite<I, S>(dependent: impl Into<String>, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::all_of([Self::module(dependent), Self::none_of(prerequisites)])
    }

    /// Evaluates the trigger against the enabled usermods.
    pub fn matches(&self, modules: &ModuleSet) -> bool {
        match self {
            Self::Module(name) => modules.contains(name),
            Self::AnyOf(names) => modules.contains_any(names),
            Self::NoneOf(names) => !modules.contains_any(names),
            Self::AllOf(triggers) => triggers.iter().all(|t| t.matches(modules)),
        }
    }

    /// Collects every usermod name the trigger refers to.
    pub fn collect_modules(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Module(name) => {
                out.insert(name.clone());
            }
            Self::AnyOf(names) | Self::NoneOf(names) => out.extend(names.iter().cloned()),
            Self::AllOf(triggers) => {
                for trigger in triggers {
                    trigger.collect_modules(out);
                }
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "{name}"),
            Self::AnyOf(names) => write!(f, "any of [{}]", names.join(", ")),
            Self::NoneOf(names) => write!(f, "none of [{}]", names.join(", ")),
            Self::AllOf(triggers) => {
                let parts: Vec<String> = triggers.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" and "))
            }
        }
    }
}

/// What happens when a rule's trigger holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add a define to the build.
    EmitFlag(CapabilityFlag),
    /// Abort the build with a reason.
    Reject(String),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmitFlag(flag) => write!(f, "emit {flag}"),
            Self::Reject(reason) => write!(f, "reject \"{reason}\""),
        }
    }
}

/// A trigger paired with its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Condition over the enabled usermods
    pub trigger: Trigger,
    /// Applied when the trigger holds
    pub effect: Effect,
}

impl Rule {
    /// Rule emitting `flag` when `trigger` holds.
    pub fn emit(trigger: Trigger, flag: CapabilityFlag) -> Self {
        Self {
            trigger,
            effect: Effect::EmitFlag(flag),
        }
    }

    /// Rule rejecting the build when `trigger` holds.
    pub fn reject(trigger: Trigger, reason: impl Into<String>) -> Self {
        Self {
            trigger,
            effect: Effect::Reject(reason.into()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when {} -> {}", self.trigger, self.effect)
    }
}

/// Shape of a table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleBody {
    /// Evaluated regardless of every other entry.
    Independent(Rule),
    /// Alternatives tested in order; only the first satisfied one applies.
    FirstMatch(Vec<Rule>),
}

/// One entry of a [`RuleTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    /// Usermod that contributes the entry
    pub owner: String,
    /// The rule or alternative group
    pub body: RuleBody,
}

impl RuleEntry {
    /// Entry holding a single independent rule.
    pub fn independent(owner: impl Into<String>, rule: Rule) -> Self {
        Self {
            owner: owner.into(),
            body: RuleBody::Independent(rule),
        }
    }

    /// Entry holding an ordered alternative group.
    pub fn first_match(owner: impl Into<String>, alternatives: Vec<Rule>) -> Self {
        Self {
            owner: owner.into(),
            body: RuleBody::FirstMatch(alternatives),
        }
    }

    /// Returns the rule that applies to `modules`, if any.
    pub fn select(&self, modules: &ModuleSet) -> Option<&Rule> {
        match &self.body {
            RuleBody::Independent(rule) => rule.trigger.matches(modules).then_some(rule),
            RuleBody::FirstMatch(alternatives) => alternatives
                .iter()
                .find(|rule| rule.trigger.matches(modules)),
        }
    }

    /// Rules of this entry in declaration order.
    pub fn rules(&self) -> &[Rule] {
        match &self.body {
            RuleBody::Independent(rule) => std::slice::from_ref(rule),
            RuleBody::FirstMatch(alternatives) => alternatives,
        }
    }
}

/// Ordered dependency rules consumed by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
}

impl RuleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends all entries of `other` after the existing ones.
    pub fn extend(&mut self, other: RuleTable) {
        self.entries.extend(other.entries);
    }

    /// Entries in evaluation order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every usermod name referenced by a trigger, sorted and unique.
    pub fn known_modules(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for entry in &self.entries {
            for rule in entry.rules() {
                rule.trigger.collect_modules(&mut names);
            }
        }
        names.into_iter().collect()
    }
}

impl FromIterator<RuleEntry> for RuleTable {
    fn from_iter<I: IntoIterator<Item = RuleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
