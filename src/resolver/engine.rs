//! Rule evaluation.

use super::modules::ModuleSet;
use super::rule::{CapabilityFlag, Effect, RuleTable};
use serde::Serialize;
use tracing::{debug, trace};

/// Rejection produced when a usermod is enabled without its prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A rejecting rule fired.
    #[error("{reason}")]
    MissingPrerequisite {
        /// Usermod whose rule rejected the build
        owner: String,
        /// Human-readable reason naming the missing prerequisite(s)
        reason: String,
    },
}

impl ResolveError {
    /// Usermod that contributed the rejecting rule.
    pub fn owner(&self) -> &str {
        match self {
            Self::MissingPrerequisite { owner, .. } => owner,
        }
    }

    /// Reason shown to the user.
    pub fn reason(&self) -> &str {
        match self {
            Self::MissingPrerequisite { reason, .. } => reason,
        }
    }
}

/// Defines to inject into the build, in first-emission order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Resolution {
    flags: Vec<CapabilityFlag>,
}

impl Resolution {
    /// Adds a flag; returns false if it was already present.
    fn insert(&mut self, flag: &CapabilityFlag) -> bool {
        if self.flags.contains(flag) {
            return false;
        }
        self.flags.push(flag.clone());
        true
    }

    /// Flags in emission order.
    pub fn flags(&self) -> &[CapabilityFlag] {
        &self.flags
    }

    /// Returns true if `name` was emitted.
    pub fn contains(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag.as_str() == name)
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if no flag was emitted.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Consumes the resolution, returning the flags.
    pub fn into_flags(self) -> Vec<CapabilityFlag> {
        self.flags
    }
}

/// Evaluates `table` against `modules`.
///
/// Entries run in declared order. Emitted flags accumulate; the first rejection
/// aborts evaluation and discards everything accumulated so far.
pub fn resolve(modules: &ModuleSet, table: &RuleTable) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();

    for entry in table.entries() {
        let Some(rule) = entry.select(modules) else {
            continue;
        };

        match &rule.effect {
            Effect::EmitFlag(flag) => {
                if resolution.insert(flag) {
                    trace!(owner = %entry.owner, trigger = %rule.trigger, %flag, "rule fired");
                }
            }
            Effect::Reject(reason) => {
                debug!(owner = %entry.owner, trigger = %rule.trigger, "rule rejected build");
                return Err(ResolveError::MissingPrerequisite {
                    owner: entry.owner.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    debug!(modules = modules.len(), flags = resolution.len(), "resolution complete");
    Ok(resolution)
}

/// A rule table bound at construction time.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    table: RuleTable,
}

impl Resolver {
    /// Creates a resolver over `table`.
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// Resolver over the compiled-in usermod rules.
    pub fn builtin() -> Self {
        Self::new(RuleTable::builtin())
    }

    /// The table this resolver evaluates.
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Resolves `modules` against the bound table.
    pub fn resolve(&self, modules: &ModuleSet) -> Result<Resolution, ResolveError> {
        resolve(modules, &self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::rule::{Rule, RuleEntry, Trigger};

    fn flag(name: &'static str) -> CapabilityFlag {
        CapabilityFlag::from_static(name)
    }

    #[test]
    fn test_empty_table_yields_empty_resolution() {
        let resolution = resolve(&ModuleSet::parse("a b"), &RuleTable::new()).unwrap();
        assert!(resolution.is_empty());
    }

    #[test]
    fn test_duplicate_emission_is_idempotent() {
        let table: RuleTable = [
            RuleEntry::independent("x", Rule::emit(Trigger::module("a"), flag("SHARED"))),
            RuleEntry::independent("y", Rule::emit(Trigger::module("b"), flag("SHARED"))),
        ]
        .into_iter()
        .collect();

        let resolution = resolve(&ModuleSet::parse("a b"), &table).unwrap();
        assert_eq!(resolution.flags(), &[flag("SHARED")]);
    }

    #[test]
    fn test_rejection_discards_earlier_flags() {
        let table: RuleTable = [
            RuleEntry::independent("x", Rule::emit(Trigger::module("a"), flag("A"))),
            RuleEntry::independent("y", Rule::reject(Trigger::module("b"), "b is broken")),
            RuleEntry::independent("z", Rule::emit(Trigger::module("c"), flag("C"))),
        ]
        .into_iter()
        .collect();

        let err = resolve(&ModuleSet::parse("a b c"), &table).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingPrerequisite {
                owner: "y".to_string(),
                reason: "b is broken".to_string(),
            }
        );
        assert_eq!(err.owner(), "y");
        assert_eq!(err.to_string(), "b is broken");
    }

    #[test]
    fn test_emission_order_follows_table() {
        let table: RuleTable = [
            RuleEntry::independent("x", Rule::emit(Trigger::module("z"), flag("Z"))),
            RuleEntry::independent("y", Rule::emit(Trigger::module("a"), flag("A"))),
        ]
        .into_iter()
        .collect();

        let resolution = resolve(&ModuleSet::parse("a z"), &table).unwrap();
        assert_eq!(resolution.into_flags(), vec![flag("Z"), flag("A")]);
    }
}
