//! The set of usermods enabled for a single build.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Usermods selected for the current build.
///
/// Built once per invocation, usually from the whitespace-separated
/// `custom_usermods` project option. Duplicates collapse and ordering is not
/// significant. A set cannot be modified once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleSet {
    modules: BTreeSet<String>,
}

impl ModuleSet {
    /// Tokenizes a usermod option string on whitespace.
    ///
    /// ```rust
    /// use usermod_resolver::resolver::ModuleSet;
    ///
    /// let modules = ModuleSet::parse("PWM_fan  Temperature\nPWM_fan");
    /// assert_eq!(modules.len(), 2);
    /// assert!(modules.contains("Temperature"));
    /// ```
    #[must_use]
    pub fn parse(option: &str) -> Self {
        option.split_whitespace().collect()
    }

    /// Returns true if `name` is enabled.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    /// Returns true if at least one of `names` is enabled.
    pub fn contains_any<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().any(|name| self.contains(name.as_ref()))
    }

    /// Number of distinct usermods.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no usermod is enabled.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates the usermods in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ModuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(" "))
    }
}
