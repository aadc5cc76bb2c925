//! Usermod dependency resolution.
//!
//! Maps the usermods enabled for a build to the preprocessor defines they
//! imply, and rejects selections where a usermod is missing a prerequisite.
//!
//! # Example
//!
//! ```rust
//! use usermod_resolver::resolver::{ModuleSet, Resolver};
//!
//! let resolver = Resolver::builtin();
//!
//! let flags = resolver.resolve(&ModuleSet::parse("PWM_fan sht")).unwrap();
//! assert!(flags.contains("USERMOD_SHT"));
//!
//! let err = resolver.resolve(&ModuleSet::parse("PWM_fan")).unwrap_err();
//! assert_eq!(err.owner(), "PWM_fan");
//! ```
//!
//! Resolution performs no I/O. Printing the reason and stopping the build is
//! left to the caller.

pub mod builtin;
pub mod engine;
pub mod modules;
pub mod rule;
pub mod rules_file;

pub use engine::{resolve, Resolution, ResolveError, Resolver};
pub use modules::ModuleSet;
pub use rule::{
    CapabilityFlag, Effect, InvalidFlag, Rule, RuleBody, RuleEntry, RuleTable, Trigger,
};
pub use rules_file::{load_rules, parse_rules};
