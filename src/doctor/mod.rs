//! Dependency checking and environment validation.
//!
//! This module checks that the tools and files the pre-build steps rely on
//! are present.

pub mod checker;
pub mod formatter;

pub use checker::{DependencyChecker, DependencyStatus, ToolStatus};
pub use formatter::{DoctorFormatter, OutputFormat, Platform};
