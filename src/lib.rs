//! Usermod Resolver Library
//!
//! Resolves the usermods enabled in a firmware build into the preprocessor
//! defines their dependencies need, rejecting builds whose usermods are
//! missing a prerequisite. Also provides the web UI bundling step and an
//! environment doctor that run alongside resolution before compilation.

// Module declarations
pub mod bundler;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod resolver;
