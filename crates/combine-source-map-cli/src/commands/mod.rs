//! Command implementations for the combine-maps CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! combine-source-map library for the actual work.

pub mod bundle;
pub mod strip;
