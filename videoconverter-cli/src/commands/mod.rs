//! Command implementations for the CLI.

/// Converts every candidate file of one directory.
pub mod convert;
