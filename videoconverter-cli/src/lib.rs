// videoconverter-cli/src/lib.rs
//
// Library portion of the videoconverter CLI application.
// Contains argument definitions, prompts and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod prompts;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Tune};
pub use commands::convert::{exit_code, run_convert};
