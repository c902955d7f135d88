//! CLI command handlers
//!
//! Argument parsing structures, command routing, and input validation.

pub mod args;
pub mod router;
pub mod validation;

pub use args::{Cli, Commands};
pub use router::execute_command;
pub use validation::{validate_input_file, validate_output_dir};
