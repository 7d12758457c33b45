//! Comprobador CLI library.
//!
//! Command-line interface for the Comprobar acceptance suites: `run`
//! executes the built-in suites against a browser, `list` shows what
//! would run.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, FormatArg, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Reporter, RunReport};
pub use runner::{execute, RunPlan};
