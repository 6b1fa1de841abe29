//! CLI argument parsing and the interactive loop.

pub mod args;
pub mod repl;

pub use args::Cli;
pub use repl::Repl;
