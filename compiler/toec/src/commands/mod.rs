//! CLI command implementations.

mod repl;
mod run;

pub use repl::repl;
pub use run::{lex_file, parse_file, run_file};
