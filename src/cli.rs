//! Command-line surface, gated behind the `cli` feature so the crate
//! can be embedded as a pure library without pulling in `clap`/`glob`.

mod args;
mod runner;

pub use args::{Cli, Command};
pub use runner::BatchReport;
