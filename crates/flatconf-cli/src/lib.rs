//! flatconf CLI library
//!
//! Exposes the CLI entry points so the binary stays a thin wrapper and the
//! command handling can be driven from tests.

mod cli;

pub use cli::{run, run_from};
