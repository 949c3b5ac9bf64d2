//! CLI command implementations.
//!
//! Commands print their results to stdout; logs go to stderr.

#[allow(clippy::print_stdout)]
pub mod issue;
#[allow(clippy::print_stdout)]
pub mod urls;
