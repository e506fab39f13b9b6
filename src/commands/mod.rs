//! # CLI Command Implementations
//!
//! Each subcommand of `dep` lives in its own module with:
//! - an `Args` struct derived with `clap`,
//! - an `execute` function that validates the arguments, calls into the
//!   `dep_mirror` library, and reports the result.

pub mod mirror;
