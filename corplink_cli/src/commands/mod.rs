//! CLI subcommand implementations.

pub mod compare;
pub mod matching;
