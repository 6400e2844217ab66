//! Structured logging initialisation for loadspread
//!
//! All crates log through `tracing`; this crate installs the global
//! subscriber according to the logging configuration domain.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing, preview};
