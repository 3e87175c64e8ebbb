//! User-facing interfaces other than the HTTP API

#[cfg(feature = "cli")]
pub mod cli;
