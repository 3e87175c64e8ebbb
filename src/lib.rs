//! Taplinker - NFC tap attribution and funnel analytics
//!
//! Resolves physical NFC taps to a rep's redirect or profile page, records
//! funnel events (TAP → VIEW → SUBMIT), captures leads and aggregates
//! per-rep conversion.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: SeaORM storage backend and domain models
//! - `services`: tap resolution, event recording, funnel, leads, admin CRUD
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI command implementations
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and shutdown

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
