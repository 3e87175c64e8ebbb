//! System-level modules
//!
//! - Logging initialization
//! - Graceful shutdown on Ctrl+C

pub mod logging;
pub mod shutdown;

pub use logging::init_logging;
