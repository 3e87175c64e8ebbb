//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod funnel;
mod seed;
mod token;

pub use config_gen::config_generate;
pub use funnel::print_funnel;
pub use seed::{demo_reps, seed_demo_data};
pub use token::print_token;
