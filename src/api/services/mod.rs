pub mod catalog;
pub mod error_code;
pub mod events;
pub mod health;
pub mod helpers;
pub mod leads;
pub mod reps;
pub mod routes;
pub mod tap;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use routes::configure_routes;
pub use tap::{TapService, tap_routes};
