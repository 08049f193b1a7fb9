//! HTTP request handlers.

pub mod health_handler;
pub mod instance_info_handler;

pub use health_handler::health_routes;
pub use instance_info_handler::instance_info_routes;
