pub mod capture;
pub mod handlers;
pub mod models;
#[cfg(feature = "api-server")]
pub mod server;
pub mod services;
