//! Recipe unit converter.
//!
//! Converts recipe ingredient quantities between the metric and imperial
//! systems by querying an external unit conversion service once per
//! ingredient and picking the first candidate unit of the requested system.

pub mod config;
pub mod conversion;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ConverterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
