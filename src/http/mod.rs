//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, mount path)
//!     → request.rs (request ID)
//!     → handlers.rs (method/path dispatch)
//!         GET  → page.rs (form or manifest)
//!         POST → decode.rs → conversion engine
//!     → response.rs (error bodies)
//!     → Send to client
//! ```

pub mod decode;
pub mod handlers;
pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
