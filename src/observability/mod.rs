//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the conversion engine produce:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the trace span of every request
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
