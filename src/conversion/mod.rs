//! Ingredient conversion subsystem.
//!
//! # Data Flow
//! ```text
//! ConversionRequest (validated)
//!     → engine.rs (short circuit or per-ingredient pipeline)
//!     → client.rs (one lookup per ingredient, external service)
//!     → classify.rs (metric/imperial filtering of candidates)
//!     → ConversionResponse
//! ```
//!
//! # Failure Semantics
//! - Invalid ingredient, upstream error or unreadable upstream body aborts
//!   the whole request
//! - "No matching unit" is the only per-ingredient soft outcome

pub mod classify;
pub mod client;
pub mod engine;
pub mod types;

pub use client::LookupClient;
pub use engine::{ConversionEngine, ConversionOutcome};
pub use types::{
    ConversionError, ConversionRequest, ConversionResponse, ConvertedIngredient, IngredientInput,
    MeasurementSystem, Quantity,
};
