//! Conversion request/response types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MSG_MISSING_PARAMETERS: &str = "missing required parameters";
pub const MSG_INVALID_SYSTEM: &str = "invalid system type. Use 'metric' or 'imperial'";
pub const MSG_INVALID_INGREDIENTS_FIELD: &str = "invalid ingredients JSON field";
pub const MSG_INGREDIENTS_NOT_ARRAY: &str = "ingredients must be a JSON array";
pub const MSG_UNSUPPORTED_CONTENT_TYPE: &str = "unsupported content type";
pub const MSG_INVALID_UPSTREAM_RESPONSE: &str = "invalid conversion API response";

pub const NOTE_NO_SUITABLE_UNIT: &str = "no suitable conversion unit found";
pub const NOTE_NO_CONVERSION_DATA: &str = "no conversion data available";

/// The two supported measurement unit families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl MeasurementSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementSystem {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(MeasurementSystem::Metric),
            "imperial" => Ok(MeasurementSystem::Imperial),
            _ => Err(ConversionError::BadRequest(MSG_INVALID_SYSTEM.to_string())),
        }
    }
}

/// A validated conversion request.
///
/// Ingredients stay as raw JSON until they are converted so the
/// same-system short circuit can echo them untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source_system: MeasurementSystem,
    pub target_system: MeasurementSystem,
    pub ingredients: Vec<Value>,
}

/// One validated ingredient line.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientInput {
    pub name: String,
    /// Kept as the JSON number that was sent so `2` is echoed as `2`.
    pub amount: Number,
    pub unit: String,
}

impl IngredientInput {
    /// Validate one raw ingredient: non-empty `name`, numeric `amount`,
    /// non-empty `unit`.
    pub fn from_value(raw: &Value) -> Result<Self, ConversionError> {
        let invalid = || ConversionError::BadRequest(format!("invalid ingredient data: {}", raw));

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?;
        let amount = match raw.get("amount") {
            Some(Value::Number(n)) => n.clone(),
            _ => return Err(invalid()),
        };
        let unit = raw
            .get("unit")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
        })
    }

    pub fn quantity(&self) -> Quantity {
        Quantity {
            amount: self.amount.clone(),
            unit: self.unit.clone(),
        }
    }
}

/// An amount paired with its unit label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: Number,
    pub unit: String,
}

/// One entry of the lookup service's `results` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionCandidate {
    #[serde(default)]
    pub unit: String,
    /// Kept raw; only numeric values are usable.
    #[serde(default)]
    pub value: Option<Value>,
}

/// Body returned by the external lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub results: Option<Vec<ConversionCandidate>>,
}

/// Outcome for one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedIngredient {
    pub name: String,
    pub original: Quantity,
    pub converted: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Response body of a successful conversion.
///
/// Generic over the entry type: converted requests carry
/// [`ConvertedIngredient`], the same-system echo carries raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResponse<T = ConvertedIngredient> {
    pub source_system: MeasurementSystem,
    pub target_system: MeasurementSystem,
    pub converted_ingredients: Vec<T>,
}

/// Errors that end a conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Malformed, missing or invalid input.
    #[error("{0}")]
    BadRequest(String),

    /// Body encoding the handler does not understand.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Upstream failure or any unexpected fault.
    #[error("{0}")]
    Internal(String),
}

impl ConversionError {
    pub fn upstream_status(body: &str) -> Self {
        ConversionError::Internal(format!("conversion API error: {}", body))
    }
}

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;
