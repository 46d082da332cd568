//! Core logic for converting a recipe's ingredient list.

use futures_util::{StreamExt, TryStreamExt};
use serde_json::Value;

use crate::conversion::classify::matches_system;
use crate::conversion::client::LookupClient;
use crate::conversion::types::{
    ConversionRequest, ConversionResponse, ConversionResult, ConvertedIngredient, IngredientInput,
    LookupResponse, MeasurementSystem, Quantity, NOTE_NO_CONVERSION_DATA, NOTE_NO_SUITABLE_UNIT,
};

/// What a conversion request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// Source and target systems match; ingredients echoed verbatim.
    Unchanged(ConversionResponse<Value>),
    Converted(ConversionResponse<ConvertedIngredient>),
}

/// Engine driving lookups and unit selection for a request.
#[derive(Clone)]
pub struct ConversionEngine {
    client: LookupClient,
    max_concurrency: usize,
}

impl ConversionEngine {
    /// Create a new engine. A `max_concurrency` of 1 keeps lookups strictly sequential.
    pub fn new(client: LookupClient, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Convert every ingredient of a validated request.
    ///
    /// Output order matches input order. The first failure in input order
    /// aborts the whole request; no partial result is returned.
    pub async fn convert(&self, request: ConversionRequest) -> ConversionResult<ConversionOutcome> {
        let ConversionRequest {
            source_system,
            target_system,
            ingredients,
        } = request;

        if source_system == target_system {
            tracing::debug!(system = %source_system, "Source and target match, echoing ingredients");
            return Ok(ConversionOutcome::Unchanged(ConversionResponse {
                source_system,
                target_system,
                converted_ingredients: ingredients,
            }));
        }

        let converted_ingredients = futures_util::stream::iter(ingredients)
            .map(|raw| {
                let engine = self.clone();
                async move { engine.convert_one(raw, target_system).await }
            })
            .buffered(self.max_concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(ConversionOutcome::Converted(ConversionResponse {
            source_system,
            target_system,
            converted_ingredients,
        }))
    }

    async fn convert_one(&self, raw: Value, target: MeasurementSystem) -> ConversionResult<ConvertedIngredient> {
        let ingredient = IngredientInput::from_value(&raw)?;
        let lookup = self.client.lookup(&ingredient).await?;
        Ok(resolve(&ingredient, &lookup, target))
    }
}

/// Pick the converted quantity for one ingredient from a lookup result.
///
/// The first candidate (in service order) whose unit classifies into
/// `target` and that carries a numeric value wins.
pub fn resolve(ingredient: &IngredientInput, lookup: &LookupResponse, target: MeasurementSystem) -> ConvertedIngredient {
    let original = ingredient.quantity();

    let (converted, note) = match lookup.results.as_deref() {
        Some(results) if !results.is_empty() => {
            let best = results
                .iter()
                .filter(|c| matches_system(&c.unit, target))
                .find_map(|c| {
                    c.value.as_ref().and_then(Value::as_number).map(|value| Quantity {
                        amount: value.clone(),
                        unit: c.unit.clone(),
                    })
                });
            match best {
                Some(q) => (q, None),
                None => (original.clone(), Some(NOTE_NO_SUITABLE_UNIT.to_string())),
            }
        }
        _ => (original.clone(), Some(NOTE_NO_CONVERSION_DATA.to_string())),
    };

    ConvertedIngredient {
        name: ingredient.name.clone(),
        original,
        converted,
        note,
    }
}
