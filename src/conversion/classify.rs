//! Unit label classification.
//!
//! A label is matched by lowercase substring containment against fixed token
//! lists. Short tokens (`g`, `l`, `in`) match inside longer words, so a label
//! can belong to both systems; callers only ask whether it belongs to one.

use crate::conversion::types::MeasurementSystem;

const METRIC_TOKENS: &[&str] = &[
    "gram", "kilo", "liter", "litre", "meter", "metre", "ml", "cm", "g", "kg", "l",
];

const IMPERIAL_TOKENS: &[&str] = &[
    "cup", "tablespoon", "teaspoon", "ounce", "pound", "inch", "feet", "gallon", "quart", "pint",
    "tbsp", "tsp", "oz", "lb", "in", "ft",
];

fn contains_any(unit: &str, tokens: &[&str]) -> bool {
    let unit = unit.to_lowercase();
    tokens.iter().any(|t| unit.contains(t))
}

pub fn is_metric_unit(unit: &str) -> bool {
    contains_any(unit, METRIC_TOKENS)
}

pub fn is_imperial_unit(unit: &str) -> bool {
    contains_any(unit, IMPERIAL_TOKENS)
}

/// Returns true if `unit` classifies into `system`.
pub fn matches_system(unit: &str, system: MeasurementSystem) -> bool {
    match system {
        MeasurementSystem::Metric => is_metric_unit(unit),
        MeasurementSystem::Imperial => is_imperial_unit(unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_labels() {
        for unit in ["grams", "Kilogram", "LITRE", "milliliters", "cm", "kg"] {
            assert!(is_metric_unit(unit), "{unit} should be metric");
        }
        assert!(!is_metric_unit("cup"));
        assert!(!is_metric_unit("oz"));
    }

    #[test]
    fn test_imperial_labels() {
        for unit in ["cups", "Tablespoon", "tsp", "ounces", "lb", "inch", "ft"] {
            assert!(is_imperial_unit(unit), "{unit} should be imperial");
        }
        assert!(!is_imperial_unit("grams"));
        assert!(!is_imperial_unit("kg"));
    }

    #[test]
    fn test_overlapping_labels() {
        // "gallon" carries both 'g' and 'l'; "pint" carries "in".
        assert!(is_metric_unit("gallon"));
        assert!(is_imperial_unit("gallon"));
        assert!(matches_system("gallon", MeasurementSystem::Metric));
        assert!(matches_system("gallon", MeasurementSystem::Imperial));

        // "ounces" has no metric token.
        assert!(!matches_system("ounces", MeasurementSystem::Metric));
    }

    #[test]
    fn test_empty_label_matches_nothing() {
        assert!(!matches_system("", MeasurementSystem::Metric));
        assert!(!matches_system("", MeasurementSystem::Imperial));
    }
}
