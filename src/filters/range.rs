use serde::Serialize;

use super::dictionary::FilterKey;

/// Display-level problem with a min/max pair. Both bounds are still applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeWarning {
    MinExceedsMax { min: f64, max: f64 },
}

impl RangeWarning {
    pub fn message(&self, operand: &str) -> String {
        match self {
            RangeWarning::MinExceedsMax { min, max } => {
                format!("{operand}: minimum {min} is greater than maximum {max}")
            }
        }
    }
}

pub fn check_range(min: Option<f64>, max: Option<f64>) -> Option<RangeWarning> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Some(RangeWarning::MinExceedsMax { min, max }),
        _ => None,
    }
}

/// Outcome of applying a min/max input pair to the dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeUpdate {
    pub min_key: FilterKey,
    pub max_key: FilterKey,
    pub warning: Option<RangeWarning>,
}
