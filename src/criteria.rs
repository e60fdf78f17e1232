//! Structured filter criteria extracted from a shopping query

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;

/// Optional filter fields. `None` means "not constrained".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.color.is_none()
            && self.price_max.is_none()
            && self.price_min.is_none()
            && self.rating_min.is_none()
    }

    /// Build criteria from a model-produced JSON value.
    ///
    /// Lenient about shape: numeric fields may be numbers or strings like
    /// "$200"; blanks, nulls and non-positive numbers count as absent.
    pub fn from_json_value(value: &Value) -> Result<Self, ExtractError> {
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Array(_) => return Err(ExtractError::NotAnObject("array")),
            Value::String(_) => return Err(ExtractError::NotAnObject("string")),
            Value::Number(_) => return Err(ExtractError::NotAnObject("number")),
            Value::Bool(_) => return Err(ExtractError::NotAnObject("bool")),
            Value::Null => return Err(ExtractError::NotAnObject("null")),
        };

        let criteria = Self {
            category: text_field(obj, "category"),
            color: text_field(obj, "color"),
            price_max: number_field(obj, "price_max"),
            price_min: number_field(obj, "price_min"),
            rating_min: number_field(obj, "rating_min").map(|r| r.min(5.0)),
        };
        Ok(criteria.normalized())
    }

    /// Swap inverted price bounds so the range is never empty by accident.
    pub fn normalized(mut self) -> Self {
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                self.price_min = Some(max);
                self.price_max = Some(min);
            }
        }
        self
    }

    /// One-line description of what was understood from the query
    pub fn search_summary(&self, query: &str) -> String {
        if self.is_empty() {
            return format!("Searching for: '{}' (showing all products)", query);
        }

        let mut parts = Vec::new();
        if let Some(ref category) = self.category {
            parts.push(format!("Category: {}", category));
        }
        if let Some(ref color) = self.color {
            parts.push(format!("Color: {}", color));
        }
        if let Some(max) = self.price_max {
            parts.push(format!("Max price: ${}", format_amount(max)));
        }
        if let Some(min) = self.price_min {
            parts.push(format!("Min price: ${}", format_amount(min)));
        }
        if let Some(rating) = self.rating_min {
            parts.push(format!("Min rating: {}", format_rating(rating)));
        }

        format!("Searching for: {}", parts.join(" | "))
    }
}

/// `200` for whole amounts, `89.99` otherwise
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Ratings always show at least one decimal: `4.0`, `4.25`
pub fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let raw = match obj.get(key)? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.iter().find_map(Value::as_str)?,
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}
