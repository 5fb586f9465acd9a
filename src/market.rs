//! Market Rows Module
//!
//! Typed rows for the data the application caches (rates, harbours,
//! species), with a validating parse step for untyped upstream payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

// == Row ==
/// A record that can be checked after deserialization.
pub trait Row: DeserializeOwned {
    /// Returns a description of the first problem found, if any.
    fn validate(&self) -> std::result::Result<(), String>;
}

// == Fish Rate ==
/// Price of one species, optionally at a specific harbour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishRate {
    pub name: String,
    /// Price per unit
    pub price: f64,
    #[serde(default)]
    pub harbour: Option<String>,
    /// Unit the price applies to, e.g. "kg"
    #[serde(default)]
    pub unit: Option<String>,
}

impl FishRate {
    /// Revenue for selling `quantity` units at this rate.
    pub fn revenue(&self, quantity: f64) -> f64 {
        quantity * self.price
    }
}

impl Row for FishRate {
    fn validate(&self) -> std::result::Result<(), String> {
        require_name(&self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("invalid price {} for '{}'", self.price, self.name));
        }
        Ok(())
    }
}

// == Harbour ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harbour {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
}

impl Row for Harbour {
    fn validate(&self) -> std::result::Result<(), String> {
        require_name(&self.name)
    }
}

// == Species ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: i64,
    pub name: String,
    /// Regional name shown alongside the common one
    #[serde(default)]
    pub local_name: Option<String>,
}

impl Row for Species {
    fn validate(&self) -> std::result::Result<(), String> {
        require_name(&self.name)
    }
}

fn require_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        Err("name is empty".to_string())
    } else {
        Ok(())
    }
}

// == Parse Rows ==
/// Turns an untyped upstream payload into validated rows.
///
/// The payload must be a JSON array and every element must decode into `T`
/// and pass validation; otherwise `MalformedResponse` names the first bad row.
pub fn parse_rows<T: Row>(payload: Value) -> Result<Vec<T>> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(CacheError::MalformedResponse(format!(
                "expected an array of rows, got {}",
                kind_of(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let row: T = serde_json::from_value(item)
                .map_err(|e| CacheError::MalformedResponse(format!("row {}: {}", index, e)))?;
            row.validate()
                .map_err(|e| CacheError::MalformedResponse(format!("row {}: {}", index, e)))?;
            Ok(row)
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rates() {
        let payload = json!([
            {"name": "Sardine", "price": 141},
            {"name": "Mackerel", "price": 220.5, "harbour": "Kochi", "unit": "kg"}
        ]);

        let rates: Vec<FishRate> = parse_rows(payload).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].price, 141.0);
        assert_eq!(rates[0].harbour, None);
        assert_eq!(rates[1].harbour.as_deref(), Some("Kochi"));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_rows::<Harbour>(json!({"data": []})).unwrap_err();
        assert!(matches!(err, CacheError::MalformedResponse(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_reports_bad_row_index() {
        let payload = json!([
            {"id": 1, "name": "Tuna"},
            {"id": "two", "name": "Seer"}
        ]);

        let err = parse_rows::<Species>(payload).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_parse_rejects_negative_price() {
        let err = parse_rows::<FishRate>(json!([{"name": "Prawn", "price": -3}])).unwrap_err();
        assert!(matches!(err, CacheError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_blank_name() {
        let err = parse_rows::<Harbour>(json!([{"id": 7, "name": "  "}])).unwrap_err();
        assert!(err.to_string().contains("name is empty"));
    }

    #[test]
    fn test_empty_array_is_ok() {
        let harbours: Vec<Harbour> = parse_rows(json!([])).unwrap();
        assert!(harbours.is_empty());
    }

    #[test]
    fn test_revenue() {
        let rate = FishRate {
            name: "Sardine".to_string(),
            price: 141.0,
            harbour: None,
            unit: Some("kg".to_string()),
        };
        assert_eq!(rate.revenue(2.5), 352.5);
    }
}
