//! Lenient field deserializers for create/update input.
//!
//! Multipart forms deliver every field as text, JSON bodies deliver typed
//! values. These helpers accept both so one input shape serves both routes.
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_to_string<E: serde::de::Error>(v: Value) -> Result<Option<String>, E> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected text, got {other}"))),
    }
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    scalar_to_string(Value::deserialize(d)?)?.ok_or_else(|| D::Error::custom("value must not be null"))
}

pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    scalar_to_string(Value::deserialize(d)?)
}

fn value_to_f64<E: serde::de::Error>(v: Value) -> Result<Option<f64>, E> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| E::custom("number out of range")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| E::custom(format!("`{s}` is not a number"))),
        other => Err(E::custom(format!("expected number, got {other}"))),
    }
}

pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    value_to_f64(Value::deserialize(d)?)?.ok_or_else(|| D::Error::custom("number required"))
}

pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    value_to_f64(Value::deserialize(d)?)
}

pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    match value_to_f64::<D::Error>(Value::deserialize(d)?)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(Some(n as u32)),
        Some(n) => Err(D::Error::custom(format!("{n} is not a non-negative integer"))),
    }
}

fn value_to_bool<E: serde::de::Error>(v: Value) -> Result<Option<bool>, E> {
    match v {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::Number(n) => Ok(Some(n.as_f64().unwrap_or(0.0) != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(E::custom(format!("`{s}` is not a boolean"))),
        },
        other => Err(E::custom(format!("expected boolean, got {other}"))),
    }
}

pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(value_to_bool(Value::deserialize(d)?)?.unwrap_or(false))
}

pub fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    value_to_bool(Value::deserialize(d)?)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()))
}

pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_datetime(&s).map(Some).ok_or_else(|| D::Error::custom(format!("`{s}` is not a date"))),
        other => Err(D::Error::custom(format!("expected date string, got {other}"))),
    }
}

/// Expand a field into list items: arrays stay arrays, a JSON-encoded array
/// string is decoded, any other scalar becomes a single item.
fn explode(v: Value) -> Vec<Value> {
    match v {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return items;
                }
            }
            if trimmed.is_empty() { Vec::new() } else { vec![Value::String(s)] }
        }
        other => vec![other],
    }
}

fn to_string_list<E: serde::de::Error>(v: Value) -> Result<Vec<String>, E> {
    explode(v)
        .into_iter()
        .map(|item| scalar_to_string::<E>(item).map(Option::unwrap_or_default))
        .collect()
}

pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    to_string_list(Value::deserialize(d)?)
}

pub fn opt_text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v => to_string_list(v).map(Some),
    }
}

fn to_object_list<T: DeserializeOwned, E: serde::de::Error>(v: Value) -> Result<Vec<T>, E> {
    explode(v)
        .into_iter()
        .map(|item| {
            let item = match item {
                Value::String(s) => serde_json::from_str::<Value>(&s).map_err(E::custom)?,
                other => other,
            };
            serde_json::from_value(item).map_err(E::custom)
        })
        .collect()
}

/// Lists of objects, e.g. FAQ entries; items may arrive JSON-encoded.
pub fn object_list<'de, D: Deserializer<'de>, T: DeserializeOwned>(d: D) -> Result<Vec<T>, D::Error> {
    to_object_list(Value::deserialize(d)?)
}

pub fn opt_object_list<'de, D: Deserializer<'de>, T: DeserializeOwned>(d: D) -> Result<Option<Vec<T>>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        v => to_object_list(v).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "text")]
        price: String,
        #[serde(default, deserialize_with = "opt_number")]
        rate: Option<f64>,
        #[serde(default, deserialize_with = "flag")]
        recommended: bool,
        #[serde(default, deserialize_with = "text_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "object_list")]
        pairs: Vec<std::collections::HashMap<String, String>>,
        #[serde(default, deserialize_with = "opt_date")]
        until: Option<DateTime<Utc>>,
    }

    #[test]
    fn accepts_typed_json() {
        let p: Probe = serde_json::from_value(json!({
            "price": 120, "rate": 4.5, "recommended": true,
            "tags": ["a", "b"], "pairs": [{"title": "t", "description": "d"}]
        }))
        .unwrap();
        assert_eq!(p.price, "120");
        assert_eq!(p.rate, Some(4.5));
        assert!(p.recommended);
        assert_eq!(p.tags, vec!["a", "b"]);
        assert_eq!(p.pairs[0]["title"], "t");
    }

    #[test]
    fn accepts_form_text() {
        let p: Probe = serde_json::from_value(json!({
            "price": "99.5", "rate": "3", "recommended": "false",
            "tags": "[\"x\",\"y\"]",
            "pairs": "[{\"title\":\"q\",\"description\":\"a\"}]",
            "until": "2025-01-31"
        }))
        .unwrap();
        assert_eq!(p.price, "99.5");
        assert_eq!(p.rate, Some(3.0));
        assert!(!p.recommended);
        assert_eq!(p.tags, vec!["x", "y"]);
        assert_eq!(p.pairs[0]["description"], "a");
        assert_eq!(p.until.unwrap().to_rfc3339(), "2025-01-31T00:00:00+00:00");
    }

    #[test]
    fn single_text_becomes_one_item() {
        let p: Probe = serde_json::from_value(json!({"price": "1", "tags": "only"})).unwrap();
        assert_eq!(p.tags, vec!["only"]);
        assert!(p.rate.is_none());
    }

    #[test]
    fn rejects_non_numeric_rate() {
        let r = serde_json::from_value::<Probe>(json!({"price": "1", "rate": "abc"}));
        assert!(r.is_err());
    }
}
