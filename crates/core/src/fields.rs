#![forbid(unsafe_code)]

use crate::ChartError;
use serde_json::{Map, Value};

/// Whitelisted view over an incoming JSON object.
///
/// `null` is treated the same as an absent field.
pub(crate) struct Fields<'a> {
    entity: &'static str,
    obj: &'a Map<String, Value>,
}

pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    let v = value.as_f64()?;
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl<'a> Fields<'a> {
    pub(crate) fn new(
        entity: &'static str,
        value: &'a Value,
        allowed: &[&str],
    ) -> Result<Self, ChartError> {
        let Some(obj) = value.as_object() else {
            return Err(ChartError::NotAnObject { entity });
        };
        if let Some(field) = obj.keys().find(|key| !allowed.contains(&key.as_str())) {
            return Err(ChartError::UnknownField {
                entity,
                field: field.clone(),
            });
        }
        Ok(Self { entity, obj })
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &'static str, expected: &'static str, value: &Value) -> ChartError {
        ChartError::InvalidField {
            entity: self.entity,
            field,
            expected,
            value: value.to_string(),
        }
    }

    pub(crate) fn opt_i64(&self, field: &'static str) -> Result<Option<i64>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => as_integer(v)
                .map(Some)
                .ok_or_else(|| self.invalid(field, "an integer", v)),
        }
    }

    pub(crate) fn opt_u64(&self, field: &'static str) -> Result<Option<u64>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => as_integer(v)
                .and_then(|n| u64::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a non-negative integer", v)),
        }
    }

    pub(crate) fn opt_f64(&self, field: &'static str) -> Result<Option<f64>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a number", v)),
        }
    }

    pub(crate) fn opt_bool(&self, field: &'static str) -> Result<Option<bool>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a boolean", v)),
        }
    }

    pub(crate) fn opt_string(&self, field: &'static str) -> Result<Option<String>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.invalid(field, "a string", v)),
        }
    }

    pub(crate) fn opt_array(&self, field: &'static str) -> Result<Option<&'a Vec<Value>>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_array()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "an array", v)),
        }
    }

    pub(crate) fn opt_i64_list(&self, field: &'static str) -> Result<Option<Vec<i64>>, ChartError> {
        let Some(items) = self.opt_array(field)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let Some(n) = as_integer(item) else {
                return Err(self.invalid(field, "an array of integers", item));
            };
            out.push(n);
        }
        Ok(Some(out))
    }

    /// Two-element numeric array such as `x_range`.
    pub(crate) fn opt_pair(&self, field: &'static str) -> Result<Option<(f64, f64)>, ChartError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => parse_pair(v)
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a pair of numbers", v)),
        }
    }
}

pub(crate) fn parse_pair(value: &Value) -> Option<(f64, f64)> {
    let items = value.as_array()?;
    if items.len() != 2 {
        return None;
    }
    let a = items[0].as_f64().filter(|n| n.is_finite())?;
    let b = items[1].as_f64().filter(|n| n.is_finite())?;
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_fields_outside_whitelist() {
        let value = json!({ "x": 1, "colour": "red" });
        let err = Fields::new("class", &value, &["x"]).err();
        assert_eq!(
            err,
            Some(ChartError::UnknownField {
                entity: "class",
                field: "colour".to_string()
            })
        );
    }

    #[test]
    fn integral_floats_count_as_integers() {
        let value = json!({ "x": 2.0, "y": 2.5 });
        let fields = Fields::new("class", &value, &["x", "y"]).unwrap();
        assert_eq!(fields.opt_i64("x").unwrap(), Some(2));
        assert!(fields.opt_i64("y").is_err());
    }

    #[test]
    fn null_reads_as_absent() {
        let value = json!({ "name": null });
        let fields = Fields::new("class", &value, &["name"]).unwrap();
        assert_eq!(fields.opt_string("name").unwrap(), None);
        assert!(fields.get("name").is_none());
    }
}
