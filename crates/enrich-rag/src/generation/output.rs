//! Tolerant extraction of JSON objects from free-form model output

use serde_json::{Map, Value};

/// Confidence assigned when the model output could not be parsed
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Pulls the outermost JSON object out of model text
///
/// Models often wrap JSON in prose or code fences, so the parser takes the
/// span from the first `{` to the last `}`. It never fails: anything that is
/// not a JSON object comes back as a fallback mapping whose `answer` is the
/// original text.
pub struct StructuredOutputParser;

impl StructuredOutputParser {
    /// Parse model output into a JSON mapping
    pub fn parse(text: &str) -> Map<String, Value> {
        match Self::extract_object(text) {
            Some(map) => map,
            None => {
                tracing::warn!("Model output is not a JSON object, using fallback ({} chars)", text.len());
                Self::fallback(text)
            }
        }
    }

    fn extract_object(text: &str) -> Option<Map<String, Value>> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }

        match serde_json::from_str::<Value>(&text[start..=end]) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Mapping used when the text holds no usable object
    pub fn fallback(text: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("answer".to_string(), Value::String(text.to_string()));
        map.insert("confidence".to_string(), Value::from(FALLBACK_CONFIDENCE));
        map.insert("missing_info".to_string(), Value::Array(Vec::new()));
        map.insert("enrichment_suggestions".to_string(), Value::Array(Vec::new()));
        map
    }
}

/// String field, if present and a string
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Numeric field as `f32`, if present and a finite number
pub fn f32_field(map: &Map<String, Value>, key: &str) -> Option<f32> {
    map.get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
}

/// Integer field; floats are truncated
pub fn i64_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = map.get(key)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Array-of-strings field; non-string entries are skipped
pub fn string_list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Array-of-objects field; non-object entries are skipped
pub fn object_list_field<'a>(map: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}
