//! Normalized view of a test-request details response.
//!
//! Only the first concrete test is used. Its two embedded JSON columns,
//! `test_results_json` (strength graph) and `observations_json`, may arrive
//! either as objects or as JSON-encoded strings; each is decoded on its own
//! and falls back to an empty map when absent or malformed.

use crate::validate::{check_report_data_completeness, Completeness};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Column holding the strength graph results
pub const TEST_RESULTS_FIELD: &str = "test_results_json";

/// Column holding the raw lab observations
pub const OBSERVATIONS_FIELD: &str = "observations_json";

/// Everything a report needs about one test request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestDataBundle {
    /// Parent test-request record (`Null` when the response lacks it)
    pub test_request: Value,
    /// Customer record (`Null` when the response lacks it)
    pub customer: Value,
    /// First entry of `concrete_tests`, or an empty map
    pub concrete_test: Map<String, Value>,
    /// Decoded `test_results_json`
    pub strength_data: Map<String, Value>,
    /// Decoded `observations_json`
    pub observations_data: Map<String, Value>,
    /// Full response body
    pub raw: Value,
}

impl TestDataBundle {
    /// Normalize a details response body. Never fails: malformed embedded
    /// fields are logged and replaced with empty maps.
    pub fn from_response(raw: Value) -> Self {
        let concrete_test = raw
            .get("concrete_tests")
            .and_then(Value::as_array)
            .and_then(|tests| tests.first())
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let strength_data = decode_or_empty(&concrete_test, TEST_RESULTS_FIELD);
        let observations_data = decode_or_empty(&concrete_test, OBSERVATIONS_FIELD);

        log::debug!("Parsed strength data: {}", Value::Object(strength_data.clone()));
        log::debug!("Parsed observations data: {}", Value::Object(observations_data.clone()));

        Self {
            test_request: raw.get("test_request").cloned().unwrap_or(Value::Null),
            customer: raw.get("customer").cloned().unwrap_or(Value::Null),
            concrete_test,
            strength_data,
            observations_data,
            raw,
        }
    }

    /// Whether the lab marked the observations of the selected test as done
    pub fn observations_completed(&self) -> bool {
        self.concrete_test
            .get("observations_completed")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Completeness of the decoded observations and strength data
    pub fn completeness(&self) -> Completeness {
        check_report_data_completeness(Some(&self.observations_data), Some(&self.strength_data))
    }
}

fn decode_or_empty(record: &Map<String, Value>, field: &str) -> Map<String, Value> {
    match decode_embedded(record.get(field), field) {
        Ok(map) => map,
        Err(e) => {
            log::error!("Error parsing JSON fields: {}", e);
            Map::new()
        }
    }
}

/// Decode one embedded JSON column.
///
/// Objects pass through; strings are parsed and must yield an object.
/// Absent, `null`, empty strings and other non-object values decode to an
/// empty map.
pub fn decode_embedded(value: Option<&Value>, field: &str) -> Result<Map<String, Value>> {
    match value {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(s)) if !s.is_empty() => {
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(Error::DecodeError {
                    field: field.to_string(),
                    reason: format!("expected a JSON object, got {}", json_kind(&other)),
                }),
                Err(e) => Err(Error::DecodeError {
                    field: field.to_string(),
                    reason: e.to_string(),
                }),
            }
        }
        _ => Ok(Map::new()),
    }
}

fn json_kind(value: &Value) -> &'static str {
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
    fn test_malformed_field_defaults_without_touching_the_other() {
        let bundle = TestDataBundle::from_response(json!({
            "test_request": {"id": 7},
            "customer": {"name": "Acme"},
            "concrete_tests": [{
                "test_results_json": "{\"actual_7\":30}",
                "observations_json": "not-json"
            }]
        }));
        assert_eq!(Value::Object(bundle.strength_data), json!({"actual_7": 30}));
        assert!(bundle.observations_data.is_empty());
        assert_eq!(bundle.test_request, json!({"id": 7}));
        assert_eq!(bundle.customer, json!({"name": "Acme"}));
    }

    #[test]
    fn test_first_field_failing_does_not_skip_second() {
        let bundle = TestDataBundle::from_response(json!({
            "concrete_tests": [{
                "test_results_json": "{broken",
                "observations_json": {"slump": "ok"}
            }]
        }));
        assert!(bundle.strength_data.is_empty());
        assert_eq!(bundle.observations_data.get("slump"), Some(&json!("ok")));
    }

    #[test]
    fn test_only_first_concrete_test_is_used() {
        let bundle = TestDataBundle::from_response(json!({
            "concrete_tests": [
                {"id": 1, "test_results_json": {"actual_7": 10}},
                {"id": 2, "test_results_json": {"actual_7": 99}}
            ]
        }));
        assert_eq!(bundle.concrete_test.get("id"), Some(&json!(1)));
        assert_eq!(bundle.strength_data.get("actual_7"), Some(&json!(10)));
    }

    #[test]
    fn test_missing_or_empty_list_gives_empty_record() {
        for raw in [json!({}), json!({"concrete_tests": []}), json!({"concrete_tests": null})] {
            let bundle = TestDataBundle::from_response(raw.clone());
            assert!(bundle.concrete_test.is_empty());
            assert!(bundle.strength_data.is_empty());
            assert!(bundle.observations_data.is_empty());
            assert_eq!(bundle.test_request, Value::Null);
            assert_eq!(bundle.raw, raw);
        }
    }

    #[test]
    fn test_non_object_payloads_are_rejected() {
        let err = decode_embedded(Some(&json!("[1,2]")), OBSERVATIONS_FIELD).unwrap_err();
        assert!(err.to_string().contains("an array"));
        assert!(decode_embedded(Some(&json!(5)), OBSERVATIONS_FIELD).unwrap().is_empty());
        assert!(decode_embedded(Some(&json!("")), OBSERVATIONS_FIELD).unwrap().is_empty());
        assert!(decode_embedded(None, OBSERVATIONS_FIELD).unwrap().is_empty());
    }

    #[test]
    fn test_observations_completed_flag() {
        let bundle = TestDataBundle::from_response(json!({
            "concrete_tests": [{"observations_completed": true}]
        }));
        assert!(bundle.observations_completed());
        assert!(!TestDataBundle::from_response(json!({})).observations_completed());
    }

    #[test]
    fn test_completeness_uses_decoded_fields() {
        let bundle = TestDataBundle::from_response(json!({
            "concrete_tests": [{
                "test_results_json": "{\"actual_28\": 41.5}",
                "observations_json": "{\"note\": \"x\"}"
            }]
        }));
        assert!(bundle.completeness().complete);
    }
}
