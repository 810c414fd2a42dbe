//! Pre-launch checks on report data.

use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder the UI shows for unknown values; treated as missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Strength fields that must carry at least one result
pub const STRENGTH_RESULT_FIELDS: [&str; 3] = ["actual_7", "actual_14", "actual_28"];

const OBSERVATIONS_MISSING: &str =
    "Test observations are missing. Please complete the observations first.";
const STRENGTH_MISSING: &str =
    "Strength graph data is missing. Please complete the strength graph first.";
const NO_STRENGTH_RESULTS: &str = "No strength test results found. Please enter strength values.";

/// Outcome of [`validate_report_data`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Missing field names, in the order they were required
    pub missing: Vec<String>,
}

/// Outcome of [`check_report_data_completeness`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completeness {
    pub complete: bool,
    /// Space-joined description of every issue found; empty when complete
    pub message: String,
}

/// JavaScript truthiness of a JSON value
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) if s == NOT_AVAILABLE => false,
        Some(v) => is_truthy(v),
        None => false,
    }
}

/// Check that every field in `required_fields` carries a usable value.
///
/// A field is missing when absent, falsy, empty or `"N/A"`. Non-object
/// `data` has no fields, so every required field is missing.
pub fn validate_report_data<S: AsRef<str>>(data: &Value, required_fields: &[S]) -> ValidationResult {
    let mut missing = Vec::new();
    for field in required_fields {
        let field: &str = field.as_ref();
        if !is_present(data.get(field)) {
            missing.push(field.to_string());
        }
    }

    ValidationResult {
        valid: missing.is_empty(),
        missing,
    }
}

/// Check that observations and strength results are filled in.
///
/// All rules are evaluated; issues are joined with a single space.
pub fn check_report_data_completeness(
    observations: Option<&Map<String, Value>>,
    strength: Option<&Map<String, Value>>,
) -> Completeness {
    let mut issues = Vec::new();

    if observations.map_or(true, Map::is_empty) {
        issues.push(OBSERVATIONS_MISSING);
    }

    match strength {
        Some(s) if !s.is_empty() => {
            let any_result = STRENGTH_RESULT_FIELDS
                .iter()
                .any(|f| s.get(*f).map_or(false, is_truthy));
            if !any_result {
                issues.push(NO_STRENGTH_RESULTS);
            }
        }
        _ => issues.push(STRENGTH_MISSING),
    }

    Completeness {
        complete: issues.is_empty(),
        message: issues.join(" "),
    }
}
