//! Report launching: turn a flat data bag into a query string and ask the
//! report host to display the resulting URL.

use crate::host::ReportHost;
use crate::Result;
use serde_json::Value;
use url::form_urlencoded;

/// Label used in messages when the caller does not name the report
pub const DEFAULT_REPORT_LABEL: &str = "Report";

/// Ordered set of named scalar values passed to a report as query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportData {
    entries: Vec<(String, Value)>,
}

impl ReportData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. `None` and `""` are accepted and dropped at
    /// serialization time.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Build from a JSON object, keeping the object's key order.
    /// Non-object values yield an empty bag.
    pub fn from_object(value: &Value) -> Self {
        let entries = value
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the non-empty entries as `application/x-www-form-urlencoded`
    pub fn to_query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if let Some(v) = param_value(value) {
                ser.append_pair(key, &v);
            }
        }
        ser.finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ReportData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Query-parameter text for a value, or `None` when the entry is dropped
fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(stringify(other)),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Full report address: `<origin><path>?<params>`
pub fn build_report_url(origin: &str, path: &str, data: &ReportData) -> String {
    format!("{}{}?{}", origin, path, data.to_query_string())
}

/// Opens pre-filled reports through a [`ReportHost`]
pub struct ReportLauncher<H: ReportHost> {
    host: H,
}

impl<H: ReportHost> ReportLauncher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Open `path` with `data` as query parameters in a new viewing context.
    ///
    /// Returns `false` when the host refuses; the failure is logged and the
    /// user is notified through [`ReportHost::alert`]. Repeated calls open
    /// repeated contexts.
    pub fn open_report(&self, path: &str, data: &ReportData, label: &str) -> bool {
        match self.try_open(path, data, label) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error opening {}: {}", label, e);
                self.host.alert(&format!(
                    "Failed to open {}: {}\n\nPlease ensure popups are allowed and try again.",
                    label, e
                ));
                false
            }
        }
    }

    /// [`open_report`](Self::open_report) with the default label
    pub fn open_report_default(&self, path: &str, data: &ReportData) -> bool {
        self.open_report(path, data, DEFAULT_REPORT_LABEL)
    }

    fn try_open(&self, path: &str, data: &ReportData, label: &str) -> Result<()> {
        let url = build_report_url(&self.host.origin(), path, data);
        log::info!("Opening {}: {}", label, url);
        self.host.open_window(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_dropped() {
        let data = ReportData::new().with("id", 5).with("note", "");
        assert_eq!(data.to_query_string(), "id=5");
    }

    #[test]
    fn test_null_and_none_are_dropped() {
        let data = ReportData::new()
            .with("a", Value::Null)
            .with("b", None::<String>)
            .with("c", Some("x"));
        assert_eq!(data.to_query_string(), "c=x");
    }

    #[test]
    fn test_falsy_scalars_other_than_empty_are_kept() {
        let data = ReportData::new().with("zero", 0).with("flag", false);
        assert_eq!(data.to_query_string(), "zero=0&flag=false");
    }

    #[test]
    fn test_insertion_order_and_encoding() {
        let data: ReportData = vec![("z", json!("a b")), ("a", json!("x&y=1"))]
            .into_iter()
            .collect();
        assert_eq!(data.to_query_string(), "z=a+b&a=x%26y%3D1");
    }

    #[test]
    fn test_arrays_join_with_commas() {
        let data = ReportData::new().with("ids", json!([1, 2, null]));
        assert_eq!(data.to_query_string(), "ids=1%2C2%2C");
    }

    #[test]
    fn test_from_object_keeps_key_order() {
        let data = ReportData::from_object(&json!({"zeta": 1, "alpha": 2}));
        assert_eq!(data.to_query_string(), "zeta=1&alpha=2");
    }

    #[test]
    fn test_whole_floats_drop_fraction() {
        let data = ReportData::new()
            .with("s", json!(32.0))
            .with("t", json!(41.5))
            .with("n", json!(-7));
        assert_eq!(data.to_query_string(), "s=32&t=41.5&n=-7");
    }

    #[test]
    fn test_from_object_takes_every_entry() {
        let data = ReportData::from_object(&json!({"id": 5, "note": ""}));
        assert_eq!(data.entries().len(), 2);
        assert_eq!(data.to_query_string(), "id=5");
        assert!(ReportData::from_object(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_url_is_origin_path_and_query() {
        let data = ReportData::new().with("id", 5);
        assert_eq!(
            build_report_url("http://app", "/report", &data),
            "http://app/report?id=5"
        );
        assert_eq!(
            build_report_url("http://app", "/report", &ReportData::new()),
            "http://app/report?"
        );
    }

    #[test]
    fn test_open_report_succeeds_on_accepting_host() {
        let launcher = ReportLauncher::new(RecordingHost::new("http://app"));
        let data = ReportData::new().with("id", 5).with("note", "");
        assert!(launcher.open_report("/report", &data, "Cube Report"));
        assert_eq!(launcher.host().opened(), vec!["http://app/report?id=5"]);
        assert!(launcher.host().alerts().is_empty());
    }

    #[test]
    fn test_open_report_reports_refusal() {
        let launcher = ReportLauncher::new(RecordingHost::blocking("http://app"));
        let data = ReportData::new().with("id", 5);
        assert!(!launcher.open_report("/report", &data, "Cube Report"));
        let alerts = launcher.host().alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Failed to open Cube Report: Popup blocked"));
        assert!(alerts[0].ends_with("Please ensure popups are allowed and try again."));
    }

    #[test]
    fn test_default_label_is_report() {
        let launcher = ReportLauncher::new(RecordingHost::blocking("http://app"));
        assert!(!launcher.open_report_default("/r", &ReportData::new()));
        assert!(launcher.host().alerts()[0].starts_with("Failed to open Report:"));
    }
}
