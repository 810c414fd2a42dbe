//! Lab client
//!
//! Client-side helpers for a concrete-testing laboratory backend: resolving
//! API addresses, opening pre-filled report views, and fetching test results
//! with their embedded JSON columns decoded.
//!
//! # Components
//!
//! - [`api`]: base address configuration and endpoint joining
//! - [`report`]: query-string building and report launching through a [`host::ReportHost`]
//! - [`validate`]: required-field and completeness checks run before launching
//! - [`retriever`]: async details fetch normalized into a [`bundle::TestDataBundle`]
//!
//! # Example
//!
//! ```no_run
//! use labclient::{ClientConfig, TestDataRetriever};
//!
//! # async fn run() -> labclient::Result<()> {
//! let retriever = TestDataRetriever::new(ClientConfig::from_env())?;
//! let bundle = retriever.fetch_complete_test_data(42).await?;
//! let check = bundle.completeness();
//! if !check.complete {
//!     println!("{}", check.message);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod api;
pub mod bundle;
pub mod host;
pub mod report;
pub mod validate;

// HTTP-backed retriever
#[cfg(feature = "http")]
pub mod retriever;

pub use api::ApiConfig;
pub use bundle::TestDataBundle;
pub use host::{RecordingHost, ReportHost, SystemBrowserHost};
pub use report::{build_report_url, ReportData, ReportLauncher};
pub use validate::{check_report_data_completeness, validate_report_data, Completeness, ValidationResult};

#[cfg(feature = "http")]
pub use retriever::TestDataRetriever;

/// Configuration for talking to the lab backend
///
/// The defaults point at the local development backend and leave the request
/// timeout to the transport.
///
/// # Examples
///
/// ```
/// let cfg = labclient::ClientConfig::default();
/// assert_eq!(cfg.api.base(), "http://localhost:5000/api");
/// assert!(cfg.timeout_ms.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base address
    pub api: ApiConfig,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Request timeout in milliseconds (`None` => transport default)
    pub timeout_ms: Option<u64>,
    /// Extra HTTP headers sent with every request
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Defaults with the base address taken from `LAB_API_URL`
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            user_agent: format!("labclient/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: None,
            headers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base(), "http://localhost:5000/api");
        assert!(config.user_agent.starts_with("labclient/"));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_custom_base() {
        let config = ClientConfig {
            api: ApiConfig::new("https://lab.example.com/api/"),
            ..Default::default()
        };
        assert_eq!(config.api.api_url("customers"), "https://lab.example.com/api/customers");
    }
}
