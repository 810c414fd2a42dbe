//! Backend API address resolution.
//!
//! The base address is read once from `LAB_API_URL` (falling back to the local
//! development backend) and every endpoint is joined onto it with exactly one
//! slash at the seam.

use std::env;

/// Environment variable holding the backend API base address
pub const API_URL_ENV: &str = "LAB_API_URL";

/// Base address used when `LAB_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Join `base` and `endpoint` into an absolute address.
///
/// Trailing slashes on `base` are stripped and `endpoint` is given a single
/// leading slash when it lacks one. No encoding or validation is applied.
///
/// ```
/// assert_eq!(labclient::api::resolve("http://x/api", "foo"), "http://x/api/foo");
/// assert_eq!(labclient::api::resolve("http://x/api///", "/foo"), "http://x/api/foo");
/// ```
pub fn resolve(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}

/// Configured backend base address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base: String,
}

impl ApiConfig {
    /// Use an explicit base address (trailing slashes are stripped)
    pub fn new(base: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Read the base address from `LAB_API_URL`, or use the default
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => Self::new(base.trim()),
            _ => {
                log::debug!("{} not set, using {}", API_URL_ENV, DEFAULT_API_URL);
                Self::new(DEFAULT_API_URL)
            }
        }
    }

    /// The base address without trailing slashes
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute address of `endpoint` under this base
    pub fn api_url(&self, endpoint: &str) -> String {
        resolve(&self.base, endpoint)
    }

    /// Address of the details endpoint for a test request
    pub fn test_details_url(&self, test_request_id: impl std::fmt::Display) -> String {
        self.api_url(&format!("/test-requests/{}/details", test_request_id))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
