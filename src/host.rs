//! Report host surface: where report URLs are displayed.
//!
//! A host knows its own origin, can be asked to open a new top-level viewing
//! context, and can show the user a blocking notification. The system host
//! hands URLs to the platform's default browser; the recording host keeps
//! everything in memory for tests.

use crate::{Error, Result};
use std::env;
use std::process::{Command, Stdio};
use std::sync::Mutex;

/// Environment variable holding the origin reports are served from
pub const APP_ORIGIN_ENV: &str = "LAB_APP_ORIGIN";

/// Origin used when `LAB_APP_ORIGIN` is unset
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";

/// Environment able to display report URLs
pub trait ReportHost: Send + Sync {
    /// Origin (scheme, host and port) report paths are relative to
    fn origin(&self) -> String;

    /// Open `url` in a new viewing context. An error means the host refused.
    fn open_window(&self, url: &str) -> Result<()>;

    /// Show a blocking notification to the user
    fn alert(&self, message: &str);
}

/// Opens reports with the platform's default browser
#[derive(Debug, Clone)]
pub struct SystemBrowserHost {
    origin: String,
    /// Opener program followed by its leading arguments; the URL is appended
    opener: Vec<String>,
}

impl SystemBrowserHost {
    pub fn new(origin: impl AsRef<str>) -> Self {
        Self {
            origin: origin.as_ref().trim_end_matches('/').to_string(),
            opener: default_opener(),
        }
    }

    /// Read the origin from `LAB_APP_ORIGIN`, or use the default
    pub fn from_env() -> Self {
        match env::var(APP_ORIGIN_ENV) {
            Ok(origin) if !origin.trim().is_empty() => Self::new(origin.trim()),
            _ => Self::new(DEFAULT_APP_ORIGIN),
        }
    }

    /// Replace the platform opener with `program args.. <url>`
    pub fn with_opener<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opener = std::iter::once(program.into())
            .chain(args.into_iter().map(Into::into))
            .collect();
        self
    }

    fn command(&self, url: &str) -> Result<Command> {
        let (program, args) = self
            .opener
            .split_first()
            .ok_or_else(|| Error::ConfigError("No browser opener configured".to_string()))?;
        let mut cmd = Command::new(program);
        cmd.args(args).arg(url);
        Ok(cmd)
    }
}

fn default_opener() -> Vec<String> {
    let parts: &[&str] = if cfg!(target_os = "windows") {
        &["cmd", "/C", "start", ""]
    } else if cfg!(target_os = "macos") {
        &["open"]
    } else {
        &["xdg-open"]
    };
    parts.iter().map(|s| s.to_string()).collect()
}

impl Default for SystemBrowserHost {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ReportHost for SystemBrowserHost {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    /// Runs the opener to completion; a non-zero exit counts as a refusal.
    fn open_window(&self, url: &str) -> Result<()> {
        let status = self
            .command(url)?
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| Error::LaunchError(format!("Could not open a browser window: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            Err(Error::LaunchError(format!(
                "Could not open a browser window: opener exited with {}",
                code
            )))
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// In-memory host that records opened URLs and alerts
pub struct RecordingHost {
    origin: String,
    refuse: bool,
    opened: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingHost {
    /// A host that accepts every open request
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            refuse: false,
            opened: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    /// A host that refuses every open request, like a popup blocker
    pub fn blocking(origin: impl Into<String>) -> Self {
        Self {
            refuse: true,
            ..Self::new(origin)
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl ReportHost for RecordingHost {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn open_window(&self, url: &str) -> Result<()> {
        if self.refuse {
            return Err(Error::LaunchError(
                "Popup blocked. Please allow popups for this site.".to_string(),
            ));
        }
        if let Ok(mut g) = self.opened.lock() {
            g.push(url.to_string());
        }
        Ok(())
    }

    fn alert(&self, message: &str) {
        if let Ok(mut g) = self.alerts.lock() {
            g.push(message.to_string());
        }
    }
}
