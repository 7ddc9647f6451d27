// src/params.rs
use std::path::PathBuf;
use crate::csv::Delim;

// Portal
pub const LOGIN_URL: &str = "https://www.rtsports.com/login";
pub const USERNAME_FIELD: &str = "ACCOUNTID";
pub const PASSWORD_FIELD: &str = "PASSWORD";

// Session timing
pub const NAV_TIMEOUT_SECS: u64 = 15;
pub const DIALOG_WAIT_MS: u64 = 1_000; // per optional post-login dialog
pub const DIALOG_POLL_MS: u64 = 50;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_WORKBOOK: &str = "player_counts";

/// Exact lineup value that marks an active (non-bench) slot.
pub const STARTER: &str = "Starter";

#[derive(Clone)]
pub struct Params {
    pub username: String,     // portal account
    pub password: String,
    pub roster_url: String,   // report page to scrape
    pub login_url: String,    // overridable for testing
    pub out: Option<PathBuf>, // workbook directory
    pub format: Delim,
}

impl Params {
    pub fn new() -> Self {
        Self {
            username: s!(),
            password: s!(),
            roster_url: s!(),
            login_url: s!(LOGIN_URL),
            out: None,
            format: Delim::Csv,
        }
    }

    /// Destination directory for the exported workbook.
    pub fn workbook_path(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_WORKBOOK))
    }
}

impl Default for Params {
    fn default() -> Self { Self::new() }
}
