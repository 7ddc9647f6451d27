// src/error.rs
//
// Stage-fatal failure taxonomy for one pipeline run. Per-row problems are
// absorbed where they occur (dropped + logged); anything here aborts the
// whole run and leaves prior persisted output untouched.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScrapeError {
    /// Login form fields absent, meaning the site markup changed.
    LoginFieldsMissing(String),
    /// Navigation / render failure on the authenticated session.
    Fetch(String),
    /// Report page contained no <table> at all.
    NoTables,
    /// Tables were found, but no row populated all required fields.
    NoUsableRows { tables: usize },
    /// Workbook destination not writable.
    Export(String),
    /// Lookup side: workbook missing or unreadable.
    NoWorkbook(String),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::LoginFieldsMissing(field) => {
                write!(f, "login field {field:?} not found; site markup may have changed")
            }
            ScrapeError::Fetch(why) => write!(f, "fetch failed: {why}"),
            ScrapeError::NoTables => write!(f, "no tables found on the report page"),
            ScrapeError::NoUsableRows { tables } => {
                write!(f, "{tables} table(s) found but no usable rows")
            }
            ScrapeError::Export(why) => write!(f, "export failed: {why}"),
            ScrapeError::NoWorkbook(why) => write!(f, "no data available: {why}"),
        }
    }
}

impl Error for ScrapeError {}
