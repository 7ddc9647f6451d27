// src/runner.rs
//
// One full pass: login → fetch rendered report → extract → normalize →
// aggregate → export. Single-threaded, no retries; the only suspension is
// inside the session (page render, optional dialogs). Stage-fatal
// problems abort with a typed reason and the browser is released on every
// path out (Session is RAII).

use std::error::Error;
use std::path::PathBuf;

use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::params::Params;
use crate::specs::report;
use crate::stats;
use crate::store;

/// Optional progress sink for the frontend (CLI: print lines).
pub trait Progress {
    fn update_status(&mut self, _msg: &str) {}
}

/// A no-op progress sink you can pass when you don't care.
pub struct NullProgress;
impl Progress for NullProgress {}

/// What one run produced. Drop counts are informational; dropped rows
/// never abort a run.
pub struct RunSummary {
    pub rows_extracted: usize,
    pub rows_dropped: usize,
    pub records: usize,
    pub sheets_written: Vec<PathBuf>,
}

pub fn run(
    params: &Params,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    if let Some(p) = progress.as_deref_mut() {
        p.update_status("Logging in");
    }
    let session = Session::login(&params.login_url, &params.username, &params.password)?;

    if let Some(p) = progress.as_deref_mut() {
        p.update_status("Fetching roster report");
    }
    let html = session.fetch_rendered(&params.roster_url)?;
    // Everything past this point is in-memory; release the browser early.
    drop(session);

    if let Some(p) = progress.as_deref_mut() {
        p.update_status("Extracting tables");
    }
    let scan = report::extract_rows(&html);
    if scan.tables == 0 {
        return Err(ScrapeError::NoTables.into());
    }
    if scan.rows.is_empty() {
        return Err(ScrapeError::NoUsableRows { tables: scan.tables }.into());
    }
    logf!(
        "Extracted {} row(s) from {} table(s), dropped {}",
        scan.rows.len(), scan.tables, scan.dropped
    );

    let rows_extracted = scan.rows.len();
    let rows_dropped = scan.dropped;
    let rows = stats::normalize_positions(scan.rows);
    let records = stats::aggregate(&rows);

    if let Some(p) = progress.as_deref_mut() {
        p.update_status("Writing workbook");
    }
    let dest = params.workbook_path();
    let sheets_written = store::save_workbook(&records, &dest, params.format)?;
    logf!("Wrote {} sheet(s) to {}", sheets_written.len(), dest.display());

    Ok(RunSummary {
        rows_extracted,
        rows_dropped,
        records: records.len(),
        sheets_written,
    })
}
