// src/store.rs
//
// Partitioned workbook persistence. A workbook is a directory of CSV/TSV
// sheets, one per position; sheet stem = position with '/' mapped to '_'
// (the persisted format forbids '/' in sheet names). A run replaces the
// workbook wholesale: sheets are written into a `<dest>.tmp` sibling, the
// prior workbook is renamed aside to `<dest>.old`, and the new one is
// renamed into place. Every step that can lose data is a rename, so a
// failure at any point leaves a complete workbook at the destination.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::io::{BufWriter, Write};
use std::mem::take;
use std::path::{Path, PathBuf};

use crate::core::sanitize::sanitize_sheet_name;
use crate::csv::{Delim, parse_rows, write_row};
use crate::error::ScrapeError;
use crate::stats::AggregateRecord;

/// Column order is part of the persisted format.
pub const SHEET_HEADERS: [&str; 4] = ["PLAYER", "POS", "Occurrences", "Starters"];

/// One persisted sub-table: all records of a single position.
#[derive(Debug)]
pub struct Sheet {
    pub name: String,
    pub records: Vec<AggregateRecord>,
}

/// Partition records by position, in first-observation order. Within a
/// partition, stable sort by occurrences descending; equal counts keep
/// the order the aggregator produced them in.
pub fn partition(records: &[AggregateRecord]) -> Vec<Sheet> {
    let mut order: Vec<String> = Vec::new();
    let mut by_pos: HashMap<String, Vec<AggregateRecord>> = HashMap::new();
    for rec in records {
        if !by_pos.contains_key(&rec.position) {
            order.push(rec.position.clone());
        }
        by_pos.entry(rec.position.clone()).or_default().push(rec.clone());
    }

    let mut sheets = Vec::with_capacity(order.len());
    for pos in order {
        let mut recs = by_pos.remove(&pos).unwrap_or_default();
        recs.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        sheets.push(Sheet { name: sanitize_sheet_name(&pos), records: recs });
    }
    sheets
}

/// Write the whole workbook. Returns the sheet paths under `dest`.
pub fn save_workbook(
    records: &[AggregateRecord],
    dest: &Path,
    format: Delim,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let sheets = partition(records);
    let tmp = tmp_sibling(dest);
    let old = old_sibling(dest);

    // Leftovers from an earlier failed run.
    let _ = fs::remove_dir_all(&tmp);
    let _ = fs::remove_dir_all(&old);

    let written = match write_sheets(&sheets, &tmp, format) {
        Ok(w) => w,
        Err(e) => {
            let _ = fs::remove_dir_all(&tmp);
            return Err(ScrapeError::Export(e.to_string()).into());
        }
    };

    // The fully written tmp dir stays on disk if the swap fails.
    if let Err(e) = swap_into_place(&tmp, dest, &old) {
        return Err(ScrapeError::Export(format!("{}: {e}", dest.display())).into());
    }

    Ok(written.into_iter().map(|name| dest.join(name)).collect())
}

// Move `dest` aside, move `tmp` in, drop the retired copy. Only renames
// touch `dest`, and a failed second rename puts the retired copy back.
fn swap_into_place(tmp: &Path, dest: &Path, old: &Path) -> std::io::Result<()> {
    let had_prior = dest.exists();
    if had_prior {
        fs::rename(dest, old)?;
    }
    if let Err(e) = fs::rename(tmp, dest) {
        if had_prior {
            let _ = fs::rename(old, dest);
        }
        return Err(e);
    }
    if had_prior {
        let _ = fs::remove_dir_all(old);
    }
    Ok(())
}

fn write_sheets(sheets: &[Sheet], dir: &Path, format: Delim) -> Result<Vec<String>, Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let headers: Vec<String> = SHEET_HEADERS.iter().map(|h| s!(*h)).collect();

    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let filename = join!(sheet.name.as_str(), ".", format.ext());
        let file = fs::File::create(dir.join(&filename))?;
        let mut out = BufWriter::new(file);
        write_row(&mut out, &headers, format.sep())?;
        for rec in &sheet.records {
            let row = vec![
                rec.player.clone(),
                rec.position.clone(),
                rec.occurrences.to_string(),
                rec.starters.to_string(),
            ];
            write_row(&mut out, &row, format.sep())?;
        }
        out.flush()?;
        written.push(filename);
    }
    Ok(written)
}

fn tmp_sibling(dest: &Path) -> PathBuf {
    suffixed_sibling(dest, ".tmp")
}

fn old_sibling(dest: &Path) -> PathBuf {
    suffixed_sibling(dest, ".old")
}

fn suffixed_sibling(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| s!("workbook"));
    name.push_str(suffix);
    dest.with_file_name(name)
}

/// Read every sheet back. Sheets come out in filename order so the lookup
/// index is deterministic; row order inside a sheet is preserved. A
/// missing or unreadable workbook is a `NoWorkbook`, never a panic.
pub fn load_workbook(dir: &Path) -> Result<Vec<Sheet>, ScrapeError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScrapeError::NoWorkbook(format!("{}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScrapeError::NoWorkbook(e.to_string()))?.path();
        if !path.is_file() { continue; }
        match path.extension().and_then(|s| s.to_str()) {
            Some("csv") | Some("tsv") => files.push(path),
            _ => continue,
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(ScrapeError::NoWorkbook(format!("no sheets under {}", dir.display())));
    }

    let mut sheets = Vec::with_capacity(files.len());
    for path in files {
        let delim = match path.extension().and_then(|s| s.to_str()) {
            Some("tsv") => Delim::Tsv,
            _ => Delim::Csv,
        };
        let text = fs::read_to_string(&path)
            .map_err(|e| ScrapeError::NoWorkbook(format!("{}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        sheets.push(parse_sheet(name, &text, delim)?);
    }
    Ok(sheets)
}

fn parse_sheet(name: String, text: &str, delim: Delim) -> Result<Sheet, ScrapeError> {
    let mut rows = parse_rows(text, delim.sep());

    // save_workbook always writes a header line; tolerate its absence.
    let has_header = rows
        .first()
        .and_then(|r| r.first())
        .is_some_and(|c| c.eq_ignore_ascii_case(SHEET_HEADERS[0]));
    if has_header {
        rows.remove(0);
    }

    let mut records = Vec::with_capacity(rows.len());
    for mut row in rows {
        if row.len() < 4 {
            return Err(ScrapeError::NoWorkbook(format!("sheet {name}: malformed row")));
        }
        let occurrences = row[2].parse().map_err(|_| {
            ScrapeError::NoWorkbook(format!("sheet {name}: bad Occurrences value {:?}", row[2]))
        })?;
        let starters = row[3].parse().map_err(|_| {
            ScrapeError::NoWorkbook(format!("sheet {name}: bad Starters value {:?}", row[3]))
        })?;
        records.push(AggregateRecord {
            player: take(&mut row[0]),
            position: take(&mut row[1]),
            occurrences,
            starters,
        });
    }
    Ok(Sheet { name, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(player: &str, pos: &str, occurrences: u32, starters: u32) -> AggregateRecord {
        AggregateRecord { player: s!(player), position: s!(pos), occurrences, starters }
    }

    #[test]
    fn partition_names_replace_slash() {
        let sheets = partition(&[rec("A", "WR/TE", 3, 1), rec("B", "QB", 2, 2)]);
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["WR_TE", "QB"]);
    }

    #[test]
    fn partition_sort_is_stable_descending() {
        let sheets = partition(&[
            rec("A", "QB", 10, 0),
            rec("B", "QB", 10, 0),
            rec("C", "QB", 7, 0),
        ]);
        let players: Vec<&str> = sheets[0].records.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["A", "B", "C"]);

        let reordered = partition(&[
            rec("C", "QB", 7, 0),
            rec("A", "QB", 10, 0),
            rec("B", "QB", 10, 0),
        ]);
        let players: Vec<&str> =
            reordered[0].records.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["A", "B", "C"]);
    }

    #[test]
    fn tmp_sibling_stays_next_to_dest() {
        let tmp = tmp_sibling(Path::new("out/player_counts"));
        assert_eq!(tmp, PathBuf::from("out/player_counts.tmp"));
        let old = old_sibling(Path::new("out/player_counts"));
        assert_eq!(old, PathBuf::from("out/player_counts.old"));
    }

    #[test]
    fn failed_swap_restores_prior_workbook() {
        let base = std::env::temp_dir().join(format!(
            "rts_store_{}_{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::create_dir_all(&base).unwrap();
        let dest = base.join("wb");
        save_workbook(&[rec("A", "QB", 3, 1)], &dest, Delim::Csv).unwrap();

        // A tmp dir that was never written makes the second rename fail
        // after the prior workbook has already been moved aside.
        let tmp = base.join("nosuch.tmp");
        let old = old_sibling(&dest);
        assert!(swap_into_place(&tmp, &dest, &old).is_err());

        let sheets = load_workbook(&dest).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].records[0].player, "A");
        assert!(!old.exists());

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn parse_sheet_rejects_bad_counts() {
        let err = parse_sheet(s!("QB"), "PLAYER,POS,Occurrences,Starters\nA,QB,x,0\n", Delim::Csv);
        assert!(err.is_err());
    }
}
