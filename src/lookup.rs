// src/lookup.rs
//
// Read-only consumer of the exported workbook. The index is rebuilt in
// full on every load and never writes back.

use std::path::Path;

use crate::error::ScrapeError;
use crate::stats::AggregateRecord;
use crate::store;

#[derive(Debug)]
pub struct PlayerIndex {
    entries: Vec<AggregateRecord>,
}

impl PlayerIndex {
    /// Flatten every sheet into one directory of players. A player that
    /// appears in more than one position sheet keeps one entry per sheet.
    pub fn load(dir: &Path) -> Result<Self, ScrapeError> {
        let sheets = store::load_workbook(dir)?;
        let mut entries = Vec::new();
        for sheet in sheets {
            entries.extend(sheet.records);
        }
        Ok(Self { entries })
    }

    /// Build an index directly from records (tests, embedding).
    pub fn from_records(entries: Vec<AggregateRecord>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AggregateRecord] {
        &self.entries
    }

    /// All player names containing `query` as a case-insensitive
    /// substring, in index iteration order. Cheap enough to re-run on
    /// every keystroke; no caching.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let q = query.to_lowercase();
        self.entries
            .iter()
            .filter(|r| r.player.to_lowercase().contains(&q))
            .map(|r| r.player.as_str())
            .collect()
    }

    /// First record whose name matches exactly (case-sensitive). For a
    /// multi-position player the first entry in index order wins; callers
    /// that need every position should scan `entries()` instead.
    pub fn detail(&self, player: &str) -> Option<&AggregateRecord> {
        self.entries.iter().find(|r| r.player == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(player: &str, pos: &str, occurrences: u32, starters: u32) -> AggregateRecord {
        AggregateRecord { player: s!(player), position: s!(pos), occurrences, starters }
    }

    fn index() -> PlayerIndex {
        PlayerIndex::from_records(vec![
            rec("Josh Allen", "QB", 14, 12),
            rec("Allen Lazard", "WR/TE", 6, 1),
            rec("Taysom Hill", "QB", 3, 0),
            rec("Taysom Hill", "WR/TE", 5, 2),
        ])
    }

    #[test]
    fn search_is_case_insensitive_substring_in_index_order() {
        let ix = index();
        assert_eq!(ix.search("allen"), vec!["Josh Allen", "Allen Lazard"]);
        assert_eq!(ix.search("ALLEN"), vec!["Josh Allen", "Allen Lazard"]);
    }

    #[test]
    fn search_no_match_is_empty() {
        assert!(index().search("zzz").is_empty());
    }

    #[test]
    fn detail_is_exact_and_case_sensitive() {
        let ix = index();
        assert_eq!(ix.detail("Josh Allen").unwrap().occurrences, 14);
        assert!(ix.detail("josh allen").is_none());
        assert!(ix.detail("Josh").is_none());
    }

    #[test]
    fn detail_multi_position_returns_first_entry() {
        let ix = index();
        let rec = ix.detail("Taysom Hill").unwrap();
        assert_eq!(rec.position, "QB");
        assert_eq!(rec.occurrences, 3);
    }
}
