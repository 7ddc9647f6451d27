// src/stats.rs
//
// Position bucketing and per-player occurrence counts.

use std::collections::HashMap;

use crate::params::STARTER;
use crate::specs::report::RosterRow;

/// One (player, position) tally across all processed roster entries.
/// `starters <= occurrences` always; `occurrences >= 1` by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateRecord {
    pub player: String,
    pub position: String,
    pub occurrences: u32,
    pub starters: u32,
}

/// WR and TE slots are roster-interchangeable on the source site, so they
/// report as one "WR/TE" bucket. No other position is rewritten.
pub fn normalize_positions(mut rows: Vec<RosterRow>) -> Vec<RosterRow> {
    for row in &mut rows {
        if row.position == "WR" || row.position == "TE" {
            row.position = s!("WR/TE");
        }
    }
    rows
}

/// Group rows by (player, position). `occurrences` is the group size;
/// `starters` counts the subset whose lineup status is exactly `"Starter"`.
/// Every pair observed at least once gets a record; a player who plays
/// but never starts comes out with `starters: 0`, never absent. Records
/// keep first-appearance order, which the exporter's stable sort relies on
/// for tie-breaking.
pub fn aggregate(rows: &[RosterRow]) -> Vec<AggregateRecord> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<AggregateRecord> = Vec::new();

    for row in rows {
        let key = (row.player.clone(), row.position.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            out.push(AggregateRecord {
                player: row.player.clone(),
                position: row.position.clone(),
                occurrences: 0,
                starters: 0,
            });
            out.len() - 1
        });
        out[slot].occurrences += 1;
        if row.lineup_status == STARTER {
            out[slot].starters += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, pos: &str, lineup: &str) -> RosterRow {
        RosterRow {
            player: s!(player),
            position: s!(pos),
            lineup_status: s!(lineup),
        }
    }

    #[test]
    fn wr_and_te_merge_into_one_bucket() {
        let rows = normalize_positions(vec![
            row("A", "WR", "Starter"),
            row("B", "TE", "Bench"),
            row("C", "QB", "Starter"),
        ]);
        let positions: Vec<&str> = rows.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["WR/TE", "WR/TE", "QB"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let rows = vec![row("A", "WR", "Starter"), row("B", "K", "Bench")];
        let once = normalize_positions(rows);
        let twice = normalize_positions(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn counts_occurrences_and_starters_per_pair() {
        let rows = vec![
            row("P1", "QB", "Starter"),
            row("P1", "QB", "Bench"),
            row("P1", "QB", "Starter"),
            row("P2", "QB", "Bench"),
        ];
        let recs = aggregate(&rows);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0], AggregateRecord {
            player: s!("P1"), position: s!("QB"), occurrences: 3, starters: 2,
        });
        assert_eq!(recs[1], AggregateRecord {
            player: s!("P2"), position: s!("QB"), occurrences: 1, starters: 0,
        });
    }

    #[test]
    fn never_started_player_still_gets_a_record_with_zero() {
        // The bench-only player must appear, with a typed 0, not be omitted.
        let rows = vec![row("BenchGuy", "RB", "Bench"), row("BenchGuy", "RB", "Bench")];
        let recs = aggregate(&rows);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].occurrences, 2);
        assert_eq!(recs[0].starters, 0);
    }

    #[test]
    fn starter_match_is_exact_literal() {
        let rows = vec![
            row("A", "QB", "starter"),
            row("A", "QB", "STARTER"),
            row("A", "QB", "Starter"),
        ];
        let recs = aggregate(&rows);
        assert_eq!(recs[0].occurrences, 3);
        assert_eq!(recs[0].starters, 1);
    }

    #[test]
    fn starters_never_exceed_occurrences() {
        let rows = vec![
            row("A", "QB", "Starter"),
            row("A", "QB", "Starter"),
            row("B", "WR/TE", "Bench"),
        ];
        for rec in aggregate(&rows) {
            assert!(rec.starters <= rec.occurrences);
            assert!(rec.occurrences >= 1);
        }
    }

    #[test]
    fn same_player_two_positions_stays_two_records() {
        let rows = vec![row("Taysom Hill", "QB", "Starter"), row("Taysom Hill", "WR/TE", "Bench")];
        let recs = aggregate(&rows);
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn records_keep_first_appearance_order() {
        let rows = vec![
            row("C", "QB", "Bench"),
            row("A", "QB", "Bench"),
            row("C", "QB", "Bench"),
            row("B", "QB", "Bench"),
        ];
        let recs = aggregate(&rows);
        let players: Vec<&str> = recs.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["C", "A", "B"]);
    }
}
