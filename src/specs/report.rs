// src/specs/report.rs
//
// Roster report extraction. The page renders one or more tables (paginated
// or per-team blocks); every one of them contributes rows. Column order is
// not stable between tables, so cells are mapped by header *name*, never
// by fixed position.

use crate::core::html::{inner_after_open_tag, next_tag_block_ci, strip_tags, table_blocks};
use crate::core::sanitize::normalize_entities;

// Required report columns, matched case-insensitively against <th> text.
const COL_PLAYER: &str = "PLAYER";
const COL_POS: &str = "POS";
const COL_LINEUP: &str = "LINEUP";

/// One fielded roster entry. A player recurs across many rows, one per
/// roster-week entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRow {
    pub player: String,
    pub position: String,
    pub lineup_status: String,
}

/// Extraction result. `tables` lets the caller tell "no tables at all"
/// apart from "tables present but nothing usable"; those are distinct
/// fatal conditions upstream.
#[derive(Debug)]
pub struct TableScan {
    pub tables: usize,
    pub rows: Vec<RosterRow>,
    pub dropped: usize,
}

/// Pull roster rows out of every table in the document. Rows that fail to
/// populate all three required fields are dropped, never partially kept.
pub fn extract_rows(doc: &str) -> TableScan {
    let blocks = table_blocks(doc);
    let tables = blocks.len();

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for table in blocks {
        let columns = read_column_map(table);
        scan_table(table, &columns, &mut rows, &mut dropped);
    }

    if dropped > 0 {
        logd!("Dropped {dropped} report row(s) missing required fields");
    }
    TableScan { tables, rows, dropped }
}

/// Cell indexes of the required columns, valid for one table only.
#[derive(Default)]
struct ColumnMap {
    player: Option<usize>,
    pos: Option<usize>,
    lineup: Option<usize>,
}

/// Build the column map from this table's <th> cells. A table without
/// headers gets an empty map: none of its rows can resolve the required
/// fields, so they all drop.
fn read_column_map(table: &str) -> ColumnMap {
    let mut map = ColumnMap::default();
    let mut pos = 0usize;
    let mut col = 0usize;
    while let Some((th_s, th_e)) = next_tag_block_ci(table, "<th", "</th>", pos) {
        let text = strip_tags(normalize_entities(&inner_after_open_tag(&table[th_s..th_e])));
        if text.eq_ignore_ascii_case(COL_PLAYER) {
            map.player = Some(col);
        } else if text.eq_ignore_ascii_case(COL_POS) {
            map.pos = Some(col);
        } else if text.eq_ignore_ascii_case(COL_LINEUP) {
            map.lineup = Some(col);
        }
        pos = th_e;
        col += 1;
    }
    map
}

fn scan_table(table: &str, columns: &ColumnMap, out: &mut Vec<RosterRow>, dropped: &mut usize) {
    let mut pos = 0usize;
    let mut first = true;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(table, "<tr", "</tr>", pos) {
        let tr = &table[tr_s..tr_e];
        pos = tr_e;

        // The source report's first row is always a header row, even when
        // it carries no <th> markup. Quirk of the site; replicate it.
        if first {
            first = false;
            continue;
        }

        let mut cells = Vec::new();
        let mut td_pos = 0usize;
        while let Some((td_s, td_e)) = next_tag_block_ci(tr, "<td", "</td>", td_pos) {
            let inner = inner_after_open_tag(&tr[td_s..td_e]);
            cells.push(strip_tags(normalize_entities(&inner)));
            td_pos = td_e;
        }
        if cells.is_empty() {
            continue; // spacer/decoration row
        }

        match build_row(columns, &cells) {
            Some(row) => out.push(row),
            None => *dropped += 1,
        }
    }
}

/// A row is kept only when player, position and lineup status all resolve
/// to non-empty cells through this table's column map.
fn build_row(columns: &ColumnMap, cells: &[String]) -> Option<RosterRow> {
    let field = |ix: Option<usize>| -> Option<&String> {
        let cell = cells.get(ix?)?;
        if cell.is_empty() { None } else { Some(cell) }
    };
    Some(RosterRow {
        player: field(columns.player)?.clone(),
        position: field(columns.pos)?.clone(),
        lineup_status: field(columns.lineup)?.clone(),
    })
}
