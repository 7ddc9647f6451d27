// src/core/html.rs
//
// Hand-rolled, case-insensitive tag-block scanning. Good enough for the
// one report layout we read; not a general HTML parser.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Find the next `<o ...> ... </c>` block at or after `from`.
/// Returns (start of open tag, end just past close tag).
pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

/// Content between a block's open tag and its close tag.
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Every `<table> ... </table>` block in document order. The report may
/// render more than one (paginated or per-team); all of them matter.
pub fn table_blocks(doc: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((s, e)) = next_tag_block_ci(doc, "<table", "</table>", pos) {
        out.push(&doc[s..e]);
        pos = e;
    }
    out
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_blocks_finds_all_in_order() {
        let doc = "<p>x</p><TABLE id=a><tr></tr></TABLE> noise <table><tr></tr></table>";
        let blocks = table_blocks(doc);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("id=a"));
    }

    #[test]
    fn table_blocks_empty_doc() {
        assert!(table_blocks("<div>no tables here</div>").is_empty());
    }

    #[test]
    fn next_tag_block_is_case_insensitive() {
        let s = "<TR><td>x</td></TR>";
        let (a, b) = next_tag_block_ci(s, "<tr", "</tr>", 0).unwrap();
        assert_eq!(&s[a..b], s);
    }

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("<b>Josh\n  Allen</b>"), "Josh Allen");
    }
}
