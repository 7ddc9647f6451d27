// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Sheet name for a position. The persisted format forbids '/' in sheet
/// names; nothing else is rewritten.
pub fn sanitize_sheet_name(position: &str) -> String {
    position.replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_name_maps_slash_only() {
        assert_eq!(sanitize_sheet_name("WR/TE"), "WR_TE");
        assert_eq!(sanitize_sheet_name("QB"), "QB");
        assert_eq!(sanitize_sheet_name("D/ST"), "D_ST");
    }

    #[test]
    fn normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  a \t b\n c "), "a b c");
    }
}
