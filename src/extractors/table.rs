// src/extractors/table.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// --- Constants ---
// Length of the text snippet kept per table in diagnostics
const TABLE_SNIPPET_CHARS: usize = 200;

// --- Regex Patterns (Lazy Static) ---
static DATA_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<table[^>]*class="[^"]*(?:wikitable|tracklist)[^"]*"[^>]*>(.*?)</table>"#)
        .expect("Failed to compile DATA_TABLE_RE")
});

static ANY_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<table(?:\s[^>]*)?>(.*?)</table>").expect("Failed to compile ANY_TABLE_RE")
});

static ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr>").expect("Failed to compile ROW_RE")
});

static CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<t[hd](?:\s[^>]*)?>(.*?)</t[hd]>").expect("Failed to compile CELL_RE")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Failed to compile TAG_RE"));

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").expect("Failed to compile REFERENCE_RE"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

const EDIT_MARKER: &str = "[edit]";

// --- Data Structures ---

/// Rows of cleaned cell text extracted from one section's data table.
/// Row 0 is conventionally the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub section_id: String,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// All rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// A header-only or empty table is a valid result with no data.
    pub fn is_empty_data(&self) -> bool {
        self.data_rows().is_empty()
    }

    /// Widest row, since ragged rows are kept as-is.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

// --- Table Location ---

/// Inner HTML of the first table in the section body whose class contains
/// "wikitable" or "tracklist" (case-insensitive), up to the first `</table>`.
pub fn find_data_table(section_body: &str) -> Option<&str> {
    let inner = DATA_TABLE_RE.captures(section_body)?.get(1)?.as_str();
    tracing::debug!("Found data table ({} bytes)", inner.len());
    Some(inner)
}

/// Inner HTML of every `<table>` in the section body regardless of class.
/// Only a diagnostic aid for when [`find_data_table`] finds nothing.
pub fn list_all_tables(section_body: &str) -> Vec<&str> {
    ANY_TABLE_RE
        .captures_iter(section_body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Short plain-text preview of a table for diagnostics: tags become spaces,
/// whitespace is collapsed, and the result is cut to a fixed length.
pub fn table_snippet(table_html: &str) -> String {
    let text = TAG_RE.replace_all(table_html, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().chars().take(TABLE_SNIPPET_CHARS).collect()
}

// --- Row / Cell Extraction ---

/// Splits table HTML into rows of cleaned cell text. Ragged rows are not padded.
pub fn extract_rows(table_html: &str) -> Vec<Vec<String>> {
    let rows: Vec<Vec<String>> = ROW_RE
        .captures_iter(table_html)
        .filter_map(|row| row.get(1))
        .map(|row| {
            CELL_RE
                .captures_iter(row.as_str())
                .filter_map(|cell| cell.get(1))
                .map(|cell| clean_cell(cell.as_str()))
                .collect()
        })
        .collect();

    tracing::debug!("Extracted {} rows from table", rows.len());
    rows
}

/// Strips tags, `[n]` reference markers and `[edit]` markers, then trims.
/// Character references such as `&amp;` are left undecoded.
///
/// Marker removal repeats until nothing changes, so input such as
/// `[[edit]1]` does not leave a fresh `[1]` behind and cleaning an already
/// cleaned cell is a no-op.
pub fn clean_cell(raw: &str) -> String {
    let mut text = TAG_RE.replace_all(raw, "").into_owned();

    loop {
        let without_refs = REFERENCE_RE.replace_all(&text, "");
        let cleaned = without_refs.replace(EDIT_MARKER, "");
        if cleaned == text {
            break;
        }
        text = cleaned;
    }

    text.trim().to_string()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_reference_is_stripped() {
        let body = r#"<p>The soundtrack was composed by Deva.</p>
<table class="wikitable"><tr><th>No.</th><th>Title</th></tr><tr><td>1</td><td>"Intro"[1]</td></tr></table>"#;
        let table = find_data_table(body).expect("table should be found");
        assert_eq!(
            extract_rows(table),
            vec![
                vec!["No.".to_string(), "Title".to_string()],
                vec!["1".to_string(), "\"Intro\"".to_string()],
            ]
        );
    }

    #[test]
    fn test_find_data_table_matches_class_substring() {
        let body = r#"<table class="infobox"><tr><td>skip</td></tr></table>
<TABLE class="tracklist plainrowheaders"><tr><td>keep</td></tr></TABLE>"#;
        let table = find_data_table(body).unwrap();
        assert!(table.contains("keep"));
        assert!(!table.contains("skip"));

        let body = r#"<table class="sortable WikiTable"><tr><td>x</td></tr></table>"#;
        assert_eq!(find_data_table(body), Some("<tr><td>x</td></tr>"));
    }

    #[test]
    fn test_no_table_in_section() {
        let body = "<p>No soundtrack was released.</p>";
        assert_eq!(find_data_table(body), None);
        assert!(list_all_tables(body).is_empty());
    }

    #[test]
    fn test_list_all_tables_ignores_class() {
        let body = r#"<table class="infobox"><tr><td>a</td></tr></table><p>x</p><table><tr><td>b</td></tr></table>"#;
        assert_eq!(find_data_table(body), None);
        assert_eq!(list_all_tables(body), vec!["<tr><td>a</td></tr>", "<tr><td>b</td></tr>"]);
    }

    #[test]
    fn test_extract_rows_shape_and_ragged_rows() {
        let html = "<tr><th>No.</th><th>Title</th><th>Length</th></tr>\n\
                    <tr><td>1</td><td>A</td><td>3:01</td></tr>\n\
                    <tr><td>2</td><td>B</td></tr>";
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[2], vec!["2", "B"]);
    }

    #[test]
    fn test_extract_rows_spans_newlines_and_attributes() {
        let html = r##"<tbody><TR style="x">
<TD class="tracklist-number">1.</TD>
<td style="vertical-align:top">"<a href="/wiki/Song">Song</a>"<sup class="reference"><a href="#cite_note-3">[3]</a></sup></td>
</TR></tbody>"##;
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["1.".to_string(), "\"Song\"".to_string()]]);
    }

    #[test]
    fn test_header_only_table_is_empty_data() {
        let rows = extract_rows("<tr><th>No.</th><th>Title</th></tr>");
        let table = Table { section_id: "Music".to_string(), rows };
        assert_eq!(table.header().map(|h| h.len()), Some(2));
        assert!(table.is_empty_data());

        let table = Table { section_id: "Music".to_string(), rows: extract_rows("") };
        assert!(table.header().is_none());
        assert!(table.is_empty_data());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_clean_cell_pipeline() {
        assert_eq!(clean_cell("  <b>Title</b>[12] [edit] "), "Title");
        assert_eq!(clean_cell("<i>A</i> &amp; <i>B</i>"), "A &amp; B");
        assert_eq!(clean_cell("[a] stays"), "[a] stays");
        assert_eq!(clean_cell("[Edit] stays"), "[Edit] stays");
    }

    #[test]
    fn test_clean_cell_is_idempotent() {
        let samples = [
            "<td>\"Intro\"[1]</td>",
            "[[edit]1]",
            "[[1]2]",
            "[[edit]edit]",
            " <a href=\"x\">Link</a> [edit]\n",
            "<<b>>x",
            "plain",
            "",
        ];
        for raw in samples {
            let once = clean_cell(raw);
            assert_eq!(clean_cell(&once), once, "not idempotent for {:?}", raw);
        }
        assert_eq!(clean_cell("[[edit]1]"), "");
    }

    #[test]
    fn test_table_snippet() {
        let snippet = table_snippet("<tr>\n<td>1</td>  <td>Song</td></tr>");
        assert_eq!(snippet, "1 Song");
        let long = format!("<tr><td>{}</td></tr>", "x".repeat(500));
        assert_eq!(table_snippet(&long).chars().count(), TABLE_SNIPPET_CHARS);
    }
}
