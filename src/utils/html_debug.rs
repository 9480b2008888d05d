// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Patterns highlighted in the annotated page written by `--debug`.
pub const DEBUG_PATTERNS: &[(&str, &str)] = &[
    (r#"(?is)<span[^>]*class="[^"]*mw-headline[^"]*"[^>]*id="[^"]+"[^>]*>.*?</span>"#, "headline"),
    (r#"(?is)<div[^>]*class="[^"]*\bmw-heading\b[^"]*"[^>]*>\s*<h[23][^>]*\bid="[^"]+"[^>]*>"#, "headline"),
    (r"(?i)<h[23][^>]*>", "boundary"),
    (r#"(?i)<table[^>]*class="[^"]*(?:wikitable|tracklist)[^"]*"[^>]*>"#, "table"),
    (r"(?i)<table[^>]*>", "other-table"),
];

/// Wraps the given byte ranges of `html` in highlight spans and writes the result.
/// Ranges that overlap an earlier highlight are skipped.
pub fn save_debug_html(html: &str, filename: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let debug_html = render_debug_html(html, highlights);

    let mut file = File::create(filename)?;
    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}

fn render_debug_html(html: &str, highlights: &[(usize, usize, &str)]) -> String {
    // Add debug styling in head
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-headline { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-boundary { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-table { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| (h.0, std::cmp::Reverse(h.1)));

    let mut last_pos = 0;
    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > html.len() {
            tracing::trace!("Skipping overlapping highlight {}-{} ({})", start, end, highlight_type);
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "headline" => "highlight-headline",
            "boundary" => "highlight-boundary",
            "table" => "highlight-table",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Creates a debug version of an HTML document with locations of specified regex patterns highlighted
pub fn create_debug_html(html: &str, filename: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    let highlights = collect_highlights(html, patterns)?;
    save_debug_html(html, filename, &highlights)
}

fn collect_highlights<'p>(html: &str, patterns: &[(&str, &'p str)]) -> Result<Vec<(usize, usize, &'p str)>, AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    Ok(highlights)
}
