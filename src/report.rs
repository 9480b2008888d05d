// src/report.rs
//! Human-readable console output for extraction results and diagnostics.

use std::fmt::Write;
use crate::extractors::table::Table;
use crate::utils::error::ExtractError;
use crate::wiki::models::AlbumMetadata;

/// Section id, row counts, header and the first `sample` data rows.
pub fn format_table_report(table: &Table, sample: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Section found: {}", table.section_id);
    let _ = writeln!(out, "Table rows: {} ({} data rows)", table.rows.len(), table.data_rows().len());

    if let Some(header) = table.header() {
        let _ = writeln!(out, "Header: {:?}", header);
    }

    if table.is_empty_data() {
        let _ = writeln!(out, "No data rows.");
        return out;
    }

    let shown = sample.min(table.data_rows().len());
    let _ = writeln!(out, "First {} data rows:", shown);
    for (i, row) in table.data_rows().iter().take(shown).enumerate() {
        let _ = writeln!(out, "Row {}: {:?}", i + 1, row);
    }
    out
}

/// Diagnostic dump for a failed extraction: the available headline ids, or
/// the tables that were found in the section instead.
pub fn format_error_report(err: &ExtractError) -> String {
    let mut out = String::new();
    match err {
        ExtractError::SectionNotFound { candidates, available } => {
            let _ = writeln!(out, "Section not found (tried {}).", candidates.join(", "));
            if available.is_empty() {
                let _ = writeln!(out, "No headline ids on the page.");
            } else {
                let _ = writeln!(out, "Available sections:");
                for (i, id) in available.iter().enumerate() {
                    let _ = writeln!(out, "Section {}: id=\"{}\"", i + 1, id);
                }
            }
        }
        ExtractError::TableNotFound { section_id, tables } => {
            let _ = writeln!(out, "Section found: {}", section_id);
            let _ = writeln!(out, "No wikitable/tracklist table in section.");
            let _ = writeln!(out, "Number of tables in section: {}", tables.len());
            for (i, snippet) in tables.iter().enumerate() {
                let _ = writeln!(out, "Table {}: {:?}", i + 1, snippet);
            }
        }
    }
    out
}

pub fn format_album_report(album: &AlbumMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Album: {}", album.album);
    if !album.music_director.is_empty() {
        let _ = writeln!(out, "Music director: {}", album.music_director);
    }
    for track in &album.tracks {
        let _ = write!(out, "{:>2}. {}", track.track_number, track.title);
        if !track.artist.is_empty() {
            let _ = write!(out, " - {}", track.artist);
        }
        if track.duration_seconds > 0 {
            let _ = write!(out, " ({}:{:02})", track.duration_seconds / 60, track.duration_seconds % 60);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::models::TrackMetadata;

    fn sample_table() -> Table {
        Table {
            section_id: "Track_listing".to_string(),
            rows: vec![
                vec!["No.".to_string(), "Title".to_string()],
                vec!["1".to_string(), "Intro".to_string()],
                vec!["2".to_string(), "Theme".to_string()],
            ],
        }
    }

    #[test]
    fn test_table_report_limits_sample() {
        let report = format_table_report(&sample_table(), 1);
        assert!(report.contains("Section found: Track_listing"));
        assert!(report.contains("Table rows: 3 (2 data rows)"));
        assert!(report.contains("Row 1: [\"1\", \"Intro\"]"));
        assert!(!report.contains("Theme"));
    }

    #[test]
    fn test_table_report_empty_data() {
        let mut table = sample_table();
        table.rows.truncate(1);
        assert!(format_table_report(&table, 3).contains("No data rows."));
    }

    #[test]
    fn test_error_report_lists_ids_and_tables() {
        let report = format_error_report(&ExtractError::SectionNotFound {
            candidates: vec!["Soundtrack".to_string(), "Music".to_string()],
            available: vec!["Plot".to_string(), "Cast".to_string()],
        });
        assert!(report.contains("tried Soundtrack, Music"));
        assert!(report.contains("Section 2: id=\"Cast\""));

        let report = format_error_report(&ExtractError::TableNotFound {
            section_id: "Music".to_string(),
            tables: vec!["Recorded 1976".to_string()],
        });
        assert!(report.contains("Number of tables in section: 1"));
        assert!(report.contains("Table 1: \"Recorded 1976\""));
    }

    #[test]
    fn test_album_report() {
        let album = AlbumMetadata {
            album: "Annakili".to_string(),
            music_director: "Ilaiyaraaja".to_string(),
            tracks: vec![TrackMetadata {
                title: "Annakili Unnai Theduthe".to_string(),
                artist: "S. Janaki".to_string(),
                track_number: 1,
                duration_seconds: 271,
                ..TrackMetadata::default()
            }],
            ..AlbumMetadata::default()
        };
        let report = format_album_report(&album);
        assert!(report.contains("Music director: Ilaiyaraaja"));
        assert!(report.contains(" 1. Annakili Unnai Theduthe - S. Janaki (4:31)"));
    }
}
