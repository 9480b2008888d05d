// src/extractors/tracks.rs

// --- Imports ---
use crate::extractors::strategy::ExtractionStrategy;
use crate::extractors::table::{clean_cell, Table};
use crate::utils::error::ExtractError;
use crate::wiki::models::{AlbumMetadata, TrackMetadata};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<title>([^<]+)</title>").expect("Failed to compile TITLE_RE")
});

static WIKIPEDIA_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[-–—]\s*Wikipedia.*$").expect("Failed to compile WIKIPEDIA_SUFFIX_RE")
});

static FILM_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(film\)\s*$").expect("Failed to compile FILM_SUFFIX_RE")
});

static COLON_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+):(\d+)").expect("Failed to compile COLON_DURATION_RE")
});

static DOT_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\.(\d+)").expect("Failed to compile DOT_DURATION_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

const ENTITIES: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

// --- Column Detection ---

/// Index of each known column in a soundtrack table header, if present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableColumns {
    pub number: Option<usize>,
    pub title: Option<usize>,
    pub singer: Option<usize>,
    pub lyricist: Option<usize>,
    pub music: Option<usize>,
    pub duration: Option<usize>,
}

/// Maps header labels to columns by keyword. Each header claims at most one
/// column (first rule that matches); a later header wins over an earlier one
/// for the same column.
pub fn detect_columns<S: AsRef<str>>(headers: &[S]) -> TableColumns {
    let mut cols = TableColumns::default();

    for (i, header) in headers.iter().enumerate() {
        let h = header.as_ref().to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| h.contains(w));

        if has(&["no", "#"]) || h == "sr" {
            cols.number = Some(i);
        } else if has(&["song", "title", "track"]) {
            cols.title = Some(i);
        } else if has(&["singer", "artist", "vocals", "performed"]) {
            cols.singer = Some(i);
        } else if has(&["lyric", "written"]) {
            cols.lyricist = Some(i);
        } else if has(&["music", "composer", "composed"]) {
            cols.music = Some(i);
        } else if has(&["duration", "length", "time"]) {
            cols.duration = Some(i);
        }
    }

    tracing::debug!("Detected columns: {:?}", cols);
    cols
}

/// Seconds from "3:45", "3.45" or "225". Anything else is 0.
pub fn parse_duration(text: &str) -> u32 {
    let text = text.trim();

    for re in [&*COLON_DURATION_RE, &*DOT_DURATION_RE] {
        if let Some(caps) = re.captures(text) {
            let minutes: u32 = caps[1].parse().unwrap_or(0);
            let seconds: u32 = caps[2].parse().unwrap_or(0);
            return minutes.saturating_mul(60).saturating_add(seconds);
        }
    }

    text.parse().unwrap_or(0)
}

/// Cell cleanup plus entity decoding, quote removal and whitespace collapsing.
pub fn clean_wiki_text(text: &str) -> String {
    let mut cleaned = clean_cell(text);
    for (entity, replacement) in ENTITIES {
        cleaned = cleaned.replace(entity, replacement);
    }
    cleaned.retain(|c| !matches!(c, '"' | '\u{201C}' | '\u{201D}'));
    WHITESPACE_RE.replace_all(cleaned.trim(), " ").into_owned()
}

// --- Track Mapping ---

/// Turns an extracted table into tracks. Row 0 is the header.
pub fn tracks_from_table(table: &Table) -> Vec<TrackMetadata> {
    let Some(header) = table.header() else {
        return Vec::new();
    };
    let columns = detect_columns(header);
    let cell = |cells: &[String], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| cells.get(i)).map(|c| clean_wiki_text(c))
    };

    let mut tracks = Vec::new();
    for row in table.data_rows().iter().map(Vec::as_slice) {
        if row.is_empty() {
            continue;
        }

        let track_number = cell(row, columns.number)
            .and_then(|n| n.trim_end_matches('.').parse().ok())
            .unwrap_or(tracks.len() as u32 + 1);

        // Rows shorter than the title column use their first cell
        let title = cell(row, columns.title).unwrap_or_else(|| clean_wiki_text(&row[0]));
        if title.is_empty() {
            tracing::debug!("Skipping row without a title: {:?}", row);
            continue;
        }

        let music_director = cell(row, columns.music).unwrap_or_default();
        tracks.push(TrackMetadata {
            title,
            artist: cell(row, columns.singer).unwrap_or_default(),
            lyricist: cell(row, columns.lyricist).unwrap_or_default(),
            composer: music_director.clone(),
            music_director,
            track_number,
            duration_seconds: cell(row, columns.duration).map(|d| parse_duration(&d)).unwrap_or(0),
            ..TrackMetadata::default()
        });
    }

    let total = tracks.len() as u32;
    for track in &mut tracks {
        track.total_tracks = total;
    }

    tracing::info!("Parsed {} tracks from table", tracks.len());
    tracks
}

/// Page `<title>` without the " - Wikipedia" and "(film)" suffixes.
pub fn extract_page_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title = WIKIPEDIA_SUFFIX_RE.replace(raw, "");
    let title = FILM_SUFFIX_RE.replace(title.trim(), "");
    Some(clean_wiki_text(&title))
}

/// Builds album metadata from a page and the table already extracted from it.
pub fn album_from_table(html: &str, source_url: &str, table: &Table) -> AlbumMetadata {
    let album = extract_page_title(html).unwrap_or_default();
    let mut tracks = tracks_from_table(table);
    for track in &mut tracks {
        track.album = album.clone();
    }

    let music_director = tracks
        .iter()
        .map(|t| t.music_director.as_str())
        .find(|md| !md.is_empty())
        .unwrap_or_default()
        .to_string();

    AlbumMetadata {
        album,
        music_director,
        source_url: source_url.to_string(),
        section_id: table.section_id.clone(),
        tracks,
    }
}

/// Extracts the section table with `strategy` and maps it to album metadata.
pub fn album_from_page(
    strategy: &dyn ExtractionStrategy,
    html: &str,
    source_url: &str,
    candidate_ids: &[String],
) -> Result<AlbumMetadata, ExtractError> {
    let table = strategy.extract_table(html, candidate_ids)?;
    Ok(album_from_table(html, source_url, &table))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::strategy::PatternExtractor;

    fn table(rows: &[&[&str]]) -> Table {
        Table {
            section_id: "Track_listing".to_string(),
            rows: rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        }
    }

    #[test]
    fn test_detect_columns() {
        let cols = detect_columns(&["No.", "Song", "Singer(s)", "Lyrics", "Music", "Length"]);
        assert_eq!(
            cols,
            TableColumns {
                number: Some(0),
                title: Some(1),
                singer: Some(2),
                lyricist: Some(3),
                music: Some(4),
                duration: Some(5),
            }
        );

        let cols = detect_columns(&["Sr", "Track title", "Performed by", "Written by", "Composed by", "Time"]);
        assert_eq!(cols.number, Some(0));
        assert_eq!(cols.title, Some(1));
        assert_eq!(cols.singer, Some(2));
        assert_eq!(cols.lyricist, Some(3));
        assert_eq!(cols.music, Some(4));
        assert_eq!(cols.duration, Some(5));

        assert_eq!(detect_columns::<&str>(&[]), TableColumns::default());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("4:31"), 271);
        assert_eq!(parse_duration(" 12:05 "), 725);
        assert_eq!(parse_duration("3.45"), 225);
        assert_eq!(parse_duration("225"), 225);
        assert_eq!(parse_duration("unknown"), 0);
        assert_eq!(parse_duration(""), 0);
    }

    #[test]
    fn test_clean_wiki_text() {
        assert_eq!(clean_wiki_text("\"Machana &amp; Paatha\"[3]"), "Machana & Paatha");
        assert_eq!(clean_wiki_text("\u{201C}Sondham\u{201D}  \n Vol. 2"), "Sondham Vol. 2");
        assert_eq!(clean_wiki_text("S.&nbsp;Janaki"), "S. Janaki");
    }

    #[test]
    fn test_tracks_from_table() {
        let t = table(&[
            &["No.", "Title", "Singer(s)", "Lyrics", "Music", "Length"],
            &["1.", "\"Annakili Unnai Theduthe\"", "S. Janaki", "Panchu Arunachalam", "Ilaiyaraaja", "4:31"],
            &["2.", "\"Machana Paatheengala\"", "S. Janaki", "Panchu Arunachalam", "Ilaiyaraaja", "4:19"],
            &[],
            &["", "", "", "", "", ""],
        ]);
        let tracks = tracks_from_table(&t);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "Annakili Unnai Theduthe");
        assert_eq!(tracks[0].track_number, 1);
        assert_eq!(tracks[0].artist, "S. Janaki");
        assert_eq!(tracks[0].lyricist, "Panchu Arunachalam");
        assert_eq!(tracks[0].composer, "Ilaiyaraaja");
        assert_eq!(tracks[0].music_director, "Ilaiyaraaja");
        assert_eq!(tracks[0].duration_seconds, 271);
        assert_eq!(tracks[1].track_number, 2);
        assert!(tracks.iter().all(|t| t.total_tracks == 2));
    }

    #[test]
    fn test_tracks_without_known_columns_fall_back() {
        let t = table(&[&["Name", "Notes"], &["First", "x"], &["Second", "y"]]);
        let tracks = tracks_from_table(&t);
        // "Notes" looks like a number column; unparseable numbers fall back to position
        assert_eq!(tracks.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["First", "Second"]);
        assert_eq!(tracks[1].track_number, 2);

        assert!(tracks_from_table(&table(&[])).is_empty());
        assert!(tracks_from_table(&table(&[&["No.", "Title"]])).is_empty());
    }

    #[test]
    fn test_short_row_title_falls_back_to_first_cell() {
        let t = table(&[
            &["No.", "Title", "Length"],
            &["\"Bonus Track\""],
            &["2.", "\"Machana Paatheengala\"", "4:19"],
        ]);
        let tracks = tracks_from_table(&t);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "Bonus Track");
        assert_eq!(tracks[0].track_number, 1);
        assert_eq!(tracks[0].duration_seconds, 0);
        assert_eq!(tracks[1].title, "Machana Paatheengala");
    }

    #[test]
    fn test_extract_page_title() {
        assert_eq!(
            extract_page_title("<html><head><title>Annakili (soundtrack) - Wikipedia</title></head></html>").as_deref(),
            Some("Annakili (soundtrack)")
        );
        assert_eq!(
            extract_page_title("<TITLE>Annakili (film) – Wikipedia, the free encyclopedia</TITLE>").as_deref(),
            Some("Annakili")
        );
        assert_eq!(extract_page_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_album_from_page() {
        let html = r#"<html><head><title>Annakili (film) - Wikipedia</title></head><body>
<h2><span class="mw-headline" id="Soundtrack">Soundtrack</span></h2>
<table class="wikitable"><tr><th>No.</th><th>Song</th><th>Music</th><th>Duration</th></tr>
<tr><td>1</td><td>"Annakili"</td><td>Ilaiyaraaja</td><td>4:31</td></tr></table>
</body></html>"#;
        let candidates = vec!["Soundtrack".to_string()];
        let album = album_from_page(&PatternExtractor::default(), html, "https://en.wikipedia.org/wiki/Annakili_(film)", &candidates)
            .expect("album extraction failed");
        assert_eq!(album.album, "Annakili");
        assert_eq!(album.music_director, "Ilaiyaraaja");
        assert_eq!(album.section_id, "Soundtrack");
        assert_eq!(album.tracks.len(), 1);
        assert_eq!(album.tracks[0].album, "Annakili");
        assert_eq!(album.total_duration_seconds(), 271);
    }
}
