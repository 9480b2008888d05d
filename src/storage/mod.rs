// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::extractors::table::Table;
use crate::utils::error::StorageError;
use crate::wiki::models::AlbumMetadata;

const RAW_HTML_FILE: &str = "raw.html";
const TRACKS_FILE: &str = "tracks.json";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory for one page: /base_dir/<slug>/
    pub fn page_dir(&self, slug: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(slug);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)?;
        }
        Ok(target_dir)
    }

    /// Saves the fetched page so later runs can use `--file` instead of the network
    pub fn save_raw_html(&self, slug: &str, html: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.page_dir(slug)?.join(RAW_HTML_FILE);
        fs::write(&file_path, html)?;

        tracing::info!("Saved raw page ({} bytes) to {}", html.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves the extracted table rows as JSON
    pub fn save_table(&self, slug: &str, table: &Table) -> Result<PathBuf, StorageError> {
        let file_path = self.page_dir(slug)?.join(format!("{}_table.json", sanitize_component(&table.section_id)));
        write_json(&file_path, table)?;

        tracing::info!("Saved table to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the extracted table in JSON format
    pub fn save_table_metadata(&self, slug: &str, source: &str, table: &Table) -> Result<PathBuf, StorageError> {
        let file_path = self.page_dir(slug)?.join(format!("{}_table_meta.json", sanitize_component(&table.section_id)));

        let metadata = serde_json::json!({
            "source": source,
            "section_id": table.section_id,
            "row_count": table.rows.len(),
            "data_row_count": table.data_rows().len(),
            "column_count": table.column_count(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });
        write_json(&file_path, &metadata)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the track list derived from the table
    pub fn save_album(&self, slug: &str, album: &AlbumMetadata) -> Result<PathBuf, StorageError> {
        let file_path = self.page_dir(slug)?.join(TRACKS_FILE);
        write_json(&file_path, album)?;

        tracing::info!("Saved {} tracks to {}", album.tracks.len(), file_path.display());
        Ok(file_path)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Filesystem-safe directory name for a page URL or a saved file path.
///
/// `https://en.wikipedia.org/wiki/Annakili_(soundtrack)#Track_listing`
/// becomes `Annakili_soundtrack`; `pages/annakili.html` becomes `annakili`.
pub fn page_slug(source: &str) -> String {
    let without_fragment = source.split(&['#', '?'][..]).next().unwrap_or(source);
    let last = without_fragment.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let stem = last.strip_suffix(".html").or_else(|| last.strip_suffix(".htm")).unwrap_or(last);
    sanitize_component(stem)
}

/// Keeps alphanumerics and '-', collapses every other run of characters to a
/// single '_', so the result is one path component with no separators or dots.
fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_us = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() || ch == '-' {
            out.push(ch);
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }

    let out = out.trim_matches('_').to_string();
    if out.is_empty() { "page".to_string() } else { out }
}
