// src/wiki/models.rs
use serde::{Deserialize, Serialize};

/// One track parsed from a soundtrack table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub lyricist: String,
    pub composer: String,
    pub music_director: String,
    pub track_number: u32,
    pub total_tracks: u32,
    pub duration_seconds: u32,
}

/// Album-level data for one Wikipedia page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    pub album: String,
    pub music_director: String,
    pub source_url: String,
    pub section_id: String,
    pub tracks: Vec<TrackMetadata>,
}

impl AlbumMetadata {
    pub fn total_duration_seconds(&self) -> u32 {
        self.tracks.iter().map(|t| t.duration_seconds).sum()
    }
}
