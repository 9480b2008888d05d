// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("Not a Wikipedia article URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Wikipedia page not found: {0}")]
    PageNotFound(String),

    #[error("Request blocked by Wikipedia (status {0}); check the User-Agent")]
    Blocked(reqwest::StatusCode),

    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    /// No headline carried any of the candidate ids. `available` lists every
    /// headline id in document order so a human can pick the right one.
    #[error("Section not found (tried {candidates:?}); available ids: {available:?}")]
    SectionNotFound {
        candidates: Vec<String>,
        available: Vec<String>,
    },

    /// Section located but no wikitable/tracklist table in it. `tables` holds
    /// a tag-stripped snippet of every table in the section, possibly none.
    #[error("No wikitable/tracklist table in section '{section_id}' ({} other tables)", .tables.len())]
    TableNotFound {
        section_id: String,
        tables: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Wikipedia interaction failed: {0}")]
    Wiki(#[from] WikiError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
