// src/extractors/mod.rs
pub mod section;
pub mod table;
pub mod dom;
pub mod strategy;
pub mod tracks;

// Re-export key extraction types for convenience
pub use section::{MatchOrder, SectionAnchor};
pub use strategy::{extract, extract_with, strategy_for, ExtractionStrategy, PatternExtractor};
pub use table::Table;
