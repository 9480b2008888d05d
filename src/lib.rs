// src/lib.rs
pub mod utils;
pub mod extractors;
pub mod report;
pub mod storage;
pub mod wiki;

pub use extractors::{extract, extract_with, MatchOrder, Table};
pub use utils::AppError;
