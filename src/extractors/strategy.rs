// src/extractors/strategy.rs

// --- Imports ---
use crate::extractors::dom::DomExtractor;
use crate::extractors::section::{bound_section, list_headline_ids, locate_section_with, MatchOrder};
use crate::extractors::table::{extract_rows, find_data_table, list_all_tables, table_snippet, Table};
use crate::utils::error::ExtractError;

/// A way of turning a page into the data table of one of the candidate sections.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;

    fn extract_table(&self, html: &str, candidate_ids: &[String]) -> Result<Table, ExtractError>;
}

/// Offset-based extraction: regex headline lookup, section bounded by the
/// next h2/h3 tag, first wikitable/tracklist table in between.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternExtractor {
    pub order: MatchOrder,
}

impl ExtractionStrategy for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn extract_table(&self, html: &str, candidate_ids: &[String]) -> Result<Table, ExtractError> {
        extract_with(html, candidate_ids, self.order)
    }
}

impl ExtractionStrategy for DomExtractor {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn extract_table(&self, html: &str, candidate_ids: &[String]) -> Result<Table, ExtractError> {
        self.extract(html, candidate_ids)
    }
}

/// Picks the extraction strategy for the CLI flags.
pub fn strategy_for(use_dom: bool, order: MatchOrder) -> Box<dyn ExtractionStrategy> {
    if use_dom {
        Box::new(DomExtractor::new(order))
    } else {
        Box::new(PatternExtractor { order })
    }
}

/// Locate, bound, find and split in one pass, using document order for the
/// candidate ids.
pub fn extract<S: AsRef<str>>(html: &str, candidate_ids: &[S]) -> Result<Table, ExtractError> {
    extract_with(html, candidate_ids, MatchOrder::DocumentOrder)
}

pub fn extract_with<S: AsRef<str>>(
    html: &str,
    candidate_ids: &[S],
    order: MatchOrder,
) -> Result<Table, ExtractError> {
    let anchor = locate_section_with(html, candidate_ids, order).ok_or_else(|| {
        ExtractError::SectionNotFound {
            candidates: candidate_ids.iter().map(|c| c.as_ref().to_string()).collect(),
            available: list_headline_ids(html),
        }
    })?;

    let body = bound_section(html, &anchor);
    tracing::info!("Section '{}' found ({} bytes)", anchor.id, body.len());

    let Some(table_html) = find_data_table(body) else {
        let tables: Vec<String> = list_all_tables(body).into_iter().map(table_snippet).collect();
        tracing::warn!("No wikitable/tracklist in section '{}'; {} other tables", anchor.id, tables.len());
        return Err(ExtractError::TableNotFound { section_id: anchor.id, tables });
    };

    let rows = extract_rows(table_html);
    if rows.len() <= 1 {
        tracing::warn!("Table in section '{}' has no data rows", anchor.id);
    }

    Ok(Table { section_id: anchor.id, rows })
}
