// src/extractors/dom.rs

// --- Imports ---
use crate::extractors::section::MatchOrder;
use crate::extractors::table::{clean_cell, table_snippet, Table};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
// Legacy headline spans and current-style headings both carry the section id.
// Headings only count inside their mw-heading wrapper.
static HEADLINE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.mw-headline[id], div.mw-heading > h2[id], div.mw-heading > h3[id]")
        .expect("Failed to compile HEADLINE_SELECTOR")
});

static SECTION_HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2, h3").expect("Failed to compile SECTION_HEADING_SELECTOR")
});

static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to compile TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

const DATA_TABLE_CLASSES: [&str; 2] = ["wikitable", "tracklist"];

/// Tree-based counterpart of the offset extractor: finds the headline by id,
/// then walks the siblings that follow its heading until the next h2/h3.
///
/// Cell text comes from parsed text nodes, so character references are
/// already decoded (`&amp;` reads as `&`). The pattern extractor keeps them
/// as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomExtractor {
    order: MatchOrder,
}

impl DomExtractor {
    pub fn new(order: MatchOrder) -> Self {
        Self { order }
    }

    pub fn extract<S: AsRef<str>>(&self, html: &str, candidate_ids: &[S]) -> Result<Table, ExtractError> {
        let document = Html::parse_document(html);
        let candidates: Vec<&str> = candidate_ids.iter().map(|c| c.as_ref()).collect();

        let headlines: Vec<(ElementRef, &str)> = document
            .select(&HEADLINE_SELECTOR)
            .filter_map(|el| el.value().attr("id").map(|id| (el, id)))
            .collect();

        let found = match self.order {
            MatchOrder::DocumentOrder => headlines.iter().find(|(_, id)| candidates.contains(id)),
            MatchOrder::Priority => candidates
                .iter()
                .find_map(|c| headlines.iter().find(|(_, id)| id == c)),
        };

        let Some(&(headline, section_id)) = found else {
            tracing::debug!("No headline element matched {:?}", candidates);
            return Err(ExtractError::SectionNotFound {
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
                available: headlines.iter().map(|(_, id)| id.to_string()).collect(),
            });
        };
        tracing::debug!("Found headline <{}> for section '{}'", headline.value().name(), section_id);

        let origin = section_origin(headline);
        let mut other_tables = Vec::new();

        for sibling in origin.next_siblings().filter_map(ElementRef::wrap) {
            if is_section_break(sibling) {
                tracing::trace!("Reached next section at <{}>", sibling.value().name());
                break;
            }

            let tables = std::iter::once(sibling)
                .filter(|el| el.value().name() == "table")
                .chain(sibling.select(&TABLE_SELECTOR));

            for table in tables {
                if is_data_table(table) {
                    let rows = extract_dom_rows(table);
                    tracing::info!("Extracted {} rows from section '{}' via DOM", rows.len(), section_id);
                    return Ok(Table { section_id: section_id.to_string(), rows });
                }
                other_tables.push(table_snippet(&table.inner_html()));
            }
        }

        Err(ExtractError::TableNotFound {
            section_id: section_id.to_string(),
            tables: other_tables,
        })
    }
}

/// The element whose following siblings make up the section body.
fn section_origin(headline: ElementRef) -> ElementRef {
    let heading = std::iter::once(headline)
        .chain(headline.ancestors().filter_map(ElementRef::wrap))
        .find(|el| matches!(el.value().name(), "h2" | "h3"))
        .unwrap_or(headline);

    // Current MediaWiki wraps headings in <div class="mw-heading">
    match heading.parent().and_then(ElementRef::wrap) {
        Some(parent) if has_class(parent, "mw-heading") => parent,
        _ => heading,
    }
}

fn is_section_break(el: ElementRef) -> bool {
    matches!(el.value().name(), "h2" | "h3") || el.select(&SECTION_HEADING_SELECTOR).next().is_some()
}

fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn is_data_table(table: ElementRef) -> bool {
    let class = table.value().attr("class").unwrap_or_default().to_lowercase();
    DATA_TABLE_CLASSES.iter().any(|wanted| class.contains(wanted))
}

/// Rows of `table` itself; rows belonging to nested tables are skipped.
fn extract_dom_rows(table: ElementRef) -> Vec<Vec<String>> {
    table
        .select(&ROW_SELECTOR)
        .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table.id()))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                .map(|cell| clean_cell(&cell.text().collect::<String>()))
                .collect()
        })
        .collect()
}

fn owning_table(row: ElementRef) -> Option<ElementRef> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}
