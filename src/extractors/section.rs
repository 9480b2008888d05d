// src/extractors/section.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// A headline marker is either the legacy `<span class="mw-headline" id="...">`
// or a current-style `<h2 id="...">` / `<h3 id="...">` directly inside its
// `<div class="mw-heading">` wrapper. Bare id'd headings (TOC title, sidebar
// menus) are not section headlines.
// Group 1 holds the span id, group 2 the heading id.
static HEADLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?is)<span[^>]*class="[^"]*mw-headline[^"]*"[^>]*\bid="([^"]+)"[^>]*>.*?</span>"#,
        r#"|<div[^>]*class="[^"]*\bmw-heading\b[^"]*"[^>]*>\s*<h[23][^>]*\bid="([^"]+)"[^>]*>.*?</h[23]>"#,
    ))
    .expect("Failed to compile HEADLINE_RE")
});

// Opening tag of the next same-or-higher-level section.
static NEXT_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<h[23][^>]*>").expect("Failed to compile NEXT_SECTION_RE")
});

// --- Data Structures ---

/// A located headline marker. `end` is the byte offset just past the marker,
/// where the section body begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAnchor {
    pub id: String,
    pub end: usize,
}

/// How candidate section ids are matched against the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOrder {
    /// First headline in the document whose id equals any candidate.
    #[default]
    DocumentOrder,
    /// First candidate (in the caller's order) that occurs anywhere.
    Priority,
}

/// Iterates every headline marker as `(id, end offset)` in document order.
fn headlines(html: &str) -> impl Iterator<Item = (&str, usize)> {
    HEADLINE_RE.captures_iter(html).filter_map(|caps| {
        let end = caps.get(0)?.end();
        let id = caps.get(1).or_else(|| caps.get(2))?;
        Some((id.as_str(), end))
    })
}

/// Locates the first headline, in document order, whose id equals one of
/// `candidate_ids`.
///
/// Note: the order of `candidate_ids` does not matter here. If a page has
/// both "Music" and "Track_listing" headlines, whichever comes first in the
/// page wins. Use [`locate_section_with`] and [`MatchOrder::Priority`] to
/// honour the candidate order instead.
pub fn locate_section<S: AsRef<str>>(html: &str, candidate_ids: &[S]) -> Option<SectionAnchor> {
    locate_section_with(html, candidate_ids, MatchOrder::DocumentOrder)
}

pub fn locate_section_with<S: AsRef<str>>(
    html: &str,
    candidate_ids: &[S],
    order: MatchOrder,
) -> Option<SectionAnchor> {
    let candidates: Vec<&str> = candidate_ids.iter().map(|c| c.as_ref()).collect();

    let found = match order {
        MatchOrder::DocumentOrder => headlines(html).find(|(id, _)| candidates.contains(id)),
        MatchOrder::Priority => {
            let all: Vec<(&str, usize)> = headlines(html).collect();
            candidates
                .iter()
                .find_map(|c| all.iter().find(|(id, _)| id == c).copied())
        }
    };

    match found {
        Some((id, end)) => {
            tracing::debug!("Located section '{}' ending at byte {}", id, end);
            Some(SectionAnchor { id: id.to_string(), end })
        }
        None => {
            tracing::debug!("No headline matched candidates {:?}", candidates);
            None
        }
    }
}

/// All headline ids in document order. Used as the diagnostic when no
/// candidate matched.
pub fn list_headline_ids(html: &str) -> Vec<String> {
    headlines(html).map(|(id, _)| id.to_string()).collect()
}

/// Returns the section body: everything from the anchor's end up to the next
/// `<h2`/`<h3` opening tag, or to the end of the document.
pub fn bound_section<'a>(html: &'a str, anchor: &SectionAnchor) -> &'a str {
    let Some(rest) = html.get(anchor.end..) else {
        tracing::warn!("Anchor offset {} is outside the document ({} bytes)", anchor.end, html.len());
        return "";
    };

    match NEXT_SECTION_RE.find(rest) {
        Some(next) => {
            tracing::debug!("Section '{}' spans bytes {}..{}", anchor.id, anchor.end, anchor.end + next.start());
            &rest[..next.start()]
        }
        None => {
            tracing::debug!("Section '{}' runs to end of document", anchor.id);
            rest
        }
    }
}
