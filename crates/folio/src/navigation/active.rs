//! Scroll position -> active section.

use crate::environment::{Bounds, Viewport};

/// How close (px) the viewport bottom must be to the document bottom to force
/// the last section.
pub const BOTTOM_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub id: Option<String>,
    pub bounds: Bounds,
}

/// Picks the section the reader is looking at.
///
/// The last section (in document order) whose range contains
/// `scroll_y + scroll_offset` wins. At the very bottom of the page the last section
/// wins regardless, so a short final section can still become active.
pub fn candidate_section(sections: &[SectionLayout], viewport: Viewport, scroll_offset: f64) -> Option<String> {
    let scroll_position = viewport.scroll_y + scroll_offset;

    let mut candidate = None;
    for section in sections {
        if section.bounds.contains(scroll_position) {
            candidate = section.id.clone();
        }
    }

    if at_page_bottom(viewport) {
        if let Some(last) = sections.last() {
            candidate = last.id.clone();
        }
    }

    candidate.filter(|id| !id.is_empty())
}

pub fn at_page_bottom(viewport: Viewport) -> bool {
    viewport.inner_height + viewport.scroll_y >= viewport.document_height - BOTTOM_TOLERANCE
}

/// `true` when a link's `href` points at the candidate section.
pub fn link_targets(href: Option<&str>, candidate: Option<&str>) -> bool {
    match (href.and_then(|href| href.strip_prefix('#')), candidate) {
        (Some(fragment), Some(candidate)) => fragment == candidate,
        _ => false,
    }
}
