#![forbid(unsafe_code)]

//! Active-section selection.
//!
//! Two independent routines decide which page section is "in view":
//!
//! - [`most_visible`] runs on every batch of intersection changes and picks
//!   the entry with the highest visible ratio.
//! - [`initial_active`] runs once at load and picks the last section whose
//!   top has already scrolled past the navbar.

/// One intersection-change record for an observed section.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionSample {
    /// Section element id.
    pub id: String,
    /// Visible fraction of the section within the observer's root region.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionSample {
    pub fn new(id: impl Into<String>, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            id: id.into(),
            ratio,
            is_intersecting,
        }
    }
}

/// A section and its document-relative top offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset<'a> {
    pub id: &'a str,
    pub top: f64,
}

/// Pick the id of the intersecting sample with the greatest ratio.
///
/// A sample wins only with a ratio strictly greater than the running
/// maximum, which starts at zero: ties keep the earlier sample, and a batch
/// with no intersecting samples (or only zero ratios) yields `None`.
#[must_use]
pub fn most_visible(samples: &[IntersectionSample]) -> Option<&str> {
    let mut best: Option<&str> = None;
    let mut max_ratio = 0.0;
    for sample in samples.iter().filter(|s| s.is_intersecting) {
        if sample.ratio > max_ratio {
            max_ratio = sample.ratio;
            best = Some(sample.id.as_str());
        }
    }
    best
}

/// Scan sections bottom-up for the last one whose top is at or above
/// `scroll_y + offset`.
///
/// `sections` must be in document order.
#[must_use]
pub fn initial_active<'a>(
    sections: &[SectionOffset<'a>],
    scroll_y: f64,
    offset: f64,
) -> Option<&'a str> {
    let probe = scroll_y + offset;
    sections
        .iter()
        .rev()
        .find(|section| section.top <= probe)
        .map(|section| section.id)
}
