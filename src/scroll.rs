/// Vertical extent of a section relative to the viewport top, as reported by
/// `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub bottom: f64,
}

impl SectionBounds {
    pub fn straddles(&self, reference_offset: f64) -> bool {
        self.top <= reference_offset && self.bottom >= reference_offset
    }
}

pub fn is_past_threshold(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Fraction of the scrollable distance already covered. Documents that fit in
/// the viewport report 0.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }

    let progress = scroll_top / scrollable;
    if progress.is_nan() {
        return 0.0;
    }

    progress.clamp(0.0, 1.0)
}

pub fn parallax_offset(element_top_in_viewport: f64, speed: f64) -> f64 {
    -element_top_in_viewport * speed
}

/// Tracks which section of a fixed, ordered list currently sits under the
/// reference line.
#[derive(Clone, Debug)]
pub struct ActiveSectionTracker {
    sections: Vec<String>,
    reference_offset: f64,
    active: Option<String>,
}

impl ActiveSectionTracker {
    pub fn new<I, S>(sections: I, reference_offset: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            reference_offset,
            active: None,
        }
    }

    pub fn with_initial(mut self, section: impl Into<String>) -> Self {
        self.active = Some(section.into());
        self
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Re-evaluates the active section. The first straddling section in list
    /// order wins; when nothing straddles, the previous value is kept.
    /// Returns whether the active section changed.
    pub fn update(&mut self, mut lookup: impl FnMut(&str) -> Option<SectionBounds>) -> bool {
        let hit = self.sections.iter().find(|section| {
            lookup(section)
                .map(|bounds| bounds.straddles(self.reference_offset))
                .unwrap_or(false)
        });

        let Some(hit) = hit else {
            return false;
        };

        if self.active.as_deref() == Some(hit.as_str()) {
            return false;
        }

        self.active = Some(hit.clone());
        true
    }
}
