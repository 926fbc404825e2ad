use crate::logging::{log_event, LogLevel};
use serde_json::json;

pub trait ScrollHost {
    /// Top edge of the section relative to the viewport, if it exists.
    fn section_top(&self, section_id: &str) -> Option<f64>;
    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
}

pub fn scroll_target(element_top_in_viewport: f64, scroll_y: f64, header_offset: f64) -> f64 {
    element_top_in_viewport + scroll_y - header_offset
}

/// Scrolls so the section lands just below the fixed header. Unknown ids do
/// nothing.
pub fn navigate_to_section(host: &impl ScrollHost, section_id: &str, header_offset: f64) {
    let Some(top) = host.section_top(section_id) else {
        log_event(
            LogLevel::Debug,
            "section_navigation_skipped",
            json!({ "section": section_id }),
        );
        return;
    };

    host.smooth_scroll_to(scroll_target(top, host.scroll_y(), header_offset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, collections::HashMap};

    struct FakeHost {
        sections: HashMap<&'static str, f64>,
        scroll_y: f64,
        scrolls: RefCell<Vec<f64>>,
    }

    impl FakeHost {
        fn new(scroll_y: f64, sections: &[(&'static str, f64)]) -> Self {
            Self {
                sections: sections.iter().copied().collect(),
                scroll_y,
                scrolls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ScrollHost for FakeHost {
        fn section_top(&self, section_id: &str) -> Option<f64> {
            self.sections.get(section_id).copied()
        }

        fn scroll_y(&self) -> f64 {
            self.scroll_y
        }

        fn smooth_scroll_to(&self, top: f64) {
            self.scrolls.borrow_mut().push(top);
        }
    }

    #[test]
    fn target_sits_below_header() {
        assert_eq!(scroll_target(640.0, 1_200.0, 80.0), 1_760.0);
        assert_eq!(scroll_target(-300.0, 1_200.0, 80.0), 820.0);
    }

    #[test]
    fn known_section_triggers_one_smooth_scroll() {
        let host = FakeHost::new(400.0, &[("portfolio", 900.0)]);

        navigate_to_section(&host, "portfolio", 80.0);

        assert_eq!(*host.scrolls.borrow(), vec![1_220.0]);
    }

    #[test]
    fn unknown_section_is_a_silent_no_op() {
        let host = FakeHost::new(400.0, &[("portfolio", 900.0)]);

        navigate_to_section(&host, "pricing", 80.0);

        assert!(host.scrolls.borrow().is_empty());
    }

    #[test]
    fn repeated_navigation_retargets() {
        let host = FakeHost::new(0.0, &[("about", 2_000.0), ("contact", 3_000.0)]);

        navigate_to_section(&host, "about", 80.0);
        navigate_to_section(&host, "contact", 80.0);

        assert_eq!(*host.scrolls.borrow(), vec![1_920.0, 2_920.0]);
    }
}
