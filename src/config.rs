use crate::logging::{LogLevel, DEFAULT_LOG_LEVEL};

const DEFAULT_SCROLLED_THRESHOLD_PX: u32 = 50;
const DEFAULT_SECTION_REFERENCE_PX: u32 = 100;
const DEFAULT_HEADER_OFFSET_PX: u32 = 80;
const DEFAULT_COUNTER_DURATION_MS: u32 = 2_000;

const SCROLLED_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 1_000);
const SECTION_REFERENCE_PX_BOUNDS: (u32, u32) = (0, 2_000);
const HEADER_OFFSET_PX_BOUNDS: (u32, u32) = (0, 1_000);
const COUNTER_DURATION_MS_BOUNDS: (u32, u32) = (1, 60_000);

/// Tunables baked in at build time. Each `SITE_*` variable is optional and
/// falls back to its default when missing, unparsable or out of bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteConfig {
    pub scrolled_threshold_px: f64,
    pub section_reference_px: f64,
    pub header_offset_px: f64,
    pub counter_duration_ms: f64,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl SiteConfig {
    pub fn from_build_env() -> Self {
        Self::from_lookup(|name| match name {
            "SITE_SCROLLED_THRESHOLD_PX" => option_env!("SITE_SCROLLED_THRESHOLD_PX"),
            "SITE_SECTION_REFERENCE_PX" => option_env!("SITE_SECTION_REFERENCE_PX"),
            "SITE_HEADER_OFFSET_PX" => option_env!("SITE_HEADER_OFFSET_PX"),
            "SITE_COUNTER_DURATION_MS" => option_env!("SITE_COUNTER_DURATION_MS"),
            "SITE_LOG_LEVEL" => option_env!("SITE_LOG_LEVEL"),
            _ => None,
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<&'static str>) -> Self {
        let scrolled_threshold_px = parse_u32_with_bounds(
            lookup("SITE_SCROLLED_THRESHOLD_PX"),
            DEFAULT_SCROLLED_THRESHOLD_PX,
            SCROLLED_THRESHOLD_PX_BOUNDS,
        );
        let section_reference_px = parse_u32_with_bounds(
            lookup("SITE_SECTION_REFERENCE_PX"),
            DEFAULT_SECTION_REFERENCE_PX,
            SECTION_REFERENCE_PX_BOUNDS,
        );
        let header_offset_px = parse_u32_with_bounds(
            lookup("SITE_HEADER_OFFSET_PX"),
            DEFAULT_HEADER_OFFSET_PX,
            HEADER_OFFSET_PX_BOUNDS,
        );
        let counter_duration_ms = parse_u32_with_bounds(
            lookup("SITE_COUNTER_DURATION_MS"),
            DEFAULT_COUNTER_DURATION_MS,
            COUNTER_DURATION_MS_BOUNDS,
        );
        let log_level = lookup("SITE_LOG_LEVEL")
            .and_then(LogLevel::parse)
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            scrolled_threshold_px: f64::from(scrolled_threshold_px),
            section_reference_px: f64::from(section_reference_px),
            header_offset_px: f64::from(header_offset_px),
            counter_duration_ms: f64::from(counter_duration_ms),
            log_level,
        }
    }
}

fn parse_u32_with_bounds(value: Option<&str>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_landing_page_layout() {
        let config = SiteConfig::default();

        assert_eq!(config.scrolled_threshold_px, 50.0);
        assert_eq!(config.section_reference_px, 100.0);
        assert_eq!(config.header_offset_px, 80.0);
        assert_eq!(config.counter_duration_ms, 2_000.0);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn overrides_within_bounds_are_applied() {
        let config = SiteConfig::from_lookup(|name| match name {
            "SITE_HEADER_OFFSET_PX" => Some(" 64 "),
            "SITE_LOG_LEVEL" => Some("debug"),
            _ => None,
        });

        assert_eq!(config.header_offset_px, 64.0);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_bounds_or_garbage_falls_back_to_default() {
        let config = SiteConfig::from_lookup(|name| match name {
            "SITE_COUNTER_DURATION_MS" => Some("0"),
            "SITE_SECTION_REFERENCE_PX" => Some("abc"),
            "SITE_LOG_LEVEL" => Some("verbose"),
            _ => None,
        });

        assert_eq!(config.counter_duration_ms, 2_000.0);
        assert_eq!(config.section_reference_px, 100.0);
        assert_eq!(config.log_level, LogLevel::Info);
    }
}
