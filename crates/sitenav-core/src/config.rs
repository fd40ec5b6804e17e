#![forbid(unsafe_code)]

//! Tuning knobs for the navigation controller.
//!
//! The host passes configuration as a JSON object; every field is optional
//! and falls back to the defaults below.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `scroll_threshold` | 50px | >= 0 | Offset past which the navbar is "scrolled" |
//! | `scroll_debounce_ms` | 10ms | 0-1000ms | Quiet window for scroll events |
//! | `scroll_duration_ms` | 800ms | 1-10000ms | Smooth-scroll animation length |
//! | `min_scroll_distance` | 5px | >= 0 | Below this, smooth scroll is skipped |
//! | `scroll_gap` | 20px | >= 0 | Gap left between navbar and section top |
//! | `mobile_breakpoint` | 768px | >= 0 | Wider viewports auto-close the menu |

use std::time::Duration;

use serde::Deserialize;

use crate::error::NavError;

/// Default offset (px) past which the navbar gets the scrolled marker.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;

/// Default scroll debounce window.
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 10;

/// Maximum allowed scroll debounce window.
pub const MAX_SCROLL_DEBOUNCE_MS: u64 = 1000;

/// Default smooth-scroll duration.
pub const DEFAULT_SCROLL_DURATION_MS: u64 = 800;

/// Bounds for the smooth-scroll duration.
pub const MIN_SCROLL_DURATION_MS: u64 = 1;
pub const MAX_SCROLL_DURATION_MS: u64 = 10_000;

/// Default minimum distance (px) worth animating.
pub const DEFAULT_MIN_SCROLL_DISTANCE: f64 = 5.0;

/// Default gap (px) between the navbar's bottom edge and a section's top.
pub const DEFAULT_SCROLL_GAP: f64 = 20.0;

/// Default viewport width (px) above which the mobile menu is closed.
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;

/// Default intersection thresholds handed to the observer.
pub const DEFAULT_OBSERVER_THRESHOLDS: [f64; 7] = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];

/// Default share of the viewport (from the bottom) excluded from observation.
pub const DEFAULT_OBSERVER_BOTTOM_MARGIN_PERCENT: f64 = 50.0;

/// Style marker class names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavClasses {
    /// Added to the navbar once the page is scrolled past the threshold.
    pub scrolled: String,
    /// Carried by the single active navigation link.
    pub active: String,
    /// Added to the menu and toggle while the mobile menu is open.
    pub open: String,
}

impl Default for NavClasses {
    fn default() -> Self {
        Self {
            scrolled: "scrolled".to_string(),
            active: "active".to_string(),
            open: "open".to_string(),
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub scroll_threshold: f64,
    pub scroll_debounce_ms: u64,
    pub scroll_duration_ms: u64,
    pub min_scroll_distance: f64,
    pub scroll_gap: f64,
    pub mobile_breakpoint: f64,
    pub observer_thresholds: Vec<f64>,
    pub observer_bottom_margin_percent: f64,
    /// Jump straight to the target when the user prefers reduced motion.
    pub respect_reduced_motion: bool,
    pub classes: NavClasses,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            scroll_debounce_ms: DEFAULT_SCROLL_DEBOUNCE_MS,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            min_scroll_distance: DEFAULT_MIN_SCROLL_DISTANCE,
            scroll_gap: DEFAULT_SCROLL_GAP,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            observer_thresholds: DEFAULT_OBSERVER_THRESHOLDS.to_vec(),
            observer_bottom_margin_percent: DEFAULT_OBSERVER_BOTTOM_MARGIN_PERCENT,
            respect_reduced_motion: true,
            classes: NavClasses::default(),
        }
    }
}

impl NavConfig {
    /// Parse a JSON object, then clamp it with [`NavConfig::validated`].
    ///
    /// An empty or whitespace-only string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    #[must_use]
    pub fn with_scroll_threshold(mut self, px: f64) -> Self {
        self.scroll_threshold = px;
        self
    }

    #[must_use]
    pub fn with_scroll_debounce(mut self, debounce: Duration) -> Self {
        self.scroll_debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_scroll_duration(mut self, duration: Duration) -> Self {
        self.scroll_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_scroll_gap(mut self, px: f64) -> Self {
        self.scroll_gap = px;
        self
    }

    #[must_use]
    pub fn with_mobile_breakpoint(mut self, px: f64) -> Self {
        self.mobile_breakpoint = px;
        self
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// Debounce window as a [`Duration`].
    #[must_use]
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    /// Animation length as a [`Duration`].
    #[must_use]
    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }

    /// Observer root margin: excludes a band under the navbar and the
    /// configured bottom share of the viewport.
    ///
    /// ```
    /// use sitenav_core::NavConfig;
    ///
    /// assert_eq!(NavConfig::default().root_margin(80.0), "-80px 0px -50% 0px");
    /// ```
    #[must_use]
    pub fn root_margin(&self, navbar_height: f64) -> String {
        let top = navbar_height.max(0.0).round();
        let bottom = self.observer_bottom_margin_percent.round();
        format!("-{top}px 0px -{bottom}% 0px")
    }

    /// Clamp values to safe ranges.
    ///
    /// - non-finite or negative distances fall back to their defaults
    /// - durations are clamped to their documented ranges
    /// - observer thresholds are clamped into `[0, 1]`, sorted and deduped;
    ///   an empty list falls back to the default seven thresholds
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.scroll_threshold = non_negative_or(self.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
        self.min_scroll_distance =
            non_negative_or(self.min_scroll_distance, DEFAULT_MIN_SCROLL_DISTANCE);
        self.scroll_gap = non_negative_or(self.scroll_gap, DEFAULT_SCROLL_GAP);
        self.mobile_breakpoint = non_negative_or(self.mobile_breakpoint, DEFAULT_MOBILE_BREAKPOINT);
        self.observer_bottom_margin_percent = if self.observer_bottom_margin_percent.is_finite() {
            self.observer_bottom_margin_percent.clamp(0.0, 100.0)
        } else {
            DEFAULT_OBSERVER_BOTTOM_MARGIN_PERCENT
        };

        self.scroll_debounce_ms = self.scroll_debounce_ms.min(MAX_SCROLL_DEBOUNCE_MS);
        self.scroll_duration_ms = self
            .scroll_duration_ms
            .clamp(MIN_SCROLL_DURATION_MS, MAX_SCROLL_DURATION_MS);

        let mut thresholds: Vec<f64> = self
            .observer_thresholds
            .iter()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        if thresholds.is_empty() {
            thresholds = DEFAULT_OBSERVER_THRESHOLDS.to_vec();
        }
        self.observer_thresholds = thresholds;

        self
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_table() {
        let cfg = NavConfig::default();
        assert_eq!(cfg.scroll_threshold, 50.0);
        assert_eq!(cfg.scroll_duration(), Duration::from_millis(800));
        assert_eq!(cfg.scroll_debounce(), Duration::from_millis(10));
        assert_eq!(cfg.min_scroll_distance, 5.0);
        assert_eq!(cfg.observer_thresholds.len(), 7);
        assert_eq!(cfg.classes.scrolled, "scrolled");
    }

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(NavConfig::from_json("  ").unwrap(), NavConfig::default());
        assert_eq!(NavConfig::from_json("{}").unwrap(), NavConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = NavConfig::from_json(
            r#"{"scroll_threshold": 120, "classes": {"open": "is-open"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.scroll_threshold, 120.0);
        assert_eq!(cfg.classes.open, "is-open");
        assert_eq!(cfg.classes.active, "active");
        assert_eq!(cfg.scroll_duration_ms, DEFAULT_SCROLL_DURATION_MS);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let err = NavConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
    }

    #[test]
    fn validated_clamps_out_of_range_values() {
        let cfg = NavConfig {
            scroll_threshold: -3.0,
            scroll_debounce_ms: 50_000,
            scroll_duration_ms: 0,
            scroll_gap: f64::NAN,
            observer_thresholds: vec![1.5, 0.5, -1.0, 0.5],
            observer_bottom_margin_percent: 250.0,
            ..NavConfig::default()
        }
        .validated();

        assert_eq!(cfg.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
        assert_eq!(cfg.scroll_debounce_ms, MAX_SCROLL_DEBOUNCE_MS);
        assert_eq!(cfg.scroll_duration_ms, MIN_SCROLL_DURATION_MS);
        assert_eq!(cfg.scroll_gap, DEFAULT_SCROLL_GAP);
        assert_eq!(cfg.observer_thresholds, vec![0.0, 0.5, 1.0]);
        assert_eq!(cfg.observer_bottom_margin_percent, 100.0);
    }

    #[test]
    fn oversized_durations_saturate_then_clamp() {
        let cfg = NavConfig::default()
            .with_scroll_debounce(Duration::MAX)
            .with_scroll_duration(Duration::MAX);
        assert_eq!(cfg.scroll_debounce_ms, u64::MAX);
        assert_eq!(cfg.scroll_duration_ms, u64::MAX);

        let cfg = cfg.validated();
        assert_eq!(cfg.scroll_debounce(), Duration::from_millis(MAX_SCROLL_DEBOUNCE_MS));
        assert_eq!(cfg.scroll_duration(), Duration::from_millis(MAX_SCROLL_DURATION_MS));
    }

    #[test]
    fn empty_threshold_list_falls_back_to_defaults() {
        let cfg = NavConfig {
            observer_thresholds: Vec::new(),
            ..NavConfig::default()
        }
        .validated();
        assert_eq!(cfg.observer_thresholds, DEFAULT_OBSERVER_THRESHOLDS.to_vec());
    }

    #[test]
    fn root_margin_rounds_navbar_height() {
        let cfg = NavConfig::default();
        assert_eq!(cfg.root_margin(64.4), "-64px 0px -50% 0px");
    }
}
