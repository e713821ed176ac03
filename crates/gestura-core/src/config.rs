//! Recognizer options.
//!
//! Field names serialize in camelCase (`tapMaxDistance`, `longPressDelay`, ...)
//! so one options file can be shared with hosts that use those names. Every
//! field is optional when loading; missing fields take their defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration shared by all recognizers.
///
/// Distances are in surface units, durations in milliseconds and velocity in
/// surface units per millisecond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GestureOptions {
    /// Listen in the capture phase. A hint for the host's listener setup.
    pub capture_events: bool,
    /// Window for the second tap of a double-tap, and the held-tap delay.
    pub double_tap_max_delay: u64,
    /// Accepted for host compatibility; pressure is always passed through.
    pub enable_pressure: bool,
    /// Accepted for host compatibility; relative coordinates are always computed.
    pub enable_relative_coordinates: bool,
    /// Run the swipe recognizer.
    pub enable_swipe: bool,
    /// Run the tap recognizer.
    pub enable_tap: bool,
    /// Hold time before a long press fires.
    pub long_press_delay: u64,
    /// Hold single taps until a double-tap can no longer happen.
    pub suppress_tap_on_double_tap: bool,
    /// Drop a tap when a long press fired for the same contact.
    pub suppress_tap_on_long_press: bool,
    /// Longest contact that still counts as a swipe.
    pub swipe_max_duration: u64,
    /// Slowest release that still counts as a swipe.
    pub swipe_min_velocity: f64,
    /// Distance after which a contact is considered swiping.
    pub swipe_threshold: f32,
    /// Movement allowed during a tap or long press.
    pub tap_max_distance: f32,
    /// Longest contact that still counts as a tap.
    pub tap_max_duration: u64,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            capture_events: false,
            double_tap_max_delay: 250,
            enable_pressure: false,
            enable_relative_coordinates: true,
            enable_swipe: true,
            enable_tap: true,
            long_press_delay: 600,
            suppress_tap_on_double_tap: false,
            suppress_tap_on_long_press: true,
            swipe_max_duration: 500,
            swipe_min_velocity: 0.2,
            swipe_threshold: 20.0,
            tap_max_distance: 8.0,
            tap_max_duration: 200,
        }
    }
}

impl GestureOptions {
    /// Parse options from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_yaml_ng::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a `.toml`, `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_str() {
            "toml" => Self::from_toml_str,
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        let source = fs::read_to_string(path)?;
        let options = parse(&source)?;
        log::debug!("loaded gesture options from {}", path.display());
        Ok(options)
    }

    /// Check that every threshold is a finite, non-negative number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("swipeThreshold", self.swipe_threshold)?;
        check_distance("tapMaxDistance", self.tap_max_distance)?;
        if !self.swipe_min_velocity.is_finite() || self.swipe_min_velocity < 0.0 {
            return Err(ConfigError::Invalid {
                field: "swipeMinVelocity",
                reason: format!("expected a finite value >= 0, got {}", self.swipe_min_velocity),
            });
        }
        Ok(())
    }

    /// Whether taps are held back for suppression checks instead of emitted
    /// on release.
    #[must_use]
    pub const fn holds_taps(&self) -> bool {
        self.suppress_tap_on_double_tap || self.suppress_tap_on_long_press
    }

    /// Squared radius within which two taps count as the same spot.
    #[must_use]
    pub fn double_tap_radius_squared(&self) -> f32 {
        let radius = self.tap_max_distance * 1.5;
        radius * radius
    }
}

fn check_distance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_options_default() {
        let options = GestureOptions::default();
        assert!(!options.capture_events);
        assert_eq!(options.double_tap_max_delay, 250);
        assert!(!options.enable_pressure);
        assert!(options.enable_relative_coordinates);
        assert!(options.enable_swipe);
        assert!(options.enable_tap);
        assert_eq!(options.long_press_delay, 600);
        assert!(!options.suppress_tap_on_double_tap);
        assert!(options.suppress_tap_on_long_press);
        assert_eq!(options.swipe_max_duration, 500);
        assert!((options.swipe_min_velocity - 0.2).abs() < 1e-9);
        assert_eq!(options.swipe_threshold, 20.0);
        assert_eq!(options.tap_max_distance, 8.0);
        assert_eq!(options.tap_max_duration, 200);
    }

    #[test]
    fn test_holds_taps() {
        let mut options = GestureOptions {
            suppress_tap_on_double_tap: false,
            suppress_tap_on_long_press: false,
            ..Default::default()
        };
        assert!(!options.holds_taps());

        options.suppress_tap_on_long_press = true;
        assert!(options.holds_taps());

        options.suppress_tap_on_long_press = false;
        options.suppress_tap_on_double_tap = true;
        assert!(options.holds_taps());
    }

    #[test]
    fn test_double_tap_radius_squared() {
        let options = GestureOptions {
            tap_max_distance: 10.0,
            ..Default::default()
        };
        assert!((options.double_tap_radius_squared() - 225.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_toml_partial() {
        let options = GestureOptions::from_toml_str(
            "tapMaxDistance = 12.0\nsuppressTapOnDoubleTap = true\n",
        )
        .unwrap();
        assert_eq!(options.tap_max_distance, 12.0);
        assert!(options.suppress_tap_on_double_tap);
        assert_eq!(options.long_press_delay, 600);
    }

    #[test]
    fn test_from_yaml() {
        let options =
            GestureOptions::from_yaml_str("longPressDelay: 900\nenableSwipe: false\n").unwrap();
        assert_eq!(options.long_press_delay, 900);
        assert!(!options.enable_swipe);
    }

    #[test]
    fn test_from_json() {
        let options = GestureOptions::from_json_str(r#"{"swipeMinVelocity": 0.5}"#).unwrap();
        assert!((options.swipe_min_velocity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GestureOptions::from_json_str(r#"{"tapSlop": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = GestureOptions::from_toml_str("swipeThreshold = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "swipeThreshold",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_velocity_rejected() {
        let options = GestureOptions {
            swipe_min_velocity: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_load_unsupported_extension() {
        let err = GestureOptions::load("options.ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GestureOptions::load("/nonexistent/gestura/options.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = toml::to_string(&GestureOptions::default()).unwrap();
        assert!(text.contains("tapMaxDuration = 200"));
        assert_eq!(
            GestureOptions::from_toml_str(&text).unwrap(),
            GestureOptions::default()
        );
    }
}
