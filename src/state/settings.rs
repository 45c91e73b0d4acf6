/// Overlay settings with validation
///
/// Out-of-range values are clamped into range at the store boundary, never
/// stored as-is. Each clamp is reported as a [`SettingsError::InvalidValue`]
/// so callers can log what was adjusted.
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::SettingsError;

pub const DURATION_RANGE: RangeInclusive<i64> = 1..=120;
pub const WIDTH_RANGE: RangeInclusive<i64> = 200..=800;
pub const HEIGHT_RANGE: RangeInclusive<i64> = 100..=400;

pub const DEFAULT_TIMER_DURATION_SECS: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySize {
    pub width: u32,
    pub height: u32,
}

/// User-facing settings, as exchanged with the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Countdown length in seconds (1-120)
    #[serde(rename = "timerDuration")]
    pub timer_duration_secs: u32,

    /// Play the low-time warning
    pub sound_enabled: bool,

    /// Overlay top-left corner in screen pixels
    pub overlay_position: OverlayPosition,

    /// Overlay size in pixels (width 200-800, height 100-400)
    pub overlay_size: OverlaySize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_duration_secs: DEFAULT_TIMER_DURATION_SECS,
            sound_enabled: true,
            overlay_position: OverlayPosition { x: 100, y: 100 },
            overlay_size: OverlaySize {
                width: 400,
                height: 200,
            },
        }
    }
}

/// Requested size before range checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePatch {
    pub width: i64,
    pub height: i64,
}

/// Partial update sent by `save-settings`. Missing fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(rename = "timerDuration", default)]
    pub timer_duration_secs: Option<i64>,

    #[serde(default)]
    pub sound_enabled: Option<bool>,

    #[serde(default)]
    pub overlay_position: Option<OverlayPosition>,

    #[serde(default)]
    pub overlay_size: Option<SizePatch>,
}

impl SettingsPatch {
    /// Parse a patch received from the presentation layer
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Malformed)
    }

    pub fn duration(secs: i64) -> Self {
        Self {
            timer_duration_secs: Some(secs),
            ..Self::default()
        }
    }

    pub fn sound(enabled: bool) -> Self {
        Self {
            sound_enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn position(x: i32, y: i32) -> Self {
        Self {
            overlay_position: Some(OverlayPosition { x, y }),
            ..Self::default()
        }
    }

    pub fn size(width: i64, height: i64) -> Self {
        Self {
            overlay_size: Some(SizePatch { width, height }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Clamp `value` into `range`, reporting the adjustment if one was needed
fn clamp_field(
    field: &'static str,
    value: i64,
    range: &RangeInclusive<i64>,
    adjustments: &mut Vec<SettingsError>,
) -> u32 {
    let (min, max) = (*range.start(), *range.end());
    if !range.contains(&value) {
        adjustments.push(SettingsError::InvalidValue {
            field,
            value,
            min,
            max,
        });
    }
    // The ranges are all inside u32
    value.clamp(min, max) as u32
}

impl Settings {
    /// Shallow-merge `patch` into a copy of these settings.
    ///
    /// Returns the merged settings together with every clamp that was applied.
    pub fn merged(&self, patch: &SettingsPatch) -> (Settings, Vec<SettingsError>) {
        let mut next = *self;
        let mut adjustments = Vec::new();

        if let Some(secs) = patch.timer_duration_secs {
            next.timer_duration_secs =
                clamp_field("timerDuration", secs, &DURATION_RANGE, &mut adjustments);
        }

        if let Some(enabled) = patch.sound_enabled {
            next.sound_enabled = enabled;
        }

        if let Some(position) = patch.overlay_position {
            next.overlay_position = position;
        }

        if let Some(size) = patch.overlay_size {
            next.overlay_size = OverlaySize {
                width: clamp_field("overlaySize.width", size.width, &WIDTH_RANGE, &mut adjustments),
                height: clamp_field(
                    "overlaySize.height",
                    size.height,
                    &HEIGHT_RANGE,
                    &mut adjustments,
                ),
            };
        }

        (next, adjustments)
    }

    /// Bring every field into range (used for settings coming from config)
    pub fn sanitized(&self) -> (Settings, Vec<SettingsError>) {
        Settings::default().merged(&SettingsPatch {
            timer_duration_secs: Some(i64::from(self.timer_duration_secs)),
            sound_enabled: Some(self.sound_enabled),
            overlay_position: Some(self.overlay_position),
            overlay_size: Some(SizePatch {
                width: i64::from(self.overlay_size.width),
                height: i64::from(self.overlay_size.height),
            }),
        })
    }

    /// Check that every field is in range
    pub fn validate(&self) -> Result<(), Vec<SettingsError>> {
        let (_, adjustments) = self.sanitized();
        if adjustments.is_empty() {
            Ok(())
        } else {
            Err(adjustments)
        }
    }

    pub fn geometry_differs(&self, other: &Settings) -> bool {
        self.overlay_position != other.overlay_position || self.overlay_size != other.overlay_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.timer_duration_secs, 45);
        assert!(settings.sound_enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_is_shallow() {
        let settings = Settings::default();
        let (next, adjustments) = settings.merged(&SettingsPatch::sound(false));

        assert!(adjustments.is_empty());
        assert!(!next.sound_enabled);
        assert_eq!(next.timer_duration_secs, settings.timer_duration_secs);
        assert_eq!(next.overlay_size, settings.overlay_size);
    }

    #[test]
    fn test_duration_is_clamped() {
        let settings = Settings::default();

        let (next, adjustments) = settings.merged(&SettingsPatch::duration(200));
        assert_eq!(next.timer_duration_secs, 120);
        assert_eq!(adjustments.len(), 1);

        let (next, _) = settings.merged(&SettingsPatch::duration(0));
        assert_eq!(next.timer_duration_secs, 1);

        let (next, _) = settings.merged(&SettingsPatch::duration(-5));
        assert_eq!(next.timer_duration_secs, 1);
    }

    #[test]
    fn test_size_is_clamped_per_axis() {
        let (next, adjustments) = Settings::default().merged(&SettingsPatch::size(1000, 50));
        assert_eq!(
            next.overlay_size,
            OverlaySize {
                width: 800,
                height: 100
            }
        );
        assert_eq!(adjustments.len(), 2);
    }

    #[test]
    fn test_patch_json_uses_panel_field_names() {
        let json = r#"{"timerDuration": 30, "overlaySize": {"width": 300, "height": 150}}"#;
        let patch = SettingsPatch::from_json(json).unwrap();
        assert_eq!(patch.timer_duration_secs, Some(30));
        assert_eq!(patch.sound_enabled, None);
        assert_eq!(
            patch.overlay_size,
            Some(SizePatch {
                width: 300,
                height: 150
            })
        );
    }

    #[test]
    fn test_malformed_patch_is_rejected() {
        let result = SettingsPatch::from_json(r#"{"soundEnabled": "loud"}"#);
        assert!(matches!(result, Err(SettingsError::Malformed(_))));
    }

    #[test]
    fn test_settings_serialization() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["timerDuration"], 45);
        assert_eq!(json["soundEnabled"], true);
        assert_eq!(json["overlayPosition"]["x"], 100);
        assert_eq!(json["overlaySize"]["height"], 200);
    }

    #[test]
    fn test_sanitized_fixes_out_of_range_config() {
        let mut settings = Settings::default();
        settings.timer_duration_secs = 500;
        settings.overlay_size.width = 10;

        assert!(settings.validate().is_err());
        let (fixed, adjustments) = settings.sanitized();
        assert_eq!(fixed.timer_duration_secs, 120);
        assert_eq!(fixed.overlay_size.width, 200);
        assert_eq!(adjustments.len(), 2);
    }
}
