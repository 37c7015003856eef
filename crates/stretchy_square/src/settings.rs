use core::time::Duration;

use bevy::prelude::*;
use stretchy_shell::toast::TOAST_DURATION;
use thiserror::Error;

pub const WIDGET_SIZE: f32 = 120.0;
pub const CURVE_STEPS: usize = 16;

pub const TOP_COLOR: Srgba = Srgba::rgb(0x33 as f32 / 255.0, 0xb5 as f32 / 255.0, 0xe5 as f32 / 255.0);
pub const BOTTOM_COLOR: Srgba = Srgba::rgb(1.0, 0xbb as f32 / 255.0, 0x33 as f32 / 255.0);

/// Distance the widget may be pulled from its resting edge before it lets go.
///
/// Arguments are the screen height, the widget size and whether the widget is
/// currently nearer to the top edge.
pub type StickyThresholdFn = fn(f32, f32, bool) -> f32;

/// A third of the screen, measured from the widget's center when it rests at the top.
pub fn third_of_screen(screen_height: f32, widget_size: f32, potentially_at_top: bool) -> f32 {
    if potentially_at_top {
        screen_height / 3.0 - widget_size / 2.0
    } else {
        screen_height / 3.0
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("Widget size must be a positive finite number, got {0}")]
    InvalidWidgetSize(f32),

    #[error("Curves need at least one step to be drawn")]
    NoCurveSteps,
}

#[derive(Resource, Debug, Clone)]
pub struct SquareSettings {
    pub widget_size: f32,
    pub sticky_threshold: StickyThresholdFn,
    pub top_color: Srgba,
    pub bottom_color: Srgba,
    /// Strokes the outline and marks its control points instead of filling it.
    pub debug_outline: bool,
    pub curve_steps: usize,
    pub toast_duration: Duration,
}

impl Default for SquareSettings {
    fn default() -> Self {
        Self {
            widget_size: WIDGET_SIZE,
            sticky_threshold: third_of_screen,
            top_color: TOP_COLOR,
            bottom_color: BOTTOM_COLOR,
            debug_outline: false,
            curve_steps: CURVE_STEPS,
            toast_duration: TOAST_DURATION,
        }
    }
}

impl SquareSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.widget_size.is_finite() || self.widget_size <= 0.0 {
            return Err(SettingsError::InvalidWidgetSize(self.widget_size));
        }
        if self.curve_steps == 0 {
            return Err(SettingsError::NoCurveSteps);
        }
        Ok(())
    }

    pub const fn accent_color(&self, potentially_at_top: bool) -> Srgba {
        if potentially_at_top {
            self.top_color
        } else {
            self.bottom_color
        }
    }
}

/// Replaces invalid settings with the defaults before anything reads them.
pub fn validate_settings(mut settings: ResMut<SquareSettings>) {
    if let Err(err) = settings.validate() {
        error!("Invalid square settings: {err}");
        warn!("Falling back to default square settings");
        *settings = SquareSettings::default();
    }
}
