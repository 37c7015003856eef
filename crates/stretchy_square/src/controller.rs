//! Drag state machine of the stretchy square.
//!
//! The controller is fed layout, drag-delta and drag-stop events and answers
//! per-frame queries (offset, stretch factor, outline). Positions are window
//! coordinates: `y_coordinate` is the distance of the widget's top edge from
//! the top of the screen.

use bevy::log::debug;
use bevy::prelude::Resource;
use strum::Display;

use crate::bounds::{OutlineRect, StretchedOutline, compute_outline};
use crate::settings::{SquareSettings, StickyThresholdFn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SquarePhase {
    /// Resting against an edge, stretching with the finger.
    #[default]
    Stuck,
    /// The sticky threshold was crossed during the current drag.
    JustUnstuck,
    /// The drag ended and the widget springs back to a rail.
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub y_coordinate: f32,
    pub absolute_translation: f32,
    pub potentially_at_top: bool,
    pub stuck: bool,
    pub screen_height: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            y_coordinate: 0.0,
            absolute_translation: 0.0,
            potentially_at_top: true,
            stuck: true,
            screen_height: 0.0,
        }
    }
}

/// The drag crossed the sticky threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unstuck {
    pub translation: f32,
    pub potentially_at_top: bool,
}

/// The drag ended and the widget went back to a rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settled {
    /// Distance pulled from the resting edge right before the release.
    pub translation: f32,
    pub potentially_at_top: bool,
    /// `false` when the drag had crossed the sticky threshold.
    pub was_stuck: bool,
}

pub fn is_in_top_half(y_coordinate: f32, widget_size: f32, screen_height: f32) -> bool {
    y_coordinate + widget_size / 2.0 <= screen_height / 2.0
}

#[derive(Resource, Debug, Clone)]
pub struct DragInteractionController {
    widget_size: f32,
    sticky_threshold: StickyThresholdFn,
    state: InteractionState,
    phase: SquarePhase,
}

impl DragInteractionController {
    pub fn new(widget_size: f32, sticky_threshold: StickyThresholdFn) -> Self {
        Self {
            widget_size,
            sticky_threshold,
            state: InteractionState::default(),
            phase: SquarePhase::default(),
        }
    }

    pub fn from_settings(settings: &SquareSettings) -> Self {
        Self::new(settings.widget_size, settings.sticky_threshold)
    }

    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    pub const fn phase(&self) -> SquarePhase {
        self.phase
    }

    pub const fn widget_size(&self) -> f32 {
        self.widget_size
    }

    pub const fn potentially_at_top(&self) -> bool {
        self.state.potentially_at_top
    }

    pub const fn is_stuck(&self) -> bool {
        self.state.stuck
    }

    /// Travel between the top and bottom resting positions.
    pub fn drag_range(&self) -> f32 {
        self.state.screen_height - self.widget_size
    }

    /// No movement is possible until a layout leaves room to travel.
    pub fn has_valid_layout(&self) -> bool {
        let range = self.drag_range();
        range.is_finite() && range > 0.0
    }

    pub fn sticky_threshold(&self) -> f32 {
        (self.sticky_threshold)(
            self.state.screen_height,
            self.widget_size,
            self.state.potentially_at_top,
        )
    }

    pub fn on_layout(&mut self, screen_height: f32) {
        if (self.state.screen_height - screen_height).abs() <= f32::EPSILON {
            return;
        }
        self.state.screen_height = screen_height;

        // Keep the widget on its rail (or at its pull distance from it) for the new range.
        let range = self.drag_range().max(0.0);
        let state = &mut self.state;
        state.y_coordinate = match self.phase {
            _ if range <= 0.0 => 0.0,
            SquarePhase::Normal if state.potentially_at_top => 0.0,
            SquarePhase::Normal => range,
            SquarePhase::Stuck if !state.potentially_at_top => {
                (range - state.absolute_translation).clamp(0.0, range)
            }
            SquarePhase::Stuck | SquarePhase::JustUnstuck => state.y_coordinate.clamp(0.0, range),
        };
        debug!(
            "Square layout: screen height {screen_height}, drag range {}",
            self.drag_range()
        );
    }

    /// Moves the widget by `delta` pixels (positive is downwards).
    ///
    /// Returns [`Unstuck`] the first time the drag crosses the sticky threshold.
    pub fn on_drag_delta(&mut self, delta: f32) -> Option<Unstuck> {
        if !self.has_valid_layout() || !delta.is_finite() {
            return None;
        }

        let state = &mut self.state;
        // Classified from the position before this event, so the top/bottom
        // decision lags one event behind and does not flicker at the midpoint.
        state.potentially_at_top =
            is_in_top_half(state.y_coordinate, self.widget_size, state.screen_height);

        let drag_range = state.screen_height - self.widget_size;
        state.y_coordinate = (state.y_coordinate + delta).clamp(0.0, drag_range);

        state.absolute_translation = if state.potentially_at_top {
            state.y_coordinate
        } else {
            state.screen_height - state.y_coordinate - self.widget_size
        };

        if !state.stuck {
            return None;
        }

        let threshold = self.sticky_threshold();
        self.state.stuck = self.state.absolute_translation < threshold;
        let phase = if self.state.stuck {
            SquarePhase::Stuck
        } else {
            SquarePhase::JustUnstuck
        };
        self.set_phase(phase);

        (!self.state.stuck).then_some(Unstuck {
            translation: self.state.absolute_translation,
            potentially_at_top: self.state.potentially_at_top,
        })
    }

    /// Ends the drag: the widget goes back to the nearest rail and sticks again.
    pub fn on_drag_stopped(&mut self) -> Settled {
        self.set_phase(SquarePhase::Normal);

        let potentially_at_top = if self.has_valid_layout() {
            is_in_top_half(
                self.state.y_coordinate,
                self.widget_size,
                self.state.screen_height,
            )
        } else {
            self.state.potentially_at_top
        };
        let settled = Settled {
            translation: self.state.absolute_translation,
            potentially_at_top,
            was_stuck: self.state.stuck,
        };

        let rail = if potentially_at_top || !self.has_valid_layout() {
            0.0
        } else {
            self.drag_range()
        };
        self.state = InteractionState {
            y_coordinate: rail,
            absolute_translation: 0.0,
            potentially_at_top,
            stuck: true,
            screen_height: self.state.screen_height,
        };

        settled
    }

    /// Progress towards the sticky threshold, always within `0..=1`.
    pub fn stretch_factor(&self) -> f32 {
        if !self.state.stuck {
            return 0.0;
        }
        let threshold = self.sticky_threshold();
        if !threshold.is_finite() || threshold <= 0.0 {
            return 0.0;
        }
        let factor = self.state.absolute_translation / threshold;
        if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        }
    }

    /// Vertical offset of the widget's top edge from the top of the screen.
    pub fn frame_offset(&self) -> f32 {
        if !self.has_valid_layout() {
            return 0.0;
        }
        match self.phase {
            SquarePhase::Stuck if self.state.potentially_at_top => 0.0,
            SquarePhase::Stuck => self.drag_range(),
            SquarePhase::JustUnstuck | SquarePhase::Normal => self.state.y_coordinate,
        }
    }

    /// Box the silhouette is drawn in: it grows with the pull while stuck.
    pub fn outline_rect(&self) -> OutlineRect {
        let end_y = if self.state.stuck {
            self.widget_size + self.state.absolute_translation.max(0.0)
        } else {
            self.widget_size
        };
        OutlineRect::new(0.0, self.widget_size, 0.0, end_y)
    }

    pub fn current_outline(&self) -> StretchedOutline {
        compute_outline(&self.outline_rect(), self.stretch_factor())
    }

    fn set_phase(&mut self, phase: SquarePhase) {
        if self.phase != phase {
            debug!("Square phase {} -> {phase}", self.phase);
            self.phase = phase;
        }
    }
}
