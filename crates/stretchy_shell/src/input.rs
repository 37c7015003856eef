use bevy::input::touch::Touch;
use bevy::prelude::*;

/// Pointer travel (logical px) before a press is treated as a drag.
pub const DRAG_SLOP: f32 = 8.0;

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

pub fn pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input.iter().next().map(Touch::position)
    }
}

pub fn any_just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_released(MouseButton::Left)
        || touch_input.any_just_released()
        || touch_input.any_just_canceled()
}

/// Drag gesture reported in window coordinates (y grows downwards).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerDrag {
    /// Movement since the previous report.
    Delta(Vec2),
    /// The pointer was lifted after a drag.
    Stopped,
}

/// Turns a stream of pointer positions into drag deltas.
///
/// A press only becomes a drag once the pointer has travelled further than
/// [`DRAG_SLOP`], so taps on buttons never reach drag consumers.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DragTracker {
    start: Option<Vec2>,
    last: Option<Vec2>,
    dragging: bool,
}

impl DragTracker {
    pub fn press(&mut self, position: Vec2) {
        self.start = Some(position);
        self.last = Some(position);
        self.dragging = false;
    }

    /// Records a new pointer position, returning the delta once the drag has started.
    pub fn move_to(&mut self, position: Vec2) -> Option<Vec2> {
        let start = self.start?;
        let last = self.last.unwrap_or(start);

        if !self.dragging {
            if position.distance(start) <= DRAG_SLOP {
                return None;
            }
            self.dragging = true;
        }

        self.last = Some(position);
        let delta = position - last;
        (delta != Vec2::ZERO).then_some(delta)
    }

    /// Ends the gesture. Returns `true` if it had turned into a drag.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.dragging;
        *self = Self::default();
        was_dragging
    }

    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }
}

pub struct PointerDragPlugin;

impl Plugin for PointerDragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragTracker>()
            .add_event::<PointerDrag>()
            .add_systems(PreUpdate, track_pointer_drag.after(bevy::input::InputSystem));
    }
}

pub fn track_pointer_drag(
    button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut tracker: ResMut<DragTracker>,
    mut drag_events: EventWriter<PointerDrag>,
) {
    if let Some(position) = just_pressed_screen_position(&button_input, &touch_input, &windows) {
        tracker.press(position);
        return;
    }

    if let Some(position) = pressed_screen_position(&button_input, &touch_input, &windows) {
        if let Some(delta) = tracker.move_to(position) {
            drag_events.send(PointerDrag::Delta(delta));
        }
    }

    if any_just_released(&button_input, &touch_input) && tracker.release() {
        drag_events.send(PointerDrag::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_without_press_reports_nothing() {
        let mut tracker = DragTracker::default();
        assert_eq!(tracker.move_to(Vec2::new(10.0, 10.0)), None);
        assert!(!tracker.release());
    }

    #[test]
    fn movement_inside_slop_is_not_a_drag() {
        let mut tracker = DragTracker::default();
        tracker.press(Vec2::new(100.0, 100.0));

        assert_eq!(tracker.move_to(Vec2::new(100.0, 105.0)), None);
        assert!(!tracker.is_dragging());
        assert!(!tracker.release());
    }

    #[test]
    fn first_delta_covers_the_slop_then_follows_pointer() {
        let mut tracker = DragTracker::default();
        tracker.press(Vec2::new(100.0, 100.0));

        assert_eq!(
            tracker.move_to(Vec2::new(100.0, 112.0)),
            Some(Vec2::new(0.0, 12.0))
        );
        assert_eq!(
            tracker.move_to(Vec2::new(100.0, 110.0)),
            Some(Vec2::new(0.0, -2.0))
        );
        assert!(tracker.is_dragging());
    }

    #[test]
    fn stationary_pointer_reports_no_delta() {
        let mut tracker = DragTracker::default();
        tracker.press(Vec2::ZERO);
        tracker.move_to(Vec2::new(0.0, 20.0));

        assert_eq!(tracker.move_to(Vec2::new(0.0, 20.0)), None);
    }

    #[test]
    fn release_resets_the_tracker() {
        let mut tracker = DragTracker::default();
        tracker.press(Vec2::ZERO);
        tracker.move_to(Vec2::new(0.0, 50.0));

        assert!(tracker.release());
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.move_to(Vec2::new(0.0, 60.0)), None);
    }
}
