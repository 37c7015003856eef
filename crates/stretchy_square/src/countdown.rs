use core::time::Duration;

use bevy::prelude::*;

pub const DONE_LABEL: &str = "Done!";

pub fn format_min_sec(total_seconds: u64) -> String {
    format!("{} : {}", total_seconds / 60, total_seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Whole seconds left, reported each time the value changes.
    Running(u64),
    Finished,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    timer: Timer,
    last_reported: u64,
}

impl Countdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            timer: Timer::new(Duration::from_secs(seconds), TimerMode::Once),
            last_reported: seconds,
        }
    }

    /// Rounded up, so the display reads `1` until the very end.
    pub fn seconds_remaining(&self) -> u64 {
        let remaining = self.timer.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    pub fn is_finished(&self) -> bool {
        self.timer.finished()
    }

    pub fn tick(&mut self, delta: Duration) -> Option<CountdownTick> {
        if self.timer.finished() {
            return None;
        }
        self.timer.tick(delta);
        if self.timer.just_finished() {
            self.last_reported = 0;
            return Some(CountdownTick::Finished);
        }

        let seconds = self.seconds_remaining();
        (seconds != self.last_reported).then(|| {
            self.last_reported = seconds;
            CountdownTick::Running(seconds)
        })
    }
}

/// Holds the widget's single countdown.
///
/// A finished countdown stays in the slot so its "done" state can be shown,
/// but only an unfinished one counts as active.
#[derive(Resource, Debug, Default)]
pub struct CountdownSlot {
    countdown: Option<Countdown>,
}

impl CountdownSlot {
    /// Starts a new countdown, returning the one it cancelled if that was still running.
    pub fn start(&mut self, seconds: u64) -> Option<Countdown> {
        let previous = self.countdown.replace(Countdown::new(seconds));
        previous.filter(|countdown| !countdown.is_finished())
    }

    /// Drops the countdown, returning it if it was still running.
    pub fn cancel(&mut self) -> Option<Countdown> {
        self.countdown
            .take()
            .filter(|countdown| !countdown.is_finished())
    }

    pub fn is_active(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(|countdown| !countdown.is_finished())
    }

    pub const fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn tick(&mut self, delta: Duration) -> Option<CountdownTick> {
        self.countdown.as_mut()?.tick(delta)
    }
}

/// Text shown above the widget.
///
/// While the widget sticks, the running countdown is shown, or a preview of the
/// countdown the current pull would start.
pub fn countdown_label(stuck: bool, slot: &CountdownSlot, translation: f32) -> String {
    if !stuck {
        return format_min_sec(0);
    }
    match slot.countdown() {
        Some(countdown) if countdown.is_finished() => DONE_LABEL.to_string(),
        Some(countdown) => format_min_sec(countdown.seconds_remaining()),
        None => format_min_sec(whole_seconds(translation)),
    }
}

/// Pulled pixels map one-to-one to countdown seconds.
pub fn whole_seconds(translation: f32) -> u64 {
    if translation.is_finite() && translation > 0.0 {
        translation as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_min_sec(0), "0 : 0");
        assert_eq!(format_min_sec(59), "0 : 59");
        assert_eq!(format_min_sec(151), "2 : 31");
    }

    #[test]
    fn whole_seconds_truncates_and_rejects_garbage() {
        assert_eq!(whole_seconds(151.9), 151);
        assert_eq!(whole_seconds(-3.0), 0);
        assert_eq!(whole_seconds(f32::NAN), 0);
    }

    #[test]
    fn countdown_reports_each_second_then_finishes() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.seconds_remaining(), 3);

        assert_eq!(countdown.tick(Duration::from_millis(500)), None);
        assert_eq!(
            countdown.tick(Duration::from_millis(600)),
            Some(CountdownTick::Running(2))
        );
        assert_eq!(
            countdown.tick(Duration::from_secs(1)),
            Some(CountdownTick::Running(1))
        );
        assert_eq!(
            countdown.tick(Duration::from_secs(1)),
            Some(CountdownTick::Finished)
        );
        assert!(countdown.is_finished());
        assert_eq!(countdown.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn starting_a_countdown_cancels_the_running_one() {
        let mut slot = CountdownSlot::default();
        assert!(slot.start(10).is_none());
        assert!(slot.is_active());

        let cancelled = slot.start(20);
        assert_eq!(cancelled.as_ref().map(Countdown::seconds_remaining), Some(10));
        assert!(slot.is_active());
        assert_eq!(slot.countdown().map(Countdown::seconds_remaining), Some(20));
    }

    #[test]
    fn replacing_a_finished_countdown_cancels_nothing() {
        let mut slot = CountdownSlot::default();
        slot.start(1);
        assert_eq!(slot.tick(Duration::from_secs(2)), Some(CountdownTick::Finished));
        assert!(!slot.is_active());

        assert!(slot.start(5).is_none());
        assert!(slot.is_active());
    }

    #[test]
    fn cancel_clears_the_slot() {
        let mut slot = CountdownSlot::default();
        assert!(slot.cancel().is_none());

        slot.start(5);
        assert!(slot.cancel().is_some());
        assert!(!slot.is_active());
        assert!(slot.countdown().is_none());
        assert_eq!(slot.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn label_previews_pull_shows_countdown_and_done() {
        let mut slot = CountdownSlot::default();
        assert_eq!(countdown_label(true, &slot, 75.4), "1 : 15");
        assert_eq!(countdown_label(false, &slot, 200.0), "0 : 0");

        slot.start(90);
        assert_eq!(countdown_label(true, &slot, 10.0), "1 : 30");

        slot.tick(Duration::from_secs(90));
        assert_eq!(countdown_label(true, &slot, 10.0), DONE_LABEL);
        assert_eq!(countdown_label(false, &slot, 10.0), "0 : 0");
    }
}
