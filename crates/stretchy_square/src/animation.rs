use crate::controller::SquarePhase;

/// Damping ratio of a noticeably bouncy spring.
pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;
pub const STIFFNESS_MEDIUM: f32 = 1500.0;

const SPRING_REST_THRESHOLD: f32 = 0.01;
// Keeps the integration stable for stiff springs at low frame rates.
const MAX_SPRING_STEP: f32 = 1.0 / 240.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Spring { damping_ratio: f32, stiffness: f32 },
    /// Ease-out over a fixed duration in seconds.
    Tween { duration: f32 },
}

impl Easing {
    pub const BOUNCY: Self = Self::Spring {
        damping_ratio: DAMPING_RATIO_MEDIUM_BOUNCY,
        stiffness: STIFFNESS_MEDIUM,
    };
}

/// The silhouette snaps back with a bounce when the widget lets go.
pub fn stretch_easing(from: SquarePhase, to: SquarePhase) -> Easing {
    match (from, to) {
        (SquarePhase::Stuck, SquarePhase::JustUnstuck) => Easing::BOUNCY,
        _ => Easing::Tween { duration: 0.1 },
    }
}

/// The widget bounces onto its rail after a release and tracks the finger 1:1 otherwise.
pub fn offset_easing(from: SquarePhase, to: SquarePhase) -> Easing {
    match (from, to) {
        (SquarePhase::JustUnstuck, SquarePhase::Normal) => Easing::BOUNCY,
        _ => Easing::Tween { duration: 0.001 },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    velocity: f32,
    target: f32,
    easing: Easing,
    tween_from: f32,
    tween_elapsed: f32,
}

impl AnimatedValue {
    pub const fn new(value: f32, easing: Easing) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            easing,
            tween_from: value,
            tween_elapsed: 0.0,
        }
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() <= f32::EPSILON && self.velocity.abs() <= f32::EPSILON
    }

    /// Retargets the animation, restarting from the current value.
    pub fn animate_to(&mut self, target: f32, easing: Easing) {
        if (target - self.target).abs() <= f32::EPSILON && easing == self.easing {
            return;
        }
        if !matches!(easing, Easing::Spring { .. }) {
            self.velocity = 0.0;
        }
        self.target = target;
        self.easing = easing;
        self.tween_from = self.value;
        self.tween_elapsed = 0.0;
    }

    pub fn snap_to(&mut self, value: f32) {
        *self = Self::new(value, self.easing);
    }

    pub fn update(&mut self, delta_secs: f32) -> f32 {
        if self.is_settled() || delta_secs <= 0.0 {
            return self.value;
        }
        match self.easing {
            Easing::Tween { duration } => self.step_tween(delta_secs, duration),
            Easing::Spring {
                damping_ratio,
                stiffness,
            } => self.step_spring(delta_secs, damping_ratio, stiffness),
        }
        self.value
    }

    fn step_tween(&mut self, delta_secs: f32, duration: f32) {
        self.tween_elapsed += delta_secs;
        if duration <= 0.0 || self.tween_elapsed >= duration {
            self.value = self.target;
            return;
        }
        let t = self.tween_elapsed / duration;
        let eased = 1.0 - (1.0 - t).powi(3);
        self.value = (self.target - self.tween_from).mul_add(eased, self.tween_from);
    }

    fn step_spring(&mut self, delta_secs: f32, damping_ratio: f32, stiffness: f32) {
        let damping = 2.0 * damping_ratio * stiffness.sqrt();
        let mut remaining = delta_secs;
        while remaining > 0.0 {
            let dt = remaining.min(MAX_SPRING_STEP);
            let force = stiffness.mul_add(self.target - self.value, -damping * self.velocity);
            self.velocity = force.mul_add(dt, self.velocity);
            self.value = self.velocity.mul_add(dt, self.value);
            remaining -= dt;
        }

        if (self.target - self.value).abs() < SPRING_REST_THRESHOLD
            && self.velocity.abs() < SPRING_REST_THRESHOLD
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn tween_reaches_target_after_its_duration() {
        let mut value = AnimatedValue::new(0.0, Easing::Tween { duration: 0.1 });
        value.animate_to(1.0, Easing::Tween { duration: 0.1 });

        let halfway = value.update(0.05);
        assert!(halfway > 0.5 && halfway < 1.0);

        assert_eq!(value.update(0.06), 1.0);
        assert!(value.is_settled());
    }

    #[test]
    fn near_instant_tween_tracks_in_one_frame() {
        let easing = offset_easing(SquarePhase::Stuck, SquarePhase::JustUnstuck);
        let mut value = AnimatedValue::new(0.0, easing);
        value.animate_to(240.0, easing);
        assert_eq!(value.update(FRAME), 240.0);
    }

    #[test]
    fn retargeting_restarts_from_current_value() {
        let easing = Easing::Tween { duration: 1.0 };
        let mut value = AnimatedValue::new(0.0, easing);
        value.animate_to(10.0, easing);
        let current = value.update(0.5);

        value.animate_to(0.0, easing);
        let next = value.update(0.01);
        assert!(next < current && next > 0.0);
    }

    #[test]
    fn bouncy_spring_overshoots_then_settles() {
        let mut value = AnimatedValue::new(0.0, Easing::BOUNCY);
        value.animate_to(100.0, Easing::BOUNCY);

        let mut peak = 0.0f32;
        for _ in 0..120 {
            peak = peak.max(value.update(FRAME));
        }
        assert!(peak > 100.0);
        assert_eq!(value.value(), 100.0);
        assert!(value.is_settled());
    }

    #[test]
    fn spring_survives_long_frames() {
        let mut value = AnimatedValue::new(0.0, Easing::BOUNCY);
        value.animate_to(1.0, Easing::BOUNCY);
        for _ in 0..10 {
            value.update(0.5);
        }
        assert_eq!(value.value(), 1.0);
    }

    #[test]
    fn easing_follows_phase_transitions() {
        assert_eq!(
            stretch_easing(SquarePhase::Stuck, SquarePhase::JustUnstuck),
            Easing::BOUNCY
        );
        assert_eq!(
            stretch_easing(SquarePhase::Stuck, SquarePhase::Normal),
            Easing::Tween { duration: 0.1 }
        );
        assert_eq!(
            offset_easing(SquarePhase::JustUnstuck, SquarePhase::Normal),
            Easing::BOUNCY
        );
        assert_eq!(
            offset_easing(SquarePhase::Normal, SquarePhase::Stuck),
            Easing::Tween { duration: 0.001 }
        );
    }

    #[test]
    fn snap_skips_the_animation() {
        let mut value = AnimatedValue::new(0.0, Easing::BOUNCY);
        value.animate_to(50.0, Easing::BOUNCY);
        value.snap_to(20.0);
        assert!(value.is_settled());
        assert_eq!(value.update(FRAME), 20.0);
    }
}
