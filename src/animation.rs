//! Spring-driven animated value with a start-up delay.
//!
//! The gauge hands its clamped percent to a [`SpringValue`] and reads the
//! interpolated value back once per frame. A new target only takes effect
//! after the configured delay; until then the spring keeps settling
//! toward whatever it was approaching before.

use std::time::Duration;

/// Physical parameters of the spring. Defaults give a lively,
/// slightly bouncy approach (damping ratio 0.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
    /// Snap to the target instead of overshooting it.
    pub overshoot_clamping: bool,
    pub rest_displacement_threshold: f64,
    pub rest_speed_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
            overshoot_clamping: false,
            rest_displacement_threshold: 0.01,
            rest_speed_threshold: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTarget {
    target: f64,
    remaining: Duration,
}

#[derive(Debug, Clone)]
pub struct SpringValue {
    value: f64,
    velocity: f64,
    target: f64,
    pending: Option<PendingTarget>,
    delay: Duration,
    config: SpringConfig,
}

impl SpringValue {
    pub fn new(initial: f64, delay: Duration, config: SpringConfig) -> Self {
        Self {
            value: initial,
            velocity: 0.0,
            target: initial,
            pending: None,
            delay,
            config,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The most recently requested target, whether or not its delay has elapsed.
    pub fn target(&self) -> f64 {
        self.pending.map_or(self.target, |pending| pending.target)
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.value == self.target && self.velocity == 0.0
    }

    /// Swaps the spring parameters and delay, keeping the current motion.
    pub fn retune(&mut self, delay: Duration, config: SpringConfig) {
        self.delay = delay;
        self.config = config;
    }

    /// Schedules a new target. Repeating the current target is a no-op,
    /// so it does not restart the delay.
    pub fn set_target(&mut self, target: f64) {
        if target == self.target() {
            return;
        }
        self.pending = Some(PendingTarget {
            target,
            remaining: self.delay,
        });
    }

    /// Advances the animation by one frame of length `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let Some(mut pending) = self.pending.take() else {
            self.step(dt.as_secs_f64());
            return;
        };
        if pending.remaining > dt {
            pending.remaining -= dt;
            self.pending = Some(pending);
            self.step(dt.as_secs_f64());
            return;
        }
        self.step(pending.remaining.as_secs_f64());
        self.target = pending.target;
        self.step((dt - pending.remaining).as_secs_f64());
    }

    /// Integrates the damped oscillator exactly over `seconds`, starting
    /// from the current position and velocity.
    fn step(&mut self, seconds: f64) {
        if seconds <= 0.0 || (self.value == self.target && self.velocity == 0.0) {
            return;
        }
        let SpringConfig {
            damping,
            mass,
            stiffness,
            ..
        } = self.config;
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());
        let omega0 = (stiffness / mass).sqrt();
        let d0 = self.value - self.target;
        let v0 = self.velocity;

        let (displacement, velocity) = if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega0 * seconds).exp();
            let b = (v0 + zeta * omega0 * d0) / omega1;
            let (sin, cos) = (omega1 * seconds).sin_cos();
            (
                decay * (d0 * cos + b * sin),
                decay * (v0 * cos - (zeta * omega0 * b + omega1 * d0) * sin),
            )
        } else {
            // critically damped form, also used for overdamped springs
            let decay = (-omega0 * seconds).exp();
            let c = v0 + omega0 * d0;
            (decay * (d0 + c * seconds), decay * (v0 - omega0 * c * seconds))
        };

        let crossed = d0 != 0.0 && displacement.signum() != d0.signum();
        let at_rest = velocity.abs() < self.config.rest_speed_threshold
            && displacement.abs() < self.config.rest_displacement_threshold;
        if at_rest || (self.config.overshoot_clamping && crossed) {
            self.value = self.target;
            self.velocity = 0.0;
        } else {
            self.value = self.target + displacement;
            self.velocity = velocity;
        }
    }
}
