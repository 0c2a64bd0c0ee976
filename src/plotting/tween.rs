/// Cubic ease-in-out, the default easing of chart transitions.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// An animated scalar that can be retargeted mid-flight.
///
/// Times are in milliseconds on whatever clock the caller samples with.
/// Retargeting starts a new transition from the value currently shown, so a
/// burst of updates never queues.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Tween {
    /// A tween resting at `value`.
    pub fn fixed(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
        }
    }

    pub fn new(from: f64, to: f64, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn value_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = ease_cubic_in_out((now - self.start) / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.duration <= 0.0 || now >= self.start + self.duration
    }

    /// Head for `to` from wherever the tween is at `now`.
    pub fn retarget(&mut self, to: f64, now: f64, duration: f64) {
        let current = self.value_at(now);
        *self = Self::new(current, to, now, duration);
    }
}
