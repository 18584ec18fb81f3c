//! Entrance and hover transition timing

use std::time::Duration;

/// Time for a mark to grow from radius 0 to its target radius
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(1000);
/// Extra delay per mark index, so the plot fills in progressively
pub const ENTRANCE_STAGGER: Duration = Duration::from_millis(2);
/// Duration of the hover emphasis / restore transition
pub const HOVER_TRANSITION: Duration = Duration::from_millis(200);

/// Entrance timing of one mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrance {
    pub delay: Duration,
    pub duration: Duration,
}

impl Entrance {
    /// Staggered entrance for the mark at `index`
    pub fn for_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        Self {
            delay: ENTRANCE_STAGGER.saturating_mul(index),
            duration: ENTRANCE_DURATION,
        }
    }

    /// Time at which the mark reaches its target radius
    pub fn ends_at(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Eased progress in [0, 1] at `elapsed` since the scene was built
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.ends_at() {
            return 1.0;
        }
        if elapsed <= self.delay || self.duration.is_zero() {
            return 0.0;
        }
        let t = (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        ease_cubic_in_out(t)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.ends_at()
    }
}

/// Symmetric cubic easing: slow start, fast middle, slow end
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
