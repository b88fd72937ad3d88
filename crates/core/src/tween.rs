//! Time-based interpolation for camera properties
//!
//! A tween is advanced by the host tick. Starting a new tween on a property
//! replaces the old one, so the last gesture always wins.

use crate::types::Vec2;

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    Power1Out,
    ExpoInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::ExpoInOut => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    0.5 * 2f64.powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * 2f64.powf(-20.0 * t + 10.0)
                }
            }
        }
    }
}

/// Values that can be interpolated.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f64) -> Self {
        Vec2::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub duration_ms: u32,
    pub elapsed_ms: f64,
    pub ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration_ms: u32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            ease,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms as f64).min(1.0)
        }
    }

    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.ease.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Step forward and return the current value.
    pub fn advance(&mut self, elapsed_ms: f64) -> T {
        self.elapsed_ms += elapsed_ms.max(0.0);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_hit_endpoints() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::ExpoInOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
        assert_eq!(Ease::Power1Out.apply(0.5), 0.75);
        assert_eq!(Ease::ExpoInOut.apply(0.5), 0.5);
    }

    #[test]
    fn tween_reaches_target() {
        let mut t = Tween::new(1.0, 2.0, 100, Ease::Linear);
        assert_eq!(t.advance(50.0), 1.5);
        assert!(!t.is_finished());
        assert_eq!(t.advance(80.0), 2.0);
        assert!(t.is_finished());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let t = Tween::new(Vec2::ZERO, Vec2::new(4.0, 2.0), 0, Ease::ExpoInOut);
        assert!(t.is_finished());
        assert_eq!(t.value(), Vec2::new(4.0, 2.0));
    }
}
