//! Interpolated values: start a run of one or more eased segments, sample it at any
//! instant, settle it once finished, or stop it where it is.

use crate::easing::CubicBezier;
use std::time::{Duration, Instant};

/// Values that can be blended linearly.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// 2D offset in layout units; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        Self::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

/// One eased leg of a run: from wherever the previous leg ended to `to`.
#[derive(Debug, Clone, Copy)]
pub struct Segment<T> {
    pub to: T,
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl<T> Segment<T> {
    pub const fn new(to: T, duration: Duration, easing: CubicBezier) -> Self {
        Self {
            to,
            duration,
            easing,
        }
    }
}

#[derive(Debug, Clone)]
struct Run<T> {
    from: T,
    segments: Vec<Segment<T>>,
    started: Instant,
}

impl<T: Lerp> Run<T> {
    fn ends_at(&self) -> Instant {
        self.started + self.segments.iter().map(|s| s.duration).sum::<Duration>()
    }

    fn final_value(&self) -> T {
        self.segments.last().map_or(self.from, |s| s.to)
    }

    fn value_at(&self, now: Instant) -> T {
        let mut elapsed = now.saturating_duration_since(self.started);
        let mut from = self.from;
        for seg in &self.segments {
            if elapsed < seg.duration {
                let t = elapsed.as_secs_f32() / seg.duration.as_secs_f32();
                return from.lerp(seg.to, seg.easing.ease(t));
            }
            elapsed -= seg.duration;
            from = seg.to;
        }
        from
    }
}

/// An animatable value. At most one run is active; starting a new one replaces it,
/// continuing from the value the old run had reached.
#[derive(Debug, Clone)]
pub struct Animated<T> {
    value: T,
    run: Option<Run<T>>,
}

impl<T: Lerp> Animated<T> {
    pub const fn new(value: T) -> Self {
        Self { value, run: None }
    }

    /// Jump to `value`, dropping any active run.
    pub fn set(&mut self, value: T) {
        self.run = None;
        self.value = value;
    }

    pub fn animate(&mut self, now: Instant, segment: Segment<T>) {
        self.sequence(now, vec![segment]);
    }

    /// Run `segments` back to back, starting at `now`.
    pub fn sequence(&mut self, now: Instant, segments: Vec<Segment<T>>) {
        let from = self.sample(now);
        self.run = Some(Run {
            from,
            segments,
            started: now,
        });
    }

    /// Value at `now`, without mutating.
    pub fn sample(&self, now: Instant) -> T {
        self.run.as_ref().map_or(self.value, |run| run.value_at(now))
    }

    /// Last committed value (ignores any active run).
    #[cfg(test)]
    pub fn value(&self) -> T {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    #[cfg(test)]
    pub fn ends_at(&self) -> Option<Instant> {
        self.run.as_ref().map(Run::ends_at)
    }

    /// Commit the run's final value if it has finished by `now`.
    /// Returns true only on the call that completes it.
    pub fn settle(&mut self, now: Instant) -> bool {
        let done = self.run.as_ref().is_some_and(|run| now >= run.ends_at());
        if done {
            if let Some(run) = self.run.take() {
                self.value = run.final_value();
            }
        }
        done
    }

    /// Cancel the active run, freezing the value where it is at `now`.
    pub fn stop(&mut self, now: Instant) {
        if let Some(run) = self.run.take() {
            self.value = run.value_at(now);
        }
    }
}
