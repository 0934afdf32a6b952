//! Screen controller: the loading switch, overlay opacity, and the animator's lifetime.

use crate::easing::CubicBezier;
use crate::shuffle::{ShuffleAnimator, Timing};
use crate::tween::{Animated, Segment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// Owns the "is loading" flag. The animator exists exactly while the overlay is visible.
#[derive(Debug)]
pub struct ScreenController {
    visibility: Visibility,
    opacity: Animated<f32>,
    animator: Option<ShuffleAnimator>,
    timing: Timing,
    fade: Duration,
    /// Seeds each mounted animator, so a seeded controller replays identically.
    rng: StdRng,
}

impl ScreenController {
    pub fn new(timing: Timing, fade: Duration, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            visibility: Visibility::Hidden,
            opacity: Animated::new(0.0),
            animator: None,
            timing,
            fade,
            rng,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_loading(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn animator(&self) -> Option<&ShuffleAnimator> {
        self.animator.as_ref()
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.opacity.sample(now)
    }

    /// Hidden, but the fade-out has not reached zero yet.
    pub fn is_fading(&self, now: Instant) -> bool {
        self.visibility == Visibility::Hidden && self.opacity(now) > 0.0
    }

    pub fn toggle(&mut self, now: Instant) -> Visibility {
        match self.visibility {
            Visibility::Hidden => self.show(now),
            Visibility::Visible => self.hide(now),
        }
        self.visibility
    }

    /// Snap to fully opaque and mount a fresh animator; its first cycle starts now.
    pub fn show(&mut self, now: Instant) {
        if self.visibility == Visibility::Visible {
            return;
        }
        self.opacity.set(1.0);
        let rng = StdRng::seed_from_u64(self.rng.r#gen());
        self.animator = Some(ShuffleAnimator::mount(rng, self.timing, now));
        self.visibility = Visibility::Visible;
        info!("overlay shown");
    }

    /// Start the fade-out and unmount the overlay right away, without waiting for it.
    pub fn hide(&mut self, now: Instant) {
        if self.visibility == Visibility::Hidden {
            return;
        }
        self.opacity
            .animate(now, Segment::new(0.0, self.fade, CubicBezier::EASE_IN_OUT));
        if let Some(mut animator) = self.animator.take() {
            animator.cancel(now);
        }
        self.visibility = Visibility::Hidden;
        info!(fade_ms = self.fade.as_millis() as u64, "overlay hidden");
    }

    pub fn tick(&mut self, now: Instant) {
        self.opacity.settle(now);
        if let Some(animator) = &mut self.animator {
            animator.tick(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::CycleState;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> ScreenController {
        ScreenController::new(Timing::default(), ms(300), Some(11))
    }

    #[test]
    fn test_starts_hidden() {
        let c = controller();
        let t0 = Instant::now();
        assert_eq!(c.visibility(), Visibility::Hidden);
        assert!(!c.is_loading());
        assert!(c.animator().is_none());
        assert_eq!(c.opacity(t0), 0.0);
        assert!(!c.is_fading(t0));
    }

    #[test]
    fn test_show_is_immediate() {
        let mut c = controller();
        let t0 = Instant::now();
        assert_eq!(c.toggle(t0), Visibility::Visible);
        assert_eq!(c.opacity(t0), 1.0);
        let animator = c.animator().unwrap();
        // first cycle already running, no idle pause before it
        assert_eq!(animator.cycles(), 1);
        assert_eq!(animator.state(), CycleState::Moving);
    }

    #[test]
    fn test_hide_fades_but_unmounts_at_once() {
        let mut c = controller();
        let t0 = Instant::now();
        c.toggle(t0);
        c.tick(t0 + ms(300));
        assert_eq!(c.toggle(t0 + ms(400)), Visibility::Hidden);
        assert!(c.animator().is_none());

        let mid = c.opacity(t0 + ms(550));
        assert!(mid > 0.0 && mid < 1.0, "{}", mid);
        assert!(c.is_fading(t0 + ms(550)));

        c.tick(t0 + ms(700));
        assert_eq!(c.opacity(t0 + ms(700)), 0.0);
        assert!(!c.is_fading(t0 + ms(700)));

        // long after a full cycle, still nothing mounted
        c.tick(t0 + ms(5000));
        assert!(c.animator().is_none());
    }

    #[test]
    fn test_show_mid_fade_snaps_back() {
        let mut c = controller();
        let t0 = Instant::now();
        c.toggle(t0);
        c.toggle(t0 + ms(100));
        c.toggle(t0 + ms(200));
        assert_eq!(c.opacity(t0 + ms(200)), 1.0);
        assert_eq!(c.opacity(t0 + ms(250)), 1.0);
        assert!(c.is_loading());
        assert_eq!(c.animator().map(ShuffleAnimator::cycles), Some(1));
    }

    #[test]
    fn test_show_and_hide_are_idempotent() {
        let mut c = controller();
        let t0 = Instant::now();
        c.show(t0);
        c.tick(t0 + ms(800));
        c.tick(t0 + ms(1200));
        c.show(t0 + ms(1200));
        // not remounted
        assert_eq!(c.animator().map(ShuffleAnimator::cycles), Some(2));
        c.hide(t0 + ms(1300));
        c.hide(t0 + ms(1400));
        assert!(c.opacity(t0 + ms(1400)) > 0.0);
    }

    #[test]
    fn test_seeded_controllers_mount_identical_animators() {
        let t0 = Instant::now();
        let mut a = controller();
        let mut b = controller();
        a.show(t0);
        b.show(t0);
        assert_eq!(
            a.animator().map(ShuffleAnimator::cells),
            b.animator().map(ShuffleAnimator::cells)
        );
    }
}
