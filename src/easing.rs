//! Cubic-bezier easing curves with CSS `cubic-bezier(x1, y1, x2, y2)` semantics.

const EPSILON: f32 = 1e-5;

/// Timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// CSS `ease`; used for block movement.
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    /// CSS `ease-in-out`; used for the overlay fade.
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);
    /// Material "standard" curve; used for rotation and colour.
    pub const FAST_OUT_SLOW_IN: Self = Self::new(0.4, 0.0, 0.2, 1.0);
    #[cfg(test)]
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for linear progress `t` (clamped to 0..=1).
    pub fn ease(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_x(t);
        bezier(self.y1, self.y2, s)
    }

    /// Curve parameter whose x coordinate is `x`.
    fn solve_x(&self, x: f32) -> f32 {
        // Newton-Raphson converges in a few steps unless the slope flattens out.
        let mut s = x;
        for _ in 0..8 {
            let err = bezier(self.x1, self.x2, s) - x;
            if err.abs() < EPSILON {
                return s;
            }
            let d = bezier_slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s = (s - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = x;
        for _ in 0..32 {
            let v = bezier(self.x1, self.x2, s);
            if (v - x).abs() < EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }
}

/// One coordinate of the curve at parameter `s`, endpoints fixed at 0 and 1.
#[inline]
fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * p1 + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}
