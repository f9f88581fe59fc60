//! Cubic-bezier easing curves for camera animation.

/// Cubic bezier from (0, 0) to (1, 1) with control points `(p1x, p1y)` and
/// `(p2x, p2y)`, as used by CSS `cubic-bezier()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitBezier {
    cx: f64,
    bx: f64,
    ax: f64,
    cy: f64,
    by: f64,
    ay: f64,
}

const EPSILON: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 8;

impl UnitBezier {
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        let cx = 3.0 * p1x;
        let bx = 3.0 * (p2x - p1x) - cx;
        let ax = 1.0 - cx - bx;

        let cy = 3.0 * p1y;
        let by = 3.0 * (p2y - p1y) - cy;
        let ay = 1.0 - cy - by;

        Self {
            cx,
            bx,
            ax,
            cy,
            by,
            ay,
        }
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Curve parameter whose x coordinate is `x`.
    ///
    /// Newton's method first; bisection if it fails to converge.
    fn solve_x(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = self.sample_derivative_x(t);
            if d.abs() < EPSILON {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        if t < lo {
            return lo;
        }
        if t > hi {
            return hi;
        }
        while lo < hi {
            let sample = self.sample_x(t);
            if (sample - x).abs() < EPSILON {
                return t;
            }
            if x > sample {
                lo = t;
            } else {
                hi = t;
            }
            let next = (hi - lo) * 0.5 + lo;
            if next == t {
                break;
            }
            t = next;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1].
    pub fn solve(&self, x: f64) -> f64 {
        self.sample_y(self.solve_x(x.clamp(0.0, 1.0)))
    }
}

/// The CSS `ease` curve.
pub const EASE: (f64, f64, f64, f64) = (0.25, 0.1, 0.25, 1.0);

/// Eases `t` in [0, 1] along the CSS `ease` curve.
pub fn ease(t: f64) -> f64 {
    let (p1x, p1y, p2x, p2y) = EASE;
    UnitBezier::new(p1x, p1y, p2x, p2y).solve(t)
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
