use ::keyframe::EasingFunction;
use glam::Vec2;
use lottie_data::model::BezierTangent;

/// Largest magnitude accepted for the y coordinate of an easing handle.
const MAX_HANDLE_Y: f32 = 100.0;

/// Remaps linear in-keyframe progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// CSS-style cubic bezier through (0,0), `p1`, `p2`, (1,1).
    CubicBezier { p1: Vec2, p2: Vec2 },
}

impl Easing {
    /// Builds the easing for a keyframe from its out (`o`) and in (`i`) handles.
    pub fn from_handles(
        out_handle: Option<&BezierTangent>,
        in_handle: Option<&BezierTangent>,
    ) -> Self {
        let (Some(o), Some(i)) = (out_handle, in_handle) else {
            return Easing::Linear;
        };

        let p1 = handle_point(o, Vec2::ZERO);
        let p2 = handle_point(i, Vec2::ONE);

        if p1.x == p1.y && p2.x == p2.y {
            return Easing::Linear;
        }
        Easing::CubicBezier { p1, p2 }
    }

    pub fn transform(&self, t: f64) -> f64 {
        self.y(t)
    }
}

fn handle_point(handle: &BezierTangent, fallback: Vec2) -> Vec2 {
    let x = handle.x.first().copied().unwrap_or(fallback.x);
    let y = handle.y.first().copied().unwrap_or(fallback.y);
    Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-MAX_HANDLE_Y, MAX_HANDLE_Y))
}

impl EasingFunction for Easing {
    fn y(&self, x: f64) -> f64 {
        match self {
            Easing::Linear => ::keyframe::functions::Linear.y(x),
            Easing::CubicBezier { p1, p2 } => solve_cubic_bezier(*p1, *p2, x as f32) as f64,
        }
    }
}

// Cubic Bezier Easing
pub fn solve_cubic_bezier(p1: Vec2, p2: Vec2, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson
    let mut t = x;
    for _ in 0..8 {
        let one_minus_t = 1.0 - t;
        let x_est = 3.0 * one_minus_t * one_minus_t * t * p1.x
            + 3.0 * one_minus_t * t * t * p2.x
            + t * t * t;

        let err = x_est - x;
        if err.abs() < 1e-4 {
            break;
        }

        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);

        if dx_dt.abs() < 1e-6 {
            break;
        }
        t -= err / dx_dt;
    }

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}
