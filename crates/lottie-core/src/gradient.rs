use crate::color::{self, Color};
use crate::error::{LottieError, Result};
use glam::Vec2;
use kurbo::{Point, Rect};

/// A color ramp: positions and colors, index-aligned and sorted by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientColor {
    positions: Vec<f32>,
    colors: Vec<Color>,
}

impl GradientColor {
    /// Stops without a partner in the other list are dropped.
    pub fn new(mut positions: Vec<f32>, mut colors: Vec<Color>) -> Self {
        let size = positions.len().min(colors.len());
        positions.truncate(size);
        colors.truncate(size);
        Self { positions, colors }
    }

    /// A ramp of `size` transparent stops, used as an output buffer.
    pub fn with_size(size: usize) -> Self {
        Self {
            positions: vec![0.0; size],
            colors: vec![Color::TRANSPARENT; size],
        }
    }

    /// Decodes a raw stop array: `color_points` groups of `[pos, r, g, b]`,
    /// optionally followed by `[pos, alpha]` opacity stops.
    ///
    /// Opacity is sampled at each color stop, so the ramp always has exactly
    /// `color_points` stops. Stops missing from a truncated array are black.
    pub fn from_raw(raw: &[f32], color_points: usize) -> Self {
        let color_len = color_points * 4;
        let alpha_stops: Vec<(f32, f32)> = raw
            .get(color_len..)
            .unwrap_or_default()
            .chunks_exact(2)
            .map(|c| (c[0], c[1]))
            .collect();

        let mut positions = Vec::with_capacity(color_points);
        let mut colors = Vec::with_capacity(color_points);
        for i in 0..color_points {
            let stop = raw.get(i * 4..i * 4 + 4).unwrap_or(&[0.0, 0.0, 0.0, 0.0]);
            let (pos, r, g, b) = (stop[0], stop[1], stop[2], stop[3]);
            let alpha = interpolate_alpha(&alpha_stops, pos);
            positions.push(pos);
            colors.push(Color::from_rgba_f32(&[r, g, b, alpha]));
        }

        Self { positions, colors }
    }

    pub fn size(&self) -> usize {
        self.colors.len()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Writes the blend of `start` and `end` into `self` without reallocating.
    ///
    /// All three ramps must have the same size.
    pub fn lerp_into(&mut self, start: &GradientColor, end: &GradientColor, t: f32) -> Result<()> {
        for other in [start, end] {
            if other.size() != self.size() {
                return Err(LottieError::GradientSizeMismatch {
                    expected: self.size(),
                    found: other.size(),
                });
            }
        }

        for i in 0..self.size() {
            self.positions[i] = start.positions[i] + (end.positions[i] - start.positions[i]) * t;
            self.colors[i] = color::evaluate(t, start.colors[i], end.colors[i]);
        }
        Ok(())
    }
}

/// Opacity at `t`, linearly interpolated between the surrounding stops.
fn interpolate_alpha(stops: &[(f32, f32)], t: f32) -> f32 {
    let (Some(&(first_t, first_a)), Some(&(last_t, last_a))) = (stops.first(), stops.last()) else {
        return 1.0;
    };
    if t <= first_t {
        return first_a;
    }
    if t >= last_t {
        return last_a;
    }
    for pair in stops.windows(2) {
        let ((t1, a1), (t2, a2)) = (pair[0], pair[1]);
        if t >= t1 && t <= t2 {
            let range = t2 - t1;
            let ratio = if range == 0.0 { 0.0 } else { (t - t1) / range };
            return a1 + (a2 - a1) * ratio;
        }
    }
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

impl GradientType {
    /// Record code: 1 linear, 2 radial. Anything else is read as linear.
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => GradientType::Radial,
            _ => GradientType::Linear,
        }
    }
}

/// Paint description of a gradient in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientShader {
    Linear {
        start: Point,
        end: Point,
        colors: Vec<Color>,
        positions: Vec<f32>,
    },
    Radial {
        center: Point,
        radius: f64,
        colors: Vec<Color>,
        positions: Vec<f32>,
    },
}

impl GradientShader {
    pub fn colors(&self) -> &[Color] {
        match self {
            GradientShader::Linear { colors, .. } | GradientShader::Radial { colors, .. } => colors,
        }
    }

    pub fn positions(&self) -> &[f32] {
        match self {
            GradientShader::Linear { positions, .. } | GradientShader::Radial { positions, .. } => {
                positions
            }
        }
    }
}

/// Builds a gradient shader from control points given relative to the
/// center of `bounds`.
pub fn create_shader(
    gradient: &GradientColor,
    kind: GradientType,
    start_offset: Vec2,
    end_offset: Vec2,
    bounds: Rect,
) -> GradientShader {
    let center = bounds.center();
    let start = Point::new(
        center.x + start_offset.x as f64,
        center.y + start_offset.y as f64,
    );
    let end = Point::new(center.x + end_offset.x as f64, center.y + end_offset.y as f64);
    let colors = gradient.colors().to_vec();
    let positions = gradient.positions().to_vec();

    match kind {
        GradientType::Linear => GradientShader::Linear {
            start,
            end,
            colors,
            positions,
        },
        GradientType::Radial => {
            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let squared = dx * dx + dy * dy;
            GradientShader::Radial {
                center: start,
                radius: squared.sqrt(),
                colors,
                positions,
            }
        }
    }
}
