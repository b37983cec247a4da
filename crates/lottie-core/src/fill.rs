use crate::animation::{
    or_static, AnimatedValue, BoxedAnimation, GradientAnimation, IntegerAnimation, PointAnimation,
};
use crate::config::Timing;
use crate::error::Result;
use crate::gradient::{create_shader, GradientShader, GradientType};
use glam::Vec2;
use kurbo::Rect;
use lottie_data::model::GradientFillShape;

/// Gradient paint whose ramp and control points are animated.
pub struct GradientFillContent {
    name: Option<String>,
    kind: GradientType,
    colors: GradientAnimation,
    start: BoxedAnimation<Vec2>,
    end: BoxedAnimation<Vec2>,
    opacity: BoxedAnimation<i32>,
}

impl GradientFillContent {
    pub fn new(
        kind: GradientType,
        colors: GradientAnimation,
        start: BoxedAnimation<Vec2>,
        end: BoxedAnimation<Vec2>,
        opacity: BoxedAnimation<i32>,
    ) -> Self {
        Self {
            name: None,
            kind,
            colors,
            start,
            end,
            opacity,
        }
    }

    pub fn from_shape(shape: &GradientFillShape, timing: Timing) -> Result<Self> {
        let mut fill = Self::new(
            GradientType::from_code(shape.t),
            GradientAnimation::from_colors(&shape.g, timing)?,
            or_static(PointAnimation::from_property(&shape.s, timing)?, Vec2::ZERO),
            or_static(PointAnimation::from_property(&shape.e, timing)?, Vec2::ZERO),
            or_static(IntegerAnimation::from_property(&shape.o, timing)?, 100),
        );
        fill.name = shape.nm.clone();
        Ok(fill)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> GradientType {
        self.kind
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.colors.set_progress(progress);
        self.start.set_progress(progress);
        self.end.set_progress(progress);
        self.opacity.set_progress(progress);
    }

    /// Opacity in percent.
    pub fn opacity(&mut self) -> Result<i32> {
        self.opacity.value()
    }

    /// The shader for a shape occupying `bounds`.
    pub fn shader(&mut self, bounds: Rect) -> Result<GradientShader> {
        let gradient = self.colors.value()?;
        let start = self.start.value()?;
        let end = self.end.value()?;
        Ok(create_shader(&gradient, self.kind, start, end, bounds))
    }
}
