use crate::animation::{
    or_static, AnimatedValue, BoxedAnimation, DoubleAnimation, IntegerAnimation,
    PathFollowAnimation, PointAnimation, ScaleAnimation, SplitDimensionAnimation, StaticAnimation,
};
use crate::config::Timing;
use crate::error::Result;
use glam::Vec2;
use kurbo::Affine;
use lottie_data::model::{PositionProperty, Property, TransformShape, Value};

/// Animated anchor, position, scale, rotation and opacity of a shape group.
pub struct GroupTransform {
    anchor: BoxedAnimation<Vec2>,
    position: BoxedAnimation<Vec2>,
    scale: BoxedAnimation<Vec2>,
    rotation: BoxedAnimation<f64>,
    opacity: BoxedAnimation<i32>,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GroupTransform {
    pub fn identity() -> Self {
        Self::new(
            Box::new(StaticAnimation::new(Vec2::ZERO)),
            Box::new(StaticAnimation::new(Vec2::ZERO)),
            Box::new(StaticAnimation::new(Vec2::splat(100.0))),
            Box::new(StaticAnimation::new(0.0)),
        )
    }

    pub fn new(
        anchor: BoxedAnimation<Vec2>,
        position: BoxedAnimation<Vec2>,
        scale: BoxedAnimation<Vec2>,
        rotation: BoxedAnimation<f64>,
    ) -> Self {
        Self {
            anchor,
            position,
            scale,
            rotation,
            opacity: Box::new(StaticAnimation::new(100)),
        }
    }

    pub fn from_shape(shape: &TransformShape, timing: Timing) -> Result<Self> {
        let anchor = or_static(PointAnimation::from_vec3(&shape.a, timing)?, Vec2::ZERO);
        let position = position_animation(&shape.p, timing)?;
        let scale = or_static(ScaleAnimation::from_property(&shape.s, timing)?, Vec2::splat(100.0));
        let rotation = or_static(DoubleAnimation::from_property(&shape.r, timing)?, 0.0);
        let opacity = or_static(IntegerAnimation::from_property(&shape.o, timing)?, 100);

        Ok(Self {
            anchor,
            position,
            scale,
            rotation,
            opacity,
        })
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.anchor.set_progress(progress);
        self.position.set_progress(progress);
        self.scale.set_progress(progress);
        self.rotation.set_progress(progress);
        self.opacity.set_progress(progress);
    }

    /// `translate(position) * rotate * scale * translate(-anchor)`.
    pub fn matrix(&mut self) -> Result<Affine> {
        let position = self.position.value()?;
        let rotation = self.rotation.value()?;
        let scale = self.scale.value()?;
        let anchor = self.anchor.value()?;

        Ok(Affine::translate((position.x as f64, position.y as f64))
            * Affine::rotate(rotation.to_radians())
            * Affine::scale_non_uniform(scale.x as f64 / 100.0, scale.y as f64 / 100.0)
            * Affine::translate((-anchor.x as f64, -anchor.y as f64)))
    }

    /// Opacity in percent.
    pub fn opacity(&mut self) -> Result<i32> {
        self.opacity.value()
    }
}

fn position_animation(position: &PositionProperty, timing: Timing) -> Result<BoxedAnimation<Vec2>> {
    match position {
        PositionProperty::Split { x, y, .. } => {
            let x = or_static(DoubleAnimation::from_property(x, timing)?, 0.0);
            let y = or_static(DoubleAnimation::from_property(y, timing)?, 0.0);
            Ok(Box::new(SplitDimensionAnimation::new(x, y)))
        }
        PositionProperty::Unified(p) if has_spatial_tangents(p) => Ok(or_static(
            PathFollowAnimation::from_position(p, timing)?,
            Vec2::ZERO,
        )),
        PositionProperty::Unified(p) => Ok(or_static(
            PointAnimation::from_vec3(p, timing)?,
            Vec2::ZERO,
        )),
    }
}

fn has_spatial_tangents<T>(property: &Property<T>) -> bool {
    match &property.k {
        Value::Animated(keyframes) => keyframes.iter().any(|kf| kf.to.is_some() || kf.ti.is_some()),
        _ => false,
    }
}
