use crate::color::{self, Color};
use crate::error::Result;
use crate::gradient::GradientColor;
use crate::keyframe::Keyframe;
use crate::measure::ContourMeasure;
use crate::scene::Scene;
use crate::shape::ShapeData;
use glam::Vec2;
use kurbo::{BezPath, Point};

/// Accuracy used when measuring motion paths.
const MOTION_PATH_ACCURACY: f64 = 1e-3;

pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t as f64
    }
}

impl Interpolatable for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::lerp(*self, *other, t)
    }
}

impl Interpolatable for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        color::evaluate(t, *self, *other)
    }
}

impl Interpolatable for ShapeData {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.interpolate(other, t)
    }
}

/// Turns a keyframe and an eased in-keyframe progress into a concrete value.
///
/// `index` identifies the keyframe within its scene, so evaluators may keep
/// per-keyframe caches.
pub trait KeyframeEvaluator {
    type Keyframe;
    type Value: Clone;

    fn evaluate(
        &mut self,
        index: usize,
        keyframe: &Keyframe<Self::Keyframe>,
        progress: f32,
    ) -> Result<Self::Value>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerEvaluator;

impl KeyframeEvaluator for IntegerEvaluator {
    type Keyframe = i32;
    type Value = i32;

    fn evaluate(&mut self, _index: usize, keyframe: &Keyframe<i32>, progress: f32) -> Result<i32> {
        let (start, end) = keyframe.endpoints()?;
        let value = Interpolatable::lerp(&(*start as f64), &(*end as f64), progress);
        Ok(value.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleEvaluator;

impl KeyframeEvaluator for DoubleEvaluator {
    type Keyframe = f64;
    type Value = f64;

    fn evaluate(&mut self, _index: usize, keyframe: &Keyframe<f64>, progress: f32) -> Result<f64> {
        let (start, end) = keyframe.endpoints()?;
        Ok(Interpolatable::lerp(start, end, progress))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorEvaluator;

impl KeyframeEvaluator for ColorEvaluator {
    type Keyframe = Color;
    type Value = Color;

    fn evaluate(
        &mut self,
        _index: usize,
        keyframe: &Keyframe<Color>,
        progress: f32,
    ) -> Result<Color> {
        let (start, end) = keyframe.endpoints()?;
        Ok(start.lerp(end, progress))
    }
}

/// Blends gradient ramps into a buffer owned by this evaluator.
///
/// The buffer size is fixed from the first keyframe's start value; every
/// read hands out a copy, so callers never alias the buffer.
#[derive(Debug, Clone, Default)]
pub struct GradientEvaluator {
    buffer: GradientColor,
}

impl GradientEvaluator {
    pub fn new(scene: &Scene<GradientColor>) -> Self {
        let size = scene
            .first()
            .and_then(|kf| kf.start_value.as_ref())
            .map(GradientColor::size)
            .unwrap_or(0);
        Self {
            buffer: GradientColor::with_size(size),
        }
    }
}

impl KeyframeEvaluator for GradientEvaluator {
    type Keyframe = GradientColor;
    type Value = GradientColor;

    fn evaluate(
        &mut self,
        _index: usize,
        keyframe: &Keyframe<GradientColor>,
        progress: f32,
    ) -> Result<GradientColor> {
        let (start, end) = keyframe.endpoints()?;
        self.buffer.lerp_into(start, end, progress)?;
        Ok(self.buffer.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PointEvaluator;

impl KeyframeEvaluator for PointEvaluator {
    type Keyframe = Vec2;
    type Value = Vec2;

    fn evaluate(
        &mut self,
        _index: usize,
        keyframe: &Keyframe<Vec2>,
        progress: f32,
    ) -> Result<Vec2> {
        let (start, end) = keyframe.endpoints()?;
        Ok(Interpolatable::lerp(start, end, progress))
    }
}

/// Same arithmetic as [`PointEvaluator`]; values are scale factors in percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleEvaluator;

impl KeyframeEvaluator for ScaleEvaluator {
    type Keyframe = Vec2;
    type Value = Vec2;

    fn evaluate(
        &mut self,
        _index: usize,
        keyframe: &Keyframe<Vec2>,
        progress: f32,
    ) -> Result<Vec2> {
        let (start, end) = keyframe.endpoints()?;
        Ok(Vec2::new(
            start.x + (end.x - start.x) * progress,
            start.y + (end.y - start.y) * progress,
        ))
    }
}

/// Blends shapes point-wise and emits the result as a path. A keyframe with
/// no end shape holds its start shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeEvaluator;

impl KeyframeEvaluator for ShapeEvaluator {
    type Keyframe = ShapeData;
    type Value = BezPath;

    fn evaluate(
        &mut self,
        _index: usize,
        keyframe: &Keyframe<ShapeData>,
        progress: f32,
    ) -> Result<BezPath> {
        let start = keyframe.start()?;
        let shape = match keyframe.end_value.as_ref() {
            Some(end) => start.lerp(end, progress),
            None => start.clone(),
        };
        Ok(shape.to_bez_path())
    }
}

/// Moves a point along the keyframe's motion path by arc length.
///
/// The motion path runs from the start to the end value, curving through the
/// keyframe's spatial tangents. The measured path of the current keyframe is
/// cached.
#[derive(Debug, Clone, Default)]
pub struct PathFollowEvaluator {
    cached: Option<(usize, Option<ContourMeasure>)>,
}

impl PathFollowEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    fn motion_path(keyframe: &Keyframe<Vec2>) -> Option<ContourMeasure> {
        let (Some(start), Some(end)) = (keyframe.start_value, keyframe.end_value) else {
            return None;
        };
        if start == end {
            return None;
        }

        let pt = |v: Vec2| Point::new(v.x as f64, v.y as f64);
        let mut path = BezPath::new();
        path.move_to(pt(start));
        match keyframe.spatial {
            Some(t) if t.out_tangent != Vec2::ZERO || t.in_tangent != Vec2::ZERO => {
                path.curve_to(pt(start + t.out_tangent), pt(end + t.in_tangent), pt(end));
            }
            _ => path.line_to(pt(end)),
        }
        ContourMeasure::first(&path, MOTION_PATH_ACCURACY)
    }
}

impl KeyframeEvaluator for PathFollowEvaluator {
    type Keyframe = Vec2;
    type Value = Vec2;

    fn evaluate(&mut self, index: usize, keyframe: &Keyframe<Vec2>, progress: f32) -> Result<Vec2> {
        let start = *keyframe.start()?;

        if self.cached.as_ref().map(|(cached, _)| *cached) != Some(index) {
            self.cached = Some((index, Self::motion_path(keyframe)));
        }

        let Some((_, Some(measure))) = &self.cached else {
            return Ok(start);
        };
        let p = measure.position_at(progress as f64 * measure.length());
        Ok(Vec2::new(p.x as f32, p.y as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::error::{Endpoint, LottieError};
    use crate::keyframe::SpatialTangents;

    fn kf<T>(start: T, end: T) -> Keyframe<T> {
        Keyframe::new(Some(start), Some(end), 0.0, 1.0, Easing::Linear)
    }

    #[test]
    fn integers_round_to_nearest() {
        let mut e = IntegerEvaluator;
        let k = kf(0, 10);
        assert_eq!(e.evaluate(0, &k, 0.0).unwrap(), 0);
        assert_eq!(e.evaluate(0, &k, 0.26).unwrap(), 3);
        assert_eq!(e.evaluate(0, &k, 0.24).unwrap(), 2);
        assert_eq!(e.evaluate(0, &k, 1.0).unwrap(), 10);
    }

    #[test]
    fn endpoints_are_reproduced() {
        let mut d = DoubleEvaluator;
        assert_eq!(d.evaluate(0, &kf(2.5, -4.0), 0.0).unwrap(), 2.5);
        assert_eq!(d.evaluate(0, &kf(2.5, -4.0), 1.0).unwrap(), -4.0);

        let mut c = ColorEvaluator;
        let k = kf(Color(0xFF11_2233), Color(0x8044_5566));
        assert_eq!(c.evaluate(0, &k, 0.0).unwrap(), Color(0xFF11_2233));
        assert_eq!(c.evaluate(0, &k, 1.0).unwrap(), Color(0x8044_5566));

        let mut p = PointEvaluator;
        let k = kf(Vec2::new(1.0, 2.0), Vec2::new(3.0, -2.0));
        assert_eq!(p.evaluate(0, &k, 0.0).unwrap(), Vec2::new(1.0, 2.0));
        assert_eq!(p.evaluate(0, &k, 1.0).unwrap(), Vec2::new(3.0, -2.0));
        assert_eq!(p.evaluate(0, &k, 0.5).unwrap(), Vec2::new(2.0, 0.0));

        let mut s = ScaleEvaluator;
        let k = kf(Vec2::new(100.0, 50.0), Vec2::new(0.0, 150.0));
        assert_eq!(s.evaluate(0, &k, 1.0).unwrap(), Vec2::new(0.0, 150.0));
    }

    #[test]
    fn missing_end_is_an_error_for_blending_evaluators() {
        let k: Keyframe<f64> = Keyframe::new(Some(1.0), None, 0.25, 1.0, Easing::Linear);
        assert_eq!(
            DoubleEvaluator.evaluate(0, &k, 0.5),
            Err(LottieError::MissingKeyframeValue {
                progress: 0.25,
                endpoint: Endpoint::End
            })
        );
    }

    #[test]
    fn shape_without_end_holds_start() {
        let square = ShapeData::polygon(&[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]);
        let k = Keyframe::new(Some(square.clone()), None, 0.0, 1.0, Easing::Linear);
        let path = ShapeEvaluator.evaluate(0, &k, 0.7).unwrap();
        assert_eq!(path.elements(), square.to_bez_path().elements());
    }

    #[test]
    fn gradient_buffer_is_copied_out() {
        let a = GradientColor::new(vec![0.0, 1.0], vec![Color::BLACK, Color::WHITE]);
        let b = GradientColor::new(vec![0.5, 1.0], vec![Color::WHITE, Color::WHITE]);
        let scene = Scene::new(vec![kf(a.clone(), b.clone())]);
        let mut e = GradientEvaluator::new(&scene);

        let first = e.evaluate(0, &scene.keyframes()[0], 0.0).unwrap();
        let second = e.evaluate(0, &scene.keyframes()[0], 1.0).unwrap();
        assert_eq!(first, a);
        assert_eq!(second, b);
    }

    #[test]
    fn gradient_size_is_fixed_by_first_keyframe() {
        let a = GradientColor::with_size(2);
        let b = GradientColor::with_size(3);
        let scene = Scene::new(vec![kf(a, b)]);
        let mut e = GradientEvaluator::new(&scene);
        assert_eq!(
            e.evaluate(0, &scene.keyframes()[0], 0.5),
            Err(LottieError::GradientSizeMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn path_follow_walks_arc_length() {
        let mut e = PathFollowEvaluator::new();
        let k = kf(Vec2::ZERO, Vec2::new(100.0, 0.0)).with_spatial(Some(SpatialTangents {
            out_tangent: Vec2::ZERO,
            in_tangent: Vec2::ZERO,
        }));
        assert_eq!(e.evaluate(0, &k, 0.0).unwrap(), Vec2::ZERO);
        let mid = e.evaluate(0, &k, 0.5).unwrap();
        assert!((mid.x - 50.0).abs() < 1e-3);
        assert_eq!(e.evaluate(0, &k, 1.0).unwrap(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn path_follow_curves_through_tangents() {
        let mut e = PathFollowEvaluator::new();
        let k = kf(Vec2::ZERO, Vec2::new(100.0, 0.0)).with_spatial(Some(SpatialTangents {
            out_tangent: Vec2::new(0.0, 50.0),
            in_tangent: Vec2::new(0.0, 50.0),
        }));
        let mid = e.evaluate(0, &k, 0.5).unwrap();
        assert!((mid.x - 50.0).abs() < 0.5);
        assert!(mid.y > 30.0);
    }

    #[test]
    fn path_follow_without_path_returns_start() {
        let mut e = PathFollowEvaluator::new();
        let k = kf(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(e.evaluate(3, &k, 0.6).unwrap(), Vec2::new(5.0, 5.0));

        let k = Keyframe::new(Some(Vec2::new(1.0, 2.0)), None, 0.0, 1.0, Easing::Linear);
        assert_eq!(e.evaluate(4, &k, 0.6).unwrap(), Vec2::new(1.0, 2.0));
    }
}
