//! Timeline drivers.
//!
//! A [`KeyframeAnimation`] maps a normalized progress onto one of its scene's
//! keyframes, eases the progress through that keyframe and asks its evaluator
//! for the value. Listeners are told synchronously whenever the stored
//! progress changes.

use crate::animatable::{
    ColorEvaluator, DoubleEvaluator, GradientEvaluator, IntegerEvaluator, KeyframeEvaluator,
    PathFollowEvaluator, PointEvaluator, ScaleEvaluator, ShapeEvaluator,
};
use crate::color::Color;
use crate::config::Timing;
use crate::error::{LottieError, Result};
use crate::gradient::GradientColor;
use crate::keyframe::Keyframe;
use crate::listeners::{ListenerId, Listeners};
use crate::scene::Scene;
use crate::shape::ShapeData;
use glam::Vec2;
use lottie_data::model::{self as data, Property};

/// A value that changes with playback progress.
pub trait AnimatedValue {
    type Value;

    fn set_progress(&mut self, progress: f64);

    fn progress(&self) -> f64;

    fn value(&mut self) -> Result<Self::Value>;

    fn add_listener(&mut self, listener: Box<dyn FnMut()>) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

pub type BoxedAnimation<V> = Box<dyn AnimatedValue<Value = V>>;

pub struct KeyframeAnimation<E: KeyframeEvaluator> {
    scene: Scene<E::Keyframe>,
    evaluator: E,
    progress: f64,
    cached_index: Option<usize>,
    cached_value: Option<(usize, f64, E::Value)>,
    is_discrete: bool,
    listeners: Listeners,
}

impl<E: KeyframeEvaluator> KeyframeAnimation<E> {
    pub fn new(scene: Scene<E::Keyframe>, evaluator: E) -> Self {
        Self {
            scene,
            evaluator,
            progress: 0.0,
            cached_index: None,
            cached_value: None,
            is_discrete: false,
            listeners: Listeners::new(),
        }
    }

    pub fn scene(&self) -> &Scene<E::Keyframe> {
        &self.scene
    }

    /// Discrete animations snap to each keyframe's start value.
    pub fn set_discrete(&mut self, discrete: bool) {
        self.is_discrete = discrete;
        self.cached_value = None;
    }

    pub fn is_discrete(&self) -> bool {
        self.is_discrete
    }

    pub fn current_keyframe_index(&mut self) -> Result<usize> {
        if self.scene.is_empty() {
            return Err(LottieError::EmptyTimeline);
        }
        if let Some(index) = self.cached_index {
            if self.scene.contains(index, self.progress) {
                return Ok(index);
            }
        }

        let index = self
            .scene
            .index_for(self.progress)
            .ok_or(LottieError::EmptyTimeline)?;
        tracing::trace!(progress = self.progress, index, "keyframe cache miss");
        self.cached_index = Some(index);
        Ok(index)
    }

    pub fn current_keyframe(&mut self) -> Result<&Keyframe<E::Keyframe>> {
        let index = self.current_keyframe_index()?;
        self.scene.get(index).ok_or(LottieError::EmptyTimeline)
    }

    /// Eased progress through the current keyframe.
    pub fn current_keyframe_progress(&mut self) -> Result<f64> {
        let index = self.current_keyframe_index()?;
        let keyframe = &self.scene.keyframes()[index];
        if self.is_discrete || keyframe.is_static {
            return Ok(0.0);
        }
        Ok(keyframe
            .easing
            .transform(keyframe.linear_progress(self.progress)))
    }
}

impl<E: KeyframeEvaluator> AnimatedValue for KeyframeAnimation<E> {
    type Value = E::Value;

    /// Clamps to 0 before the first keyframe and to 1 after the last one.
    /// Setting the stored progress again is a no-op.
    fn set_progress(&mut self, progress: f64) {
        let progress = if progress < self.scene.start_delay_progress() {
            0.0
        } else if progress > self.scene.end_progress() {
            1.0
        } else {
            progress
        };

        if progress == self.progress {
            return;
        }
        self.progress = progress;
        self.listeners.notify();
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn value(&mut self) -> Result<E::Value> {
        let index = self.current_keyframe_index()?;
        let local = self.current_keyframe_progress()?;

        if let Some((cached_index, cached_local, value)) = &self.cached_value {
            if *cached_index == index && *cached_local == local {
                return Ok(value.clone());
            }
        }

        let keyframe = &self.scene.keyframes()[index];
        let value = self.evaluator.evaluate(index, keyframe, local as f32)?;
        self.cached_value = Some((index, local, value.clone()));
        Ok(value)
    }

    fn add_listener(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

/// An unanimated value. Progress changes are ignored and listeners never fire.
pub struct StaticAnimation<T> {
    value: T,
    listeners: Listeners,
}

impl<T: Clone> StaticAnimation<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Listeners::new(),
        }
    }
}

impl<T: Clone> AnimatedValue for StaticAnimation<T> {
    type Value = T;

    fn set_progress(&mut self, _progress: f64) {}

    fn progress(&self) -> f64 {
        0.0
    }

    fn value(&mut self) -> Result<T> {
        Ok(self.value.clone())
    }

    fn add_listener(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

/// A point whose coordinates run on separate timelines.
pub struct SplitDimensionAnimation {
    x: BoxedAnimation<f64>,
    y: BoxedAnimation<f64>,
    progress: f64,
    listeners: Listeners,
}

impl SplitDimensionAnimation {
    pub fn new(x: BoxedAnimation<f64>, y: BoxedAnimation<f64>) -> Self {
        Self {
            x,
            y,
            progress: 0.0,
            listeners: Listeners::new(),
        }
    }
}

impl AnimatedValue for SplitDimensionAnimation {
    type Value = Vec2;

    /// Both coordinates are updated before any listener runs.
    fn set_progress(&mut self, progress: f64) {
        self.x.set_progress(progress);
        self.y.set_progress(progress);
        if progress == self.progress {
            return;
        }
        self.progress = progress;
        self.listeners.notify();
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn value(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.x.value()? as f32, self.y.value()? as f32))
    }

    fn add_listener(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

pub type IntegerAnimation = KeyframeAnimation<IntegerEvaluator>;
pub type DoubleAnimation = KeyframeAnimation<DoubleEvaluator>;
pub type ColorAnimation = KeyframeAnimation<ColorEvaluator>;
pub type GradientAnimation = KeyframeAnimation<GradientEvaluator>;
pub type PointAnimation = KeyframeAnimation<PointEvaluator>;
pub type ScaleAnimation = KeyframeAnimation<ScaleEvaluator>;
pub type ShapeAnimation = KeyframeAnimation<ShapeEvaluator>;
pub type PathFollowAnimation = KeyframeAnimation<PathFollowEvaluator>;

/// Boxes `animation`, or a static `default` when its scene is empty.
pub fn or_static<E>(animation: KeyframeAnimation<E>, default: E::Value) -> BoxedAnimation<E::Value>
where
    E: KeyframeEvaluator + 'static,
    E::Keyframe: 'static,
    E::Value: 'static,
{
    if animation.scene().is_empty() {
        Box::new(StaticAnimation::new(default))
    } else {
        Box::new(animation)
    }
}

fn vec2(v: &[f32]) -> Vec2 {
    Vec2::new(
        v.first().copied().unwrap_or(0.0),
        v.get(1).copied().unwrap_or(0.0),
    )
}

impl IntegerAnimation {
    pub fn from_property(property: &Property<f32>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(v.round() as i32))?;
        Ok(Self::new(scene, IntegerEvaluator))
    }
}

impl DoubleAnimation {
    pub fn from_property(property: &Property<f32>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(*v as f64))?;
        Ok(Self::new(scene, DoubleEvaluator))
    }
}

impl ColorAnimation {
    /// Colors are `[r, g, b, a]` records.
    pub fn from_property(property: &Property<Vec<f32>>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(Color::from_rgba_f32(v)))?;
        Ok(Self::new(scene, ColorEvaluator))
    }
}

impl GradientAnimation {
    pub fn from_colors(colors: &data::GradientColors, timing: Timing) -> Result<Self> {
        let points = colors.p as usize;
        let scene = Scene::from_property(&colors.k, timing, |raw| {
            Ok(GradientColor::from_raw(raw, points))
        })?;
        let evaluator = GradientEvaluator::new(&scene);
        Ok(Self::new(scene, evaluator))
    }
}

impl PointAnimation {
    pub fn from_property(property: &Property<data::Vec2>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(vec2(v)))?;
        Ok(Self::new(scene, PointEvaluator))
    }

    pub fn from_vec3(property: &Property<data::Vec3DefaultZero>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(vec2(&v.0)))?;
        Ok(Self::new(scene, PointEvaluator))
    }
}

impl ScaleAnimation {
    pub fn from_property(property: &Property<data::Vec3Scale>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(vec2(&v.0)))?;
        Ok(Self::new(scene, ScaleEvaluator))
    }
}

impl ShapeAnimation {
    pub fn from_property(property: &Property<data::BezierPath>, timing: Timing) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(ShapeData::from(v)))?;
        Ok(Self::new(scene, ShapeEvaluator))
    }
}

impl PathFollowAnimation {
    /// Positions whose keyframes carry spatial tangents follow a motion path.
    pub fn from_position(
        property: &Property<data::Vec3DefaultZero>,
        timing: Timing,
    ) -> Result<Self> {
        let scene = Scene::from_property(property, timing, |v| Ok(vec2(&v.0)))?;
        Ok(Self::new(scene, PathFollowEvaluator::new()))
    }
}
