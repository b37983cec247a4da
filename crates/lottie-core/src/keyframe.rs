use crate::easing::Easing;
use crate::error::{Endpoint, LottieError, Result};
use glam::Vec2;

/// Control-point offsets of a spatial (motion path) keyframe, relative to the
/// start and end positions respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTangents {
    pub out_tangent: Vec2,
    pub in_tangent: Vec2,
}

/// One interval of a timeline.
///
/// A keyframe covers `[start_progress, end_progress)` of the normalized
/// timeline and blends from `start_value` to `end_value` through `easing`.
/// Static keyframes hold their start value and ignore easing.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub start_value: Option<T>,
    pub end_value: Option<T>,
    pub start_progress: f64,
    pub end_progress: f64,
    pub easing: Easing,
    pub is_static: bool,
    pub spatial: Option<SpatialTangents>,
}

impl<T> Keyframe<T> {
    pub fn new(
        start_value: Option<T>,
        end_value: Option<T>,
        start_progress: f64,
        end_progress: f64,
        easing: Easing,
    ) -> Self {
        debug_assert!(start_progress <= end_progress);
        Self {
            start_value,
            end_value,
            start_progress,
            end_progress,
            easing,
            is_static: false,
            spatial: None,
        }
    }

    /// A keyframe spanning the whole timeline that always yields `value`.
    pub fn fixed(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            start_value: Some(value.clone()),
            end_value: Some(value),
            start_progress: 0.0,
            end_progress: 1.0,
            easing: Easing::Linear,
            is_static: true,
            spatial: None,
        }
    }

    pub fn with_spatial(mut self, spatial: Option<SpatialTangents>) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn contains_progress(&self, progress: f64) -> bool {
        progress >= self.start_progress && progress < self.end_progress
    }

    /// Linear progress through this interval, clamped to `[0, 1]`.
    ///
    /// Zero-length intervals jump straight to their end once reached.
    pub fn linear_progress(&self, progress: f64) -> f64 {
        if self.is_static {
            return 0.0;
        }
        let span = self.end_progress - self.start_progress;
        if span <= 0.0 {
            return if progress >= self.end_progress { 1.0 } else { 0.0 };
        }
        ((progress - self.start_progress) / span).clamp(0.0, 1.0)
    }

    pub fn start(&self) -> Result<&T> {
        self.start_value
            .as_ref()
            .ok_or(LottieError::MissingKeyframeValue {
                progress: self.start_progress,
                endpoint: Endpoint::Start,
            })
    }

    pub fn end(&self) -> Result<&T> {
        self.end_value
            .as_ref()
            .ok_or(LottieError::MissingKeyframeValue {
                progress: self.start_progress,
                endpoint: Endpoint::End,
            })
    }

    pub fn endpoints(&self) -> Result<(&T, &T)> {
        Ok((self.start()?, self.end()?))
    }
}
