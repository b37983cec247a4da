use crate::config::Timing;
use crate::easing::Easing;
use crate::error::Result;
use crate::keyframe::{Keyframe, SpatialTangents};
use glam::Vec2;
use lottie_data::model::{self as data, Value};

/// The ordered, immutable keyframes of one animated property.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T> Scene<T> {
    /// Keyframes must be sorted by progress and contiguous.
    pub fn new(keyframes: Vec<Keyframe<T>>) -> Self {
        debug_assert!(keyframes
            .windows(2)
            .all(|w| w[0].start_progress <= w[1].start_progress));
        Self { keyframes }
    }

    pub fn empty() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }

    /// A single static keyframe holding `value` for the whole timeline.
    pub fn fixed(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            keyframes: vec![Keyframe::fixed(value)],
        }
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe<T>> {
        self.keyframes.get(index)
    }

    pub fn first(&self) -> Option<&Keyframe<T>> {
        self.keyframes.first()
    }

    pub fn last(&self) -> Option<&Keyframe<T>> {
        self.keyframes.last()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Progress before which the timeline has not started yet.
    pub fn start_delay_progress(&self) -> f64 {
        self.first().map(|kf| kf.start_progress).unwrap_or(0.0)
    }

    /// Progress after which the timeline has finished.
    pub fn end_progress(&self) -> f64 {
        self.last().map(|kf| kf.end_progress).unwrap_or(1.0)
    }

    /// Whether keyframe `index` covers `progress`. The last keyframe also
    /// covers its own end.
    pub fn contains(&self, index: usize, progress: f64) -> bool {
        let Some(kf) = self.keyframes.get(index) else {
            return false;
        };
        kf.contains_progress(progress)
            || (index + 1 == self.keyframes.len() && progress == kf.end_progress)
    }

    /// Index of the keyframe whose interval contains `progress`.
    ///
    /// Progress at or before the first keyframe selects the first one;
    /// progress past the last keyframe's start selects the last one.
    pub fn index_for(&self, progress: f64) -> Option<usize> {
        let first = self.keyframes.first()?;
        if progress <= first.start_progress {
            return Some(0);
        }
        let idx = self
            .keyframes
            .partition_point(|kf| kf.start_progress <= progress);
        Some(idx.saturating_sub(1))
    }
}

impl<T: Clone> Scene<T> {
    /// Builds a scene from a decoded property.
    ///
    /// Default properties produce an empty scene, static ones a single fixed
    /// keyframe.
    pub fn from_property<R>(
        property: &data::Property<R>,
        timing: Timing,
        convert: impl Fn(&R) -> Result<T>,
    ) -> Result<Self> {
        match &property.k {
            Value::Default => Ok(Self::empty()),
            Value::Static(v) => Ok(Self::fixed(convert(v)?)),
            Value::Animated(records) => Self::from_keyframes(records, timing, convert),
        }
    }

    /// Builds a scene from keyframe records whose times are frame numbers.
    ///
    /// Each keyframe ends where the next one starts; the last one runs to the
    /// end of the timeline. Missing end values are taken from the next
    /// keyframe's start value, and a trailing keyframe carrying only a time is
    /// dropped.
    pub fn from_keyframes<R>(
        records: &[data::Keyframe<R>],
        timing: Timing,
        convert: impl Fn(&R) -> Result<T>,
    ) -> Result<Self> {
        let mut keyframes = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            let next = records.get(idx + 1);
            let start_value = record.s.as_ref().map(&convert).transpose()?;

            if next.is_none() && start_value.is_none() && !keyframes.is_empty() {
                break;
            }

            let hold = record.h == Some(1);
            let end_value = if hold {
                start_value.clone()
            } else {
                match &record.e {
                    Some(e) => Some(convert(e)?),
                    None => next
                        .and_then(|n| n.s.as_ref())
                        .map(&convert)
                        .transpose()?
                        .or_else(|| start_value.clone()),
                }
            };

            let start_progress = timing.progress_of(record.t);
            let end_progress = match next {
                Some(n) => timing.progress_of(n.t).max(start_progress),
                None => start_progress.max(1.0),
            };

            let easing = if hold {
                Easing::Linear
            } else {
                Easing::from_handles(record.o.as_ref(), record.i.as_ref())
            };

            keyframes.push(
                Keyframe::new(start_value, end_value, start_progress, end_progress, easing)
                    .with_spatial(spatial_tangents(record.to.as_deref(), record.ti.as_deref())),
            );
        }

        Ok(Self::new(keyframes))
    }
}

fn spatial_tangents(to: Option<&[f32]>, ti: Option<&[f32]>) -> Option<SpatialTangents> {
    match (to, ti) {
        (Some(to), Some(ti)) if to.len() >= 2 && ti.len() >= 2 => Some(SpatialTangents {
            out_tangent: Vec2::new(to[0], to[1]),
            in_tangent: Vec2::new(ti[0], ti[1]),
        }),
        _ => None,
    }
}
