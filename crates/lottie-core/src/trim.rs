//! Arc-length trimming of paths.
//!
//! Operators take start, end and offset as fractions of the contour length.
//! [`TrimPathContent`] converts authored percentages and degrees at the
//! boundary.

use crate::animation::{AnimatedValue, DoubleAnimation};
use crate::config::{GeometryConfig, Timing};
use crate::error::Result;
use crate::listeners::{DirtyFlag, ListenerId, Listeners};
use crate::measure::{contours, ContourMeasure};
use kurbo::BezPath;
use lottie_data::model::TrimShape;
use std::cell::RefCell;
use std::rc::Rc;

/// Non-negative remainder of `a / b` for positive `b`.
pub fn floor_mod(a: f64, b: f64) -> f64 {
    a - (a / b).floor() * b
}

/// Trims the first contour of `path` to the window `[start, end]`, shifted by
/// `offset`, wrapping around the contour start.
pub fn trim_path(path: &BezPath, start: f64, end: f64, offset: f64) -> BezPath {
    trim_path_with(path, start, end, offset, &GeometryConfig::default())
}

pub fn trim_path_with(
    path: &BezPath,
    start: f64,
    end: f64,
    offset: f64,
    config: &GeometryConfig,
) -> BezPath {
    if start == 1.0 && end == 0.0 {
        return path.clone();
    }

    let Some(measure) = ContourMeasure::first(path, config.arclen_accuracy) else {
        return path.clone();
    };
    let length = measure.length();
    if length < config.min_trim_length || (end - start - 1.0).abs() < config.full_trim_tolerance {
        tracing::debug!(length, start, end, "trim leaves path untouched");
        return path.clone();
    }

    let s = length * start;
    let e = length * end;
    let offset_length = offset * length;
    let mut new_start = s.min(e) + offset_length;
    let mut new_end = s.max(e) + offset_length;

    if new_start >= length && new_end >= length {
        new_start = floor_mod(new_start, length);
        new_end = floor_mod(new_end, length);
    }
    if new_start < 0.0 {
        new_start = floor_mod(new_start, length);
    }
    if new_end < 0.0 {
        new_end = floor_mod(new_end, length);
    }

    if new_start == new_end {
        return BezPath::new();
    }
    if new_start >= new_end {
        new_start -= length;
    }

    let mut trimmed = measure.segment(new_start, new_end);
    if new_end > length {
        append(&mut trimmed, &measure.segment(0.0, floor_mod(new_end, length)));
    } else if new_start < 0.0 {
        append(&mut trimmed, &measure.segment(length + new_start, length));
    }
    trimmed
}

fn append(path: &mut BezPath, other: &BezPath) {
    for el in other.elements() {
        path.push(*el);
    }
}

/// Trims several paths with one window laid over their concatenated length.
///
/// Paths falling entirely outside the window are dropped; the others are
/// returned whole or trimmed, in path order.
pub fn trim_paths_individually(
    paths: &[BezPath],
    start: f64,
    end: f64,
    offset: f64,
    config: &GeometryConfig,
) -> Vec<BezPath> {
    let lengths: Vec<f64> = paths
        .iter()
        .map(|p| {
            contours(p, config.arclen_accuracy)
                .first()
                .map(ContourMeasure::length)
                .unwrap_or(0.0)
        })
        .collect();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return paths.to_vec();
    }

    let offset_length = total * offset;
    let trim_start = total * start + offset_length;
    let trim_end = (total * end + offset_length).min(trim_start + total - 1.0);

    let mut out = Vec::new();
    let mut current = 0.0;
    for (path, &length) in paths.iter().zip(&lengths) {
        if length <= 0.0 {
            continue;
        }

        let wrapped_end = trim_end - total;
        if trim_end > total && wrapped_end < current + length && current < wrapped_end {
            let s = if trim_start > total {
                (trim_start - total) / length
            } else {
                0.0
            };
            let e = (wrapped_end / length).min(1.0);
            push_visible(&mut out, trim_path_with(path, s, e, 0.0, config));
        } else if current + length < trim_start || current > trim_end {
            // outside the window
        } else if current + length <= trim_end && trim_start < current {
            out.push(path.clone());
        } else {
            let s = if trim_start < current {
                0.0
            } else {
                (trim_start - current) / length
            };
            let e = if trim_end > current + length {
                1.0
            } else {
                (trim_end - current) / length
            };
            push_visible(&mut out, trim_path_with(path, s, e, 0.0, config));
        }
        current += length;
    }
    out
}

fn push_visible(out: &mut Vec<BezPath>, path: BezPath) {
    if !path.elements().is_empty() {
        out.push(path);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimKind {
    /// Every path is trimmed with the same window.
    #[default]
    Simultaneously,
    /// One window spans all paths end to end.
    Individually,
}

impl TrimKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => TrimKind::Individually,
            _ => TrimKind::Simultaneously,
        }
    }
}

/// Trim paths are shared between the content that owns them and every path
/// they apply to.
pub type SharedTrim = Rc<RefCell<TrimPathContent>>;

/// Animated trim window. Start and end are authored in percent, offset in
/// degrees.
pub struct TrimPathContent {
    name: Option<String>,
    kind: TrimKind,
    hidden: bool,
    start: DoubleAnimation,
    end: DoubleAnimation,
    offset: DoubleAnimation,
    changed: DirtyFlag,
    listeners: Listeners,
    config: GeometryConfig,
}

impl TrimPathContent {
    pub fn new(
        kind: TrimKind,
        mut start: DoubleAnimation,
        mut end: DoubleAnimation,
        mut offset: DoubleAnimation,
    ) -> Self {
        let changed = DirtyFlag::new();
        changed.take();
        for anim in [&mut start, &mut end, &mut offset] {
            anim.add_listener(changed.listener());
        }
        Self {
            name: None,
            kind,
            hidden: false,
            start,
            end,
            offset,
            changed,
            listeners: Listeners::new(),
            config: GeometryConfig::default(),
        }
    }

    pub fn from_shape(shape: &TrimShape, timing: Timing) -> Result<Self> {
        let mut trim = Self::new(
            TrimKind::from_code(shape.m),
            DoubleAnimation::from_property(&shape.s, timing)?,
            DoubleAnimation::from_property(&shape.e, timing)?,
            DoubleAnimation::from_property(&shape.o, timing)?,
        );
        trim.name = shape.nm.clone();
        trim.hidden = shape.hd.unwrap_or(false);
        Ok(trim)
    }

    pub fn shared(self) -> SharedTrim {
        Rc::new(RefCell::new(self))
    }

    pub fn with_config(mut self, config: GeometryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> TrimKind {
        self.kind
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Updates the window. Listeners run once, after all three values moved.
    pub fn set_progress(&mut self, progress: f64) {
        self.start.set_progress(progress);
        self.end.set_progress(progress);
        self.offset.set_progress(progress);
        if self.changed.take() {
            self.listeners.notify();
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn start(&mut self) -> Result<f64> {
        Ok(self.start.value()? / 100.0)
    }

    pub fn end(&mut self) -> Result<f64> {
        Ok(self.end.value()? / 100.0)
    }

    pub fn offset(&mut self) -> Result<f64> {
        Ok(self.offset.value()? / 360.0)
    }

    /// Trims one path with the current window.
    pub fn apply(&mut self, path: &BezPath) -> Result<BezPath> {
        if self.hidden {
            return Ok(path.clone());
        }
        let (start, end, offset) = (self.start()?, self.end()?, self.offset()?);
        Ok(trim_path_with(path, start, end, offset, &self.config))
    }

    /// Trims a set of paths according to [`TrimKind`].
    pub fn apply_all(&mut self, paths: &[BezPath]) -> Result<Vec<BezPath>> {
        if self.hidden {
            return Ok(paths.to_vec());
        }
        match self.kind {
            TrimKind::Simultaneously => paths.iter().map(|p| self.apply(p)).collect(),
            TrimKind::Individually => {
                let (start, end, offset) = (self.start()?, self.end()?, self.offset()?);
                Ok(trim_paths_individually(paths, start, end, offset, &self.config))
            }
        }
    }
}

impl std::fmt::Debug for TrimPathContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrimPathContent")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// Concatenates paths into one.
pub fn concat_paths<'a>(paths: impl IntoIterator<Item = &'a BezPath>) -> BezPath {
    let mut out = BezPath::new();
    for path in paths {
        append(&mut out, path);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animatable::DoubleEvaluator;
    use crate::easing::Easing;
    use crate::keyframe::Keyframe;
    use crate::scene::Scene;
    use kurbo::{PathEl, Rect, Shape};
    use std::cell::Cell;

    fn square() -> BezPath {
        Rect::new(0.0, 0.0, 100.0, 100.0).to_path(0.1)
    }

    fn total_length(path: &BezPath) -> f64 {
        contours(path, 1e-6).iter().map(ContourMeasure::length).sum()
    }

    fn contour_count(path: &BezPath) -> usize {
        contours(path, 1e-6).len()
    }

    fn starts_at(path: &BezPath, x: f64, y: f64) -> bool {
        matches!(path.elements().first(), Some(PathEl::MoveTo(p))
            if (p.x - x).abs() < 1e-6 && (p.y - y).abs() < 1e-6)
    }

    #[test]
    fn full_marker_returns_path_unchanged() {
        let path = square();
        for offset in [0.0, 0.3, -0.7] {
            assert_eq!(trim_path(&path, 1.0, 0.0, offset).elements(), path.elements());
        }
    }

    #[test]
    fn full_window_returns_path_unchanged() {
        let path = square();
        assert_eq!(trim_path(&path, 0.0, 1.0, 0.0).elements(), path.elements());
        assert_eq!(trim_path(&path, 0.0, 0.995, 0.0).elements(), path.elements());
    }

    #[test]
    fn short_contours_are_untouched() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.5, 0.0));
        assert_eq!(trim_path(&path, 0.2, 0.4, 0.0).elements(), path.elements());
    }

    #[test]
    fn middle_half() {
        let trimmed = trim_path(&square(), 0.25, 0.75, 0.0);
        assert_eq!(contour_count(&trimmed), 1);
        assert!((total_length(&trimmed) - 200.0).abs() < 1e-6);
        assert!(starts_at(&trimmed, 100.0, 0.0));
    }

    #[test]
    fn offset_window_wraps_around_start() {
        let trimmed = trim_path(&square(), 0.0, 0.3, 0.8);
        assert_eq!(contour_count(&trimmed), 2);
        assert!((total_length(&trimmed) - 120.0).abs() < 1e-6);
    }

    #[test]
    fn negative_offset_wraps_backwards() {
        let trimmed = trim_path(&square(), 0.0, 0.3, -0.1);
        assert_eq!(contour_count(&trimmed), 2);
        assert!((total_length(&trimmed) - 120.0).abs() < 1e-6);
    }

    #[test]
    fn reversed_window_is_reordered() {
        // start and end swap, so the visible run is 0.2..0.9 of the contour
        let trimmed = trim_path(&square(), 0.9, 0.2, 0.0);
        assert_eq!(contour_count(&trimmed), 1);
        assert!((total_length(&trimmed) - 280.0).abs() < 1e-6);
    }

    #[test]
    fn window_past_the_end_is_reduced() {
        let trimmed = trim_path(&square(), 0.1, 0.3, 1.0);
        assert_eq!(contour_count(&trimmed), 1);
        assert!((total_length(&trimmed) - 80.0).abs() < 1e-6);
        assert!(starts_at(&trimmed, 40.0, 0.0));
    }

    #[test]
    fn empty_window_yields_empty_path() {
        assert!(trim_path(&square(), 0.4, 0.4, 0.0).elements().is_empty());
    }

    #[test]
    fn floor_mod_is_non_negative() {
        assert_eq!(floor_mod(-30.0, 400.0), 370.0);
        assert_eq!(floor_mod(430.0, 400.0), 30.0);
        assert_eq!(floor_mod(400.0, 400.0), 0.0);
    }

    fn line(x0: f64, x1: f64) -> BezPath {
        let mut p = BezPath::new();
        p.move_to((x0, 0.0));
        p.line_to((x1, 0.0));
        p
    }

    #[test]
    fn individual_trim_spans_paths() {
        let paths = [line(0.0, 100.0), line(200.0, 300.0)];
        let out = trim_paths_individually(&paths, 0.25, 0.75, 0.0, &GeometryConfig::default());
        assert_eq!(out.len(), 2);
        assert!((total_length(&out[0]) - 50.0).abs() < 1e-9);
        assert!((total_length(&out[1]) - 50.0).abs() < 1e-9);
        assert!(starts_at(&out[1], 200.0, 0.0));
    }

    #[test]
    fn individual_trim_drops_paths_outside_window() {
        let paths = [line(0.0, 100.0), line(0.0, 100.0), line(0.0, 100.0)];
        let out = trim_paths_individually(&paths, 0.0, 0.3, 0.0, &GeometryConfig::default());
        assert_eq!(out.len(), 1);
        assert!((total_length(&out[0]) - 90.0).abs() < 1e-9);
    }

    fn animated(from: f64, to: f64) -> DoubleAnimation {
        let kf = Keyframe::new(Some(from), Some(to), 0.0, 1.0, Easing::Linear);
        DoubleAnimation::new(Scene::new(vec![kf]), DoubleEvaluator)
    }

    #[test]
    fn trim_content_converts_units_and_notifies_once() {
        let mut trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            animated(0.0, 50.0),
            animated(100.0, 100.0),
            animated(0.0, 180.0),
        );
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        trim.add_listener(Box::new(move || h.set(h.get() + 1)));

        trim.set_progress(1.0);
        assert_eq!(hits.get(), 1);
        trim.set_progress(1.0);
        assert_eq!(hits.get(), 1);

        assert_eq!(trim.start().unwrap(), 0.5);
        assert_eq!(trim.end().unwrap(), 1.0);
        assert_eq!(trim.offset().unwrap(), 0.5);

        let trimmed = trim.apply(&square()).unwrap();
        assert!((total_length(&trimmed) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn hidden_trim_is_identity() {
        let shape: TrimShape = serde_json::from_value(serde_json::json!({
            "s": { "k": 10 }, "e": { "k": 20 }, "o": { "k": 0 }, "m": 2, "hd": true
        }))
        .unwrap();
        let mut trim = TrimPathContent::from_shape(&shape, Timing::new(0.0, 10.0)).unwrap();
        assert_eq!(trim.kind(), TrimKind::Individually);
        let path = square();
        assert_eq!(trim.apply(&path).unwrap().elements(), path.elements());
    }

    #[test]
    fn configured_minimum_length_skips_trimming() {
        let config = GeometryConfig {
            min_trim_length: 1000.0,
            ..GeometryConfig::default()
        };
        let mut trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            animated(0.0, 0.0),
            animated(50.0, 50.0),
            animated(0.0, 0.0),
        )
        .with_config(config);
        let path = square();
        assert_eq!(trim.apply(&path).unwrap().elements(), path.elements());
        let all = trim.apply_all(&[path.clone()]).unwrap();
        assert_eq!(all[0].elements(), path.elements());
    }

    #[test]
    fn concat_keeps_every_contour() {
        let joined = concat_paths([&line(0.0, 1.0), &line(5.0, 6.0)]);
        assert_eq!(joined.elements().len(), 4);
        assert_eq!(&joined.elements()[..2], line(0.0, 1.0).elements());
    }
}
