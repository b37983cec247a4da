//! Path-producing content nodes.
//!
//! Nodes form a tree owned from the top: a group drives the progress of its
//! transform and children, so every value is updated before anything that
//! depends on it is read. Paths are computed lazily on read.

use crate::animation::{or_static, AnimatedValue, BoxedAnimation, ShapeAnimation};
use crate::config::Timing;
use crate::error::Result;
use crate::fill::GradientFillContent;
use crate::listeners::{DirtyFlag, ListenerId};
use crate::transform::GroupTransform;
use crate::trim::{concat_paths, SharedTrim, TrimKind};
use kurbo::{Affine, BezPath};
use lottie_data::model::PathShape;

/// A sibling as seen by content being wired into its group.
#[derive(Clone)]
pub enum Sibling {
    Trim(SharedTrim),
    Other,
}

/// Paths of a group in its own coordinates, with the matrix that places them.
#[derive(Debug, Clone)]
pub struct GroupPaths {
    pub transform: Affine,
    pub paths: Vec<BezPath>,
}

pub trait PathContent {
    fn name(&self) -> Option<&str>;

    fn set_progress(&mut self, progress: f64);

    fn path(&mut self) -> Result<BezPath>;

    /// Called once the owning group is assembled. `before` holds the
    /// siblings that apply to this content, `after` the ones it precedes.
    fn set_contents(&mut self, _before: &[Sibling], _after: &[Sibling]) {}

    /// Groups expose their child paths separately so boolean operations can
    /// combine them one by one.
    fn group_paths(&mut self) -> Option<Result<GroupPaths>> {
        None
    }
}

pub enum Content {
    Path(Box<dyn PathContent>),
    Trim(SharedTrim),
    GradientFill(GradientFillContent),
}

impl Content {
    fn as_sibling(&self) -> Sibling {
        match self {
            Content::Trim(trim) => Sibling::Trim(trim.clone()),
            _ => Sibling::Other,
        }
    }

    fn set_progress(&mut self, progress: f64) {
        match self {
            Content::Path(path) => path.set_progress(progress),
            Content::Trim(trim) => trim.borrow_mut().set_progress(progress),
            Content::GradientFill(fill) => fill.set_progress(progress),
        }
    }
}

/// An animated bezier shape, trimmed by the simultaneous trims that apply to
/// it.
pub struct ShapeContent {
    name: Option<String>,
    hidden: bool,
    shape: BoxedAnimation<BezPath>,
    trims: Vec<(SharedTrim, ListenerId)>,
    dirty: DirtyFlag,
    cached: BezPath,
}

impl ShapeContent {
    pub fn new(mut shape: BoxedAnimation<BezPath>) -> Self {
        let dirty = DirtyFlag::new();
        shape.add_listener(dirty.listener());
        Self {
            name: None,
            hidden: false,
            shape,
            trims: Vec::new(),
            dirty,
            cached: BezPath::new(),
        }
    }

    pub fn from_shape(shape: &PathShape, timing: Timing) -> Result<Self> {
        let animation = or_static(
            ShapeAnimation::from_property(&shape.ks, timing)?,
            BezPath::new(),
        );
        let mut content = Self::new(animation);
        content.name = shape.nm.clone();
        content.hidden = shape.hd.unwrap_or(false);
        Ok(content)
    }

    pub fn trim_count(&self) -> usize {
        self.trims.len()
    }

    fn compute(&mut self) -> Result<BezPath> {
        let mut path = self.shape.value()?;
        for (trim, _) in self.trims.iter().rev() {
            path = trim.borrow_mut().apply(&path)?;
        }
        Ok(path)
    }
}

impl PathContent for ShapeContent {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_progress(&mut self, progress: f64) {
        self.shape.set_progress(progress);
    }

    fn path(&mut self) -> Result<BezPath> {
        if self.hidden {
            return Ok(BezPath::new());
        }
        if !self.dirty.take() {
            return Ok(self.cached.clone());
        }
        match self.compute() {
            Ok(path) => {
                self.cached = path.clone();
                Ok(path)
            }
            Err(err) => {
                self.dirty.mark();
                Err(err)
            }
        }
    }

    fn set_contents(&mut self, before: &[Sibling], _after: &[Sibling]) {
        for (trim, id) in self.trims.drain(..) {
            trim.borrow_mut().remove_listener(id);
        }
        for sibling in before {
            let Sibling::Trim(trim) = sibling else {
                continue;
            };
            if trim.borrow().kind() != TrimKind::Simultaneously {
                continue;
            }
            let id = trim.borrow_mut().add_listener(self.dirty.listener());
            self.trims.push((trim.clone(), id));
        }
        self.dirty.mark();
    }
}

/// An ordered list of contents sharing a transform.
pub struct ContentGroup {
    name: Option<String>,
    hidden: bool,
    contents: Vec<Content>,
    transform: GroupTransform,
}

impl ContentGroup {
    /// Builds the group and wires its contents as a root group.
    pub fn new(name: Option<String>, contents: Vec<Content>, transform: GroupTransform) -> Self {
        let mut group = Self {
            name,
            hidden: false,
            contents,
            transform,
        };
        group.set_contents(&[], &[]);
        group
    }

    /// A hidden group contributes no geometry, however its children animate.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    fn child_paths(&mut self) -> Result<GroupPaths> {
        let transform = self.transform.matrix()?;
        let mut paths = Vec::new();
        if !self.hidden {
            for content in &mut self.contents {
                if let Content::Path(child) = content {
                    paths.push(child.path()?);
                }
            }
        }
        Ok(GroupPaths { transform, paths })
    }

    /// Child paths in order, placed by the group transform, with any
    /// individual trims of this group laid across them.
    pub fn trimmed_paths(&mut self) -> Result<Vec<BezPath>> {
        let matrix = self.transform.matrix()?;
        let mut paths = Vec::new();
        for content in &mut self.contents {
            if let Content::Path(child) = content {
                paths.push(matrix * child.path()?);
            }
        }
        for content in &self.contents {
            if let Content::Trim(trim) = content {
                let mut trim = trim.borrow_mut();
                if trim.kind() == TrimKind::Individually {
                    paths = trim.apply_all(&paths)?;
                }
            }
        }
        Ok(paths)
    }
}

impl PathContent for ContentGroup {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The transform moves first, then children in order.
    fn set_progress(&mut self, progress: f64) {
        self.transform.set_progress(progress);
        for content in &mut self.contents {
            content.set_progress(progress);
        }
    }

    fn path(&mut self) -> Result<BezPath> {
        if self.hidden {
            return Ok(BezPath::new());
        }
        let matrix = self.transform.matrix()?;
        let mut children = Vec::new();
        for content in self.contents.iter_mut().rev() {
            if let Content::Path(child) = content {
                children.push(matrix * child.path()?);
            }
        }
        Ok(concat_paths(&children))
    }

    /// Each child sees the outer siblings plus every later child of this
    /// group as applying to it.
    fn set_contents(&mut self, before: &[Sibling], _after: &[Sibling]) {
        let siblings: Vec<Sibling> = self.contents.iter().map(Content::as_sibling).collect();
        let mut my_before = before.to_vec();
        for i in (0..self.contents.len()).rev() {
            if let Content::Path(child) = &mut self.contents[i] {
                child.set_contents(&my_before, &siblings[..i]);
            }
            my_before.push(siblings[i].clone());
        }
    }

    fn group_paths(&mut self) -> Option<Result<GroupPaths>> {
        Some(self.child_paths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animatable::{DoubleEvaluator, ShapeEvaluator};
    use crate::animation::{DoubleAnimation, KeyframeAnimation, StaticAnimation};
    use crate::easing::Easing;
    use crate::keyframe::Keyframe;
    use crate::measure::{contours, ContourMeasure};
    use crate::scene::Scene;
    use crate::shape::ShapeData;
    use crate::trim::TrimPathContent;
    use glam::Vec2;
    use kurbo::{Point, Rect, Shape};

    fn length(path: &BezPath) -> f64 {
        contours(path, 1e-6).iter().map(ContourMeasure::length).sum()
    }

    fn square_content() -> ShapeContent {
        ShapeContent::new(Box::new(StaticAnimation::new(
            Rect::new(0.0, 0.0, 100.0, 100.0).to_path(0.1),
        )))
    }

    fn constant(v: f64) -> DoubleAnimation {
        DoubleAnimation::new(Scene::fixed(v), DoubleEvaluator)
    }

    fn ramp(from: f64, to: f64) -> DoubleAnimation {
        let kf = Keyframe::new(Some(from), Some(to), 0.0, 1.0, Easing::Linear);
        DoubleAnimation::new(Scene::new(vec![kf]), DoubleEvaluator)
    }

    #[test]
    fn trims_later_in_the_group_apply_to_shapes() {
        let trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            constant(0.0),
            ramp(0.0, 100.0),
            constant(0.0),
        )
        .shared();
        let mut group = ContentGroup::new(
            None,
            vec![Content::Path(Box::new(square_content())), Content::Trim(trim)],
            GroupTransform::identity(),
        );

        group.set_progress(0.5);
        assert!((length(&group.path().unwrap()) - 200.0).abs() < 1e-6);
        group.set_progress(0.25);
        assert!((length(&group.path().unwrap()) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn trims_before_a_shape_do_not_apply() {
        let trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            constant(0.0),
            constant(50.0),
            constant(0.0),
        )
        .shared();
        let mut group = ContentGroup::new(
            None,
            vec![Content::Trim(trim), Content::Path(Box::new(square_content()))],
            GroupTransform::identity(),
        );
        group.set_progress(0.5);
        assert!((length(&group.path().unwrap()) - 400.0).abs() < 1e-6);
    }

    #[test]
    fn outer_trims_reach_nested_groups() {
        let trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            constant(0.0),
            constant(25.0),
            constant(0.0),
        )
        .shared();
        let inner = ContentGroup::new(
            None,
            vec![Content::Path(Box::new(square_content()))],
            GroupTransform::identity(),
        );
        let mut outer = ContentGroup::new(
            None,
            vec![Content::Path(Box::new(inner)), Content::Trim(trim)],
            GroupTransform::identity(),
        );
        outer.set_progress(0.3);
        assert!((length(&outer.path().unwrap()) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn rewiring_does_not_duplicate_trims() {
        let trim = TrimPathContent::new(
            TrimKind::Simultaneously,
            constant(0.0),
            constant(50.0),
            constant(0.0),
        )
        .shared();
        let mut shape = square_content();
        let before = [Sibling::Trim(trim.clone())];
        shape.set_contents(&before, &[]);
        shape.set_contents(&before, &[]);
        assert_eq!(shape.trim_count(), 1);
    }

    #[test]
    fn group_transform_places_children() {
        let transform = GroupTransform::new(
            Box::new(StaticAnimation::new(Vec2::ZERO)),
            Box::new(StaticAnimation::new(Vec2::new(10.0, 20.0))),
            Box::new(StaticAnimation::new(Vec2::splat(100.0))),
            Box::new(StaticAnimation::new(0.0)),
        );
        let mut group = ContentGroup::new(
            Some("g".into()),
            vec![Content::Path(Box::new(square_content()))],
            transform,
        );

        let bounds = group.path().unwrap().bounding_box();
        assert_eq!(bounds, Rect::new(10.0, 20.0, 110.0, 120.0));

        let parts = group.group_paths().unwrap().unwrap();
        assert_eq!(parts.paths.len(), 1);
        assert_eq!(parts.transform * Point::ZERO, Point::new(10.0, 20.0));
        assert_eq!(group.name(), Some("g"));
    }

    #[test]
    fn shape_path_is_cached_until_progress_changes() {
        let a = ShapeData::polygon(&[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]);
        let b = ShapeData::polygon(&[Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(20.0, 20.0)]);
        let kf = Keyframe::new(Some(a), Some(b), 0.0, 1.0, Easing::Linear);
        let anim = KeyframeAnimation::new(Scene::new(vec![kf]), ShapeEvaluator);
        let mut shape = ShapeContent::new(Box::new(anim));

        let first = shape.path().unwrap();
        assert_eq!(shape.path().unwrap().elements(), first.elements());
        shape.set_progress(1.0);
        assert_eq!(shape.path().unwrap().bounding_box(), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn individual_trims_span_group_children() {
        let trim = TrimPathContent::new(
            TrimKind::Individually,
            constant(0.0),
            constant(50.0),
            constant(0.0),
        )
        .shared();
        let mut group = ContentGroup::new(
            None,
            vec![
                Content::Path(Box::new(square_content())),
                Content::Path(Box::new(square_content())),
                Content::Trim(trim),
            ],
            GroupTransform::identity(),
        );
        group.set_progress(0.5);

        let whole = group.path().unwrap();
        assert!((length(&whole) - 800.0).abs() < 1e-6);
        let visible = group.trimmed_paths().unwrap();
        assert_eq!(visible.len(), 1);
        assert!((length(&visible[0]) - 400.0).abs() < 1e-6);
    }

    #[test]
    fn hidden_group_has_no_geometry() {
        let mut group = ContentGroup::new(
            None,
            vec![Content::Path(Box::new(square_content()))],
            GroupTransform::identity(),
        );
        group.set_hidden(true);
        group.set_progress(0.5);
        assert!(group.path().unwrap().elements().is_empty());
        assert!(group.group_paths().unwrap().unwrap().paths.is_empty());

        group.set_hidden(false);
        assert!((length(&group.path().unwrap()) - 400.0).abs() < 1e-6);
    }
}
