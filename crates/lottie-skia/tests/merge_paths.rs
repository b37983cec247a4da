use glam::Vec2;
use kurbo::{BezPath, PathEl, Rect, Shape};
use lottie_core::animation::StaticAnimation;
use lottie_core::content::{Content, ContentGroup, PathContent, ShapeContent};
use lottie_core::transform::GroupTransform;
use lottie_data::model::MergePathsShape;
use lottie_skia::{MergeMode, MergePathsContent};
use serde_json::json;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Box<dyn PathContent> {
    let path = Rect::new(x0, y0, x1, y1).to_path(0.1);
    Box::new(ShapeContent::new(Box::new(StaticAnimation::new(path))))
}

/// Sum of the absolute areas of each contour.
fn area(path: &BezPath) -> f64 {
    let mut total = 0.0;
    let mut contour = Vec::new();
    for el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) && !contour.is_empty() {
            total += BezPath::from_vec(std::mem::take(&mut contour)).area().abs();
        }
        contour.push(*el);
    }
    if !contour.is_empty() {
        total += BezPath::from_vec(contour).area().abs();
    }
    total
}

#[test]
fn add_disjoint_rectangles_sums_areas() {
    let mut merge = MergePathsContent::new(
        MergeMode::Add,
        vec![rect(0.0, 0.0, 10.0, 10.0), rect(20.0, 0.0, 40.0, 10.0)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 300.0).abs() < 1e-3);
}

#[test]
fn intersect_identical_rectangles_keeps_one() {
    let mut merge = MergePathsContent::new(
        MergeMode::Intersect,
        vec![rect(0.0, 0.0, 10.0, 10.0), rect(0.0, 0.0, 10.0, 10.0)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 100.0).abs() < 1e-3);
}

#[test]
fn subtract_by_containing_rectangle_is_empty() {
    let mut merge = MergePathsContent::new(
        MergeMode::Subtract,
        vec![rect(10.0, 10.0, 20.0, 20.0), rect(0.0, 0.0, 50.0, 50.0)],
    );
    let path = merge.path().unwrap();
    assert!(path.elements().is_empty());
}

#[test]
fn subtract_keeps_the_first_child() {
    let mut merge = MergePathsContent::new(
        MergeMode::Subtract,
        vec![rect(0.0, 0.0, 20.0, 10.0), rect(10.0, 0.0, 30.0, 10.0)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 100.0).abs() < 1e-3);
    assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn exclude_drops_the_overlap() {
    let mut merge = MergePathsContent::new(
        MergeMode::ExcludeIntersections,
        vec![rect(0.0, 0.0, 20.0, 10.0), rect(10.0, 0.0, 30.0, 10.0)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 200.0).abs() < 1e-3);
}

#[test]
fn merge_concatenates_without_resolving() {
    let mut merge = MergePathsContent::new(
        MergeMode::Merge,
        vec![rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 0.0, 15.0, 10.0)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 200.0).abs() < 1e-6);
}

#[test]
fn nested_group_children_are_placed_by_group_matrix() {
    let transform = GroupTransform::new(
        Box::new(StaticAnimation::new(Vec2::ZERO)),
        Box::new(StaticAnimation::new(Vec2::new(100.0, 0.0))),
        Box::new(StaticAnimation::new(Vec2::splat(100.0))),
        Box::new(StaticAnimation::new(0.0)),
    );
    let group = ContentGroup::new(
        Some("Moved".into()),
        vec![
            Content::Path(rect(0.0, 0.0, 10.0, 10.0)),
            Content::Path(rect(20.0, 0.0, 30.0, 10.0)),
        ],
        transform,
    );

    let mut merge = MergePathsContent::new(
        MergeMode::Add,
        vec![rect(0.0, 0.0, 10.0, 10.0), Box::new(group)],
    );
    let path = merge.path().unwrap();
    assert!((area(&path) - 300.0).abs() < 1e-3);
    assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 130.0, 10.0));
}

#[test]
fn merges_nest() {
    let inner = MergePathsContent::new(
        MergeMode::Add,
        vec![rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 0.0, 20.0, 10.0)],
    );
    let mut outer = MergePathsContent::new(
        MergeMode::Intersect,
        vec![Box::new(inner), rect(5.0, 0.0, 15.0, 10.0)],
    );
    let path = outer.path().unwrap();
    assert!((area(&path) - 100.0).abs() < 1e-3);
}

#[test]
fn built_from_records() {
    let shape: MergePathsShape =
        serde_json::from_value(json!({ "nm": "Merge Paths 1", "mm": 4 })).unwrap();
    let merge = MergePathsContent::from_shape(&shape, vec![rect(0.0, 0.0, 1.0, 1.0)]);
    assert_eq!(merge.mode(), MergeMode::Intersect);
    assert_eq!(merge.name(), Some("Merge Paths 1"));
    assert_eq!(merge.children().len(), 1);
}
