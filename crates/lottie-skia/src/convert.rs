use kurbo::{BezPath, PathEl, Point};
use skia_safe::path::{Iter, Verb};
use skia_safe::{Path, PathBuilder};

fn sk(p: Point) -> skia_safe::Point {
    skia_safe::Point::new(p.x as f32, p.y as f32)
}

fn kp(p: skia_safe::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

/// Copies a kurbo path into a Skia path with the default winding fill.
pub fn to_skia_path(path: &BezPath) -> Path {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                builder.move_to(sk(p));
            }
            PathEl::LineTo(p) => {
                builder.line_to(sk(p));
            }
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(sk(p1), sk(p2));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                builder.cubic_to(sk(p1), sk(p2), sk(p3));
            }
            PathEl::ClosePath => {
                builder.close();
            }
        }
    }
    builder.detach(None)
}

/// Copies a Skia path back into kurbo.
///
/// Conics only come out of Skia when they went in, which this crate never
/// does; should one appear it is approximated by its control quad.
pub fn from_skia_path(path: &Path) -> BezPath {
    let mut out = BezPath::new();
    for (verb, points) in Iter::new(path, false) {
        match (verb, points.as_slice()) {
            (Verb::Move, [p, ..]) => out.move_to(kp(*p)),
            (Verb::Line, [_, p]) => out.line_to(kp(*p)),
            (Verb::Quad, [_, p1, p2]) => out.quad_to(kp(*p1), kp(*p2)),
            (Verb::Conic, [_, p1, p2]) => {
                tracing::trace!("approximating conic as quad");
                out.quad_to(kp(*p1), kp(*p2))
            }
            (Verb::Cubic, [_, p1, p2, p3]) => out.curve_to(kp(*p1), kp(*p2), kp(*p3)),
            (Verb::Close, _) => out.close_path(),
            (Verb::Done, _) => break,
            (verb, points) => {
                tracing::warn!(?verb, count = points.len(), "unexpected path verb layout");
            }
        }
    }
    out
}
