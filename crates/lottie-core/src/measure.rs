//! Arc-length measurement of path contours.

use kurbo::{
    BezPath, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, PathEl, PathSeg,
    Point, QuadBez, Vec2,
};

/// Arc-length parameterization of a single contour.
#[derive(Debug, Clone)]
pub struct ContourMeasure {
    segments: Vec<PathSeg>,
    /// Cumulative length at the end of each segment.
    ends: Vec<f64>,
    closed: bool,
    accuracy: f64,
}

impl ContourMeasure {
    /// Measures the first non-empty contour of `path`.
    pub fn first(path: &BezPath, accuracy: f64) -> Option<Self> {
        Contours::new(path, accuracy).next()
    }

    fn from_segments(segments: Vec<PathSeg>, closed: bool, accuracy: f64) -> Self {
        let mut total = 0.0;
        let ends = segments
            .iter()
            .map(|seg| {
                total += seg.arclen(accuracy);
                total
            })
            .collect();
        Self {
            segments,
            ends,
            closed,
            accuracy,
        }
    }

    pub fn length(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn position_at(&self, distance: f64) -> Point {
        let (idx, t) = self.locate(distance);
        self.segments[idx].eval(t)
    }

    /// Unit tangent at `distance`, or zero on a degenerate segment.
    pub fn tangent_at(&self, distance: f64) -> Vec2 {
        let (idx, t) = self.locate(distance);
        let d = match self.segments[idx] {
            PathSeg::Line(l) => l.p1 - l.p0,
            PathSeg::Quad(q) => q.deriv().eval(t).to_vec2(),
            PathSeg::Cubic(c) => c.deriv().eval(t).to_vec2(),
        };
        let len = d.hypot();
        if len > 0.0 {
            d / len
        } else {
            Vec2::ZERO
        }
    }

    /// The part of the contour between two distances, as an open path.
    ///
    /// Distances are clamped to the contour. An empty or inverted range
    /// yields an empty path.
    pub fn segment(&self, start: f64, end: f64) -> BezPath {
        let mut out = BezPath::new();
        let start = start.max(0.0);
        let end = end.min(self.length());
        if start >= end {
            return out;
        }

        let (i0, t0) = self.locate(start);
        let (i1, t1) = self.locate(end);
        out.move_to(self.segments[i0].eval(t0));

        if i0 == i1 {
            push_seg(&mut out, self.segments[i0].subsegment(t0..t1));
        } else {
            push_seg(&mut out, self.segments[i0].subsegment(t0..1.0));
            for seg in &self.segments[i0 + 1..i1] {
                push_seg(&mut out, *seg);
            }
            push_seg(&mut out, self.segments[i1].subsegment(0.0..t1));
        }
        out
    }

    /// Segment index and curve parameter for a distance along the contour.
    fn locate(&self, distance: f64) -> (usize, f64) {
        let distance = distance.clamp(0.0, self.length());
        let idx = self
            .ends
            .partition_point(|&end| end < distance)
            .min(self.segments.len() - 1);

        let seg_start = if idx == 0 { 0.0 } else { self.ends[idx - 1] };
        let seg_len = self.ends[idx] - seg_start;
        let local = distance - seg_start;

        let t = if seg_len <= 0.0 {
            0.0
        } else if local >= seg_len {
            1.0
        } else {
            self.segments[idx].inv_arclen(local, self.accuracy)
        };
        (idx, t)
    }
}

fn push_seg(path: &mut BezPath, seg: PathSeg) {
    match seg {
        PathSeg::Line(l) => path.line_to(l.p1),
        PathSeg::Quad(q) => path.quad_to(q.p1, q.p2),
        PathSeg::Cubic(c) => path.curve_to(c.p1, c.p2, c.p3),
    }
}

/// Iterates the measurable contours of a path. Contours of zero length are
/// skipped.
pub struct Contours<'a> {
    elements: &'a [PathEl],
    pos: usize,
    accuracy: f64,
}

impl<'a> Contours<'a> {
    pub fn new(path: &'a BezPath, accuracy: f64) -> Self {
        Self {
            elements: path.elements(),
            pos: 0,
            accuracy,
        }
    }
}

impl Iterator for Contours<'_> {
    type Item = ContourMeasure;

    fn next(&mut self) -> Option<ContourMeasure> {
        while self.pos < self.elements.len() {
            let mut segments = Vec::new();
            let mut closed = false;
            let mut start = Point::ZERO;
            let mut current = Point::ZERO;

            while let Some(el) = self.elements.get(self.pos) {
                match *el {
                    PathEl::MoveTo(p) => {
                        if !segments.is_empty() {
                            break;
                        }
                        start = p;
                        current = p;
                    }
                    PathEl::LineTo(p) => {
                        segments.push(PathSeg::Line(Line::new(current, p)));
                        current = p;
                    }
                    PathEl::QuadTo(p1, p2) => {
                        segments.push(PathSeg::Quad(QuadBez::new(current, p1, p2)));
                        current = p2;
                    }
                    PathEl::CurveTo(p1, p2, p3) => {
                        segments.push(PathSeg::Cubic(CubicBez::new(current, p1, p2, p3)));
                        current = p3;
                    }
                    PathEl::ClosePath => {
                        if current != start {
                            segments.push(PathSeg::Line(Line::new(current, start)));
                        }
                        closed = true;
                        self.pos += 1;
                        break;
                    }
                }
                self.pos += 1;
            }

            if segments.is_empty() {
                continue;
            }
            let measure = ContourMeasure::from_segments(segments, closed, self.accuracy);
            if measure.length() > 0.0 {
                return Some(measure);
            }
        }
        None
    }
}

/// Measures every contour of `path`.
pub fn contours(path: &BezPath, accuracy: f64) -> Vec<ContourMeasure> {
    Contours::new(path, accuracy).collect()
}
