use glam::Vec2;
use kurbo::{BezPath, Point};
use lottie_data::model::BezierPath;

/// Vertex and tangent form of a bezier contour.
///
/// Tangents are stored relative to their vertex, which keeps point-wise
/// interpolation between two shapes well behaved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeData {
    pub vertices: Vec<Vec2>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
    pub closed: bool,
}

impl ShapeData {
    /// Tangent lists are cut or zero-padded to the vertex count.
    pub fn new(
        vertices: Vec<Vec2>,
        mut in_tangents: Vec<Vec2>,
        mut out_tangents: Vec<Vec2>,
        closed: bool,
    ) -> Self {
        in_tangents.resize(vertices.len(), Vec2::ZERO);
        out_tangents.resize(vertices.len(), Vec2::ZERO);
        Self {
            vertices,
            in_tangents,
            out_tangents,
            closed,
        }
    }

    /// A closed polygon with straight edges.
    pub fn polygon(vertices: &[Vec2]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            in_tangents: vec![Vec2::ZERO; vertices.len()],
            out_tangents: vec![Vec2::ZERO; vertices.len()],
            closed: true,
        }
    }

    /// Missing tangents are treated as zero.
    pub fn from_bezier_path(path: &BezierPath) -> Self {
        let to_vec = |pts: &[[f32; 2]], n: usize| -> Vec<Vec2> {
            (0..n)
                .map(|i| pts.get(i).map(|p| Vec2::new(p[0], p[1])).unwrap_or(Vec2::ZERO))
                .collect()
        };
        let n = path.v.len();
        Self {
            vertices: to_vec(&path.v, n),
            in_tangents: to_vec(&path.i, n),
            out_tangents: to_vec(&path.o, n),
            closed: path.c,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Point-wise blend towards `other`.
    ///
    /// Shapes should share a vertex count. When they do not, only the common
    /// prefix is blended.
    pub fn interpolate(&self, other: &ShapeData, t: f32) -> ShapeData {
        if self.len() != other.len() {
            tracing::warn!(
                start = self.len(),
                end = other.len(),
                "interpolating shapes with different vertex counts"
            );
        }
        let n = self.len().min(other.len());
        let blend = |a: &[Vec2], b: &[Vec2]| -> Vec<Vec2> {
            a.iter().zip(b).take(n).map(|(a, b)| a.lerp(*b, t)).collect()
        };

        ShapeData {
            vertices: blend(&self.vertices, &other.vertices),
            in_tangents: blend(&self.in_tangents, &other.in_tangents),
            out_tangents: blend(&self.out_tangents, &other.out_tangents),
            closed: self.closed || other.closed,
        }
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let n = self.vertices.len();
        if n == 0 {
            return path;
        }

        let pt = |v: Vec2| Point::new(v.x as f64, v.y as f64);
        let tangent = |list: &[Vec2], i: usize| list.get(i).copied().unwrap_or(Vec2::ZERO);
        let (ins, outs) = (&self.in_tangents, &self.out_tangents);
        path.move_to(pt(self.vertices[0]));

        for i in 1..n {
            let prev = i - 1;
            path.curve_to(
                pt(self.vertices[prev] + tangent(outs, prev)),
                pt(self.vertices[i] + tangent(ins, i)),
                pt(self.vertices[i]),
            );
        }

        if self.closed {
            let last = n - 1;
            path.curve_to(
                pt(self.vertices[last] + tangent(outs, last)),
                pt(self.vertices[0] + tangent(ins, 0)),
                pt(self.vertices[0]),
            );
            path.close_path();
        }

        path
    }
}

impl From<&BezierPath> for ShapeData {
    fn from(path: &BezierPath) -> Self {
        ShapeData::from_bezier_path(path)
    }
}
