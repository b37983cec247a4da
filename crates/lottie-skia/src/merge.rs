//! Boolean combination of sibling paths.

use crate::convert::{from_skia_path, to_skia_path};
use kurbo::BezPath;
use lottie_core::content::{PathContent, Sibling};
use lottie_core::Result;
use lottie_data::model::MergePathsShape;
use skia_safe::PathOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Merge,
    Add,
    Subtract,
    Intersect,
    ExcludeIntersections,
}

impl MergeMode {
    /// Record code `mm`: 1 merge, 2 add, 3 subtract, 4 intersect, 5 exclude.
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => MergeMode::Add,
            3 => MergeMode::Subtract,
            4 => MergeMode::Intersect,
            5 => MergeMode::ExcludeIntersections,
            _ => MergeMode::Merge,
        }
    }

    fn path_op(self) -> Option<PathOp> {
        match self {
            MergeMode::Merge => None,
            MergeMode::Add => Some(PathOp::Union),
            MergeMode::Subtract => Some(PathOp::Difference),
            MergeMode::Intersect => Some(PathOp::Intersect),
            MergeMode::ExcludeIntersections => Some(PathOp::XOR),
        }
    }
}

/// Combines the paths of its children with one boolean mode.
///
/// The first child is kept as the base operand; all later children are
/// gathered into a single remainder operand that is applied to it.
pub struct MergePathsContent {
    name: Option<String>,
    mode: MergeMode,
    hidden: bool,
    children: Vec<Box<dyn PathContent>>,
}

impl MergePathsContent {
    pub fn new(mode: MergeMode, children: Vec<Box<dyn PathContent>>) -> Self {
        Self {
            name: None,
            mode,
            hidden: false,
            children,
        }
    }

    pub fn from_shape(shape: &MergePathsShape, children: Vec<Box<dyn PathContent>>) -> Self {
        let mut merge = Self::new(MergeMode::from_code(shape.mm), children);
        merge.name = shape.nm.clone();
        merge.hidden = shape.hd.unwrap_or(false);
        merge
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    pub fn children(&self) -> &[Box<dyn PathContent>] {
        &self.children
    }

    fn merged(&mut self) -> Result<BezPath> {
        let mut out = BezPath::new();
        for child in &mut self.children {
            for el in child.path()?.elements() {
                out.push(*el);
            }
        }
        Ok(out)
    }

    /// A child's geometry as an operand. Groups give up their sub-paths
    /// placed by the group matrix, last sub-path first.
    fn operand(child: &mut dyn PathContent, into: &mut BezPath) -> Result<()> {
        match child.group_paths() {
            Some(group) => {
                let group = group?;
                for path in group.paths.iter().rev() {
                    for el in (group.transform * path.clone()).elements() {
                        into.push(*el);
                    }
                }
            }
            None => {
                for el in child.path()?.elements() {
                    into.push(*el);
                }
            }
        }
        Ok(())
    }

    fn combined(&mut self, op: PathOp) -> Result<BezPath> {
        let Some((first, rest)) = self.children.split_first_mut() else {
            return Ok(BezPath::new());
        };

        let mut base = BezPath::new();
        Self::operand(first.as_mut(), &mut base)?;

        let mut remainder = BezPath::new();
        for child in rest.iter_mut().rev() {
            Self::operand(child.as_mut(), &mut remainder)?;
        }

        let base_sk = to_skia_path(&base);
        match base_sk.op(&to_skia_path(&remainder), op) {
            Some(result) => Ok(from_skia_path(&result)),
            None => {
                tracing::warn!(mode = ?self.mode, "boolean path op failed, keeping base path");
                Ok(base)
            }
        }
    }
}

impl PathContent for MergePathsContent {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_progress(&mut self, progress: f64) {
        for child in &mut self.children {
            child.set_progress(progress);
        }
    }

    fn path(&mut self) -> Result<BezPath> {
        if self.hidden {
            return Ok(BezPath::new());
        }
        match self.mode.path_op() {
            None => self.merged(),
            Some(op) => self.combined(op),
        }
    }

    /// Children are trimmed by whatever applies to the merge itself.
    fn set_contents(&mut self, before: &[Sibling], after: &[Sibling]) {
        for child in &mut self.children {
            child.set_contents(before, after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes() {
        assert_eq!(MergeMode::from_code(1), MergeMode::Merge);
        assert_eq!(MergeMode::from_code(3), MergeMode::Subtract);
        assert_eq!(MergeMode::from_code(5), MergeMode::ExcludeIntersections);
        assert_eq!(MergeMode::from_code(0), MergeMode::Merge);
        assert_eq!(MergeMode::Subtract.path_op(), Some(PathOp::Difference));
        assert_eq!(MergeMode::Merge.path_op(), None);
    }
}
