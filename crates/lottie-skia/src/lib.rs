//! Skia-backed geometry for Lottie content: path conversion and boolean
//! merging of sibling shapes.

pub mod convert;
pub mod merge;

pub use convert::{from_skia_path, to_skia_path};
pub use merge::{MergeMode, MergePathsContent};
