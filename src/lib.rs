//! Lottie content engine: keyframe playback, trimmed and merged shape
//! content, masks and gradient paints.
//!
//! The heavy lifting lives in the member crates; this crate re-exports them
//! and adds loaders that turn JSON fragments into live content.

pub use lottie_core;
pub use lottie_data;
pub use lottie_skia;

use anyhow::{Context, Result};
use lottie_core::{Content, GradientFillContent, MaskGroup, ShapeContent, Timing, TrimPathContent};
use lottie_data::model::{GradientFillShape, MaskProperties, PathShape, TrimShape};
use serde::de::DeserializeOwned;

/// Decodes one record, naming `what` in the error.
pub fn record_from_str<T: DeserializeOwned>(what: &str, json: &str) -> Result<T> {
    serde_json::from_str(json).with_context(|| format!("failed to parse {what} record"))
}

/// The masks of a layer, from its `masksProperties` array.
pub fn mask_group_from_str(json: &str, timing: Timing) -> Result<MaskGroup> {
    let properties: Vec<MaskProperties> = record_from_str("mask", json)?;
    let group = MaskGroup::from_properties(&properties, timing)
        .context("failed to build mask animations")?;
    tracing::debug!(masks = group.len(), "loaded mask group");
    Ok(group)
}

/// A path shape (`ty: "sh"`).
pub fn shape_from_str(json: &str, timing: Timing) -> Result<Content> {
    let shape: PathShape = record_from_str("path shape", json)?;
    let content = ShapeContent::from_shape(&shape, timing).context("failed to build path shape")?;
    Ok(Content::Path(Box::new(content)))
}

/// A trim paths modifier (`ty: "tm"`).
pub fn trim_from_str(json: &str, timing: Timing) -> Result<Content> {
    let shape: TrimShape = record_from_str("trim paths", json)?;
    let trim = TrimPathContent::from_shape(&shape, timing).context("failed to build trim paths")?;
    Ok(Content::Trim(trim.shared()))
}

/// A gradient fill (`ty: "gf"`).
pub fn gradient_fill_from_str(json: &str, timing: Timing) -> Result<Content> {
    let shape: GradientFillShape = record_from_str("gradient fill", json)?;
    let fill =
        GradientFillContent::from_shape(&shape, timing).context("failed to build gradient fill")?;
    Ok(Content::GradientFill(fill))
}
