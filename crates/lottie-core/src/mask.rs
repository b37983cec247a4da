use crate::animation::{or_static, AnimatedValue, BoxedAnimation, IntegerAnimation, ShapeAnimation};
use crate::config::Timing;
use crate::error::Result;
use kurbo::BezPath;
use lottie_data::model::MaskProperties;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    #[default]
    Add,
    Subtract,
    Intersect,
    None,
}

impl MaskMode {
    /// Record code: `a`, `s`, `i` or `n`. Unknown or missing codes add.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("s") => MaskMode::Subtract,
            Some("i") => MaskMode::Intersect,
            Some("n") => MaskMode::None,
            _ => MaskMode::Add,
        }
    }
}

/// Static description of one mask slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mask {
    pub name: Option<String>,
    pub mode: MaskMode,
    pub inverted: bool,
}

impl From<&MaskProperties> for Mask {
    fn from(props: &MaskProperties) -> Self {
        Mask {
            name: props.nm.clone(),
            mode: MaskMode::from_code(props.mode.as_deref()),
            inverted: props.inv,
        }
    }
}

/// The masks of one layer with their live path and opacity animations.
///
/// All three lists are index-aligned and never resized.
pub struct MaskGroup {
    masks: Vec<Mask>,
    mask_animations: Vec<BoxedAnimation<BezPath>>,
    opacity_animations: Vec<BoxedAnimation<i32>>,
}

impl MaskGroup {
    pub fn new(
        masks: Vec<Mask>,
        mask_animations: Vec<BoxedAnimation<BezPath>>,
        opacity_animations: Vec<BoxedAnimation<i32>>,
    ) -> Self {
        debug_assert_eq!(masks.len(), mask_animations.len());
        debug_assert_eq!(masks.len(), opacity_animations.len());
        Self {
            masks,
            mask_animations,
            opacity_animations,
        }
    }

    pub fn from_properties(properties: &[MaskProperties], timing: Timing) -> Result<Self> {
        let mut masks = Vec::with_capacity(properties.len());
        let mut mask_animations = Vec::with_capacity(properties.len());
        let mut opacity_animations = Vec::with_capacity(properties.len());

        for props in properties {
            masks.push(Mask::from(props));
            mask_animations.push(or_static(
                ShapeAnimation::from_property(&props.pt, timing)?,
                BezPath::new(),
            ));
            opacity_animations.push(or_static(
                IntegerAnimation::from_property(&props.o, timing)?,
                100,
            ));
        }

        Ok(Self::new(masks, mask_animations, opacity_animations))
    }

    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn mask_animations(&self) -> &[BoxedAnimation<BezPath>] {
        &self.mask_animations
    }

    pub fn mask_animations_mut(&mut self) -> &mut [BoxedAnimation<BezPath>] {
        &mut self.mask_animations
    }

    pub fn opacity_animations(&self) -> &[BoxedAnimation<i32>] {
        &self.opacity_animations
    }

    pub fn opacity_animations_mut(&mut self) -> &mut [BoxedAnimation<i32>] {
        &mut self.opacity_animations
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Whether any mask takes part in compositing.
    pub fn has_masks(&self) -> bool {
        self.masks.iter().any(|m| m.mode != MaskMode::None)
    }

    pub fn set_progress(&mut self, progress: f64) {
        for anim in &mut self.mask_animations {
            anim.set_progress(progress);
        }
        for anim in &mut self.opacity_animations {
            anim.set_progress(progress);
        }
    }

    /// Current path of mask `index`.
    pub fn path(&mut self, index: usize) -> Option<Result<BezPath>> {
        self.mask_animations.get_mut(index).map(|anim| anim.value())
    }

    /// Current opacity of mask `index`, in percent.
    pub fn opacity(&mut self, index: usize) -> Option<Result<i32>> {
        self.opacity_animations.get_mut(index).map(|anim| anim.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};
    use serde_json::json;

    fn masks() -> Vec<MaskProperties> {
        serde_json::from_value(json!([
            {
                "mode": "a",
                "nm": "Mask 1",
                "pt": {
                    "a": 1,
                    "k": [
                        { "t": 0, "s": [{ "c": true, "v": [[0, 0], [10, 0], [10, 10], [0, 10]] }] },
                        { "t": 10, "s": [{ "c": true, "v": [[0, 0], [20, 0], [20, 20], [0, 20]] }] }
                    ]
                },
                "o": { "k": 100 }
            },
            {
                "mode": "s",
                "inv": true,
                "pt": { "k": { "c": true, "v": [[5, 5], [6, 5], [6, 6]] } },
                "o": { "a": 1, "k": [{ "t": 0, "s": [0] }, { "t": 10, "s": [100] }] }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn lists_are_index_aligned() {
        let group = MaskGroup::from_properties(&masks(), Timing::new(0.0, 10.0)).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.mask_animations().len(), 2);
        assert_eq!(group.opacity_animations().len(), 2);
        assert_eq!(
            group.masks()[1],
            Mask {
                name: None,
                mode: MaskMode::Subtract,
                inverted: true
            }
        );
        assert!(group.has_masks());
    }

    #[test]
    fn mask_paths_and_opacity_animate() {
        let mut group = MaskGroup::from_properties(&masks(), Timing::new(0.0, 10.0)).unwrap();
        group.set_progress(0.5);

        let path = group.path(0).unwrap().unwrap();
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(group.opacity(1).unwrap().unwrap(), 50);
        assert_eq!(group.opacity(0).unwrap().unwrap(), 100);
        assert!(group.path(2).is_none());
    }

    #[test]
    fn mode_codes() {
        assert_eq!(MaskMode::from_code(Some("a")), MaskMode::Add);
        assert_eq!(MaskMode::from_code(Some("i")), MaskMode::Intersect);
        assert_eq!(MaskMode::from_code(Some("n")), MaskMode::None);
        assert_eq!(MaskMode::from_code(None), MaskMode::Add);
    }
}
