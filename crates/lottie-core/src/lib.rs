pub mod animatable;
pub mod animation;
pub mod color;
pub mod config;
pub mod content;
pub mod easing;
pub mod error;
pub mod fill;
pub mod gradient;
pub mod keyframe;
pub mod listeners;
pub mod mask;
pub mod measure;
pub mod scene;
pub mod shape;
pub mod transform;
pub mod trim;

pub use animatable::{Interpolatable, KeyframeEvaluator};
pub use self::keyframe::Keyframe;
pub use animation::{
    AnimatedValue, BoxedAnimation, ColorAnimation, DoubleAnimation, GradientAnimation,
    IntegerAnimation, KeyframeAnimation, PathFollowAnimation, PointAnimation, ScaleAnimation,
    ShapeAnimation, SplitDimensionAnimation, StaticAnimation,
};
pub use color::Color;
pub use config::{GeometryConfig, Timing};
pub use content::{Content, ContentGroup, PathContent, ShapeContent, Sibling};
pub use easing::Easing;
pub use error::{Endpoint, LottieError, Result};
pub use fill::GradientFillContent;
pub use gradient::{create_shader, GradientColor, GradientShader, GradientType};
pub use mask::{Mask, MaskGroup, MaskMode};
pub use measure::ContourMeasure;
pub use scene::Scene;
pub use shape::ShapeData;
pub use transform::GroupTransform;
pub use trim::{trim_path, trim_path_with, SharedTrim, TrimKind, TrimPathContent};
