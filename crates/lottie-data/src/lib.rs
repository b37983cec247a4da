//! Records decoded from Lottie JSON that feed the keyframe engine.

pub mod model;
