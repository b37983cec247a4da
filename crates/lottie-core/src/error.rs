use thiserror::Error;

/// Failures raised while evaluating animated properties.
///
/// None of these are retried: they point at malformed authoring data, so a
/// renderer should stop animating the affected property and keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LottieError {
    #[error("cannot resolve a keyframe on an empty timeline")]
    EmptyTimeline,

    #[error("keyframe starting at progress {progress} has no {endpoint} value")]
    MissingKeyframeValue {
        progress: f64,
        endpoint: Endpoint,
    },

    #[error("invalid color literal {0:?}")]
    InvalidColorLiteral(String),

    #[error("cannot interpolate gradients of different sizes (expected {expected} stops, found {found})")]
    GradientSizeMismatch { expected: usize, found: usize },
}

/// Which side of a keyframe interval a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

pub type Result<T> = std::result::Result<T, LottieError>;
