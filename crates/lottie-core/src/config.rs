use serde::{Deserialize, Serialize};

/// Tolerances used by arc-length measurement and trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Accuracy passed to kurbo's arc-length routines.
    pub arclen_accuracy: f64,
    /// Contours shorter than this are never trimmed.
    pub min_trim_length: f64,
    /// A trim window within this distance of the full length leaves the path untouched.
    pub full_trim_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            arclen_accuracy: 1e-3,
            min_trim_length: 1.0,
            full_trim_tolerance: 0.01,
        }
    }
}

/// Frame range used to map keyframe times onto normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub start_frame: f32,
    pub end_frame: f32,
}

impl Timing {
    pub fn new(start_frame: f32, end_frame: f32) -> Self {
        Self {
            start_frame,
            end_frame,
        }
    }

    pub fn duration_frames(&self) -> f32 {
        self.end_frame - self.start_frame
    }

    /// Normalized progress of `frame`. Zero-length ranges map everything to 0.
    pub fn progress_of(&self, frame: f32) -> f64 {
        let duration = self.duration_frames();
        if duration <= 0.0 {
            return 0.0;
        }
        ((frame - self.start_frame) / duration) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: GeometryConfig =
            serde_json::from_value(json!({ "min_trim_length": 4.0 })).unwrap();
        assert_eq!(config.min_trim_length, 4.0);
        assert_eq!(config.arclen_accuracy, 1e-3);
        assert_eq!(config.full_trim_tolerance, 0.01);
    }

    #[test]
    fn timing_progress() {
        let timing = Timing::new(10.0, 30.0);
        assert_eq!(timing.progress_of(10.0), 0.0);
        assert_eq!(timing.progress_of(20.0), 0.5);
        assert_eq!(Timing::new(5.0, 5.0).progress_of(7.0), 0.0);
    }
}
