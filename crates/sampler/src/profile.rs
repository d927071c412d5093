use std::path::Path;

use gaze_annotator_common::AnnotateError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Closed interval `[low, high]` sampled uniformly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Yaw/pitch intervals for one gaze class.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AngleRanges {
    pub yaw: Interval,
    pub pitch: Interval,
}

/// Distribution parameters for the synthetic annotation. Every field may be
/// overridden from a TOML file; missing ones keep their defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingProfile {
    /// Probability that a track is looking at the camera.
    pub looking_probability: f64,
    /// Angles used when looking at the camera.
    pub looking: AngleRanges,
    /// Angles used when looking away.
    pub away: AngleRanges,
    pub confidence: Interval,
    pub quality: Interval,
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self {
            looking_probability: 0.4,
            looking: AngleRanges {
                yaw: Interval::new(-20.0, 20.0),
                pitch: Interval::new(-25.0, 25.0),
            },
            away: AngleRanges {
                yaw: Interval::new(-80.0, 80.0),
                pitch: Interval::new(-60.0, 60.0),
            },
            confidence: Interval::new(0.7, 0.95),
            quality: Interval::new(0.6, 0.9),
        }
    }
}

impl SamplingProfile {
    /// Parse and validate a profile from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, AnnotateError> {
        let profile: SamplingProfile =
            toml::from_str(content).map_err(|e| AnnotateError::Profile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile file.
    pub fn load(path: &Path) -> Result<Self, AnnotateError> {
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded sampling profile");
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), AnnotateError> {
        let p = self.looking_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(AnnotateError::Profile(format!(
                "looking_probability must be within [0, 1], got {p}"
            )));
        }

        let intervals = [
            ("looking.yaw", self.looking.yaw),
            ("looking.pitch", self.looking.pitch),
            ("away.yaw", self.away.yaw),
            ("away.pitch", self.away.pitch),
            ("confidence", self.confidence),
            ("quality", self.quality),
        ];
        for (name, interval) in intervals {
            if !interval.low.is_finite() || !interval.high.is_finite() {
                return Err(AnnotateError::Profile(format!("{name} bounds must be finite")));
            }
            if interval.low > interval.high {
                return Err(AnnotateError::Profile(format!(
                    "{name} low ({}) exceeds high ({})",
                    interval.low, interval.high
                )));
            }
        }
        Ok(())
    }
}
