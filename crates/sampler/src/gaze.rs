use gaze_annotator_common::{round_to, GazeData, UniformSource};

use crate::profile::SamplingProfile;

/// Decimal places kept for yaw/pitch.
pub const ANGLE_DECIMALS: u32 = 2;
/// Decimal places kept for confidence/quality.
pub const SCORE_DECIMALS: u32 = 3;

/// Draw one synthetic gaze annotation.
///
/// Draw order is fixed (looking decision, yaw, pitch, confidence, quality) so
/// a seeded source reproduces the same annotation.
pub fn sample_gaze(profile: &SamplingProfile, source: &mut dyn UniformSource) -> GazeData {
    let looking_at_camera = source.uniform(0.0, 1.0) < profile.looking_probability;

    let angles = if looking_at_camera {
        &profile.looking
    } else {
        &profile.away
    };
    let yaw = source.uniform(angles.yaw.low, angles.yaw.high);
    let pitch = source.uniform(angles.pitch.low, angles.pitch.high);

    let confidence = source.uniform(profile.confidence.low, profile.confidence.high);
    let quality = source.uniform(profile.quality.low, profile.quality.high);

    GazeData {
        yaw_angle: round_to(yaw, ANGLE_DECIMALS),
        pitch_angle: round_to(pitch, ANGLE_DECIMALS),
        looking_at_camera,
        confidence: round_to(confidence, SCORE_DECIMALS),
        quality: round_to(quality, SCORE_DECIMALS),
    }
}
