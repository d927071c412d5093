use gaze_annotator_common::Statistics;

use crate::annotator::TrackGaze;

pub fn header_line(total: usize) -> String {
    format!("Adding gaze data to {total} tracks...")
}

/// One progress line per annotated track.
pub fn progress_line(track: &TrackGaze) -> String {
    let status = if track.gaze.looking_at_camera {
        "✓ LOOKING"
    } else {
        "✗ not looking"
    };
    format!(
        "  Track {:2}: yaw={:6.2}°, pitch={:6.2}° - {}",
        track.track_id, track.gaze.yaw_angle, track.gaze.pitch_angle, status
    )
}

/// Final summary. An empty collection reports `N/A` instead of a percentage.
pub fn summary_line(stats: &Statistics) -> String {
    format!("\n✅ Done! {stats} looking at camera")
}
