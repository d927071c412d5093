use std::path::{Path, PathBuf};

use gaze_annotator_common::{AnnotateError, Statistics};
use gaze_annotator_engine::report::summary_line;
use gaze_annotator_engine::{annotate, GazeAnnotator};
use serde_json::{json, Value};
use tempfile::TempDir;

fn setup(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metadata.json");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn decimals(value: f64) -> usize {
    let text = value.to_string();
    text.split('.').nth(1).map_or(0, str::len)
}

fn assert_gaze_valid(gaze: &Value) {
    let obj = gaze.as_object().expect("gaze_data must be an object");
    assert_eq!(obj.len(), 5, "unexpected gaze fields: {gaze}");

    let yaw = obj["yaw_angle"].as_f64().unwrap();
    let pitch = obj["pitch_angle"].as_f64().unwrap();
    let looking = obj["looking_at_camera"].as_bool().unwrap();
    let confidence = obj["confidence"].as_f64().unwrap();
    let quality = obj["quality"].as_f64().unwrap();

    if looking {
        assert!((-20.0..=20.0).contains(&yaw), "{gaze}");
        assert!((-25.0..=25.0).contains(&pitch), "{gaze}");
    } else {
        assert!((-80.0..=80.0).contains(&yaw), "{gaze}");
        assert!((-60.0..=60.0).contains(&pitch), "{gaze}");
    }
    assert!((0.7..=0.95).contains(&confidence), "{gaze}");
    assert!((0.6..=0.9).contains(&quality), "{gaze}");

    assert!(decimals(yaw) <= 2 && decimals(pitch) <= 2, "{gaze}");
    assert!(decimals(confidence) <= 3 && decimals(quality) <= 3, "{gaze}");
}

// =========================================================================
// Two tracks: both annotated, summary reports X/2
// =========================================================================
#[test]
fn test_two_track_scenario() {
    let (_dir, path) = setup(r#"{"tracks":[{"track_id":1},{"track_id":2}]}"#);

    let annotation = GazeAnnotator::seeded(1).annotate_file(&path).unwrap();
    assert_eq!(annotation.statistics.total, 2);
    assert!(annotation.statistics.looking <= 2);

    let doc = read_json(&path);
    let tracks = doc["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["track_id"], json!(1));
    assert_eq!(tracks[1]["track_id"], json!(2));
    for track in tracks {
        assert_gaze_valid(&track["gaze_data"]);
    }

    let summary = summary_line(&annotation.statistics);
    assert!(summary.contains(&format!("{}/2", annotation.statistics.looking)));
}

// =========================================================================
// Empty collection: no crash, percentage reported as N/A
// =========================================================================
#[test]
fn test_empty_tracks_scenario() {
    let (_dir, path) = setup(r#"{"tracks":[]}"#);

    let stats = annotate(&path).unwrap();
    assert_eq!(stats, Statistics { looking: 0, total: 0 });
    assert_eq!(stats.looking_percentage(), None);
    assert!(summary_line(&stats).contains("0/0 (N/A)"));

    assert_eq!(read_json(&path), json!({"tracks": []}));
}

// =========================================================================
// Missing `tracks` key is an empty collection and is not introduced
// =========================================================================
#[test]
fn test_absent_tracks_key() {
    let (_dir, path) = setup(r#"{"video": "demo.mp4"}"#);

    let stats = annotate(&path).unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(read_json(&path), json!({"video": "demo.mp4"}));
}

// =========================================================================
// Other top-level and per-track fields pass through untouched
// =========================================================================
#[test]
fn test_passthrough_of_unknown_fields() {
    let input = json!({
        "video": {"name": "interview.mp4", "fps": 29.97, "duration": 312.5},
        "tracks": [
            {
                "track_id": 3,
                "age_range": "25-34",
                "gender": "female",
                "frames": [10, 11, 12],
                "bbox": {"x": 0.25, "y": 0.5, "w": 0.125, "h": 0.2},
                "gaze_data": {"legacy": true}
            },
            {"track_id": 8, "emotion": null, "score": -1}
        ],
        "generated_at": "2024-05-01T12:00:00Z"
    });
    let (_dir, path) = setup(&input.to_string());

    GazeAnnotator::seeded(99).annotate_file(&path).unwrap();
    let output = read_json(&path);

    let in_obj = input.as_object().unwrap();
    let out_obj = output.as_object().unwrap();
    assert_eq!(in_obj.len(), out_obj.len());
    for (key, value) in in_obj {
        if key != "tracks" {
            assert_eq!(&out_obj[key], value, "top-level field {key} changed");
        }
    }

    let in_tracks = input["tracks"].as_array().unwrap();
    let out_tracks = output["tracks"].as_array().unwrap();
    assert_eq!(in_tracks.len(), out_tracks.len());
    for (before, after) in in_tracks.iter().zip(out_tracks) {
        for (key, value) in before.as_object().unwrap() {
            if key != "gaze_data" {
                assert_eq!(&after[key], value, "track field {key} changed");
            }
        }
        assert_gaze_valid(&after["gaze_data"]);
    }
}

// =========================================================================
// Number text, key order and non-ASCII text survive the rewrite
// =========================================================================
#[test]
fn test_passthrough_is_textual() {
    let input = r#"{"session":123456789012345678901234567890,"tracks":[{"hash":18446744073709551616,"track_id":1,"ratio":0.1000000000000000055511}],"title":"Entrevista à Zoë"}"#;
    let (_dir, path) = setup(input);

    GazeAnnotator::seeded(7).annotate_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("\"session\": 123456789012345678901234567890,"), "{text}");
    assert!(text.contains("\"hash\": 18446744073709551616,"), "{text}");
    assert!(text.contains("\"ratio\": 0.1000000000000000055511,"), "{text}");
    assert!(text.contains(r#""title": "Entrevista \u00e0 Zo\u00eb""#), "{text}");

    let order: Vec<usize> = ["\"session\"", "\"tracks\"", "\"hash\"", "\"track_id\"", "\"ratio\"", "\"gaze_data\"", "\"title\""]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{text}");
}

// =========================================================================
// Written file uses 2-space indentation
// =========================================================================
#[test]
fn test_output_is_pretty_printed() {
    let (_dir, path) = setup(r#"{"tracks":[{"track_id":1}]}"#);
    GazeAnnotator::seeded(5).annotate_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"tracks\": [\n    {\n      \"track_id\": 1,"));
    assert!(text.contains("\n      \"gaze_data\": {\n        \"yaw_angle\": "));
}

// =========================================================================
// Same seed, same file contents
// =========================================================================
#[test]
fn test_seeded_runs_are_reproducible() {
    let input = r#"{"tracks":[{"track_id":1},{"track_id":2},{"track_id":3}]}"#;
    let (_dir_a, path_a) = setup(input);
    let (_dir_b, path_b) = setup(input);

    let a = GazeAnnotator::seeded(123).annotate_file(&path_a).unwrap();
    let b = GazeAnnotator::seeded(123).annotate_file(&path_b).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        std::fs::read_to_string(&path_a).unwrap(),
        std::fs::read_to_string(&path_b).unwrap()
    );
}

// =========================================================================
// Re-annotating keeps the shape and replaces gaze_data
// =========================================================================
#[test]
fn test_reannotation_keeps_shape() {
    let (_dir, path) = setup(r#"{"tracks":[{"track_id":4},{"track_id":2}]}"#);

    GazeAnnotator::seeded(1).annotate_file(&path).unwrap();
    let first = read_json(&path);
    GazeAnnotator::seeded(2).annotate_file(&path).unwrap();
    let second = read_json(&path);

    let ids = |doc: &Value| -> Vec<i64> {
        doc["tracks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["track_id"].as_i64().unwrap())
            .collect()
    };
    assert_eq!(ids(&first), vec![4, 2]);
    assert_eq!(ids(&second), vec![4, 2]);
    for track in second["tracks"].as_array().unwrap() {
        assert_eq!(track.as_object().unwrap().len(), 2);
        assert_gaze_valid(&track["gaze_data"]);
    }
}

// =========================================================================
// Failures abort before the file is touched
// =========================================================================
#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");

    let err = annotate(&path).unwrap_err();
    assert!(matches!(err, AnnotateError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_invalid_json_is_format_error() {
    let content = "{\"tracks\": [ {\"track_id\": 1}, ";
    let (_dir, path) = setup(content);

    let err = annotate(&path).unwrap_err();
    assert!(matches!(err, AnnotateError::Format(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_missing_track_id_is_format_error() {
    let content = r#"{"tracks":[{"track_id":1},{"label":"no id"}]}"#;
    let (_dir, path) = setup(content);

    let err = GazeAnnotator::seeded(0).annotate_file(&path).unwrap_err();
    match err {
        AnnotateError::Format(e) => assert!(e.to_string().contains("track_id")),
        other => panic!("expected format error, got {other}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}
