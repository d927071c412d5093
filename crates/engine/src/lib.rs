pub mod annotator;
pub mod report;

pub use annotator::{annotate, Annotation, GazeAnnotator, TrackGaze};
