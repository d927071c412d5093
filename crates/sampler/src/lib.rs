pub mod gaze;
pub mod profile;
pub mod source;
