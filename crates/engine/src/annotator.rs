use std::path::Path;

use gaze_annotator_common::{
    AnnotateError, GazeData, MetadataDocument, Statistics, TrackId, UniformSource,
};
use gaze_annotator_sampler::gaze::sample_gaze;
use gaze_annotator_sampler::profile::SamplingProfile;
use gaze_annotator_sampler::source::RandSource;
use gaze_annotator_store::document::MetadataFile;
use tracing::{debug, warn};

/// Gaze attached to one track during a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackGaze {
    pub track_id: TrackId,
    pub gaze: GazeData,
}

/// Outcome of one annotation pass, in track order.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub tracks: Vec<TrackGaze>,
    pub statistics: Statistics,
}

/// Metadata gaze annotator.
///
/// Owns the sampling profile and the random source. The pass itself performs
/// no I/O; `annotate_file` wraps it with a whole-file load and save.
pub struct GazeAnnotator {
    profile: SamplingProfile,
    source: Box<dyn UniformSource>,
}

impl GazeAnnotator {
    pub fn new(
        profile: SamplingProfile,
        source: Box<dyn UniformSource>,
    ) -> Result<Self, AnnotateError> {
        profile.validate()?;
        Ok(Self { profile, source })
    }

    /// Default profile with a deterministic source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            profile: SamplingProfile::default(),
            source: Box::new(RandSource::seeded(seed)),
        }
    }

    /// Default profile with an entropy-seeded source.
    pub fn from_entropy() -> Self {
        Self {
            profile: SamplingProfile::default(),
            source: Box::new(RandSource::from_entropy()),
        }
    }

    pub fn profile(&self) -> &SamplingProfile {
        &self.profile
    }

    /// Attach a freshly sampled `gaze_data` to every track, replacing any
    /// previous value. Tracks are neither added, removed nor reordered.
    pub fn annotate_document(&mut self, doc: &mut MetadataDocument) -> Annotation {
        let mut tracks = Vec::with_capacity(doc.tracks().len());

        for track in doc.tracks_mut() {
            let gaze = sample_gaze(&self.profile, &mut *self.source);
            debug!(
                track_id = track.track_id,
                yaw = gaze.yaw_angle,
                pitch = gaze.pitch_angle,
                looking = gaze.looking_at_camera,
                "annotated track"
            );
            track.gaze_data = Some(gaze.clone());
            tracks.push(TrackGaze {
                track_id: track.track_id,
                gaze,
            });
        }

        let statistics = Statistics::tally(tracks.iter().map(|t| t.gaze.looking_at_camera));
        if statistics.total == 0 {
            warn!("metadata has no tracks; looking percentage is undefined");
        }

        Annotation { tracks, statistics }
    }

    /// Load `path`, annotate every track and write the document back.
    ///
    /// Read and parse failures abort before the file is touched.
    pub fn annotate_file(&mut self, path: &Path) -> Result<Annotation, AnnotateError> {
        let file = MetadataFile::open(path);
        let mut doc = file.load()?;
        let annotation = self.annotate_document(&mut doc);
        file.save(&doc)?;
        Ok(annotation)
    }
}

/// Annotate the metadata file at `path` with the default profile and an
/// entropy-seeded source.
pub fn annotate(path: &Path) -> Result<Statistics, AnnotateError> {
    let annotation = GazeAnnotator::from_entropy().annotate_file(path)?;
    Ok(annotation.statistics)
}
