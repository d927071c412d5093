use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Identifier of a person track inside a metadata document.
pub type TrackId = i64;

/// Key under which the synthetic annotation is attached to each track.
pub const GAZE_DATA_KEY: &str = "gaze_data";

/// Round half away from zero to `places` decimal digits.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Gaze annotation
// ---------------------------------------------------------------------------

/// Synthetic gaze direction attached to a single track.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GazeData {
    /// Horizontal angle in degrees, 2 decimals.
    pub yaw_angle: f64,
    /// Vertical angle in degrees, 2 decimals.
    pub pitch_angle: f64,
    pub looking_at_camera: bool,
    /// 3 decimals.
    pub confidence: f64,
    /// 3 decimals.
    pub quality: f64,
}

// ---------------------------------------------------------------------------
// Metadata document
// ---------------------------------------------------------------------------

/// Key holding the track list at the top level of a metadata document.
pub const TRACKS_KEY: &str = "tracks";

/// Key holding the integer identifier of a track.
pub const TRACK_ID_KEY: &str = "track_id";

/// One track record.
///
/// `fields` holds every entry as read, in file order. On write the `track_id`
/// and `gaze_data` entries are taken from the typed fields, at their original
/// positions; keys that were not there before are appended.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub track_id: TrackId,
    pub fields: Map<String, Value>,
    /// `None` when the track had no `gaze_data`, or one of another shape.
    /// Annotation replaces it either way.
    pub gaze_data: Option<GazeData>,
}

impl Track {
    pub fn new(track_id: TrackId) -> Self {
        Self {
            track_id,
            fields: Map::new(),
            gaze_data: None,
        }
    }
}

impl Serialize for Track {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.fields.contains_key(TRACK_ID_KEY) {
            map.serialize_entry(TRACK_ID_KEY, &self.track_id)?;
        }
        for (key, value) in &self.fields {
            match (key.as_str(), &self.gaze_data) {
                (TRACK_ID_KEY, _) => map.serialize_entry(key, &self.track_id)?,
                (GAZE_DATA_KEY, Some(gaze)) => map.serialize_entry(key, gaze)?,
                _ => map.serialize_entry(key, value)?,
            }
        }
        if let (false, Some(gaze)) = (self.fields.contains_key(GAZE_DATA_KEY), &self.gaze_data) {
            map.serialize_entry(GAZE_DATA_KEY, gaze)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let track_id = match fields.get(TRACK_ID_KEY) {
            Some(value) => value.as_i64().ok_or_else(|| {
                D::Error::custom(format!("invalid {TRACK_ID_KEY} {value}: expected an integer"))
            })?,
            None => return Err(D::Error::missing_field(TRACK_ID_KEY)),
        };
        let gaze_data = fields
            .get(GAZE_DATA_KEY)
            .and_then(|value| GazeData::deserialize(value).ok());
        Ok(Self {
            track_id,
            fields,
            gaze_data,
        })
    }
}

/// Top-level metadata file.
///
/// `fields` holds every top-level entry in file order. The raw `tracks` entry
/// is left as a `null` placeholder that marks its position; the typed tracks
/// are written there. `tracks` stays `None` when the key is absent so that
/// writing the document back does not introduce it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataDocument {
    pub tracks: Option<Vec<Track>>,
    pub fields: Map<String, Value>,
}

impl MetadataDocument {
    /// Tracks in file order; empty when the key is absent.
    pub fn tracks(&self) -> &[Track] {
        self.tracks.as_deref().unwrap_or(&[])
    }

    pub fn tracks_mut(&mut self) -> &mut [Track] {
        self.tracks.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Serialize for MetadataDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            match (key.as_str(), &self.tracks) {
                (TRACKS_KEY, Some(tracks)) => map.serialize_entry(key, tracks)?,
                _ => map.serialize_entry(key, value)?,
            }
        }
        if let (false, Some(tracks)) = (self.fields.contains_key(TRACKS_KEY), &self.tracks) {
            map.serialize_entry(TRACKS_KEY, tracks)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetadataDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tracks = match fields.get_mut(TRACKS_KEY) {
            Some(slot) => Some(Vec::<Track>::deserialize(slot.take()).map_err(D::Error::custom)?),
            None => None,
        };
        Ok(Self { tracks, fields })
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate counts reported after an annotation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub looking: usize,
    pub total: usize,
}

impl Statistics {
    pub fn tally<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        flags.into_iter().fold(Self::default(), |mut stats, looking| {
            stats.total += 1;
            if looking {
                stats.looking += 1;
            }
            stats
        })
    }

    /// Share of tracks looking at the camera, in percent. `None` for an empty
    /// collection.
    pub fn looking_percentage(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.looking as f64 * 100.0 / self.total as f64)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.looking_percentage() {
            Some(pct) => write!(f, "{}/{} ({:.1}%)", self.looking, self.total, pct),
            None => write!(f, "{}/{} (N/A)", self.looking, self.total),
        }
    }
}

// ---------------------------------------------------------------------------
// UniformSource trait — the sampler ↔ randomness boundary
// ---------------------------------------------------------------------------

pub trait UniformSource {
    /// Draw a value uniformly from `[low, high)`. Returns `low` when the range
    /// is empty or degenerate.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed metadata document: {0}")]
    Format(#[from] serde_json::Error),

    #[error("invalid sampling profile: {0}")]
    Profile(String),
}
