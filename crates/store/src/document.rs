//! Metadata file codec.
//!
//! Documents are written back with 2-space indentation, keys in their
//! original order (new keys appended), numbers in their original text and
//! non-ASCII characters escaped as `\uXXXX`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use gaze_annotator_common::{AnnotateError, MetadataDocument};
use tracing::info;

/// Parse a metadata document from JSON text.
pub fn decode_document(content: &str) -> Result<MetadataDocument, AnnotateError> {
    Ok(serde_json::from_str(content)?)
}

/// Serialize a document as pretty JSON (2-space indentation), ASCII only.
pub fn encode_document(doc: &MetadataDocument) -> Result<String, AnnotateError> {
    let text = serde_json::to_string_pretty(doc)?;
    Ok(escape_non_ascii(text))
}

/// Non-ASCII characters only occur inside JSON strings, where a `\uXXXX`
/// escape (UTF-16 surrogate pairs above the BMP) is equivalent.
fn escape_non_ascii(text: String) -> String {
    if text.is_ascii() {
        return text;
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            let _ = write!(out, "\\u{unit:04x}");
        }
    }
    out
}

/// A metadata file that is read whole and overwritten whole.
pub struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file.
    pub fn load(&self) -> Result<MetadataDocument, AnnotateError> {
        let content = std::fs::read_to_string(&self.path)?;
        let doc = decode_document(&content)?;
        info!(
            path = %self.path.display(),
            tracks = doc.tracks().len(),
            "loaded metadata"
        );
        Ok(doc)
    }

    /// Encode the document, then replace the file contents. Nothing is
    /// written if encoding fails.
    pub fn save(&self, doc: &MetadataDocument) -> Result<(), AnnotateError> {
        let content = encode_document(doc)?;
        std::fs::write(&self.path, content)?;
        info!(path = %self.path.display(), "saved metadata");
        Ok(())
    }
}
