#![warn(missing_docs)]
//! # preview-gate-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `preview-gate` workspace.
//!
//! ## Responsibilities
//! - Represent a picked file together with its declared media type.
//! - Classify declared media types into a closed [`MediaKind`] set.
//! - Derive data-URI previews from file content.
//! - Track in-memory blobs behind object-reference URIs.
//!
//! ## Data flow
//! The file picker yields a [`SelectedFile`]. Preview derivation turns it into
//! a [`PreviewRepresentation`]; a processed response body becomes a [`Blob`]
//! registered in [`ObjectUrlRegistry`] and rendered through its [`ObjectUrl`].
//!
//! ## Ownership and lifetimes
//! File and blob content is held in [`bytes::Bytes`], so the rendered widget
//! and an in-flight upload share one buffer without borrowing each other.
//!
//! ## Error model
//! Malformed data URIs return [`CoreError`] variants.
//!
//! ## Security and privacy notes
//! Declared media types are trusted as-is; no content sniffing happens here.
//! File bytes are never logged, use [`SelectedFile::fingerprint`] instead.
//!
//! ## Example
//! ```rust
//! use preview_gate_core::{MediaKind, PreviewRepresentation, SelectedFile};
//!
//! let file = SelectedFile::new("dot.png", "image/png", vec![0x89, 0x50]);
//! assert_eq!(file.kind(), MediaKind::Image);
//! let preview = PreviewRepresentation::from_file(&file);
//! assert_eq!(preview.as_str(), "data:image/png;base64,iVA=");
//! ```

use std::collections::HashMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Media type written into data URIs when the picker declared none.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Scheme prefix of every object-reference URI handed out by the registry.
pub const OBJECT_URL_PREFIX: &str = "blob:preview-gate/";

const FINGERPRINT_HEX_LEN: usize = 12;

/// One file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name reported by the picker.
    pub name: String,
    /// Declared media type, stored verbatim (may be empty).
    pub media_type: String,
    /// Raw file content.
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Creates a selected file from picker output.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Classifies the declared media type.
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.media_type)
    }

    /// Returns content size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for zero-length files.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Short content digest for log correlation.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        let mut encoded = hex::encode(digest);
        encoded.truncate(FINGERPRINT_HEX_LEN);
        encoded
    }
}

/// Closed set of preview categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// `image/*`
    Image,
    /// `audio/*`
    Audio,
    /// `video/*`
    Video,
    /// Exactly `application/pdf`.
    Pdf,
    /// Anything else, including an empty declared type.
    Other,
}

impl MediaKind {
    /// Classifies a declared media type.
    ///
    /// # Semantics
    /// Rules are evaluated in order and are case-sensitive:
    /// `image/` prefix, `audio/` prefix, `video/` prefix, exact
    /// `application/pdf`, otherwise [`MediaKind::Other`].
    pub fn classify(declared: &str) -> Self {
        if declared.starts_with("image/") {
            Self::Image
        } else if declared.starts_with("audio/") {
            Self::Audio
        } else if declared.starts_with("video/") {
            Self::Video
        } else if declared == "application/pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// Data-URI preview derived from one [`SelectedFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreviewRepresentation(String);

impl PreviewRepresentation {
    /// Encodes file content as `data:<type>;base64,<payload>`.
    pub fn from_file(file: &SelectedFile) -> Self {
        let media_type = if file.media_type.is_empty() {
            FALLBACK_MEDIA_TYPE
        } else {
            file.media_type.as_str()
        };
        Self(format!(
            "data:{media_type};base64,{}",
            STANDARD.encode(&file.bytes)
        ))
    }

    /// Returns the data URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the data URI back into media type and decoded content.
    ///
    /// # Errors
    /// Returns [`CoreError::MalformedDataUri`] when the scheme or base64 marker
    /// is missing, and [`CoreError::Base64`] for an undecodable payload.
    pub fn decode(&self) -> Result<(String, Vec<u8>), CoreError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| CoreError::MalformedDataUri("missing data: scheme".to_string()))?;
        let (media_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| CoreError::MalformedDataUri("missing base64 marker".to_string()))?;
        let bytes = STANDARD.decode(payload)?;
        Ok((media_type.to_string(), bytes))
    }
}

impl fmt::Display for PreviewRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory binary data addressed by an [`ObjectUrl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Blob content.
    pub bytes: Bytes,
    /// Media type reported alongside the content (may be empty).
    pub media_type: String,
}

impl Blob {
    /// Creates a blob.
    pub fn new(bytes: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }
}

/// Locally-scoped reference usable by rendering elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Returns the URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Table of live object-reference URIs.
///
/// Every [`ObjectUrlRegistry::create`] call yields a fresh URI, even for the
/// same blob content. Entries live until revoked.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    entries: HashMap<ObjectUrl, Blob>,
}

impl ObjectUrlRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a blob and returns its URI.
    pub fn create(&mut self, blob: Blob) -> ObjectUrl {
        let url = ObjectUrl(format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4()));
        self.entries.insert(url.clone(), blob);
        url
    }

    /// Looks up a live blob.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&Blob> {
        self.entries.get(url)
    }

    /// Releases a URI. Returns the blob when it was still live.
    pub fn revoke(&mut self, url: &ObjectUrl) -> Option<Blob> {
        self.entries.remove(url)
    }

    /// Number of live URIs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Error type for core model failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data URI does not follow `data:<type>;base64,<payload>`.
    #[error("malformed data uri: {0}")]
    MalformedDataUri(String),
    /// Base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for media classification and blob bookkeeping.

    use super::*;

    #[test]
    fn classification_is_case_sensitive() {
        assert_eq!(MediaKind::classify("IMAGE/PNG"), MediaKind::Other);
        assert_eq!(MediaKind::classify("Application/pdf"), MediaKind::Other);
    }

    #[test]
    fn empty_media_type_falls_back_in_data_uri() {
        let file = SelectedFile::new("blob.bin", "", vec![1, 2, 3]);
        let preview = PreviewRepresentation::from_file(&file);
        assert!(preview.as_str().starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn decode_rejects_foreign_uris() {
        let foreign = PreviewRepresentation("blob:preview-gate/123".to_string());
        assert!(matches!(foreign.decode(), Err(CoreError::MalformedDataUri(_))));

        let garbled = PreviewRepresentation("data:text/plain;base64,***".to_string());
        assert!(matches!(garbled.decode(), Err(CoreError::Base64(_))));
    }

    #[test]
    fn registry_hands_out_distinct_urls_for_same_blob() {
        let mut registry = ObjectUrlRegistry::new();
        let blob = Blob::new(vec![9, 9], "image/png");
        let first = registry.create(blob.clone());
        let second = registry.create(blob);

        assert_ne!(first, second);
        assert!(first.as_str().starts_with(OBJECT_URL_PREFIX));
        assert_eq!(registry.len(), 2);

        assert!(registry.revoke(&first).is_some());
        assert!(registry.resolve(&first).is_none());
        assert!(registry.resolve(&second).is_some());
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = SelectedFile::new("a.txt", "text/plain", b"hello".to_vec());
        let b = SelectedFile::new("b.txt", "text/plain", b"hello".to_vec());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
    }
}
