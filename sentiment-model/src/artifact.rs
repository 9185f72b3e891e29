//! Model artifact codec
//!
//! The artifact is a framed binary blob:
//! - 4 magic bytes `SNTM`
//! - 4-byte big-endian format version
//! - 4-byte big-endian payload length
//! - JSON payload of the fitted [`SentimentPipeline`]
//!
//! Decoding rejects anything that is not exactly one well-formed frame and
//! checks that the model tables line up, so a decoded pipeline never indexes
//! out of bounds at prediction time.

use thiserror::Error;
use tracing::debug;

use crate::pipeline::SentimentPipeline;

/// Fixed object key / file name of the artifact
pub const ARTIFACT_KEY: &str = "model.bin";

/// Leading magic bytes
pub const MAGIC: [u8; 4] = *b"SNTM";

/// Current format version
pub const FORMAT_VERSION: u32 = 1;

/// Magic + version + payload length
const HEADER_LEN: usize = 12;

/// Errors that can occur while encoding or decoding an artifact
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact truncated: got {0} bytes, header needs 12")]
    Truncated(usize),

    #[error("Bad magic bytes: {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("Unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    #[error("Payload length mismatch: header declares {declared} bytes, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Payload of {0} bytes does not fit the length field")]
    TooLarge(usize),

    #[error("Failed to (de)serialize model payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model payload is inconsistent: {0}")]
    Inconsistent(String),
}

/// Serialize a fitted pipeline into an artifact.
pub fn encode(pipeline: &SentimentPipeline) -> Result<Vec<u8>, ArtifactError> {
    let payload = serde_json::to_vec(pipeline)?;
    let len = u32::try_from(payload.len()).map_err(|_| ArtifactError::TooLarge(payload.len()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    bytes.extend_from_slice(&len.to_be_bytes());
    bytes.extend_from_slice(&payload);

    debug!(artifact_len = bytes.len(), "Artifact encoded");
    Ok(bytes)
}

/// Deserialize an artifact back into a pipeline.
pub fn decode(bytes: &[u8]) -> Result<SentimentPipeline, ArtifactError> {
    if bytes.len() < HEADER_LEN {
        return Err(ArtifactError::Truncated(bytes.len()));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);

    let magic = [header[0], header[1], header[2], header[3]];
    if magic != MAGIC {
        return Err(ArtifactError::BadMagic(magic));
    }

    let version = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    if version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion(version));
    }

    let declared = u32::from_be_bytes([header[8], header[9], header[10], header[11]]) as usize;
    if declared != payload.len() {
        return Err(ArtifactError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let pipeline: SentimentPipeline = serde_json::from_slice(payload)?;
    pipeline.validate().map_err(ArtifactError::Inconsistent)?;

    debug!(
        features = pipeline.num_features(),
        classes = pipeline.classes().len(),
        "Artifact decoded"
    );
    Ok(pipeline)
}
