use thiserror::Error;

use crate::shared::frame::Frame;

/// The bytes of a photo could not be turned into pixels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot decode image: {0}")]
pub struct DecodeError(pub String);

/// Decodes raw photo bytes into an RGB [`Frame`].
pub trait FrameDecoder: Send {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError>;
}
