use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Error reading the word list
    #[error("Word list could not be read")]
    WordList(#[from] io::Error),
    /// Error decoding an image
    #[error("Image could not be decoded")]
    Image(#[from] image::error::ImageError),
    /// The frame source could not deliver a capture
    #[error("Frame capture failed: {0}")]
    Capture(String),
    /// The external text recognizer failed outright (not a mismatch, see
    /// [RecognitionFailure](crate::RecognitionFailure) for those)
    #[error("Text recognition backend failed: {0}")]
    Recognizer(String),
}
