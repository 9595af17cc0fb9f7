use thiserror::Error;

use super::session::Phase;

/// Everything that can go wrong in a session, as shown to the user.
///
/// Each variant becomes a single blocking notice. None of them are retried
/// automatically; the user goes back to the form and submits again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Permission to access the photo gallery is required.")]
    PermissionDenied,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to upload the image: {0}")]
    Upload(String),

    #[error("Failed to retrieve the generated image: {0}")]
    Retrieval(String),

    #[error("Could not reach the server: {0}")]
    Connection(String),

    #[error("Cannot {action} while {phase}.")]
    InvalidTransition { action: &'static str, phase: Phase },
}

/// Missing form input, detected before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an image first.")]
    MissingImage,
    #[error("Please enter a positive prompt.")]
    EmptyPositivePrompt,
    #[error("Please enter a negative prompt.")]
    EmptyNegativePrompt,
}
