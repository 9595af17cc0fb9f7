/// Session state management
///
/// This module owns everything the app remembers about the current attempt:
/// - The session data and its phase (session.rs)
/// - The controller, the only code allowed to mutate the session (controller.rs)
/// - Errors surfaced to the user (error.rs)

pub mod controller;
pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{run_submission, Controller, SubmitOutcome};
pub use error::SubmissionError;
pub use session::{ImageRef, Phase, Session, SessionId};
