/// The submission controller
///
/// The controller is the only writer of [`Session`]. The UI reads the session
/// through [`Controller::session`] and asks for changes through the methods
/// below, which enforce the phase machine:
///
/// ```text
/// Idle --submit(valid)--> Submitting --upload + fetch ok--> Displaying
///  ^                           |                                |
///  +------- any failure -------+                                |
///  +------------------------- reset ----------------------------+
/// ```
///
/// Submitting is split in three so a UI event loop can observe it:
/// [`Controller::begin_submit`] validates and enters Submitting,
/// [`run_submission`] does the network work without touching the session, and
/// [`Controller::complete_submit`] applies the outcome.

use super::error::{SubmissionError, ValidationError};
use super::session::{ImageRef, Phase, Session, SessionId};
use crate::api::{prepare_photo, ApiError, GenerationApi, UploadForm};
use crate::gallery::{PickOptions, PickOutcome};

/// Snapshot of the form taken when a submission starts
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub session_id: SessionId,
    pub image: ImageRef,
    pub positive_prompt: String,
    pub negative_prompt: String,
    pub style: Option<String>,
}

/// First generated image, or the error to show
pub type SubmitOutcome = Result<ImageRef, SubmissionError>;

#[derive(Debug, Default)]
pub struct Controller {
    session: Session,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view for rendering
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check the form still accepts an image before the chooser is opened
    pub fn begin_select(&self) -> Result<PickOptions, SubmissionError> {
        self.require(Phase::Idle, "select an image")?;
        Ok(PickOptions::default())
    }

    /// Ask the gallery for an image and store it if the user picks one.
    /// The UI runs the same steps as separate messages.
    #[cfg(test)]
    pub async fn select_image(
        &mut self,
        source: &dyn crate::gallery::Gallery,
    ) -> Result<(), SubmissionError> {
        let options = self.begin_select()?;
        let outcome = crate::gallery::pick_image(source, &options).await;
        self.apply_pick(outcome)
    }

    /// Apply the result of a gallery pick made elsewhere (e.g. in a UI task).
    /// Denied and cancelled picks leave the session untouched.
    pub fn apply_pick(&mut self, outcome: PickOutcome) -> Result<(), SubmissionError> {
        self.require(Phase::Idle, "select an image")?;
        match outcome {
            PickOutcome::Denied => Err(SubmissionError::PermissionDenied),
            PickOutcome::Cancelled => Ok(()),
            PickOutcome::Picked(image) => {
                self.session.selected_image = Some(image);
                Ok(())
            }
        }
    }

    pub fn set_positive_prompt(&mut self, text: impl Into<String>) {
        if self.session.phase == Phase::Idle {
            self.session.positive_prompt = text.into();
        }
    }

    pub fn set_negative_prompt(&mut self, text: impl Into<String>) {
        if self.session.phase == Phase::Idle {
            self.session.negative_prompt = text.into();
        }
    }

    pub fn set_style(&mut self, style: Option<String>) {
        if self.session.phase == Phase::Idle {
            self.session.style = style;
        }
    }

    /// Validate the form, mint a session id and enter Submitting.
    ///
    /// On error nothing changes and no network call should be made.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmissionError> {
        self.require(Phase::Idle, "submit")?;

        let image = self
            .session
            .selected_image
            .clone()
            .ok_or(ValidationError::MissingImage)?;
        if self.session.positive_prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPositivePrompt.into());
        }
        if self.session.negative_prompt.trim().is_empty() {
            return Err(ValidationError::EmptyNegativePrompt.into());
        }

        let session_id = SessionId::generate();
        self.session.session_id = Some(session_id);
        self.session.phase = Phase::Submitting;

        tracing::info!(
            %session_id,
            positive_prompt = %self.session.positive_prompt,
            negative_prompt = %self.session.negative_prompt,
            style = ?self.session.style,
            "🎨 Generating new image"
        );

        Ok(SubmitRequest {
            session_id,
            image,
            positive_prompt: self.session.positive_prompt.clone(),
            negative_prompt: self.session.negative_prompt.clone(),
            style: self.session.style.clone(),
        })
    }

    /// Leave Submitting: Displaying on success, Idle (with the id cleared) on failure.
    ///
    /// An outcome for a session id other than the one in flight is rejected.
    pub fn complete_submit(
        &mut self,
        session_id: SessionId,
        outcome: SubmitOutcome,
    ) -> Result<ImageRef, SubmissionError> {
        if self.session.phase != Phase::Submitting || self.session.session_id != Some(session_id) {
            return Err(SubmissionError::InvalidTransition {
                action: "complete a submission",
                phase: self.session.phase,
            });
        }

        match outcome {
            Ok(image) => {
                tracing::info!(%session_id, "✅ Generated image: {}", image);
                self.session.result_image = Some(image.clone());
                self.session.phase = Phase::Displaying;
                Ok(image)
            }
            Err(e) => {
                tracing::debug!(%session_id, "submission failed, back to idle");
                self.session.session_id = None;
                self.session.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    /// Validate, upload, fetch and apply the outcome in one go
    #[cfg(test)]
    pub async fn submit(&mut self, api: &dyn GenerationApi) -> Result<(), SubmissionError> {
        let request = self.begin_submit()?;
        let session_id = request.session_id;
        let outcome = run_submission(api, request).await;
        self.complete_submit(session_id, outcome).map(|_| ())
    }

    /// Back to an empty form. Prompts and style are cleared along with the images.
    pub fn reset(&mut self) -> Result<(), SubmissionError> {
        self.require(Phase::Displaying, "go back to home")?;
        self.session = Session::default();
        Ok(())
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), SubmissionError> {
        if self.session.phase == phase {
            Ok(())
        } else {
            Err(SubmissionError::InvalidTransition {
                action,
                phase: self.session.phase,
            })
        }
    }
}

/// Upload the photo and prompts, then fetch the results for the same id.
///
/// The fetch is only issued once the upload succeeded. Transport failures on
/// either call are connection errors; anything else is attributed to the
/// step that failed.
pub async fn run_submission(api: &dyn GenerationApi, request: SubmitRequest) -> SubmitOutcome {
    let session_id = request.session_id;

    let photo = prepare_photo(&request.image)
        .await
        .map_err(|e| SubmissionError::Upload(e.to_string()))?;

    let form = UploadForm {
        photo,
        positive_prompt: request.positive_prompt,
        negative_prompt: request.negative_prompt,
        style: request.style,
    };
    api.upload(session_id, form).await.map_err(|e| match e {
        ApiError::Transport(msg) => SubmissionError::Connection(msg),
        other => SubmissionError::Upload(other.to_string()),
    })?;

    let photos = api.fetch_results(session_id).await.map_err(|e| match e {
        ApiError::Transport(msg) => SubmissionError::Connection(msg),
        other => SubmissionError::Retrieval(other.to_string()),
    })?;

    photos
        .into_iter()
        .next()
        .map(ImageRef::new)
        .ok_or_else(|| SubmissionError::Retrieval("the server returned no images".to_string()))
}
