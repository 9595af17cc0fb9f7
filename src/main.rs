use iced::widget::{container, image};
use iced::{Element, Length, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod config;
mod gallery;
mod logging;
mod state;
mod ui;

use api::{GenerationApi, HttpGenerationApi};
use config::Config;
use gallery::{DesktopGallery, Gallery, PickOutcome};
use state::{run_submission, Controller, Phase, SessionId, SubmissionError, SubmitOutcome};
use ui::result::ResultImage;

/// Main application state
struct PromptRemix {
    /// Owns the session; the only writer of it
    controller: Controller,
    /// Generation service client
    api: Arc<HttpGenerationApi>,
    /// Where images come from
    gallery: Arc<dyn Gallery>,
    /// Style presets for the picker
    styles: Vec<String>,
    /// Decoded preview of the selected image
    preview: Option<image::Handle>,
    /// Generated image as loaded for display
    result: ResultImage,
    /// Blocking message waiting for the user to dismiss it
    notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Select your image"
    SelectImage,
    /// Permission check + chooser finished
    ImagePicked(PickOutcome),
    PositivePromptChanged(String),
    NegativePromptChanged(String),
    StyleSelected(String),
    /// User clicked "Generate image"
    Generate,
    /// Upload + fetch finished for the given session
    SubmissionFinished(SessionId, SubmitOutcome),
    /// Bytes behind the result reference of the given session, or why they could not be loaded
    ResultLoaded(SessionId, Result<Vec<u8>, String>),
    /// User clicked "Save image"
    SaveImage,
    /// Save dialog closed; `None` if cancelled
    ImageSaved(Result<Option<PathBuf>, String>),
    /// User clicked "Back to home"
    BackToHome,
    /// User acknowledged the current notice
    DismissNotice,
}

impl PromptRemix {
    /// Create a new instance of the application
    fn new(config: Config, api: HttpGenerationApi) -> (Self, Task<Message>) {
        tracing::info!("🎨 Prompt Remix ready, generation service at {}", api.base_url());

        (
            PromptRemix {
                controller: Controller::new(),
                api: Arc::new(api),
                gallery: Arc::new(DesktopGallery),
                styles: config.styles,
                preview: None,
                result: ResultImage::default(),
                notice: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectImage => match self.controller.begin_select() {
                Ok(options) => {
                    let source = Arc::clone(&self.gallery);
                    Task::perform(
                        async move { gallery::pick_image(source.as_ref(), &options).await },
                        Message::ImagePicked,
                    )
                }
                Err(e) => {
                    self.show_error(e);
                    Task::none()
                }
            },
            Message::ImagePicked(outcome) => {
                match self.controller.apply_pick(outcome) {
                    Ok(()) => {
                        self.preview = self
                            .controller
                            .session()
                            .selected_image()
                            .map(|selected| image::Handle::from_path(selected.to_path()));
                    }
                    Err(e) => self.show_error(e),
                }
                Task::none()
            }
            Message::PositivePromptChanged(text) => {
                self.controller.set_positive_prompt(text);
                Task::none()
            }
            Message::NegativePromptChanged(text) => {
                self.controller.set_negative_prompt(text);
                Task::none()
            }
            Message::StyleSelected(style) => {
                self.controller.set_style(Some(style));
                Task::none()
            }
            Message::Generate => match self.controller.begin_submit() {
                Ok(request) => {
                    let api: Arc<dyn GenerationApi> = self.api.clone();
                    let session_id = request.session_id;
                    Task::perform(
                        async move { run_submission(api.as_ref(), request).await },
                        move |outcome| Message::SubmissionFinished(session_id, outcome),
                    )
                }
                Err(e) => {
                    self.show_error(e);
                    Task::none()
                }
            },
            Message::SubmissionFinished(session_id, outcome) => {
                match self.controller.complete_submit(session_id, outcome) {
                    Ok(reference) => {
                        self.result = ResultImage::Loading;
                        let api = Arc::clone(&self.api);
                        Task::perform(
                            async move { api.download(&reference).await.map_err(|e| e.to_string()) },
                            move |loaded| Message::ResultLoaded(session_id, loaded),
                        )
                    }
                    Err(e) => {
                        self.show_error(e);
                        Task::none()
                    }
                }
            }
            Message::ResultLoaded(session_id, loaded) => {
                // The user may have gone back home, or on to another generation
                let session = self.controller.session();
                if session.phase() == Phase::Displaying && session.session_id() == Some(session_id) {
                    self.result = match loaded {
                        Ok(bytes) => ResultImage::ready(bytes),
                        Err(reason) => {
                            tracing::warn!("⚠️  Could not load generated image: {}", reason);
                            ResultImage::Failed(reason)
                        }
                    };
                } else {
                    tracing::debug!(%session_id, "dropping generated image of a finished session");
                }
                Task::none()
            }
            Message::SaveImage => {
                let Some(bytes) = self.result.bytes() else {
                    return Task::none();
                };
                let name = gallery::suggested_file_name(bytes);
                Task::perform(gallery::save_image(bytes.to_vec(), name), Message::ImageSaved)
            }
            Message::ImageSaved(saved) => {
                match saved {
                    Ok(Some(path)) => {
                        self.notice = Some(format!("Image saved to {}", path.display()));
                    }
                    Ok(None) => {}
                    Err(reason) => {
                        tracing::warn!("⚠️  {}", reason);
                        self.notice = Some(reason);
                    }
                }
                Task::none()
            }
            Message::BackToHome => {
                match self.controller.reset() {
                    Ok(()) => {
                        self.preview = None;
                        self.result = ResultImage::default();
                    }
                    Err(e) => self.show_error(e),
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    fn show_error(&mut self, error: SubmissionError) {
        tracing::warn!("⚠️  {}", error);
        self.notice = Some(error.to_string());
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let session = self.controller.session();

        let screen = match session.phase() {
            Phase::Displaying => ui::result::view(&self.result, session.result_image()),
            Phase::Idle | Phase::Submitting => {
                ui::home::view(session, &self.styles, self.preview.as_ref())
            }
        };

        let mut content: Element<Message> = container(screen)
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(ui::background)
            .into();

        if session.is_loading() {
            content = ui::overlay::modal(content, ui::overlay::loading());
        }
        if let Some(notice) = &self.notice {
            content = ui::overlay::modal(content, ui::overlay::notice(notice));
        }

        content
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    logging::init();

    let config = Config::load_or_default();
    let api = match HttpGenerationApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            // Without an HTTP client there is nothing this app can do
            tracing::error!("❌ Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Prompt Remix", PromptRemix::update, PromptRemix::view)
        .theme(PromptRemix::theme)
        .window_size((480.0, 820.0))
        .centered()
        .run_with(move || PromptRemix::new(config, api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::ImageRef;

    fn app() -> PromptRemix {
        let config = Config::default();
        let api = HttpGenerationApi::new(&config).unwrap();
        PromptRemix::new(config, api).0
    }

    /// Fill the form and land on the result screen for `reference`
    fn generate(app: &mut PromptRemix, reference: &str) -> SessionId {
        let _ = app.update(Message::ImagePicked(PickOutcome::Picked(ImageRef::new(
            "/photos/dog.jpg",
        ))));
        let _ = app.update(Message::PositivePromptChanged("a red car".into()));
        let _ = app.update(Message::NegativePromptChanged("blurry".into()));
        let _ = app.update(Message::Generate);

        let session_id = app.controller.session().session_id().unwrap();
        let _ = app.update(Message::SubmissionFinished(
            session_id,
            Ok(ImageRef::new(reference)),
        ));
        assert_eq!(app.controller.session().phase(), Phase::Displaying);
        session_id
    }

    #[test]
    fn test_late_image_from_earlier_session_is_dropped() {
        let mut app = app();
        let first = generate(&mut app, "http://h/a.png");
        let _ = app.update(Message::BackToHome);
        let second = generate(&mut app, "http://h/b.png");
        assert_ne!(first, second);

        let _ = app.update(Message::ResultLoaded(second, Ok(b"B-bytes".to_vec())));
        let _ = app.update(Message::ResultLoaded(first, Ok(b"A-bytes".to_vec())));

        assert_eq!(app.result.bytes(), Some(&b"B-bytes"[..]));
    }

    #[test]
    fn test_image_arriving_after_back_to_home_is_dropped() {
        let mut app = app();
        let session_id = generate(&mut app, "http://h/a.png");
        let _ = app.update(Message::BackToHome);

        let _ = app.update(Message::ResultLoaded(session_id, Ok(b"A-bytes".to_vec())));

        assert!(matches!(app.result, ResultImage::Loading));
        assert_eq!(app.controller.session().phase(), Phase::Idle);
    }

    #[test]
    fn test_failed_download_is_shown() {
        let mut app = app();
        let session_id = generate(&mut app, "img://result1");

        let _ = app.update(Message::ResultLoaded(session_id, Err("unsupported".into())));

        assert!(matches!(&app.result, ResultImage::Failed(reason) if reason == "unsupported"));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_select_image_while_submitting_is_refused() {
        let mut app = app();
        let _ = app.update(Message::ImagePicked(PickOutcome::Picked(ImageRef::new(
            "/photos/dog.jpg",
        ))));
        let _ = app.update(Message::PositivePromptChanged("x".into()));
        let _ = app.update(Message::NegativePromptChanged("y".into()));
        let _ = app.update(Message::Generate);

        let _ = app.update(Message::SelectImage);

        assert!(app.notice.is_some());
        assert_eq!(app.controller.session().phase(), Phase::Submitting);
    }
}
