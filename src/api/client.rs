use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::payload::{Photo, PHOTO_CONTENT_TYPE};
use crate::config::Config;
use crate::state::{ImageRef, SessionId};

/// Failure of a single call to the generation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("server responded with status {0}")]
    Status(u16),
    /// Timeout, refused connection, DNS failure...
    #[error("{0}")]
    Transport(String),
    /// The server answered 2xx but the body was not what we expect
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Everything sent with `POST /customers/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub photo: Photo,
    pub positive_prompt: String,
    pub negative_prompt: String,
    pub style: Option<String>,
}

/// The two calls the app makes against the generation service.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Upload the photo and prompts under `session_id`
    async fn upload(&self, session_id: SessionId, form: UploadForm) -> Result<(), ApiError>;

    /// Fetch the generated image references for `session_id`, in server order
    async fn fetch_results(&self, session_id: SessionId) -> Result<Vec<String>, ApiError>;
}

/// Body of `GET /customers/{id}`
#[derive(Debug, Deserialize)]
struct CustomerResults {
    #[serde(default)]
    photos: Vec<String>,
}

/// Where an image reference points once resolved against the base URL
#[derive(Debug, PartialEq)]
enum Location {
    Remote(Url),
    Local(PathBuf),
}

/// reqwest-backed implementation talking to `{base_url}/customers/{id}`
#[derive(Debug, Clone)]
pub struct HttpGenerationApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpGenerationApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base_url}/customers/{id}`, keeping any path prefix on the base URL
    fn customer_url(&self, session_id: SessionId) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("customers")
            .push(&session_id.to_string());
        Ok(url)
    }

    /// Load the bytes behind an image reference returned by the server
    /// (or a local file). Used by the result view; the controller never
    /// dereferences references itself.
    pub async fn download(&self, reference: &ImageRef) -> Result<Vec<u8>, ApiError> {
        match self.locate(reference)? {
            Location::Remote(url) => {
                tracing::debug!(%url, "downloading generated image");
                let response = self.http.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(ApiError::Status(response.status().as_u16()));
                }
                Ok(response.bytes().await?.to_vec())
            }
            Location::Local(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| ApiError::Transport(format!("{}: {}", path.display(), e))),
        }
    }

    fn locate(&self, reference: &ImageRef) -> Result<Location, ApiError> {
        let raw = reference.as_str();
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Location::Remote(url)),
                "file" => Ok(Location::Local(reference.to_path())),
                other => Err(ApiError::Decode(format!(
                    "unsupported image reference scheme '{}'",
                    other
                ))),
            },
            Err(_) if Path::new(raw).is_absolute() && Path::new(raw).exists() => {
                Ok(Location::Local(PathBuf::from(raw)))
            }
            // Relative references are served by the generation service itself
            Err(_) => self
                .base_url
                .join(raw)
                .map(Location::Remote)
                .map_err(|e| ApiError::Decode(format!("bad image reference '{}': {}", raw, e))),
        }
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationApi {
    async fn upload(&self, session_id: SessionId, form: UploadForm) -> Result<(), ApiError> {
        let url = self.customer_url(session_id)?;

        let photo = Part::bytes(form.photo.bytes)
            .file_name(form.photo.filename)
            .mime_str(PHOTO_CONTENT_TYPE)?;
        let mut multipart = Form::new()
            .part("photo", photo)
            .text("positivePrompt", form.positive_prompt)
            .text("negativePrompt", form.negative_prompt);
        if let Some(style) = form.style {
            multipart = multipart.text("style", style);
        }

        tracing::debug!(%url, "uploading photo");
        let response = self.http.post(url).multipart(multipart).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn fetch_results(&self, session_id: SessionId) -> Result<Vec<String>, ApiError> {
        let url = self.customer_url(session_id)?;

        tracing::debug!(%url, "fetching generated results");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let results: CustomerResults = response.json().await?;
        Ok(results.photos)
    }
}
