/// Test doubles for the two host seams: the generation service and the gallery.

use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::session::{ImageRef, SessionId};
use crate::api::{ApiError, GenerationApi, UploadForm};
use crate::gallery::{Access, Gallery, PickOptions};

/// A network call as seen by the fake service
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(SessionId, UploadForm),
    Fetch(SessionId),
}

/// Scripted generation service that records every call it receives
pub struct FakeApi {
    upload: Result<(), ApiError>,
    fetch: Result<Vec<String>, ApiError>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new(upload: Result<(), ApiError>, fetch: Result<Vec<String>, ApiError>) -> Self {
        Self {
            upload,
            fetch,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Upload succeeds and the fetch returns `photos`
    pub fn returning(photos: &[&str]) -> Self {
        Self::new(Ok(()), Ok(photos.iter().map(|p| p.to_string()).collect()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Upload(..)))
            .count()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Fetch(..)))
            .count()
    }
}

#[async_trait]
impl GenerationApi for FakeApi {
    async fn upload(&self, session_id: SessionId, form: UploadForm) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(Call::Upload(session_id, form));
        self.upload.clone()
    }

    async fn fetch_results(&self, session_id: SessionId) -> Result<Vec<String>, ApiError> {
        self.calls.lock().unwrap().push(Call::Fetch(session_id));
        self.fetch.clone()
    }
}

/// Gallery with a fixed permission answer and a fixed chooser result
pub struct FakeGallery {
    access: Access,
    choice: Option<ImageRef>,
    opened: AtomicUsize,
}

impl FakeGallery {
    pub fn granted(choice: Option<ImageRef>) -> Self {
        Self {
            access: Access::Granted,
            choice,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            access: Access::Denied,
            choice: None,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn chooser_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gallery for FakeGallery {
    async fn request_access(&self) -> Access {
        self.access
    }

    async fn choose(&self, _options: &PickOptions) -> Option<ImageRef> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.choice.clone()
    }
}

/// A tiny file that passes as a JPEG without decoding
pub fn jpeg_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .unwrap();
    file.write_all(&[0xFF, 0xD8, 0x00, 0x11, 0xFF, 0xD9]).unwrap();
    file
}
