/// Generation service client
///
/// This module handles:
/// - The two HTTP calls against `{base_url}/customers/{id}` (client.rs)
/// - Turning the selected file into the JPEG `photo` part (payload.rs)

pub mod client;
pub mod payload;

pub use client::{ApiError, GenerationApi, HttpGenerationApi, UploadForm};
pub use payload::prepare_photo;
