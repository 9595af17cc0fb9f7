/// Upload payload preparation
/// Reads the user's chosen file and makes sure what we send is a JPEG
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gallery::PickOptions;
use crate::state::ImageRef;

/// Content type declared for the `photo` multipart part
pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

const JPEG_START: [u8; 2] = [0xFF, 0xD8];

/// The image as it goes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a supported image: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("JPEG encoding failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("task join error: {0}")]
    Task(String),
}

/// Load the referenced image as JPEG bytes.
///
/// JPEG files are passed through untouched; anything else `image` can decode
/// is re-encoded so the declared content type is honest.
pub async fn prepare_photo(reference: &ImageRef) -> Result<Photo, PayloadError> {
    let path = reference.to_path();

    // Decoding and encoding are CPU-bound
    tokio::task::spawn_blocking(move || prepare_photo_blocking(&path))
        .await
        .map_err(|e| PayloadError::Task(e.to_string()))?
}

fn prepare_photo_blocking(path: &Path) -> Result<Photo, PayloadError> {
    let data = std::fs::read(path).map_err(|source| PayloadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes = if data.starts_with(&JPEG_START) {
        data
    } else {
        let img = image::load_from_memory(&data).map_err(|source| PayloadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "re-encoding picked image as JPEG");
        encode_jpeg(&img)?
    };

    Ok(Photo {
        filename: jpeg_filename(path),
        bytes,
    })
}

fn encode_jpeg(img: &image::DynamicImage) -> Result<Vec<u8>, PayloadError> {
    let rgb = img.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    // Same quality the picker hands images over at
    JpegEncoder::new_with_quality(&mut out, PickOptions::default().jpeg_quality())
        .encode_image(&rgb)
        .map_err(PayloadError::Encode)?;
    Ok(out.into_inner())
}

/// Original file stem with a `.jpg` extension
fn jpeg_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "photo".to_string());
    format!("{}.jpg", stem)
}
