/// Photo gallery access: permission check, native picker and saving results
use async_trait::async_trait;
use rfd::AsyncFileDialog;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::state::ImageRef;

/// Extensions offered in the picker
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

/// Answer to a media-access permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// How the chooser should behave
#[derive(Debug, Clone, PartialEq)]
pub struct PickOptions {
    /// Aspect ratio of the preview frame (width, height)
    pub aspect: (u32, u32),
    /// Let the user crop after choosing
    pub allows_editing: bool,
    /// 0.0 - 1.0, where 1.0 is the untouched original
    pub quality: f32,
}

impl PickOptions {
    /// `quality` on the 1-100 scale used when an upload has to be re-encoded
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            aspect: (4, 3),
            allows_editing: false,
            quality: 1.0,
        }
    }
}

/// What came out of a `select image` request
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Denied,
    Cancelled,
    Picked(ImageRef),
}

/// Host-side gallery: a permission gate in front of a chooser
#[async_trait]
pub trait Gallery: Send + Sync {
    async fn request_access(&self) -> Access;

    /// Show the chooser. `None` when the user cancels.
    async fn choose(&self, options: &PickOptions) -> Option<ImageRef>;
}

/// Ask for permission, then let the user choose an image.
/// The chooser is never shown when access is denied.
pub async fn pick_image(gallery: &dyn Gallery, options: &PickOptions) -> PickOutcome {
    if gallery.request_access().await == Access::Denied {
        tracing::warn!("gallery access denied");
        return PickOutcome::Denied;
    }

    match gallery.choose(options).await {
        Some(image) => {
            tracing::info!("🖼️  Selected image: {}", image);
            PickOutcome::Picked(image)
        }
        None => PickOutcome::Cancelled,
    }
}

/// Desktop gallery backed by the native file dialog.
///
/// Desktop platforms have no gallery permission prompt, so access is granted
/// unless the user's pictures folder exists but cannot be listed.
#[derive(Debug, Clone, Default)]
pub struct DesktopGallery;

impl DesktopGallery {
    fn start_dir() -> Option<PathBuf> {
        dirs::picture_dir().or_else(dirs::home_dir)
    }
}

#[async_trait]
impl Gallery for DesktopGallery {
    async fn request_access(&self) -> Access {
        let Some(dir) = Self::start_dir() else {
            return Access::Granted;
        };
        match tokio::fs::read_dir(&dir).await {
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Access::Denied,
            _ => Access::Granted,
        }
    }

    async fn choose(&self, options: &PickOptions) -> Option<ImageRef> {
        tracing::debug!(?options, "opening image chooser");
        if options.allows_editing {
            // No crop step in native dialogs; `aspect` only shapes the preview
            tracing::warn!("image chooser cannot crop, the whole image will be used");
        }

        let mut dialog = AsyncFileDialog::new()
            .set_title("Select your image")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = Self::start_dir() {
            dialog = dialog.set_directory(dir);
        }

        let file = dialog.pick_file().await?;
        Some(ImageRef::from_path(file.path()))
    }
}

/// Ask where to save the generated image and write it there.
/// Returns `Ok(None)` if the user cancels the dialog.
pub async fn save_image(bytes: Vec<u8>, suggested_name: String) -> Result<Option<PathBuf>, String> {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Save image")
        .set_file_name(suggested_name.as_str());
    if let Some(dir) = DesktopGallery::start_dir() {
        dialog = dialog.set_directory(dir);
    }

    let Some(file) = dialog.save_file().await else {
        return Ok(None);
    };
    let path = file.path().to_path_buf();

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    tracing::info!("💾 Saved generated image to {}", path.display());
    Ok(Some(path))
}

/// File name suggested in the save dialog, e.g. `prompt-remix-20241019-153000.png`
pub fn suggested_file_name(bytes: &[u8]) -> String {
    let extension = image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg");
    format!(
        "prompt-remix-{}.{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        extension
    )
}
