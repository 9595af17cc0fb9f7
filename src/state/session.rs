/// The submission session: everything the user has entered plus the
/// progress of the current generation attempt.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;
use uuid::Uuid;

/// Opaque locator for an image (a local file path or a remote URL).
///
/// The controller stores and hands these around but never opens them;
/// loading the pixels is the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Reference to a file on this machine
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the reference as a local path.
    /// Accepts both plain paths and `file://` URLs.
    pub fn to_path(&self) -> PathBuf {
        if let Ok(url) = Url::parse(&self.0) {
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    return path;
                }
            }
        }
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier correlating an upload with its result fetch.
/// A new one is minted for every submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the session is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Editing the form
    #[default]
    Idle,
    /// Upload or result fetch in flight
    Submitting,
    /// Showing the generated image
    Displaying,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Displaying => "displaying",
        };
        f.write_str(name)
    }
}

/// All mutable state of one user session.
///
/// Fields are only writable from inside `state`, so the controller stays
/// the single writer; everyone else sees it through the getters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub(super) selected_image: Option<ImageRef>,
    pub(super) positive_prompt: String,
    pub(super) negative_prompt: String,
    pub(super) style: Option<String>,
    pub(super) session_id: Option<SessionId>,
    pub(super) phase: Phase,
    pub(super) result_image: Option<ImageRef>,
}

impl Session {
    pub fn selected_image(&self) -> Option<&ImageRef> {
        self.selected_image.as_ref()
    }

    pub fn positive_prompt(&self) -> &str {
        &self.positive_prompt
    }

    pub fn negative_prompt(&self) -> &str {
        &self.negative_prompt
    }

    /// Style preset picked from the configured list, if any
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result_image(&self) -> Option<&ImageRef> {
        self.result_image.as_ref()
    }

    /// The loading overlay is shown for the whole upload + fetch sequence
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty_and_idle() {
        let session = Session::default();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.selected_image().is_none());
        assert!(session.session_id().is_none());
        assert!(session.result_image().is_none());
        assert!(session.positive_prompt().is_empty());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_image_ref_paths() {
        let plain = ImageRef::new("/tmp/photo.png");
        assert_eq!(plain.to_path(), PathBuf::from("/tmp/photo.png"));

        #[cfg(unix)]
        {
            let url = ImageRef::new("file:///tmp/my%20photo.png");
            assert_eq!(url.to_path(), PathBuf::from("/tmp/my photo.png"));
        }
    }

    #[test]
    fn test_session_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
