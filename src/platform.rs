use std::path::{Path, PathBuf};

use crate::intent::{Intent, Uri, IMAGES_EXTERNAL_CONTENT_URI, VIDEO_EXTERNAL_CONTENT_URI};

// Boundary to the operating system services the upload flow calls into.

// System:

// <Android>>>: AndroidPlatform reaches PackageManager, ContentResolver, MimeTypeMap,
//      FileProvider and Environment over JNI through the ndk context.

// <Everything else>>>: no backend, the decision logic still builds and is exercised
//      against the in-crate fake under test.

#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub use android::AndroidPlatform;

#[cfg(test)]
pub(crate) mod fake;

pub const PERMISSION_CAMERA: &str = "android.permission.CAMERA";
pub const PERMISSION_WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";

/// Android 10, first release with scoped media store inserts.
pub const SDK_Q: i32 = 29;
/// Android 13, first release with `PackageManager.ResolveInfoFlags`.
pub const SDK_TIRAMISU: i32 = 33;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[cfg(target_os = "android")]
    #[error("jni call failed: {0}")]
    Jni(#[from] jni::errors::Error),
    #[error("{0} returned null")]
    Null(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub sdk_int: i32,
    pub manufacturer: String,
}

/// One activity able to handle an intent, as reported by the package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedActivity {
    pub package_name: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCollection {
    Images,
    Video,
}

impl MediaCollection {
    pub fn external_content_uri(&self) -> Uri {
        match self {
            MediaCollection::Images => Uri::parse(IMAGES_EXTERNAL_CONTENT_URI),
            MediaCollection::Video => Uri::parse(VIDEO_EXTERNAL_CONTENT_URI),
        }
    }
}

/// Column values for a new media store row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
}

pub trait Platform {
    fn device(&self) -> DeviceInfo;

    /// Runtime grant state of a dangerous permission.
    fn is_permission_granted(&self, permission: &str) -> bool;

    /// Whether the app manifest requests `permission`.
    fn has_manifest_permission(&self, permission: &str) -> bool;

    /// Activities matching `intent` with MATCH_DEFAULT_ONLY.
    fn query_intent_activities(&self, intent: &Intent) -> Vec<ResolvedActivity>;

    fn mime_type_from_extension(&self, extension: &str) -> Option<String>;

    fn insert_media(&self, collection: MediaCollection, entry: &MediaEntry) -> Result<Uri, PlatformError>;

    /// Mints a `content://` uri for `path` through the app's file provider.
    fn file_provider_uri(&self, path: &Path) -> Result<Uri, PlatformError>;

    /// Returns the number of rows removed.
    fn delete(&self, uri: &Uri) -> Result<usize, PlatformError>;

    fn cache_dir(&self) -> Result<PathBuf, PlatformError>;

    fn public_dcim_dir(&self) -> Result<PathBuf, PlatformError>;
}
