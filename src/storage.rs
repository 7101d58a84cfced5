use std::fs;

use crate::capture::MediaKind;
use crate::intent::Uri;
use crate::platform::{MediaEntry, Platform, PlatformError, SDK_Q};

// Capture output locations.

// System:

// <Android 10+>>>: ScopedMediaStore inserts a row into the MediaStore collection with a
//      DCIM/Camera relative path, the gallery picks it up without any storage permission.

// <Android 9 and lower>>>: LegacyPublicStorage writes into the public DCIM/Camera folder
//      through the app's FileProvider, only usable with WRITE_EXTERNAL_STORAGE.

// <Private cache>>>: a single reused temp file per media kind under <cache>/downloads,
//      used when gallery saving is off or not possible.

pub const CAMERA_RELATIVE_PATH: &str = "DCIM/Camera";
pub const CAMERA_DIR: &str = "Camera";
pub const CACHE_DOWNLOADS_DIR: &str = "downloads";

pub trait GalleryStore {
    fn name(&self) -> &'static str;

    /// Whether saving to shared storage works on this tier.
    fn available(&self, can_save_to_public_storage: bool) -> bool;

    fn create_output(&self, platform: &dyn Platform, kind: MediaKind, file_name: &str) -> Result<Uri, PlatformError>;
}

pub struct ScopedMediaStore;

impl GalleryStore for ScopedMediaStore {
    fn name(&self) -> &'static str {
        "media store"
    }

    fn available(&self, _can_save_to_public_storage: bool) -> bool {
        true
    }

    fn create_output(&self, platform: &dyn Platform, kind: MediaKind, file_name: &str) -> Result<Uri, PlatformError> {
        platform.insert_media(kind.collection(), &MediaEntry {
            display_name: file_name.to_string(),
            mime_type: kind.capture_mime_type().to_string(),
            relative_path: CAMERA_RELATIVE_PATH.to_string(),
        })
    }
}

pub struct LegacyPublicStorage;

impl GalleryStore for LegacyPublicStorage {
    fn name(&self) -> &'static str {
        "public storage"
    }

    fn available(&self, can_save_to_public_storage: bool) -> bool {
        can_save_to_public_storage
    }

    fn create_output(&self, platform: &dyn Platform, _kind: MediaKind, file_name: &str) -> Result<Uri, PlatformError> {
        let camera_dir = platform.public_dcim_dir()?.join(CAMERA_DIR);
        fs::create_dir_all(&camera_dir)?;
        platform.file_provider_uri(&camera_dir.join(file_name))
    }
}

pub fn gallery_store_for(sdk_int: i32) -> Box<dyn GalleryStore> {
    if sdk_int >= SDK_Q {
        Box::new(ScopedMediaStore)
    } else {
        Box::new(LegacyPublicStorage)
    }
}

/// File provider uri for the reused private temp file of `kind`.
pub fn temp_output_uri(platform: &dyn Platform, kind: MediaKind) -> Result<Uri, PlatformError> {
    let downloads = platform.cache_dir()?.join(CACHE_DOWNLOADS_DIR);
    if !downloads.exists() {
        fs::create_dir_all(&downloads)?;
    }
    platform.file_provider_uri(&downloads.join(kind.temp_file_name()))
}
