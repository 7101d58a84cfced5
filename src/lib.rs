//! Native intents for WebView file uploads on Android.
//!
//! When a page asks for a file, [`UploadIntents`] works out which camera apps, gallery
//! picker and document picker to offer, wraps them in a system chooser and keeps track
//! of where captured photos and videos are written until the caller cleans them up.

pub mod capture;
pub mod chooser;
pub mod config;
pub mod intent;
pub mod logger;
pub mod mime;
pub mod platform;
pub mod resolver;
pub mod storage;

mod error;

pub use capture::{CaptureSlot, MediaKind};
pub use config::{AppConfig, CameraConfig, CaptureQuality};
pub use error::UploadError;
pub use intent::{ComponentName, Extra, Intent, Uri};
pub use logger::Logger;
pub use mime::UploadSpec;
pub use platform::{DeviceInfo, Platform, PlatformError};
pub use resolver::{DeviceContext, UploadIntents};

#[cfg(target_os = "android")]
pub use platform::AndroidPlatform;

pub mod prelude {
    pub use crate::{AppConfig, Intent, Platform, UploadIntents, Uri};
}
