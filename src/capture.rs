use std::fmt;

use chrono::NaiveDateTime;

use crate::intent::{ACTION_IMAGE_CAPTURE, ACTION_VIDEO_CAPTURE, Uri};
use crate::platform::{MediaCollection, Platform};

pub const TEMP_IMAGE_FILE: &str = "temp_capture_image.jpg";
pub const TEMP_VIDEO_FILE: &str = "temp_video_recording.mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn capture_action(&self) -> &'static str {
        match self {
            MediaKind::Image => ACTION_IMAGE_CAPTURE,
            MediaKind::Video => ACTION_VIDEO_CAPTURE,
        }
    }

    pub fn collection(&self) -> MediaCollection {
        match self {
            MediaKind::Image => MediaCollection::Images,
            MediaKind::Video => MediaCollection::Video,
        }
    }

    /// MIME type of what a camera app writes for this kind.
    pub fn capture_mime_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
        }
    }

    pub fn temp_file_name(&self) -> &'static str {
        match self {
            MediaKind::Image => TEMP_IMAGE_FILE,
            MediaKind::Video => TEMP_VIDEO_FILE,
        }
    }

    /// `IMG_yyyyMMdd_HHmmss.jpg` / `VID_yyyyMMdd_HHmmss.mp4`.
    pub fn gallery_file_name(&self, taken_at: NaiveDateTime) -> String {
        let stamp = taken_at.format("%Y%m%d_%H%M%S");
        match self {
            MediaKind::Image => format!("IMG_{stamp}.jpg"),
            MediaKind::Video => format!("VID_{stamp}.mp4"),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("images"),
            MediaKind::Video => f.write_str("videos"),
        }
    }
}

/// Where the camera app was told to write its output, if a capture is pending.
///
/// A new capture replaces the previous uri without deleting it. Underlying files are
/// only removed through [`CaptureSlot::release`].
#[derive(Debug, Default)]
pub struct CaptureSlot(Option<Uri>);

impl CaptureSlot {
    pub fn get(&self) -> Option<&Uri> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn replace(&mut self, uri: Uri) {
        self.0 = Some(uri);
    }

    /// Deletes the referenced content and empties the slot. No-op when already empty.
    pub fn release(&mut self, platform: &dyn Platform) {
        if let Some(uri) = self.0.take() {
            match platform.delete(&uri) {
                Ok(rows) => log::debug!("deleted {rows} row(s) for {uri}"),
                Err(e) => log::debug!("failed to delete {uri}: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn gallery_names_use_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(9, 5, 2).unwrap();
        assert_eq!(MediaKind::Image.gallery_file_name(at), "IMG_20240307_090502.jpg");
        assert_eq!(MediaKind::Video.gallery_file_name(at), "VID_20240307_090502.mp4");
    }

    #[test]
    fn kinds_map_to_platform_names() {
        assert_eq!(MediaKind::Image.capture_action(), ACTION_IMAGE_CAPTURE);
        assert_eq!(MediaKind::Video.collection(), MediaCollection::Video);
        assert_eq!(MediaKind::Video.temp_file_name(), TEMP_VIDEO_FILE);
        assert_eq!(MediaKind::Image.capture_mime_type(), "image/jpeg");
    }
}
