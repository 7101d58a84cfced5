use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::UploadError;

pub const DEFAULT_CHOOSER_TITLE: &str = "Choose an action";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureQuality {
    High,
    #[default]
    Low,
}

impl CaptureQuality {
    /// Value for `MediaStore.EXTRA_VIDEO_QUALITY`.
    pub fn video_quality_extra(&self) -> i32 {
        match self {
            CaptureQuality::High => 1,
            CaptureQuality::Low => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    pub save_to_gallery: bool,
    pub capture_quality: CaptureQuality,
}

/// The slice of the app configuration the upload flow reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub direct_camera_uploads: bool,
    pub camera_config: CameraConfig,
    pub chooser_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            direct_camera_uploads: true,
            camera_config: CameraConfig::default(),
            chooser_title: DEFAULT_CHOOSER_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, UploadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.direct_camera_uploads);
        assert!(!config.camera_config.save_to_gallery);
        assert_eq!(config.chooser_title, DEFAULT_CHOOSER_TITLE);
    }

    #[test]
    fn reads_camera_section() {
        let config = AppConfig::from_json(
            r#"{
                "directCameraUploads": false,
                "cameraConfig": { "saveToGallery": true, "captureQuality": "high" },
                "chooserTitle": "Upload with"
            }"#,
        )
        .unwrap();
        assert!(!config.direct_camera_uploads);
        assert!(config.camera_config.save_to_gallery);
        assert_eq!(config.camera_config.capture_quality, CaptureQuality::High);
        assert_eq!(config.camera_config.capture_quality.video_quality_extra(), 1);
        assert_eq!(config.chooser_title, "Upload with");
    }

    #[test]
    fn rejects_unknown_quality() {
        let err = AppConfig::from_json(r#"{"cameraConfig": {"captureQuality": "ultra"}}"#).unwrap_err();
        assert!(matches!(err, UploadError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appConfig.json");
        fs::write(&path, r#"{"cameraConfig": {"saveToGallery": true}}"#).unwrap();
        assert!(AppConfig::load(&path).unwrap().camera_config.save_to_gallery);
        assert!(matches!(AppConfig::load(dir.path().join("missing.json")), Err(UploadError::Io(_))));
    }
}
