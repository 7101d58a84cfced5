use crate::capture::MediaKind;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no installed app can capture {0}")]
    NoCaptureApp(MediaKind),
    #[error("invalid app config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read app config: {0}")]
    Io(#[from] std::io::Error),
}
