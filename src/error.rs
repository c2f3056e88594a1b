use thiserror::Error;

/// Failures a command handler can surface to the dispatch boundary.
///
/// Handlers convert the failures they can explain into user-facing replies
/// themselves (format errors, fetch failures, decode misses); everything that
/// reaches the dispatcher through this type is logged and answered with a
/// generic error message.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("file download failed: {0}")]
    Download(#[from] teloxide::DownloadError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("qr generation failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),
    #[error("handler cancelled by shutdown")]
    Cancelled,
}
