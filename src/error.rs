use thiserror::Error;

/// Failure categories of a single capture run. The two fixed messages are
/// part of the stdout contract; the other variants carry the collaborator's
/// own description verbatim.
#[derive(Error, Debug)]
pub(crate) enum CaptureError {
    /// The resolver could not produce stream metadata for the page URL
    #[error("{0}")]
    Resolve(String),

    /// The resolved stream URL could not be opened as a video source
    #[error("Cannot open stream")]
    OpenStream,

    /// The opened stream yielded no decodable frame
    #[error("Cannot read frame")]
    ReadFrame,

    /// Encoding or filesystem failure while persisting the frame
    #[error("{0}")]
    Write(String),
}
