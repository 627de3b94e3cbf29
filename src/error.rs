use std::fmt;

/// The unified error type returned by all public API functions.
#[derive(Debug)]
pub enum Error {
    /// Reading input or writing the output artifact failed.
    Io(std::io::Error),
    /// A record JSON file failed to parse.
    Json(serde_json::Error),
    /// An image payload could not be decoded or re-encoded.
    Image(String),
    /// Layout or PDF generation failed.
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Json(e) => write!(f, "Failed to parse record: {e}"),
            Error::Image(msg) => write!(f, "Image error: {msg}"),
            Error::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
