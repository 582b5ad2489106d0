//! Streaming reader error types

use thiserror::Error;

use crate::part::PartKind;

/// Result type for streaming reader operations
pub type StreamResult<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while streaming a workbook
#[derive(Debug, Error)]
pub enum StreamError {
    /// The input is neither a readable stream nor a path to a readable file,
    /// or a source was attached twice. Raised before streaming begins.
    #[error("Unrecognized input: {0}")]
    InputRecognition(String),

    /// A part could not be decoded. Reported through the `error`
    /// notification; the read continues with the next entry.
    #[error("Failed to decode {part}: {source}")]
    Decode {
        part: PartKind,
        #[source]
        source: Box<StreamError>,
    },

    /// A worksheet-shaped path did not yield a usable sheet number
    #[error("Cannot classify archive entry: {0}")]
    ClassificationImpossible(String),

    /// Unknown configuration option name
    #[error("Unknown read option: {0}")]
    InvalidOption(String),

    /// Malformed part content that the XML reader accepted
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error from the entry source
    #[error("ZIP error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl StreamError {
    /// Wrap a handler failure with the part it occurred in
    pub(crate) fn decode(part: PartKind, source: StreamError) -> Self {
        StreamError::Decode {
            part,
            source: Box::new(source),
        }
    }

    /// The part a decode error belongs to
    pub fn part(&self) -> Option<PartKind> {
        match self {
            StreamError::Decode { part, .. } => Some(*part),
            _ => None,
        }
    }

    /// Whether this error ends the read operation
    ///
    /// Failures of the byte source are terminal, including an io error
    /// surfacing through the XML reader while a part was being decoded.
    /// Everything else a single part can raise is reported and skipped.
    pub fn is_terminal(&self) -> bool {
        match self {
            StreamError::InputRecognition(_)
            | StreamError::InvalidOption(_)
            | StreamError::Archive(_)
            | StreamError::Io(_) => true,
            StreamError::Xml(quick_xml::Error::Io(_)) => true,
            StreamError::Decode { source, .. } => source.is_terminal(),
            _ => false,
        }
    }
}
