//! Input accepted by [`WorkbookReader::read`](super::WorkbookReader::read)

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{StreamError, StreamResult};

/// A byte source: a filesystem path or an already-open stream
pub enum ReadSource {
    /// Path to a regular file, opened when the read starts
    Path(PathBuf),
    /// Any readable stream; consumed forward-only
    Stream(Box<dyn Read>),
}

impl ReadSource {
    /// Wrap a stream
    pub fn stream<R: Read + 'static>(reader: R) -> Self {
        ReadSource::Stream(Box::new(reader))
    }

    /// Resolve to a readable stream
    ///
    /// Paths that do not name a readable regular file are rejected with
    /// [`StreamError::InputRecognition`].
    pub(crate) fn open(self) -> StreamResult<Box<dyn Read>> {
        match self {
            ReadSource::Stream(reader) => Ok(reader),
            ReadSource::Path(path) => {
                let metadata = path.metadata().map_err(|e| {
                    StreamError::InputRecognition(format!("{}: {}", path.display(), e))
                })?;
                if !metadata.is_file() {
                    return Err(StreamError::InputRecognition(format!(
                        "{} is not a regular file",
                        path.display()
                    )));
                }
                let file = File::open(&path).map_err(|e| {
                    StreamError::InputRecognition(format!("{}: {}", path.display(), e))
                })?;
                Ok(Box::new(file))
            }
        }
    }
}

impl fmt::Debug for ReadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ReadSource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<&str> for ReadSource {
    fn from(path: &str) -> Self {
        ReadSource::Path(PathBuf::from(path))
    }
}

impl From<String> for ReadSource {
    fn from(path: String) -> Self {
        ReadSource::Path(PathBuf::from(path))
    }
}

impl From<&Path> for ReadSource {
    fn from(path: &Path) -> Self {
        ReadSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ReadSource {
    fn from(path: PathBuf) -> Self {
        ReadSource::Path(path)
    }
}

impl From<File> for ReadSource {
    fn from(file: File) -> Self {
        ReadSource::Stream(Box::new(file))
    }
}

impl From<Box<dyn Read>> for ReadSource {
    fn from(reader: Box<dyn Read>) -> Self {
        ReadSource::Stream(reader)
    }
}
