use oxrdfio::RdfParseError;
use std::error::Error;
use std::io;

/// An error related to the pattern source.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The backend cannot be reached or is in an unusable state.
    #[error("The storage backend is unavailable: {0}")]
    Unavailable(String),
    /// The backend cannot evaluate the given pattern.
    #[error("The storage backend cannot evaluate the pattern: {0}")]
    MalformedPattern(String),
    /// Error from the OS I/O layer.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Error while parsing an RDF file that should be loaded.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Io(error) => error,
            StorageError::Parsing(error) => error.into(),
            StorageError::MalformedPattern(_) => {
                Self::new(io::ErrorKind::InvalidInput, error.to_string())
            }
            StorageError::Unavailable(_) | StorageError::Other(_) => Self::other(error),
        }
    }
}
