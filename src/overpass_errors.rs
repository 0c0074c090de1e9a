use thiserror::Error;

use crate::tracks::ParseTrackError;

#[derive(Error, Debug)]
pub enum OverpassError {
    #[error("Malformed composite timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Unable to decode track file {path}: {detail}")]
    DecodeFailure { path: String, detail: ParseTrackError },

    #[error("Filename does not follow an instrument naming convention: {0}")]
    MalformedFilename(String),

    #[error("Invalid colocation threshold: {0}")]
    InvalidThreshold(String),

    #[error("Unable to write colocation artifact {path}: {source}")]
    ArtifactWriteFailure { path: String, source: csv::Error },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV layer error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Worker pool construction failed: {0}")]
    WorkerPoolBuild(#[from] rayon::ThreadPoolBuildError),
}

impl PartialEq for OverpassError {
    fn eq(&self, other: &Self) -> bool {
        use OverpassError::*;
        match (self, other) {
            (MalformedTimestamp(a), MalformedTimestamp(b)) => a == b,
            (
                DecodeFailure {
                    path: pa,
                    detail: da,
                },
                DecodeFailure {
                    path: pb,
                    detail: db,
                },
            ) => pa == pb && da == db,
            (MalformedFilename(a), MalformedFilename(b)) => a == b,
            (InvalidThreshold(a), InvalidThreshold(b)) => a == b,

            // Not comparable beyond the variant itself.
            (ArtifactWriteFailure { path: a, .. }, ArtifactWriteFailure { path: b, .. }) => a == b,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (WorkerPoolBuild(_), WorkerPoolBuild(_)) => true,

            _ => false,
        }
    }
}
