use std::path::PathBuf;
use thiserror::Error;

/// Error union for a compression run
///
/// Every failure from probing or transcoding aborts the whole run; there is
/// no partial-ladder recovery.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),

    #[error("invalid duration {0}s; duration must be positive")]
    InvalidDuration(f64),

    #[error("ffmpeg exited with {}: {stderr}", .exit_code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    Transcode {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("filesystem operation failed on {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CompressError {
    /// Wrap an io error with the path it happened on
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
