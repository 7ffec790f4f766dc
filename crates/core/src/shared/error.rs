use std::path::PathBuf;

use thiserror::Error;

use crate::shared::rect::Rect;

/// Errors raised by the frame tools.
///
/// Configuration problems are detected before any frame is read; read and
/// write failures abort the stream and carry the index of the failing frame.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("region {rect} does not fit a {width}x{height} frame{reason}")]
    InvalidRegion {
        rect: Rect,
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("failed to open source {path}: {message}")]
    SourceOpen { path: PathBuf, message: String },
    #[error("failed to read frame {index}: {message}")]
    FrameRead { index: usize, message: String },
    #[error("failed to write frame {index}: {message}")]
    FrameWrite { index: usize, message: String },
    #[error("no output writer could be opened (tried {})", .attempts.join("; "))]
    NoWriterAvailable { attempts: Vec<String> },
    #[error("failed to finalize output: {0}")]
    Finalize(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FrameError {
    pub fn out_of_bounds(rect: Rect, width: u32, height: u32) -> Self {
        FrameError::InvalidRegion {
            rect,
            width,
            height,
            reason: String::new(),
        }
    }

    pub fn smaller_than_block(rect: Rect, width: u32, height: u32, block_size: u32) -> Self {
        FrameError::InvalidRegion {
            rect,
            width,
            height,
            reason: format!(" (smaller than block size {block_size})"),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FrameError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by bad settings rather than by the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FrameError::InvalidConfiguration(_) | FrameError::InvalidRegion { .. }
        )
    }
}
