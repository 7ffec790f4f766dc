use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;

use crate::shared::constants::REMOVED_FRAMES_SUFFIX;
use crate::shared::error::FrameError;
use crate::video::infrastructure::frame_listing::frame_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinSummary {
    pub kept: usize,
    pub dropped: usize,
}

/// Drops every second frame strictly between `start` and `end`, copying the
/// rest into a new directory.
///
/// Parity is taken from a file's position in the sorted listing, not from
/// its frame number, so gaps in the numbering shift which frames go.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThinFramesUseCase {
    start: Option<u64>,
    end: Option<u64>,
}

impl ThinFramesUseCase {
    /// Unset bounds default to the first and last frame numbers found.
    pub fn new(start: Option<u64>, end: Option<u64>) -> Self {
        Self { start, end }
    }

    pub fn execute(&self, input_dir: &Path, output_dir: &Path) -> Result<ThinSummary, FrameError> {
        let frames = list_numbered_files(input_dir)?;
        let (Some((first, _)), Some((last, _))) = (frames.first(), frames.last()) else {
            return Err(FrameError::SourceOpen {
                path: input_dir.to_path_buf(),
                message: "no frames found".to_string(),
            });
        };
        let start = self.start.unwrap_or(*first);
        let end = self.end.unwrap_or(*last);
        log::debug!("Thinning frames strictly between {start} and {end}");

        fs::create_dir(output_dir).map_err(|e| FrameError::io(output_dir, e))?;

        let mut summary = ThinSummary {
            kept: 0,
            dropped: 0,
        };
        for (position, (number, path)) in frames.iter().enumerate() {
            if position % 2 == 1 && start < *number && *number < end {
                summary.dropped += 1;
                continue;
            }
            // Listed entries are files, so they always have a name.
            let Some(name) = path.file_name() else {
                continue;
            };
            let target = output_dir.join(name);
            fs::copy(path, &target).map_err(|e| FrameError::io(&target, e))?;
            summary.kept += 1;
        }

        log::info!(
            "Kept {} frames, dropped {} into {}",
            summary.kept,
            summary.dropped,
            output_dir.display()
        );
        Ok(summary)
    }
}

/// `<prefix>_removed-frames-HHMMSS` next to `input_dir`, where `prefix` is
/// the input directory name up to its first `_`.
pub fn default_output_dir(input_dir: &Path, time: NaiveTime) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = name.split('_').next().unwrap_or_default();
    let dir_name = format!("{prefix}{REMOVED_FRAMES_SUFFIX}-{}", time.format("%H%M%S"));
    input_dir.with_file_name(dir_name)
}

/// Every file in `dir` with its frame number, sorted by number.
fn list_numbered_files(dir: &Path) -> Result<Vec<(u64, PathBuf)>, FrameError> {
    let entries = fs::read_dir(dir).map_err(|e| FrameError::SourceOpen {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FrameError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let number = frame_number(&path).ok_or_else(|| {
            FrameError::InvalidConfiguration(format!(
                "{} is not named by frame number",
                path.display()
            ))
        })?;
        frames.push((number, path));
    }
    frames.sort();
    Ok(frames)
}
