use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::error::FrameError;

/// Numeric file stem, e.g. `00042.png` -> 42.
pub fn frame_number(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, ordered by frame number.
///
/// Files without a numeric stem come after the numbered ones, by name.
pub fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>, FrameError> {
    let entries = fs::read_dir(dir).map_err(|e| FrameError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FrameError::io(dir, e))?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| compare_frames(a, b));
    Ok(paths)
}

fn compare_frames(a: &Path, b: &Path) -> Ordering {
    match (frame_number(a), frame_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
