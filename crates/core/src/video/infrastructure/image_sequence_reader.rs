use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::frame_listing::list_frame_files;

/// Adapts a directory of numbered images to the [`VideoReader`] interface.
///
/// Images are decoded lazily, one per `next()`. Every image must match the
/// first image's dimensions.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    width: u32,
    height: u32,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// File paths in read order; empty until opened.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let paths = list_frame_files(path)?;
        let first = paths
            .first()
            .ok_or_else(|| format!("No image frames found in {}", path.display()))?;

        let (width, height) = image::image_dimensions(first)?;
        let codec = first
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let metadata = VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: paths.len(),
            codec,
            source_path: Some(path.to_path_buf()),
        };

        self.paths = paths;
        self.width = width;
        self.height = height;
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if self.paths.is_empty() {
            return Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            )));
        }
        let (width, height) = (self.width, self.height);
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(move |(index, path)| decode(path, index, width, height)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
    }
}

fn decode(
    path: &Path,
    index: usize,
    width: u32,
    height: u32,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("{}: {e}", path.display()))?
        .to_rgb8();
    if img.dimensions() != (width, height) {
        return Err(format!(
            "{} is {}x{}, expected {width}x{height}",
            path.display(),
            img.width(),
            img.height()
        )
        .into());
    }
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}
