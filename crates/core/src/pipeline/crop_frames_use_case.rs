use std::path::Path;

use crate::shared::error::FrameError;
use crate::shared::rect::Rect;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;
use crate::video::infrastructure::image_sequence_reader::ImageSequenceReader;
use crate::video::infrastructure::image_sequence_writer::ImageSequenceWriter;

/// Crop bounds; `None` on the right or bottom means "to the edge".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropBounds {
    pub left: u32,
    pub top: u32,
    pub right: Option<u32>,
    pub bottom: Option<u32>,
}

impl CropBounds {
    /// Clamps the bounds to a `width` x `height` image.
    pub fn resolve(&self, width: u32, height: u32) -> Result<Rect, FrameError> {
        let requested = Rect {
            left: self.left,
            top: self.top,
            right: self.right.unwrap_or(width),
            bottom: self.bottom.unwrap_or(height),
        };
        requested
            .clamp_to(width, height)
            .ok_or_else(|| FrameError::InvalidRegion {
                rect: requested,
                width,
                height,
                reason: " (crop is empty)".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropSummary {
    pub frames: usize,
    pub original: (u32, u32),
    pub cropped: Rect,
}

/// Crops every image of a frame directory in place.
pub struct CropFramesUseCase {
    bounds: CropBounds,
}

impl CropFramesUseCase {
    pub fn new(bounds: CropBounds) -> Self {
        Self { bounds }
    }

    pub fn execute(&self, dir: &Path) -> Result<CropSummary, FrameError> {
        let mut reader = ImageSequenceReader::new();
        let metadata = reader.open(dir).map_err(|e| FrameError::SourceOpen {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let rect = self.bounds.resolve(metadata.width, metadata.height)?;
        log::info!(
            "Original size {}x{}, cropped size {}x{}",
            metadata.width,
            metadata.height,
            rect.width(),
            rect.height()
        );

        let mut writer = ImageSequenceWriter::from_paths(reader.paths());
        writer
            .open(dir, &metadata)
            .map_err(|e| FrameError::NoWriterAvailable {
                attempts: vec![e.to_string()],
            })?;

        let mut count = 0;
        for (index, frame) in reader.frames().enumerate() {
            let frame = frame.map_err(|e| FrameError::FrameRead {
                index,
                message: e.to_string(),
            })?;
            writer
                .write(&frame.crop(&rect))
                .map_err(|e| FrameError::FrameWrite {
                    index,
                    message: e.to_string(),
                })?;
            count += 1;
        }
        writer
            .close()
            .map_err(|e| FrameError::Finalize(e.to_string()))?;
        reader.close();

        log::info!("Cropped {count} frames in {}", dir.display());
        Ok(CropSummary {
            frames: count,
            original: (metadata.width, metadata.height),
            cropped: rect,
        })
    }
}
