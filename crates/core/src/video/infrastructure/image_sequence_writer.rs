use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_writer::VideoWriter;

use super::image_file_writer::ImageFileWriter;

/// Writes the n-th frame to the n-th of a fixed list of file names inside
/// the output directory.
///
/// Pointing the output at the source directory overwrites the frames in
/// place.
pub struct ImageSequenceWriter {
    file_names: Vec<OsString>,
    image_writer: Box<dyn ImageWriter>,
    output_dir: Option<PathBuf>,
    written: usize,
}

impl ImageSequenceWriter {
    pub fn new(file_names: Vec<OsString>) -> Self {
        Self::with_image_writer(file_names, Box::new(ImageFileWriter::new()))
    }

    pub fn with_image_writer(file_names: Vec<OsString>, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            file_names,
            image_writer,
            output_dir: None,
            written: 0,
        }
    }

    /// Reuses the file names of `paths` (typically a reader's source files).
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        Self::new(
            paths
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
                .collect(),
        )
    }
}

impl VideoWriter for ImageSequenceWriter {
    fn open(
        &mut self,
        path: &Path,
        _metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(path)?;
        self.output_dir = Some(path.to_path_buf());
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let dir = self
            .output_dir
            .as_ref()
            .ok_or("ImageSequenceWriter: not opened")?;
        let name = self.file_names.get(self.written).ok_or_else(|| {
            format!(
                "more frames than file names ({} available)",
                self.file_names.len()
            )
        })?;
        self.image_writer.write(&dir.join(name), frame)?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.output_dir.take().is_some() && self.written != self.file_names.len() {
            log::warn!(
                "Wrote {} of {} frames",
                self.written,
                self.file_names.len()
            );
        }
        Ok(())
    }

    fn output_path(&self) -> Option<PathBuf> {
        self.output_dir.clone()
    }
}
