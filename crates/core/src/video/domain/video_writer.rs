use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Frame sink: an encoded video or a directory of images.
pub trait VideoWriter: Send {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Where output actually goes once opened. Writers that may redirect
    /// (e.g. to a different container extension) override this.
    fn output_path(&self) -> Option<PathBuf> {
        None
    }
}
