use std::path::PathBuf;

/// Properties of an opened frame source.
///
/// Image directories report `fps = 0` and one frame per image file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_image_sequence(&self) -> bool {
        self.fps == 0.0
    }
}
