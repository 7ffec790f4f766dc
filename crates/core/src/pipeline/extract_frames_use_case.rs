use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::{ALL_FRAMES_SUFFIX, FRAME_NAME_DIGITS};
use crate::shared::error::FrameError;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

use super::pipeline_logger::PipelineLogger;

/// Decodes a video into `00001.png`, `00002.png`, ... in a fresh directory.
pub struct ExtractFramesUseCase {
    reader: Box<dyn VideoReader>,
    image_writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl ExtractFramesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        image_writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            image_writer,
            logger,
        }
    }

    /// Returns the number of frames written. `output_dir` must not exist.
    pub fn execute(&mut self, video_path: &Path, output_dir: &Path) -> Result<usize, FrameError> {
        let metadata = self
            .reader
            .open(video_path)
            .map_err(|e| FrameError::SourceOpen {
                path: video_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let result = fs::create_dir(output_dir)
            .map_err(|e| FrameError::io(output_dir, e))
            .and_then(|()| self.write_all(output_dir, metadata.total_frames));
        self.reader.close();

        let count = result?;
        self.logger.info(&format!(
            "Extracted {count} frames to {}",
            output_dir.display()
        ));
        Ok(count)
    }

    fn write_all(&mut self, output_dir: &Path, total: usize) -> Result<usize, FrameError> {
        let mut count = 0;
        for (index, frame) in self.reader.frames().enumerate() {
            let frame = frame.map_err(|e| FrameError::FrameRead {
                index,
                message: e.to_string(),
            })?;
            let path = output_dir.join(frame_file_name(index + 1));
            self.image_writer
                .write(&path, &frame)
                .map_err(|e| FrameError::FrameWrite {
                    index,
                    message: e.to_string(),
                })?;
            count += 1;
            self.logger.progress(count, total);
        }
        Ok(count)
    }
}

/// Zero-padded PNG name for a 1-based frame number.
pub fn frame_file_name(number: usize) -> String {
    format!("{number:0width$}.png", width = FRAME_NAME_DIGITS)
}

/// `<video stem>_all-frames`, relative to the working directory.
pub fn default_output_dir(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}{ALL_FRAMES_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::frame::Frame;
    use crate::shared::video_metadata::VideoMetadata;
    use crate::video::infrastructure::ffmpeg_reader::tests::create_test_video;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use std::sync::{Arc, Mutex};

    struct StubReader {
        frames: Vec<Frame>,
        fail_at: Option<usize>,
    }

    impl VideoReader for StubReader {
        fn open(&mut self, _path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            Ok(VideoMetadata {
                width: 4,
                height: 4,
                fps: 25.0,
                total_frames: self.frames.len(),
                codec: "stub".into(),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            let fail_at = self.fail_at;
            Box::new(self.frames.drain(..).enumerate().map(
                move |(i, f)| -> Result<Frame, Box<dyn std::error::Error>> {
                    if Some(i) == fail_at {
                        Err("bad packet".into())
                    } else {
                        Ok(f)
                    }
                },
            ))
        }

        fn close(&mut self) {}
    }

    /// Records target paths instead of touching the disk.
    struct RecordingImageWriter {
        paths: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ImageWriter for RecordingImageWriter {
        fn write(&self, path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.paths.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn stub_frames(n: usize) -> Vec<Frame> {
        (0..n).map(|i| Frame::filled(4, 4, [0; 3], i)).collect()
    }

    #[test]
    fn test_frame_file_names_are_one_based_and_padded() {
        assert_eq!(frame_file_name(1), "00001.png");
        assert_eq!(frame_file_name(123456), "123456.png");
    }

    #[test]
    fn test_default_output_dir_uses_stem() {
        assert_eq!(
            default_output_dir(Path::new("/videos/clip.webm")),
            PathBuf::from("clip_all-frames")
        );
    }

    #[test]
    fn test_writes_one_file_per_frame() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("frames");
        let paths = Arc::new(Mutex::new(Vec::new()));
        let mut uc = ExtractFramesUseCase::new(
            Box::new(StubReader {
                frames: stub_frames(3),
                fail_at: None,
            }),
            Box::new(RecordingImageWriter {
                paths: paths.clone(),
            }),
            Box::new(NullPipelineLogger),
        );

        assert_eq!(uc.execute(Path::new("in.mp4"), &out).unwrap(), 3);
        assert!(out.is_dir());
        assert_eq!(
            *paths.lock().unwrap(),
            [out.join("00001.png"), out.join("00002.png"), out.join("00003.png")]
        );
    }

    #[test]
    fn test_existing_output_dir_is_error() {
        let root = tempfile::tempdir().unwrap();
        let mut uc = ExtractFramesUseCase::new(
            Box::new(StubReader {
                frames: stub_frames(1),
                fail_at: None,
            }),
            Box::new(ImageFileWriter::new()),
            Box::new(NullPipelineLogger),
        );
        let err = uc.execute(Path::new("in.mp4"), root.path()).unwrap_err();
        assert!(matches!(err, FrameError::Io { .. }));
    }

    #[test]
    fn test_read_error_reports_index() {
        let root = tempfile::tempdir().unwrap();
        let mut uc = ExtractFramesUseCase::new(
            Box::new(StubReader {
                frames: stub_frames(4),
                fail_at: Some(2),
            }),
            Box::new(ImageFileWriter::new()),
            Box::new(NullPipelineLogger),
        );
        let err = uc
            .execute(Path::new("in.mp4"), &root.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, FrameError::FrameRead { index: 2, .. }));
    }

    #[test]
    fn test_extracts_real_video() {
        let root = tempfile::tempdir().unwrap();
        let video = root.path().join("clip.mp4");
        create_test_video(&video, 4, 64, 48);
        let out = root.path().join("clip_all-frames");

        let mut uc = ExtractFramesUseCase::new(
            Box::new(FfmpegReader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(NullPipelineLogger),
        );
        assert_eq!(uc.execute(&video, &out).unwrap(), 4);

        let img = image::open(out.join("00004.png")).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
        assert!(!out.join("00005.png").exists());
    }
}
