use std::path::{Path, PathBuf};

use crate::shared::error::FrameError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

use super::ffmpeg_writer::FfmpegWriter;

pub type WriterFactory = Box<dyn Fn() -> Box<dyn VideoWriter> + Send>;

/// One way of producing output: a writer and the extension it should use.
pub struct WriterCandidate {
    pub name: String,
    /// Replaces the output extension when set (e.g. `avi` for Xvid).
    pub extension: Option<String>,
    pub factory: WriterFactory,
}

impl WriterCandidate {
    pub fn new(name: &str, extension: Option<&str>, factory: WriterFactory) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.map(str::to_string),
            factory,
        }
    }

    fn target_path(&self, path: &Path) -> PathBuf {
        match &self.extension {
            Some(ext) => path.with_extension(ext),
            None => path.to_path_buf(),
        }
    }
}

/// Tries candidate writers in priority order and keeps the first one that
/// opens; writes and close go to that writer.
///
/// When every candidate fails, `open` returns a boxed
/// [`FrameError::NoWriterAvailable`] listing each attempt.
pub struct FallbackVideoWriter {
    candidates: Vec<WriterCandidate>,
    active: Option<(String, Box<dyn VideoWriter>)>,
    failures: Vec<String>,
}

impl FallbackVideoWriter {
    pub fn new(candidates: Vec<WriterCandidate>) -> Self {
        Self {
            candidates,
            active: None,
            failures: Vec::new(),
        }
    }

    /// H.264, then Xvid in an AVI container, then plain MPEG-4.
    pub fn with_default_encoders() -> Self {
        Self::new(vec![
            WriterCandidate::new(
                "libx264",
                None,
                Box::new(|| Box::new(FfmpegWriter::h264_compact())),
            ),
            WriterCandidate::new(
                "libxvid",
                Some("avi"),
                Box::new(|| Box::new(FfmpegWriter::new().with_encoder("libxvid"))),
            ),
            WriterCandidate::new("mpeg4", None, Box::new(|| Box::new(FfmpegWriter::new()))),
        ])
    }

    /// Name of the candidate that opened, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|(name, _)| name.as_str())
    }

    /// `"name: reason"` for every candidate that failed to open.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

impl VideoWriter for FallbackVideoWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.active = None;
        self.failures.clear();

        for candidate in &self.candidates {
            let target = candidate.target_path(path);
            let mut writer = (candidate.factory)();
            match writer.open(&target, metadata) {
                Ok(()) => {
                    log::info!("Using {} writer for {}", candidate.name, target.display());
                    self.active = Some((candidate.name.clone(), writer));
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("{} writer unavailable: {e}", candidate.name);
                    self.failures.push(format!("{}: {e}", candidate.name));
                }
            }
        }

        Err(Box::new(FrameError::NoWriterAvailable {
            attempts: self.failures.clone(),
        }))
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (_, writer) = self
            .active
            .as_mut()
            .ok_or("FallbackVideoWriter: not opened")?;
        writer.write(frame)
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        match self.active.as_mut() {
            Some((_, writer)) => writer.close(),
            None => Ok(()),
        }
    }

    fn output_path(&self) -> Option<PathBuf> {
        self.active.as_ref().and_then(|(_, w)| w.output_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records which paths it was opened with; fails to open when told to.
    struct ScriptedWriter {
        fail: bool,
        opened: Arc<Mutex<Vec<PathBuf>>>,
        written: Arc<Mutex<usize>>,
        path: Option<PathBuf>,
    }

    impl VideoWriter for ScriptedWriter {
        fn open(
            &mut self,
            path: &Path,
            _metadata: &VideoMetadata,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.opened.lock().unwrap().push(path.to_path_buf());
            if self.fail {
                return Err("codec missing".into());
            }
            self.path = Some(path.to_path_buf());
            Ok(())
        }

        fn write(&mut self, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            *self.written.lock().unwrap() += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn output_path(&self) -> Option<PathBuf> {
            self.path.clone()
        }
    }

    struct Harness {
        opened: Arc<Mutex<Vec<PathBuf>>>,
        written: Arc<Mutex<usize>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                opened: Arc::new(Mutex::new(Vec::new())),
                written: Arc::new(Mutex::new(0)),
            }
        }

        fn candidate(&self, name: &str, ext: Option<&str>, fail: bool) -> WriterCandidate {
            let opened = self.opened.clone();
            let written = self.written.clone();
            WriterCandidate::new(
                name,
                ext,
                Box::new(move || {
                    Box::new(ScriptedWriter {
                        fail,
                        opened: opened.clone(),
                        written: written.clone(),
                        path: None,
                    })
                }),
            )
        }
    }

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            width: 4,
            height: 4,
            fps: 25.0,
            total_frames: 1,
            codec: String::new(),
            source_path: None,
        }
    }

    #[test]
    fn test_first_working_candidate_wins() {
        let h = Harness::new();
        let mut writer = FallbackVideoWriter::new(vec![
            h.candidate("a", None, true),
            h.candidate("b", Some("avi"), false),
            h.candidate("c", None, false),
        ]);
        writer.open(Path::new("/out/video.mp4"), &metadata()).unwrap();

        assert_eq!(writer.active_name(), Some("b"));
        assert_eq!(writer.failures(), ["a: codec missing"]);
        assert_eq!(
            *h.opened.lock().unwrap(),
            [PathBuf::from("/out/video.mp4"), PathBuf::from("/out/video.avi")]
        );
        assert_eq!(writer.output_path(), Some(PathBuf::from("/out/video.avi")));
    }

    #[test]
    fn test_writes_go_to_active_writer() {
        let h = Harness::new();
        let mut writer = FallbackVideoWriter::new(vec![h.candidate("only", None, false)]);
        writer.open(Path::new("/out/v.mp4"), &metadata()).unwrap();
        writer.write(&Frame::filled(4, 4, [0; 3], 0)).unwrap();
        writer.write(&Frame::filled(4, 4, [0; 3], 1)).unwrap();
        writer.close().unwrap();
        assert_eq!(*h.written.lock().unwrap(), 2);
    }

    #[test]
    fn test_all_failing_reports_every_attempt() {
        let h = Harness::new();
        let mut writer = FallbackVideoWriter::new(vec![
            h.candidate("x264", None, true),
            h.candidate("xvid", Some("avi"), true),
        ]);
        let err = writer
            .open(Path::new("/out/v.mp4"), &metadata())
            .unwrap_err()
            .downcast::<FrameError>()
            .unwrap();

        match *err {
            FrameError::NoWriterAvailable { ref attempts } => {
                assert_eq!(attempts, &["x264: codec missing", "xvid: codec missing"]);
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(writer.active_name().is_none());
        assert_eq!(writer.failures().len(), 2);
    }

    #[test]
    fn test_write_before_open_is_error() {
        let mut writer = FallbackVideoWriter::new(Vec::new());
        assert!(writer.write(&Frame::filled(4, 4, [0; 3], 0)).is_err());
        assert!(writer.close().is_ok());
    }

    #[test]
    fn test_default_encoder_order() {
        let writer = FallbackVideoWriter::with_default_encoders();
        let names: Vec<_> = writer.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["libx264", "libxvid", "mpeg4"]);
        assert_eq!(writer.candidates[1].extension.as_deref(), Some("avi"));
    }

    #[test]
    fn test_default_encoders_produce_a_video() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FallbackVideoWriter::with_default_encoders();
        writer
            .open(&dir.path().join("out.mp4"), &metadata_sized(64, 48))
            .unwrap();
        for i in 0..3 {
            writer.write(&Frame::filled(64, 48, [90; 3], i)).unwrap();
        }
        writer.close().unwrap();

        let out = writer.output_path().unwrap();
        assert!(std::fs::metadata(out).unwrap().len() > 0);
    }

    fn metadata_sized(width: u32, height: u32) -> VideoMetadata {
        VideoMetadata {
            width,
            height,
            ..metadata()
        }
    }
}
