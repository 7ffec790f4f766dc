use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::pixelation::domain::region_pixelator::RegionPixelator;
use crate::pixelation::domain::region_schedule::RegionSchedule;
use crate::shared::error::FrameError;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::PipelineLogger;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelateSummary {
    pub frames_total: usize,
    pub frames_pixelated: usize,
    /// Where the sink actually wrote, when it reports one.
    pub output_path: Option<PathBuf>,
}

/// Streams a source through the pixelator into a sink:
/// read → match schedule → pixelate → write, one frame at a time.
///
/// The schedule is checked against the source dimensions and the
/// pixelator's block size before the first frame is pulled. Any read,
/// pixelate, or write failure aborts the run.
pub struct PixelateFramesUseCase {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    pixelator: Box<dyn RegionPixelator>,
    schedule: RegionSchedule,
    logger: Box<dyn PipelineLogger>,
}

impl PixelateFramesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        pixelator: Box<dyn RegionPixelator>,
        schedule: RegionSchedule,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            pixelator,
            schedule,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<PixelateSummary, FrameError> {
        let metadata = self
            .reader
            .open(input_path)
            .map_err(|e| FrameError::SourceOpen {
                path: input_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let result = self.run(&metadata, output_path);
        self.reader.close();

        let summary = result?;
        self.logger.info(&format!(
            "Pixelated {} of {} frames",
            summary.frames_pixelated, summary.frames_total
        ));
        self.logger.summary();
        Ok(summary)
    }

    fn run(
        &mut self,
        metadata: &VideoMetadata,
        output_path: &Path,
    ) -> Result<PixelateSummary, FrameError> {
        if metadata.is_image_sequence() {
            log::info!(
                "Source: {} images of {}x{}",
                metadata.total_frames,
                metadata.width,
                metadata.height
            );
        } else {
            log::info!(
                "Source: {}x{} {} at {:.2} fps, about {} frames",
                metadata.width,
                metadata.height,
                metadata.codec,
                metadata.fps,
                metadata.total_frames
            );
        }

        let block_size = self.pixelator.block_size();
        if block_size == 0 {
            return Err(FrameError::InvalidConfiguration(
                "block size must be a positive integer".to_string(),
            ));
        }
        self.schedule
            .validate_for(metadata.width, metadata.height, block_size)?;

        self.writer
            .open(output_path, metadata)
            .map_err(|e| match e.downcast::<FrameError>() {
                Ok(err) => *err,
                Err(e) => FrameError::NoWriterAvailable {
                    attempts: vec![e.to_string()],
                },
            })?;

        let total = metadata.total_frames;
        let mut index = 0;
        let mut pixelated = 0;
        let mut frames = self.reader.frames();

        loop {
            let read_start = Instant::now();
            let Some(next) = frames.next() else {
                break;
            };
            let mut frame = next.map_err(|e| FrameError::FrameRead {
                index,
                message: e.to_string(),
            })?;
            self.logger
                .timing("read", read_start.elapsed().as_secs_f64() * 1000.0);

            if let Some(rect) = self.schedule.match_region(index) {
                let start = Instant::now();
                self.pixelator.pixelate(&mut frame, rect)?;
                self.logger
                    .timing("pixelate", start.elapsed().as_secs_f64() * 1000.0);
                pixelated += 1;
            }

            let write_start = Instant::now();
            self.writer
                .write(&frame)
                .map_err(|e| FrameError::FrameWrite {
                    index,
                    message: e.to_string(),
                })?;
            self.logger
                .timing("write", write_start.elapsed().as_secs_f64() * 1000.0);

            index += 1;
            self.logger.progress(index, total);
        }
        drop(frames);

        self.writer
            .close()
            .map_err(|e| FrameError::Finalize(e.to_string()))?;

        if index == 0 {
            log::warn!("Source produced no frames");
        }

        Ok(PixelateSummary {
            frames_total: index,
            frames_pixelated: pixelated,
            output_path: self.writer.output_path(),
        })
    }
}
