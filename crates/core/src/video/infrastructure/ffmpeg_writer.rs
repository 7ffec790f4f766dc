use std::path::{Path, PathBuf};

use ffmpeg_next::util::frame::video::Video;

use crate::shared::constants::DEFAULT_CRF;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

const FALLBACK_FPS: i32 = 30;

/// Encodes RGB frames to a video file via ffmpeg-next.
///
/// The encoder defaults to the built-in MPEG-4 Part 2 codec; named encoders
/// (e.g. `libx264`) and private options can be chosen with the builder
/// methods. Opening fails if the named encoder is not compiled into libav.
pub struct FfmpegWriter {
    encoder_name: Option<String>,
    options: Vec<(String, String)>,
    output_path: Option<PathBuf>,
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            encoder_name: None,
            options: Vec::new(),
            output_path: None,
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            fps: FALLBACK_FPS,
            frame_count: 0,
        }
    }

    /// Uses the libav encoder registered under `name`.
    pub fn with_encoder(mut self, name: &str) -> Self {
        self.encoder_name = Some(name.to_string());
        self
    }

    /// Sets an encoder private option, e.g. `("preset", "slower")`.
    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.options.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_crf(self, crf: u32) -> Self {
        self.with_option("crf", &crf.min(51).to_string())
    }

    /// H.264 with a size-oriented profile: slow preset, capped bitrate.
    pub fn h264_compact() -> Self {
        Self::new()
            .with_encoder("libx264")
            .with_crf(DEFAULT_CRF)
            .with_option("preset", "slower")
            .with_option("maxrate", "2M")
            .with_option("bufsize", "4M")
    }

    pub fn encoder_label(&self) -> &str {
        self.encoder_name.as_deref().unwrap_or("mpeg4")
    }

    fn find_codec(&self) -> Result<ffmpeg_next::Codec, Box<dyn std::error::Error>> {
        let codec = match &self.encoder_name {
            Some(name) => ffmpeg_next::encoder::find_by_name(name),
            None => ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4),
        };
        codec.ok_or_else(|| format!("encoder {} not available", self.encoder_label()).into())
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(octx)) = (self.encoder.as_mut(), self.octx.as_mut()) else {
            return Ok(());
        };
        let ost_time_base = octx
            .stream(0)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let codec = self.find_codec()?;
        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let fps = metadata.fps.round() as i32;
        let fps = if fps <= 0 { FALLBACK_FPS } else { fps };

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let mut options = ffmpeg_next::Dictionary::new();
        for (key, value) in &self.options {
            options.set(key, value);
        }
        let encoder = encoder_ctx.open_with(options)?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!(
            "Encoding {}x{} @ {fps} fps with {} to {}",
            metadata.width,
            metadata.height,
            self.encoder_label(),
            path.display()
        );

        self.width = metadata.width;
        self.height = metadata.height;
        self.fps = fps;
        self.output_path = Some(path.to_path_buf());
        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(scaler)) = (self.encoder.as_mut(), self.scaler.as_mut()) else {
            return Err("FfmpegWriter: not opened".into());
        };
        if frame.width() != self.width || frame.height() != self.height {
            return Err(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )
            .into());
        }

        let mut rgb = Video::new(ffmpeg_next::format::Pixel::RGB24, self.width, self.height);
        let stride = rgb.stride(0);
        let row_bytes = self.width as usize * 3;
        let dst = rgb.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_bytes).enumerate() {
            dst[row * stride..row * stride + row_bytes].copy_from_slice(src_row);
        }

        let mut yuv = Video::empty();
        scaler.run(&rgb, &mut yuv)?;
        yuv.set_pts(Some(self.frame_count as i64));
        encoder.send_frame(&yuv)?;

        self.drain_packets()?;
        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_eof()?;
            self.drain_packets()?;
            if let Some(octx) = self.octx.as_mut() {
                octx.write_trailer()?;
            }
            log::debug!("Encoded {} frames", self.frame_count);
        }

        self.octx = None;
        self.encoder = None;
        self.scaler = None;
        Ok(())
    }

    fn output_path(&self) -> Option<PathBuf> {
        self.output_path.clone()
    }
}
