use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use framekit_core::pipeline::crop_frames_use_case::{CropBounds, CropFramesUseCase};
use framekit_core::pipeline::extract_frames_use_case::{self, ExtractFramesUseCase};
use framekit_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use framekit_core::pipeline::pixelate_frames_use_case::PixelateFramesUseCase;
use framekit_core::pipeline::thin_frames_use_case::{self, ThinFramesUseCase};
use framekit_core::pixelation::domain::pixelate_job::PixelateJob;
use framekit_core::pixelation::infrastructure::pixelator_factory::create_pixelator;
use framekit_core::shared::constants::PIXELATED_SUFFIX;
use framekit_core::video::domain::video_reader::VideoReader;
use framekit_core::video::domain::video_writer::VideoWriter;
use framekit_core::video::infrastructure::fallback_video_writer::FallbackVideoWriter;
use framekit_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use framekit_core::video::infrastructure::frame_listing::list_frame_files;
use framekit_core::video::infrastructure::image_file_writer::ImageFileWriter;
use framekit_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;
use framekit_core::video::infrastructure::image_sequence_writer::ImageSequenceWriter;

/// Frame-level tools for videos and image sequences.
#[derive(Parser, Debug)]
#[command(name = "framekit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pixelate scheduled regions of a video or frame directory.
    Pixelate {
        /// JSON job file: a full job object or a bare schedule array.
        job: PathBuf,

        /// Input video or frame directory (overrides the job file).
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output video or directory (overrides the job file).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Mosaic block size in pixels (overrides the job file).
        #[arg(long)]
        block_size: Option<u32>,

        /// Fill regions with a solid marker colour instead of pixelating.
        #[arg(long)]
        debug: bool,
    },

    /// Crop every image in a frame directory, in place.
    Crop {
        dir: PathBuf,

        #[arg(long, default_value = "0")]
        left: u32,

        #[arg(long, default_value = "0")]
        top: u32,

        /// Right edge (exclusive); defaults to the image width.
        #[arg(long)]
        right: Option<u32>,

        /// Bottom edge (exclusive); defaults to the image height.
        #[arg(long)]
        bottom: Option<u32>,
    },

    /// Copy a frame directory, dropping every second frame in a range.
    Thin {
        dir: PathBuf,

        /// Range start (exclusive); defaults to the first frame number.
        #[arg(long)]
        start: Option<u64>,

        /// Range end (exclusive); defaults to the last frame number.
        #[arg(long)]
        end: Option<u64>,

        /// Output directory; must not exist.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Decode a video into numbered PNG frames.
    Extract {
        video: PathBuf,

        /// Output directory; must not exist.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Pixelate {
            job,
            input,
            output,
            block_size,
            debug,
        } => {
            let mut job = PixelateJob::load(&job)?;
            apply_overrides(&mut job, input, output, block_size, debug);
            run_pixelate(&job)
        }
        Command::Crop {
            dir,
            left,
            top,
            right,
            bottom,
        } => {
            let bounds = CropBounds {
                left,
                top,
                right,
                bottom,
            };
            CropFramesUseCase::new(bounds).execute(&dir)?;
            Ok(())
        }
        Command::Thin {
            dir,
            start,
            end,
            output,
        } => {
            let output = output.unwrap_or_else(|| {
                thin_frames_use_case::default_output_dir(&dir, chrono::Local::now().time())
            });
            ThinFramesUseCase::new(start, end).execute(&dir, &output)?;
            Ok(())
        }
        Command::Extract { video, output } => {
            let output =
                output.unwrap_or_else(|| extract_frames_use_case::default_output_dir(&video));
            let mut use_case = ExtractFramesUseCase::new(
                Box::new(FfmpegReader::new()),
                Box::new(ImageFileWriter::new()),
                Box::new(StdoutPipelineLogger::default()),
            );
            use_case.execute(&video, &output)?;
            Ok(())
        }
    }
}

fn run_pixelate(job: &PixelateJob) -> Result<(), Box<dyn std::error::Error>> {
    let input = job
        .input_path
        .as_deref()
        .ok_or("no input given: set input_path in the job file or pass --input")?;
    if !input.exists() {
        return Err(format!("Input not found: {}", input.display()).into());
    }
    let output = job
        .output_path
        .clone()
        .unwrap_or_else(|| default_pixelate_output(input));

    let pixelator = create_pixelator(job.block_size, job.debug)?;
    let (reader, writer): (Box<dyn VideoReader>, Box<dyn VideoWriter>) = if input.is_dir() {
        let names = list_frame_files(input)?;
        (
            Box::new(ImageSequenceReader::new()),
            Box::new(ImageSequenceWriter::from_paths(&names)),
        )
    } else {
        (
            Box::new(FfmpegReader::new()),
            Box::new(FallbackVideoWriter::with_default_encoders()),
        )
    };

    let mut use_case = PixelateFramesUseCase::new(
        reader,
        writer,
        pixelator,
        job.schedule.clone(),
        Box::new(StdoutPipelineLogger::default()),
    );
    let summary = use_case.execute(input, &output)?;
    let written = summary.output_path.unwrap_or(output);
    log::info!("Output written to {}", written.display());
    Ok(())
}

fn apply_overrides(
    job: &mut PixelateJob,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    block_size: Option<u32>,
    debug: bool,
) {
    if input.is_some() {
        job.input_path = input;
    }
    if output.is_some() {
        job.output_path = output;
    }
    if let Some(block_size) = block_size {
        job.block_size = block_size;
    }
    job.debug |= debug;
}

/// Frame directories are rewritten in place; videos get a `_pixelated`
/// sibling.
fn default_pixelate_output(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{PIXELATED_SUFFIX}.mp4"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::pixelation::domain::region_schedule::RegionSchedule;

    #[test]
    fn test_parses_pixelate_flags() {
        let cli = Cli::try_parse_from([
            "framekit",
            "pixelate",
            "job.json",
            "--input",
            "in.mp4",
            "--block-size",
            "16",
            "--debug",
        ])
        .unwrap();
        match cli.command {
            Command::Pixelate {
                job,
                input,
                output,
                block_size,
                debug,
            } => {
                assert_eq!(job, PathBuf::from("job.json"));
                assert_eq!(input, Some(PathBuf::from("in.mp4")));
                assert_eq!(output, None);
                assert_eq!(block_size, Some(16));
                assert!(debug);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_crop_defaults() {
        let cli = Cli::try_parse_from(["framekit", "crop", "frames"]).unwrap();
        match cli.command {
            Command::Crop {
                left,
                top,
                right,
                bottom,
                ..
            } => {
                assert_eq!((left, top, right, bottom), (0, 0, None, None));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["framekit"]).is_err());
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let mut job = PixelateJob::new(RegionSchedule::default());
        job.input_path = Some(PathBuf::from("job-input.mp4"));
        job.output_path = Some(PathBuf::from("job-output.mp4"));

        apply_overrides(&mut job, None, Some(PathBuf::from("cli.mp4")), Some(4), false);

        assert_eq!(job.input_path, Some(PathBuf::from("job-input.mp4")));
        assert_eq!(job.output_path, Some(PathBuf::from("cli.mp4")));
        assert_eq!(job.block_size, 4);
        assert!(!job.debug);
    }

    #[test]
    fn test_default_output_for_video_is_sibling() {
        assert_eq!(
            default_pixelate_output(Path::new("/videos/clip.webm")),
            PathBuf::from("/videos/clip_pixelated.mp4")
        );
    }

    #[test]
    fn test_default_output_for_directory_is_in_place() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(default_pixelate_output(dir.path()), dir.path());
    }

    #[test]
    fn test_missing_input_is_error() {
        let job = PixelateJob::new(RegionSchedule::default());
        let err = run_pixelate(&job).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }
}
