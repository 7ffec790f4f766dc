pub mod fallback_video_writer;
pub mod ffmpeg_reader;
pub mod ffmpeg_writer;
pub mod frame_listing;
pub mod image_file_writer;
pub mod image_sequence_reader;
pub mod image_sequence_writer;
