pub mod crop_frames_use_case;
pub mod extract_frames_use_case;
pub mod pipeline_logger;
pub mod pixelate_frames_use_case;
pub mod thin_frames_use_case;
