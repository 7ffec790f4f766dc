pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Solid fill used by debug mode to show where a region lands.
pub const DEBUG_MARKER_RGB: [u8; 3] = [255, 0, 0];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Zero-padded width of extracted frame file names (`00001.png`).
pub const FRAME_NAME_DIGITS: usize = 5;

pub const DEFAULT_CRF: u32 = 28;

pub const PIXELATED_SUFFIX: &str = "_pixelated";
pub const ALL_FRAMES_SUFFIX: &str = "_all-frames";
pub const REMOVED_FRAMES_SUFFIX: &str = "_removed-frames";
