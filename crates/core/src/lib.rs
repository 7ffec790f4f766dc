pub mod pipeline;
pub mod pixelation;
pub mod shared;
pub mod video;
