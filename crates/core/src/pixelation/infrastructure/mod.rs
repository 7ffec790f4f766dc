pub mod block_pixelator;
pub mod marker_pixelator;
pub mod pixelator_factory;
mod resample;
