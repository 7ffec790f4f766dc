use crate::pixelation::domain::region_pixelator::RegionPixelator;
use crate::shared::error::FrameError;

use super::block_pixelator::BlockPixelator;
use super::marker_pixelator::MarkerPixelator;

/// Builds the pixelator for a run.
///
/// The block size is validated in both modes so a bad setting fails the
/// same way with or without `debug`.
pub fn create_pixelator(
    block_size: u32,
    debug: bool,
) -> Result<Box<dyn RegionPixelator>, FrameError> {
    if debug {
        let marker = MarkerPixelator::red(block_size)?;
        log::info!("Debug mode: filling regions with a marker colour instead of pixelating");
        Ok(Box::new(marker))
    } else {
        let block = BlockPixelator::new(block_size)?;
        log::info!("Pixelating with block size {}", block.block_size());
        Ok(Box::new(block))
    }
}
