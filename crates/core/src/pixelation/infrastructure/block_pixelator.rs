use crate::pixelation::domain::region_pixelator::{ensure_fits, RegionPixelator};
use crate::shared::error::FrameError;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

use super::resample::{enlarge_nearest, shrink_linear};

/// Mosaic pixelation: shrink the region by `block_size` with linear
/// sampling, then blow it back up with nearest-neighbour.
///
/// Regions whose sides divide evenly by `block_size` end up as uniform
/// `block_size` squares, so applying it twice changes nothing.
pub struct BlockPixelator {
    block_size: u32,
}

impl BlockPixelator {
    pub fn new(block_size: u32) -> Result<Self, FrameError> {
        if block_size == 0 {
            return Err(FrameError::InvalidConfiguration(
                "block size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { block_size })
    }
}

impl RegionPixelator for BlockPixelator {
    fn pixelate(&self, frame: &mut Frame, rect: &Rect) -> Result<(), FrameError> {
        ensure_fits(frame, rect)?;

        let small_w = rect.width() / self.block_size;
        let small_h = rect.height() / self.block_size;
        if small_w == 0 || small_h == 0 {
            return Err(FrameError::smaller_than_block(
                *rect,
                frame.width(),
                frame.height(),
                self.block_size,
            ));
        }

        let mut roi = frame.region_mut(rect);
        let small = shrink_linear(roi.view(), small_w as usize, small_h as usize);
        let mosaic = enlarge_nearest(small.view(), rect.width() as usize, rect.height() as usize);
        roi.assign(&mosaic);

        Ok(())
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }
}
