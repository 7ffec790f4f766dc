use crate::pixelation::domain::region_pixelator::{ensure_fits, RegionPixelator};
use crate::shared::constants::DEBUG_MARKER_RGB;
use crate::shared::error::FrameError;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Debug stand-in that paints the region a solid colour so its placement
/// can be checked by eye.
///
/// Carries the run's block size so schedules are held to the same minimum
/// region size as in normal mode.
pub struct MarkerPixelator {
    rgb: [u8; 3],
    block_size: u32,
}

impl MarkerPixelator {
    pub fn new(rgb: [u8; 3], block_size: u32) -> Result<Self, FrameError> {
        if block_size == 0 {
            return Err(FrameError::InvalidConfiguration(
                "block size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { rgb, block_size })
    }

    /// Red marker.
    pub fn red(block_size: u32) -> Result<Self, FrameError> {
        Self::new(DEBUG_MARKER_RGB, block_size)
    }
}

impl RegionPixelator for MarkerPixelator {
    fn pixelate(&self, frame: &mut Frame, rect: &Rect) -> Result<(), FrameError> {
        ensure_fits(frame, rect)?;
        for mut pixel in frame.region_mut(rect).lanes_mut(ndarray::Axis(2)) {
            for (dst, &src) in pixel.iter_mut().zip(self.rgb.iter()) {
                *dst = src;
            }
        }
        Ok(())
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }
}
