use crate::shared::error::FrameError;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Obscures one rectangular region of a frame in place.
///
/// Pixels outside `rect` must be left untouched. A rect that does not fit
/// the frame fails with [`FrameError::InvalidRegion`] and leaves the frame
/// unchanged.
pub trait RegionPixelator: Send {
    fn pixelate(&self, frame: &mut Frame, rect: &Rect) -> Result<(), FrameError>;

    /// Smallest region side this pixelator accepts.
    fn block_size(&self) -> u32;
}

/// Rejects rects that extend past the frame edge.
pub fn ensure_fits(frame: &Frame, rect: &Rect) -> Result<(), FrameError> {
    if rect.fits_within(frame.width(), frame.height()) {
        Ok(())
    } else {
        Err(FrameError::out_of_bounds(
            *rect,
            frame.width(),
            frame.height(),
        ))
    }
}
