use serde::{Deserialize, Serialize};

use crate::shared::error::FrameError;
use crate::shared::rect::Rect;

/// One schedule rule: pixelate `rect` on frames `start..=end`.
///
/// Serialized as `{"frames": [start, end], "rect": [l, t, r, b]}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry", into = "RawEntry")]
pub struct ScheduleEntry {
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
}

#[derive(Serialize, Deserialize)]
struct RawEntry {
    frames: [usize; 2],
    rect: Rect,
}

impl ScheduleEntry {
    pub fn new(start: usize, end: usize, rect: Rect) -> Result<Self, FrameError> {
        if start > end {
            return Err(FrameError::InvalidConfiguration(format!(
                "schedule entry frame range [{start}, {end}] has start after end"
            )));
        }
        Ok(Self { start, end, rect })
    }

    pub fn covers(&self, frame_index: usize) -> bool {
        (self.start..=self.end).contains(&frame_index)
    }
}

impl TryFrom<RawEntry> for ScheduleEntry {
    type Error = FrameError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let [start, end] = raw.frames;
        ScheduleEntry::new(start, end, raw.rect)
    }
}

impl From<ScheduleEntry> for RawEntry {
    fn from(e: ScheduleEntry) -> Self {
        RawEntry {
            frames: [e.start, e.end],
            rect: e.rect,
        }
    }
}

/// Ordered, immutable list of pixelation rules.
///
/// Entries may overlap; lookups resolve to the first matching entry in
/// declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSchedule {
    entries: Vec<ScheduleEntry>,
}

impl RegionSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rect of the first entry whose inclusive range holds `frame_index`.
    pub fn match_region(&self, frame_index: usize) -> Option<&Rect> {
        self.entries
            .iter()
            .find(|e| e.covers(frame_index))
            .map(|e| &e.rect)
    }

    /// Checks every rect against the frame size and block size.
    ///
    /// Run before the first frame is read so a bad schedule never produces
    /// partial output.
    pub fn validate_for(&self, width: u32, height: u32, block_size: u32) -> Result<(), FrameError> {
        for entry in &self.entries {
            let rect = entry.rect;
            if !rect.fits_within(width, height) {
                return Err(FrameError::out_of_bounds(rect, width, height));
            }
            if rect.width() < block_size || rect.height() < block_size {
                return Err(FrameError::smaller_than_block(
                    rect, width, height, block_size,
                ));
            }
        }
        Ok(())
    }
}
