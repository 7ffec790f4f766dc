use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, right- and bottom-exclusive.
///
/// Serialized as `[left, top, right, bottom]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    /// Builds a rect, rejecting zero or negative extents.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Result<Self, String> {
        if right <= left || bottom <= top {
            return Err(format!(
                "rect ({left}, {top}, {right}, {bottom}) must have right > left and bottom > top"
            ));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Intersects with a `width` x `height` frame, slice-style.
    ///
    /// Returns `None` when nothing of the rect remains inside the frame.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        let right = self.right.min(width);
        let bottom = self.bottom.min(height);
        Rect::new(self.left, self.top, right, bottom).ok()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl TryFrom<[u32; 4]> for Rect {
    type Error = String;

    fn try_from([left, top, right, bottom]: [u32; 4]) -> Result<Self, Self::Error> {
        Rect::new(left, top, right, bottom)
    }
}

impl From<Rect> for [u32; 4] {
    fn from(r: Rect) -> Self {
        [r.left, r.top, r.right, r.bottom]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dimensions() {
        let r = Rect::new(10, 20, 110, 70).unwrap();
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
    }

    #[rstest]
    #[case::zero_width(10, 0, 10, 5)]
    #[case::zero_height(0, 10, 5, 10)]
    #[case::inverted(20, 0, 10, 5)]
    fn test_degenerate_rejected(
        #[case] l: u32,
        #[case] t: u32,
        #[case] r: u32,
        #[case] b: u32,
    ) {
        assert!(Rect::new(l, t, r, b).is_err());
    }

    #[test]
    fn test_fits_within_is_exclusive_at_edges() {
        let r = Rect::new(0, 0, 100, 100).unwrap();
        assert!(r.fits_within(100, 100));
        assert!(!r.fits_within(99, 100));
        assert!(!r.fits_within(100, 99));
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 10, 20, 20).unwrap();
        assert!(r.contains(10, 10));
        assert!(r.contains(19, 19));
        assert!(!r.contains(20, 10));
        assert!(!r.contains(9, 15));
    }

    #[test]
    fn test_clamp_to_shrinks_overhang() {
        let r = Rect::new(50, 50, 1_000, 1_000).unwrap();
        let clamped = r.clamp_to(80, 60).unwrap();
        assert_eq!(clamped, Rect::new(50, 50, 80, 60).unwrap());
    }

    #[test]
    fn test_clamp_to_outside_is_none() {
        let r = Rect::new(100, 0, 200, 10).unwrap();
        assert!(r.clamp_to(100, 100).is_none());
    }

    #[test]
    fn test_deserialize_from_array() {
        let r: Rect = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(r, Rect::new(1, 2, 3, 4).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_degenerate() {
        let result: Result<Rect, _> = serde_json::from_str("[5, 2, 5, 4]");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let r = Rect::new(1, 2, 3, 4).unwrap();
        assert_eq!(r.to_string(), "(1, 2, 3, 4)");
    }
}
