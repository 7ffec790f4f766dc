use ndarray::{s, ArrayView3, ArrayViewMut3};

use crate::shared::rect::Rect;

/// One frame of a sequence: tightly packed RGB bytes in row-major order.
///
/// `index` is the frame's position in the sequence it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A frame of one repeated RGB colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 3)
            .collect();
        Self::new(data, width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.data[start..start + c]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Mutable `(height, width, channels)` view of `rect`.
    ///
    /// The caller guarantees `rect` lies within the frame.
    pub fn region_mut(&mut self, rect: &Rect) -> ArrayViewMut3<'_, u8> {
        self.as_ndarray_mut().slice_move(s![
            rect.top as usize..rect.bottom as usize,
            rect.left as usize..rect.right as usize,
            ..
        ])
    }

    /// Copies `rect` out into a new frame with the same index.
    ///
    /// The caller guarantees `rect` lies within the frame.
    pub fn crop(&self, rect: &Rect) -> Frame {
        let view = self.as_ndarray();
        let sub = view.slice(s![
            rect.top as usize..rect.bottom as usize,
            rect.left as usize..rect.right as usize,
            ..
        ]);
        let data: Vec<u8> = sub.iter().copied().collect();
        Frame::new(data, rect.width(), rect.height(), self.channels, self.index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
