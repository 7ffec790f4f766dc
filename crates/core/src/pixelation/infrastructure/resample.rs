//! Resampling for the block mosaic.
//!
//! Both functions work on `(height, width, channels)` arrays. Shrinking
//! samples the two nearest source pixels per axis at half-pixel centres
//! (no area averaging), so a region that is already a uniform block mosaic
//! shrinks to exactly its block colours.

use ndarray::{Array3, ArrayView3};

/// Bilinear downscale to `new_w` x `new_h`.
pub fn shrink_linear(src: ArrayView3<'_, u8>, new_w: usize, new_h: usize) -> Array3<u8> {
    let (h, w, channels) = src.dim();
    let mut out = Array3::<u8>::zeros((new_h, new_w, channels));
    if w == 0 || h == 0 {
        return out;
    }

    let xs: Vec<_> = (0..new_w).map(|dx| sample_axis(dx, w, new_w)).collect();
    let ys: Vec<_> = (0..new_h).map(|dy| sample_axis(dy, h, new_h)).collect();

    for (dy, &(y0, y1, fy)) in ys.iter().enumerate() {
        for (dx, &(x0, x1, fx)) in xs.iter().enumerate() {
            for c in 0..channels {
                let v00 = src[[y0, x0, c]] as f32;
                let v10 = src[[y0, x1, c]] as f32;
                let v01 = src[[y1, x0, c]] as f32;
                let v11 = src[[y1, x1, c]] as f32;

                let val = v00 * (1.0 - fx) * (1.0 - fy)
                    + v10 * fx * (1.0 - fy)
                    + v01 * (1.0 - fx) * fy
                    + v11 * fx * fy;
                out[[dy, dx, c]] = val.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

/// Nearest-neighbour upscale to `target_w` x `target_h`.
pub fn enlarge_nearest(src: ArrayView3<'_, u8>, target_w: usize, target_h: usize) -> Array3<u8> {
    let (h, w, channels) = src.dim();
    let mut out = Array3::<u8>::zeros((target_h, target_w, channels));
    if w == 0 || h == 0 {
        return out;
    }

    for y in 0..target_h {
        let sy = (y * h / target_h).min(h - 1);
        for x in 0..target_w {
            let sx = (x * w / target_w).min(w - 1);
            for c in 0..channels {
                out[[y, x, c]] = src[[sy, sx, c]];
            }
        }
    }

    out
}

/// Source neighbours and weight for destination position `d`.
fn sample_axis(d: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let scale = src_len as f32 / dst_len as f32;
    let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
    let i0 = (s.floor() as usize).min(src_len - 1);
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, s - i0 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: usize, h: usize) -> Array3<u8> {
        Array3::from_shape_fn((h, w, 3), |(y, x, _)| ((x + y * w) % 256) as u8)
    }

    #[test]
    fn test_shrink_dimensions() {
        let img = gradient(40, 20);
        let small = shrink_linear(img.view(), 4, 2);
        assert_eq!(small.dim(), (2, 4, 3));
    }

    #[test]
    fn test_shrink_uniform_is_unchanged() {
        let img = Array3::from_elem((30, 30, 3), 77u8);
        let small = shrink_linear(img.view(), 3, 3);
        assert!(small.iter().all(|&v| v == 77));
    }

    #[test]
    fn test_shrink_samples_block_centres() {
        // 1x20 row: left half 0, right half 200. Factor 10 samples pixels 4/5
        // and 14/15, so each output stays inside its own half.
        let img = Array3::from_shape_fn((1, 20, 1), |(_, x, _)| if x < 10 { 0 } else { 200 });
        let small = shrink_linear(img.view(), 2, 1);
        assert_eq!(small[[0, 0, 0]], 0);
        assert_eq!(small[[0, 1, 0]], 200);
    }

    #[test]
    fn test_shrink_blends_neighbours() {
        // Factor 2 samples between pixels 0 and 1.
        let img = Array3::from_shape_fn((1, 2, 1), |(_, x, _)| if x == 0 { 0 } else { 100 });
        let small = shrink_linear(img.view(), 1, 1);
        assert_eq!(small[[0, 0, 0]], 50);
    }

    #[test]
    fn test_enlarge_repeats_each_pixel_as_block() {
        let small = Array3::from_shape_fn((2, 2, 1), |(y, x, _)| (y * 2 + x) as u8);
        let big = enlarge_nearest(small.view(), 6, 4);
        assert_eq!(big.dim(), (4, 6, 1));
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(big[[y, x, 0]], ((y / 2) * 2 + x / 3) as u8);
            }
        }
    }

    #[test]
    fn test_enlarge_uneven_ratio_covers_whole_target() {
        let small = Array3::from_shape_fn((1, 2, 1), |(_, x, _)| x as u8 + 1);
        let big = enlarge_nearest(small.view(), 25, 1);
        assert!(big.iter().all(|&v| v == 1 || v == 2));
        assert_eq!(big[[0, 0, 0]], 1);
        assert_eq!(big[[0, 24, 0]], 2);
    }
}
