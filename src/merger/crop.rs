use ndarray::{ArrayView3, s};
use rand::Rng;
use std::ops::Range;

/// Center of a square crop, in pixel coordinates of the full frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOrigin {
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

impl CropOrigin {
    /// Draws a center uniformly from `[size / 2, dim - size / 2]` on each axis, x first. For odd
    /// sizes the upper bound shrinks by one so the crop still spans `size` pixels.
    /// Returns `None` when either dimension is smaller than `size`.
    pub fn random<R: Rng>(
        rng: &mut R,
        height: usize,
        width: usize,
        size: usize,
    ) -> Option<Self> {
        if height < size || width < size {
            return None;
        }

        let half = size / 2;
        let x = rng.gen_range(half..=width - (size - half));
        let y = rng.gen_range(half..=height - (size - half));

        Some(CropOrigin { x, y, size })
    }

    pub fn rows(&self) -> Range<usize> {
        let start = self.y - self.size / 2;
        start..start + self.size
    }

    pub fn cols(&self) -> Range<usize> {
        let start = self.x - self.size / 2;
        start..start + self.size
    }

    /// Crops a (height, width, channel) frame.
    pub fn apply<'a, A>(&self, frame: ArrayView3<'a, A>) -> ArrayView3<'a, A> {
        frame.slice_move(s![self.rows(), self.cols(), ..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_crop_stays_inside_frame() {
        let mut rng = StdRng::seed_from_u64(42);

        for (height, width) in [(64, 64), (70, 70), (64, 300), (129, 65)] {
            for _ in 0..200 {
                let origin = CropOrigin::random(&mut rng, height, width, 64).unwrap();
                let rows = origin.rows();
                let cols = origin.cols();

                assert_eq!(rows.len(), 64);
                assert_eq!(cols.len(), 64);
                assert!(rows.end <= height, "{:?} in {}", rows, height);
                assert!(cols.end <= width, "{:?} in {}", cols, width);
            }
        }
    }

    #[test]
    fn test_odd_crop_keeps_full_size() {
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..200 {
            let origin = CropOrigin::random(&mut rng, 40, 15, 15).unwrap();
            assert_eq!(origin.rows().len(), 15);
            assert_eq!(origin.cols(), 0..15);
            assert!(origin.rows().end <= 40);
        }
    }

    #[test]
    fn test_exact_size_has_single_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let origin = CropOrigin::random(&mut rng, 64, 64, 64).unwrap();
        assert_eq!((origin.x, origin.y), (32, 32));
    }

    #[test]
    fn test_frame_too_small() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(CropOrigin::random(&mut rng, 63, 100, 64).is_none());
        assert!(CropOrigin::random(&mut rng, 100, 63, 64).is_none());
    }

    #[test]
    fn test_apply_crop() {
        let frame = Array3::from_shape_fn((10, 12, 2), |(y, x, c)| (y * 100 + x * 10 + c) as u32);
        let origin = CropOrigin { x: 5, y: 4, size: 4 };

        let cropped = origin.apply(frame.view());

        assert_eq!(cropped.shape(), &[4, 4, 2]);
        assert_eq!(cropped[[0, 0, 0]], 230);
        assert_eq!(cropped[[3, 3, 1]], 561);
    }
}
