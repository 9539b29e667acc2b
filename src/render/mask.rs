//! Rasterized region masks.

use ndarray::{s, Array2};

use crate::error::{RegionError, Result};
use crate::types::{BoundingBox, OverlapSlices};

/// Per-pixel coverage in `[0, 1]`, anchored at a bounding box.
///
/// Row `j` and column `i` of `data` correspond to pixel
/// `(bbox.ixmin + i, bbox.iymin + j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    data: Array2<f64>,
    bbox: BoundingBox,
}

impl RegionMask {
    /// Wrap an array; its shape must match the box.
    pub fn new(data: Array2<f64>, bbox: BoundingBox) -> Result<Self> {
        if data.dim() != bbox.shape() {
            return Err(RegionError::InvalidArgument {
                message: format!(
                    "mask data has shape {:?} but its bounding box has shape {:?}",
                    data.dim(),
                    bbox.shape()
                ),
                help: None,
            });
        }
        Ok(Self { data, bbox })
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Array shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total coverage, in square pixels.
    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// Coverage of pixel `(x, y)`; zero outside the box.
    pub fn get(&self, x: i64, y: i64) -> f64 {
        if x < self.bbox.ixmin || x >= self.bbox.ixmax || y < self.bbox.iymin || y >= self.bbox.iymax {
            return 0.0;
        }
        self.data[[(y - self.bbox.iymin) as usize, (x - self.bbox.ixmin) as usize]]
    }

    pub fn get_overlap_slices(&self, shape: (usize, usize)) -> Option<OverlapSlices> {
        self.bbox.get_overlap_slices(shape)
    }

    /// The mask placed in a zeroed image of `shape = (ny, nx)`.
    ///
    /// `None` when the mask falls entirely outside the image.
    pub fn to_image(&self, shape: (usize, usize)) -> Option<Array2<f64>> {
        let slices = self.get_overlap_slices(shape)?;
        let mut image = Array2::zeros(shape);
        let (large_rows, large_cols) = slices.large;
        let (small_rows, small_cols) = slices.small;
        image
            .slice_mut(s![large_rows, large_cols])
            .assign(&self.data.slice(s![small_rows, small_cols]));
        Some(image)
    }

    /// The part of `image` under the mask's box, mask-shaped.
    ///
    /// Pixels of the box outside the image take `fill`.
    pub fn cutout(&self, image: &Array2<f64>, fill: f64) -> Option<Array2<f64>> {
        let slices = self.get_overlap_slices(image.dim())?;
        let mut cutout = Array2::from_elem(self.shape(), fill);
        let (large_rows, large_cols) = slices.large;
        let (small_rows, small_cols) = slices.small;
        cutout
            .slice_mut(s![small_rows, small_cols])
            .assign(&image.slice(s![large_rows, large_cols]));
        Some(cutout)
    }

    /// The cutout of `image` weighted by the mask coverage.
    pub fn multiply(&self, image: &Array2<f64>, fill: f64) -> Option<Array2<f64>> {
        self.cutout(image, fill).map(|cutout| cutout * &self.data)
    }

    /// Text rendering, one row per line: `#` full, `+` partial, `.` empty.
    pub fn to_ascii(&self) -> String {
        self.data
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|&v| {
                        if v >= 1.0 {
                            '#'
                        } else if v > 0.0 {
                            '+'
                        } else {
                            '.'
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn plus_mask() -> RegionMask {
        let data = array![[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 0.5, 0.0]];
        RegionMask::new(data, BoundingBox::new(-1, 2, 3, 6).unwrap()).unwrap()
    }

    #[test]
    fn test_new_checks_shape() {
        let data = Array2::zeros((2, 3));
        assert!(RegionMask::new(data, BoundingBox::new(0, 2, 0, 3).unwrap()).is_err());
    }

    #[test]
    fn test_sum_and_get() {
        let mask = plus_mask();
        assert_eq!(mask.sum(), 4.5);
        assert_eq!(mask.get(0, 4), 1.0);
        assert_eq!(mask.get(0, 5), 0.5);
        assert_eq!(mask.get(10, 10), 0.0);
    }

    #[test]
    fn test_to_image_clips() {
        let image = plus_mask().to_image((5, 5)).unwrap();
        assert_eq!(image.dim(), (5, 5));
        // only columns x = 0 and 1 and rows y = 3 and 4 land in the image
        assert_eq!(image[[3, 0]], 1.0);
        assert_eq!(image[[4, 0]], 1.0);
        assert_eq!(image[[4, 1]], 1.0);
        assert_eq!(image[[3, 1]], 0.0);
        assert_eq!(image.sum(), 3.0);
    }

    #[test]
    fn test_to_image_no_overlap() {
        assert!(plus_mask().to_image((2, 2)).is_none());
    }

    #[test]
    fn test_cutout_and_multiply() {
        let image = Array2::from_shape_fn((5, 5), |(y, x)| (10 * y + x) as f64);
        let mask = plus_mask();

        let cutout = mask.cutout(&image, -1.0).unwrap();
        assert_eq!(cutout.dim(), (3, 3));
        assert_eq!(cutout[[0, 0]], -1.0);
        assert_eq!(cutout[[0, 1]], 30.0);
        assert_eq!(cutout[[1, 2]], 41.0);

        let weighted = mask.multiply(&image, 0.0).unwrap();
        assert_eq!(weighted[[1, 1]], 40.0);
        assert_eq!(weighted[[0, 0]], 0.0);
        assert_eq!(weighted[[2, 1]], 0.0, "row y = 5 is outside the image");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(plus_mask().to_ascii(), ".#.\n###\n.+.");
    }
}
