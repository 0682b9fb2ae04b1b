use crate::contour::{Contour, ContourError};

use ndarray::{Array3, ArrayView2, s};

/// Boolean selection with the same (rows, cols, depth) shape as a volume.
///
/// Only one depth index is ever selected: the slice the contour was drawn on.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    data: Array3<bool>,
}

impl Mask {
    /// All-false mask.
    pub fn empty(dim: (usize, usize, usize)) -> Self {
        Self {
            data: Array3::from_elem(dim, false),
        }
    }

    /// Rasterize `contour` onto depth index `slice_index` of a fresh mask.
    ///
    /// # Errors
    ///
    /// Fails without producing a partial mask if the contour is too small or
    /// `slice_index` is outside the volume depth.
    pub fn from_contour(
        contour: &Contour,
        slice_index: usize,
        dim: (usize, usize, usize),
    ) -> Result<Self, ContourError> {
        let (rows, cols, depth) = dim;
        if slice_index >= depth {
            return Err(ContourError::SliceOutOfRange {
                index: slice_index,
                depth,
            });
        }

        let plane = contour.rasterize((rows, cols))?;
        let mut mask = Self::empty(dim);
        mask.data.slice_mut(s![.., .., slice_index]).assign(&plane);
        Ok(mask)
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<bool> {
        &self.data
    }

    pub fn slice(&self, index: usize) -> Option<ArrayView2<'_, bool>> {
        (index < self.data.dim().2).then(|| self.data.slice(s![.., .., index]))
    }

    pub fn selected_count(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Point2;

    fn square() -> Contour {
        Contour::from_points([
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 6.0),
            Point2::new(6.0, 6.0),
            Point2::new(6.0, 2.0),
        ])
    }

    #[test]
    fn test_only_active_slice_is_selected() {
        let mask = Mask::from_contour(&square(), 1, (10, 10, 3)).unwrap();
        assert_eq!(mask.dim(), (10, 10, 3));
        assert_eq!(mask.selected_count(), 16);
        assert!(mask.slice(0).unwrap().iter().all(|v| !*v));
        assert!(mask.slice(2).unwrap().iter().all(|v| !*v));
        assert!(mask.slice(1).unwrap()[[2, 2]]);
        assert!(!mask.slice(1).unwrap()[[6, 6]]);
        assert!(mask.slice(3).is_none());
    }

    #[test]
    fn test_same_contour_gives_identical_masks() {
        let first = Mask::from_contour(&square(), 0, (10, 10, 2)).unwrap();
        let second = Mask::from_contour(&square(), 0, (10, 10, 2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_slice_out_of_range() {
        assert_eq!(
            Mask::from_contour(&square(), 2, (10, 10, 2)),
            Err(ContourError::SliceOutOfRange { index: 2, depth: 2 })
        );
    }

    #[test]
    fn test_too_small_contour_gives_no_mask() {
        let line = Contour::from_points([Point2::new(1.0, 1.0), Point2::new(4.0, 4.0)]);
        assert_eq!(
            Mask::from_contour(&line, 0, (10, 10, 1)),
            Err(ContourError::TooSmall { points: 2 })
        );
    }
}
