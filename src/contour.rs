//! Hand-drawn polygon contours and their rasterization onto a slice grid.
//!
//! Points live in pixel index space: the center of pixel `(r, c)` sits at
//! coordinates `(r, c)`. Rasterization is a scanline even-odd fill with a
//! half-open convention: a pixel is selected when its center is strictly
//! inside the polygon or lies on a left/top edge; centers on right/bottom
//! edges are left out.

use ndarray::Array2;
use thiserror::Error;

/// Minimum number of distinct points a contour needs to be filled.
pub const MIN_CONTOUR_POINTS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ContourError {
    #[error(
        "Contour too small: {points} distinct point(s), at least {} required",
        MIN_CONTOUR_POINTS
    )]
    TooSmall { points: usize },

    #[error("Slice index {index} out of range for volume depth {depth}")]
    SliceOutOfRange { index: usize, depth: usize },
}

/// A point on a slice, in (row, column) pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub row: f64,
    pub col: f64,
}

impl Point2 {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// Ordered polygon boundary, implicitly closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    /// Number of pairwise distinct points.
    pub fn distinct_len(&self) -> usize {
        self.points
            .iter()
            .enumerate()
            .filter(|&(i, p)| !self.points[..i].contains(p))
            .count()
    }

    pub fn validate(&self) -> Result<(), ContourError> {
        let points = self.distinct_len();
        if points < MIN_CONTOUR_POINTS {
            return Err(ContourError::TooSmall { points });
        }
        Ok(())
    }

    /// The ring with the first point repeated at the end.
    pub fn closed(&self) -> Vec<Point2> {
        let mut ring = self.points.clone();
        if let Some(&first) = self.points.first() {
            ring.push(first);
        }
        ring
    }

    /// Fill the polygon over a `(rows, cols)` grid.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::TooSmall`] if the contour has fewer than three
    /// distinct points.
    pub fn rasterize(&self, shape: (usize, usize)) -> Result<Array2<bool>, ContourError> {
        self.validate()?;

        let (rows, cols) = shape;
        let ring = self.closed();
        let mut mask = Array2::from_elem(shape, false);
        let mut crossings = Vec::with_capacity(ring.len());

        for r in 0..rows {
            let y = r as f64;
            crossings.clear();
            crossings.extend(ring.windows(2).filter_map(|edge| {
                let (a, b) = (edge[0], edge[1]);
                // Half-open span: horizontal edges and shared vertices are counted once
                if (a.row > y) != (b.row > y) {
                    Some(a.col + (y - a.row) * (b.col - a.col) / (b.row - a.row))
                } else {
                    None
                }
            }));
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = span[0].ceil().max(0.0);
                let end = span[1].ceil().min(cols as f64);
                if start >= end {
                    continue;
                }
                for c in start as usize..end as usize {
                    mask[[r, c]] = true;
                }
            }
        }

        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(points: &[(f64, f64)]) -> Contour {
        Contour::from_points(points.iter().map(|&(r, c)| Point2::new(r, c)))
    }

    fn selected(mask: &Array2<bool>) -> Vec<(usize, usize)> {
        mask.indexed_iter()
            .filter(|(_, v)| **v)
            .map(|(idx, _)| idx)
            .collect()
    }

    #[test]
    fn test_square_is_half_open() {
        let square = contour(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]);
        let mask = square.rasterize((10, 10)).unwrap();

        for ((r, c), &inside) in mask.indexed_iter() {
            let expected = (2..6).contains(&r) && (2..6).contains(&c);
            assert_eq!(inside, expected, "pixel ({r}, {c})");
        }
        assert_eq!(mask.iter().filter(|v| **v).count(), 16);
    }

    #[test]
    fn test_winding_direction_does_not_matter() {
        let cw = contour(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]);
        let ccw = contour(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
        assert_eq!(cw.rasterize((10, 10)), ccw.rasterize((10, 10)));
    }

    #[test]
    fn test_triangle() {
        let triangle = contour(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let mask = triangle.rasterize((5, 5)).unwrap();
        // row r spans [0, 4 - r)
        let expected: Vec<_> = (0..4)
            .flat_map(|r| (0..4 - r).map(move |c| (r, c)))
            .collect();
        assert_eq!(selected(&mask), expected);
    }

    #[test]
    fn test_concave_polygon_even_odd() {
        // U shape opening towards the top, notch covers cols 3..5 on rows 0..3
        let u = contour(&[
            (0.0, 1.0),
            (6.0, 1.0),
            (6.0, 7.0),
            (0.0, 7.0),
            (0.0, 5.0),
            (3.0, 5.0),
            (3.0, 3.0),
            (0.0, 3.0),
        ]);
        let mask = u.rasterize((8, 8)).unwrap();
        assert!(mask[[1, 1]]);
        assert!(mask[[1, 2]]);
        assert!(!mask[[1, 3]]);
        assert!(!mask[[1, 4]]);
        assert!(mask[[1, 5]]);
        assert!(mask[[4, 4]]);
        assert!(!mask[[6, 4]]);
    }

    #[test]
    fn test_polygon_is_clipped_to_grid() {
        let big = contour(&[(-5.0, -5.0), (-5.0, 20.0), (20.0, 20.0), (20.0, -5.0)]);
        let mask = big.rasterize((4, 3)).unwrap();
        assert!(mask.iter().all(|v| *v));
    }

    #[test]
    fn test_two_points_is_too_small() {
        let line = contour(&[(1.0, 1.0), (5.0, 5.0)]);
        assert_eq!(
            line.rasterize((10, 10)),
            Err(ContourError::TooSmall { points: 2 })
        );
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let c = contour(&[(1.0, 1.0), (5.0, 5.0), (1.0, 1.0), (5.0, 5.0)]);
        assert_eq!(c.distinct_len(), 2);
        assert_eq!(c.validate(), Err(ContourError::TooSmall { points: 2 }));
    }

    #[test]
    fn test_closed_repeats_first_point() {
        let c = contour(&[(0.0, 0.0), (0.0, 3.0), (3.0, 0.0)]);
        let ring = c.closed();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(c.len(), 3);
        assert!(Contour::new().closed().is_empty());
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let c = contour(&[(1.5, 0.5), (7.2, 3.3), (2.0, 8.9), (4.0, 4.0)]);
        assert_eq!(c.rasterize((10, 10)), c.rasterize((10, 10)));
    }
}
