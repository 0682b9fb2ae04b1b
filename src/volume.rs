use crate::contour::Point2;
use crate::enums::Orientation;
use crate::mask::Mask;
use crate::slice::Slice;

use image::ImageBuffer;
use image::Luma;
use log::info;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::Zip;
use ndarray::s;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("No slices to assemble")]
    EmptyInput,

    #[error("Slice {index} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Missing spacing information on the first slice")]
    MissingSpacing,

    #[error("Mask shape {found:?} does not match volume shape {expected:?}")]
    MaskShape {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },
}

/// Slices stacked along a trailing depth axis, shape (rows, cols, depth).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Volume {
    pub data: Array3<u16>,
    /// (dx, dy, dz): row spacing, column spacing, slice thickness
    pub spacing: (f32, f32, f32),
}

impl Volume {
    pub fn new(data: Array3<u16>, spacing: (f32, f32, f32)) -> Self {
        Self { data, spacing }
    }

    /// Stack ordered slices into a volume.
    ///
    /// Spacing comes from the first slice only; every slice must share its
    /// in-plane shape.
    ///
    /// # Errors
    ///
    /// Returns error if `slices` is empty, shapes differ or the first slice
    /// has no spacing information
    pub fn assemble(slices: &[Slice]) -> Result<Self, VolumeError> {
        let first = slices.first().ok_or(VolumeError::EmptyInput)?;
        Self::validate_dimensions(slices)?;

        let (Some((dx, dy)), Some(dz)) = (first.pixel_spacing, first.thickness) else {
            return Err(VolumeError::MissingSpacing);
        };

        let (rows, cols) = first.dim();
        let mut data = Array3::<u16>::zeros((rows, cols, slices.len()));
        for (mut plane, slice) in data.axis_iter_mut(Axis(2)).zip(slices) {
            plane.assign(&slice.pixels);
        }

        info!("Spacing (x, y, z): ({dx}, {dy}, {dz})");
        Ok(Self::new(data, (dx, dy, dz)))
    }

    fn validate_dimensions(slices: &[Slice]) -> Result<(), VolumeError> {
        let expected = slices[0].dim();
        match slices.iter().position(|slice| slice.dim() != expected) {
            Some(index) => Err(VolumeError::ShapeMismatch {
                index,
                expected,
                found: slices[index].dim(),
            }),
            None => Ok(()),
        }
    }

    /// Get the dimensions of the volume (rows, cols, depth)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<u16> {
        &self.data
    }

    pub fn spacing(&self) -> (f32, f32, f32) {
        self.spacing
    }

    /// Copy of the volume with every voxel outside `mask` set to zero.
    pub fn masked(&self, mask: &Mask) -> Result<Self, VolumeError> {
        if mask.dim() != self.dim() {
            return Err(VolumeError::MaskShape {
                expected: self.dim(),
                found: mask.dim(),
            });
        }

        let mut data = self.data.clone();
        Zip::from(&mut data)
            .and(mask.data())
            .par_for_each(|value, &selected| {
                if !selected {
                    *value = 0;
                }
            });
        Ok(Self::new(data, self.spacing))
    }

    /// Map a picked point in physical coordinates (grid origin at zero) onto
    /// the pixel grid of a slice.
    pub fn world_to_pixel(&self, point: [f64; 3]) -> Point2 {
        let (dx, dy, _) = self.spacing;
        Point2::new(point[0] / dx as f64, point[1] / dy as f64)
    }

    pub fn get_slice_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
    ) -> Option<ArrayView2<'_, u16>> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        // Depth runs vertically on the side views
        let view = match orientation {
            Orientation::Axial => self.data.slice(s![.., .., index]),
            Orientation::Coronal => self.data.slice(s![index, .., ..]).reversed_axes(),
            Orientation::Sagittal => self.data.slice(s![.., index, ..]).reversed_axes(),
        };
        Some(view)
    }

    /// Render a plane as an 8-bit grayscale image, windowed over the
    /// value range of the whole volume.
    pub fn get_image_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
    ) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let slice = self.get_slice_from_axis(index, orientation)?;
        let (min, max) = self.value_range();
        Self::slice_to_image(&slice, min, max)
    }

    fn value_range(&self) -> (u16, u16) {
        self.data
            .iter()
            .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    #[inline]
    fn normalize_to_u8(value: u16, min: u16, max: u16) -> u8 {
        if max <= min {
            return 0;
        }
        let scaled = value.saturating_sub(min) as f32 / (max - min) as f32;
        (scaled * 255.0).clamp(0.0, 255.0) as u8
    }

    fn slice_to_image(
        slice: &ArrayView2<'_, u16>,
        min: u16,
        max: u16,
    ) -> Option<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let (height, width) = slice.dim();
        let values: Vec<u16> = slice.iter().copied().collect();
        let pixel_data: Vec<u8> = values
            .into_par_iter()
            .map(|v| Self::normalize_to_u8(v, min, max))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }

    fn is_valid_index(&self, index: usize, orientation: Orientation) -> bool {
        let (rows, cols, depth) = self.data.dim();
        let max_index = match orientation {
            Orientation::Axial => depth,
            Orientation::Coronal => rows,
            Orientation::Sagittal => cols,
        };
        index < max_index
    }
}
