use crate::{
    enums::SortBy,
    slice::{OrderKey, Slice, sort_slices},
    volume::{Volume, VolumeError},
};

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use log::{debug, info};
use ndarray::{Array2, s};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// File extension recognized as a DICOM slice, compared case-insensitively.
pub const DICOM_EXTENSION: &str = "dcm";

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No DICOM files found")]
    EmptyInput,

    #[error("Failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Volume(#[from] VolumeError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a directory containing .dcm files
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::EmptyInput`] if the directory holds no
    /// recognized file; any file that fails to decode aborts the whole load.
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Volume, VolumeLoaderError> {
        let slices = Self::load_slices_from_directory(path, sort_by)?;
        if slices.is_empty() {
            return Err(VolumeLoaderError::EmptyInput);
        }
        Ok(Volume::assemble(&slices)?)
    }

    /// Decode every .dcm file of a directory into ordered slices.
    ///
    /// An empty directory yields an empty vector, not an error.
    pub fn load_slices_from_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Vec<Slice>, VolumeLoaderError> {
        let paths = Self::list_dicom_files(path.as_ref())?;
        Self::load_slices_from_file_paths(&paths, sort_by)
    }

    /// Recognized files of a directory, in ascending path order.
    pub fn list_dicom_files(path: &Path) -> Result<Vec<PathBuf>, VolumeLoaderError> {
        let mut paths = fs::read_dir(path)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.retain(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DICOM_EXTENSION))
        });
        paths.sort();
        Ok(paths)
    }

    /// Load ordered slices from file paths
    pub fn load_slices_from_file_paths(
        paths: &[impl AsRef<Path>],
        sort_by: SortBy,
    ) -> Result<Vec<Slice>, VolumeLoaderError> {
        let mut slices = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let source_name = path.display().to_string();
                let dicom_object = open_file(path).map_err(|e| VolumeLoaderError::Decode {
                    source_name: source_name.clone(),
                    message: e.to_string(),
                })?;
                Self::extract_slice(&dicom_object, sort_by, &source_name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        sort_slices(&mut slices);
        info!("{} DICOM files loaded", slices.len());
        Ok(slices)
    }

    /// Load ordered slices from already opened DICOM objects
    pub fn load_slices_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
        sort_by: SortBy,
    ) -> Result<Vec<Slice>, VolumeLoaderError> {
        let mut slices = dicom_objects
            .iter()
            .enumerate()
            .map(|(i, dicom_object)| {
                Self::extract_slice(dicom_object, sort_by, &format!("object #{i}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        sort_slices(&mut slices);
        Ok(slices)
    }

    fn extract_slice(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
        source_name: &str,
    ) -> Result<Slice, VolumeLoaderError> {
        let pixels = Self::decode_image(dicom_object).map_err(|message| {
            VolumeLoaderError::Decode {
                source_name: source_name.to_string(),
                message,
            }
        })?;
        let order = OrderKey::from_option(Self::get_sort_order(dicom_object, sort_by));
        debug!("{source_name}: order {order:?}, shape {:?}", pixels.dim());

        Ok(Slice {
            pixels,
            order,
            pixel_spacing: Self::get_pixel_spacing(dicom_object),
            thickness: Self::get_slice_thickness(dicom_object),
        })
    }

    fn get_sort_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: SortBy,
    ) -> Option<f64> {
        match sort_by {
            SortBy::ImagePositionPatient => {
                let pos = dicom_object
                    .element(tags::IMAGE_POSITION_PATIENT)
                    .ok()?
                    .to_multi_float64()
                    .ok()?;
                // Negated so the ascending sort puts the highest z first
                pos.get(2).map(|z| -z)
            }
            SortBy::TablePosition => dicom_object
                .element(tags::TABLE_POSITION)
                .ok()?
                .to_float64()
                .ok(),
            SortBy::InstanceNumber => dicom_object
                .element(tags::INSTANCE_NUMBER)
                .ok()?
                .to_int::<i64>()
                .ok()
                // Exact for every representable Instance Number
                .map(|n| n as f64),
            SortBy::None => Some(0.0),
        }
    }

    fn get_pixel_spacing(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<(f32, f32)> {
        let spacing = dicom_object
            .element(tags::PIXEL_SPACING)
            .ok()?
            .to_multi_float32()
            .ok()?;
        match spacing.as_slice() {
            [row, col, ..] => Some((*row, *col)),
            _ => None,
        }
    }

    fn get_slice_thickness(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<f32> {
        dicom_object
            .element(tags::SLICE_THICKNESS)
            .ok()?
            .to_float32()
            .ok()
    }

    // Stored values of the first frame and first sample, no rescale or window
    fn decode_image(dicom_object: &FileDicomObject<InMemDicomObject>) -> Result<Array2<u16>, String> {
        let pixel_data = dicom_object
            .decode_pixel_data()
            .map_err(|e| e.to_string())?;
        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::None)
            .with_voi_lut(VoiLutOption::Identity);
        pixel_data
            .to_ndarray_with_options::<u16>(&options)
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
            .map_err(|e| e.to_string())
    }
}
