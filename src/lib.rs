//! # DICOM-contour library
//!
//! Load a folder of DICOM slices as a volume and carve it with a polygon
//! drawn on one slice.
//!
//! The pipeline runs in three strictly sequential stages:
//!  - Slice loading: every ".dcm" file of a folder is decoded and the slices
//!    are ordered by a [`SortBy`] attribute (Instance Number by default).
//!    Slices missing the attribute go last.
//!  - Volume assembly: the ordered slices are stacked along a trailing depth
//!    axis, giving an array of shape (rows, cols, depth) with spacing taken
//!    from the first slice.
//!  - Masking: a closed [`Contour`] is rasterized onto the active slice and
//!    every voxel outside it is zeroed on the displayed volume.
//!
//! DICOM files are assumed to have the following attributes:
//!   - No multiframe (always the first frame is used)
//!   - Images from the same series sharing rows and columns
//!
//! # Examples
//!
//! ## Carving the first slice of a folder
//!
//! ```no_run
//! # use dicom_contour::{Point2, SegmentationSession, SortBy, VolumeLoader};
//! let volume = VolumeLoader::load_from_directory("dicom", SortBy::InstanceNumber)
//!     .expect("should have loaded files from directory");
//! let mut session = SegmentationSession::new(volume);
//! for (row, col) in [(10.0, 10.0), (10.0, 60.0), (60.0, 60.0), (60.0, 10.0)] {
//!     session.pick(Point2::new(row, col)).expect("session accepts points");
//! }
//! session.finish().expect("contour has enough points");
//! println!("{} voxels kept", session.mask().selected_count());
//! ```
//!
//! [`SortBy`]: enums::SortBy
//! [`Contour`]: contour::Contour

pub mod contour;
pub mod enums;
pub mod mask;
pub mod session;
pub mod slice;
pub mod volume;
pub mod volume_loader;

pub use contour::{Contour, ContourError, Point2};
pub use enums::{Orientation, SortBy};
pub use mask::Mask;
pub use session::{ContourState, SegmentationSession, SessionError};
pub use slice::{OrderKey, Slice};
pub use volume::{Volume, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
