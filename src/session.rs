//! Interactive contour drawing over a loaded volume.
//!
//! A [`SegmentationSession`] owns the contour points, the mask and the active
//! slice index. Point picks and the finish trigger are fed in one at a time by
//! whatever front end drives the session; the session answers with what that
//! front end should draw next.

use crate::contour::{Contour, ContourError, Point2};
use crate::mask::Mask;
use crate::volume::{Volume, VolumeError};

use log::{debug, info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Volume(#[from] VolumeError),

    #[error("Contour already finalized")]
    Finalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContourState {
    Idle,
    Collecting,
    Finalized,
}

/// Segment between two consecutive picks, to be drawn by the front end.
pub type Segment = (Point2, Point2);

pub struct SegmentationSession {
    volume: Volume,
    displayed: Volume,
    contour: Contour,
    mask: Mask,
    active_slice: usize,
    state: ContourState,
}

impl SegmentationSession {
    /// Start a session on the first slice of `volume`.
    pub fn new(volume: Volume) -> Self {
        let mask = Mask::empty(volume.dim());
        Self {
            displayed: volume.clone(),
            volume,
            contour: Contour::new(),
            mask,
            active_slice: 0,
            state: ContourState::Idle,
        }
    }

    pub fn state(&self) -> ContourState {
        self.state
    }

    pub fn active_slice(&self) -> usize {
        self.active_slice
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// The volume as loaded, never modified by masking.
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// The volume currently backing the display.
    pub fn displayed(&self) -> &Volume {
        &self.displayed
    }

    /// Append a picked point.
    ///
    /// Returns the segment joining it to the previous point, if any.
    pub fn pick(&mut self, point: Point2) -> Result<Option<Segment>, SessionError> {
        if self.state == ContourState::Finalized {
            return Err(SessionError::Finalized);
        }

        let previous = self.contour.last();
        self.contour.push(point);
        self.state = ContourState::Collecting;
        debug!("Point added: ({}, {})", point.row, point.col);

        Ok(previous.map(|from| (from, point)))
    }

    /// Close the contour, rebuild the mask and replace the displayed volume
    /// with the masked one. Returns the closed ring to draw; the session
    /// keeps no points afterwards.
    ///
    /// If the contour is too small the session keeps collecting and neither
    /// the mask nor the displayed volume change.
    pub fn finish(&mut self) -> Result<Vec<Point2>, SessionError> {
        if self.state == ContourState::Finalized {
            return Err(SessionError::Finalized);
        }

        let mask = Mask::from_contour(&self.contour, self.active_slice, self.volume.dim())
            .inspect_err(|err| warn!("{err}. Pick more points."))?;
        let displayed = self.volume.masked(&mask)?;

        info!(
            "Contour closed with {} points, {} voxels selected on slice {}",
            self.contour.len(),
            mask.selected_count(),
            self.active_slice
        );

        self.mask = mask;
        self.displayed = displayed;
        self.state = ContourState::Finalized;
        Ok(std::mem::take(&mut self.contour).closed())
    }
}
