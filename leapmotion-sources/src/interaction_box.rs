//! Normalization of sensor-space coordinates against an interaction box
//!
//! Raw positions are in millimeters relative to the controller. The
//! interaction box describes the volume in which tracking is reliable; its
//! minimum corner maps to 0 and its maximum corner maps to 1 on every axis:
//!
//! ```text
//! normalized[k] = (point[k] - center[k]) / size[k] + 0.5
//! ```

use crate::error::{Result, SourceError};
use crate::frame::InteractionBox;

/// Map `point` into the unit cube spanned by `volume`.
///
/// With `clamp` set, each axis is saturated into `[0, 1]`; otherwise points
/// outside the box produce values outside that range. A zero extent is not
/// guarded here and yields an infinite or NaN component (clamping saturates
/// the infinity but keeps NaN as NaN), use
/// [`InteractionBox::validate`] first when the box comes from untrusted input.
pub fn normalize_point(volume: &InteractionBox, point: &[f64], clamp: bool) -> Result<[f64; 3]> {
    let center: &[i64; 3] = volume
        .center
        .as_slice()
        .try_into()
        .map_err(|_| SourceError::InvalidCenter { len: volume.center.len() })?;
    let size: &[f64; 3] = volume
        .size
        .as_slice()
        .try_into()
        .map_err(|_| SourceError::InvalidSize { len: volume.size.len() })?;
    let point: &[f64; 3] = point
        .try_into()
        .map_err(|_| SourceError::InvalidPoint { len: point.len() })?;

    let normalized: [f64; 3] =
        std::array::from_fn(|k| (point[k] - center[k] as f64) / size[k] + 0.5);

    Ok(if clamp { clamp_unit(normalized) } else { normalized })
}

fn clamp_unit(v: [f64; 3]) -> [f64; 3] {
    v.map(|x| x.clamp(0.0, 1.0))
}

impl InteractionBox {
    pub fn new(center: [i64; 3], size: [f64; 3]) -> Self {
        Self {
            center: center.to_vec(),
            size: size.to_vec(),
        }
    }

    /// See [`normalize_point`].
    pub fn normalize_point(&self, point: &[f64], clamp: bool) -> Result<[f64; 3]> {
        normalize_point(self, point, clamp)
    }

    /// Check the shape of the box and that no extent is zero.
    pub fn validate(&self) -> Result<()> {
        if self.center.len() != 3 {
            return Err(SourceError::InvalidCenter { len: self.center.len() });
        }
        if self.size.len() != 3 {
            return Err(SourceError::InvalidSize { len: self.size.len() });
        }
        match self.size.iter().position(|s| *s == 0.0) {
            Some(axis) => Err(SourceError::ZeroExtent { axis }),
            None => Ok(()),
        }
    }
}
