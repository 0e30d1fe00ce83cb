use crate::common::vec3d::Vec3D;
use strum_macros::Display;

/// Failure of a position source to provide a satellite position.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum EphemerisError {
    /// The requested time lies outside the valid ephemeris span `[valid_from, valid_to]`.
    OutOfRange { t: i64, valid_from: i64, valid_to: i64 },
    /// The source produced a position with non-finite components.
    NonFinitePosition { t: i64 },
    /// A sample table needs at least one sample and a positive spacing. An orbit needs a
    /// positive radius, finite angles and an ordered valid range.
    InvalidSampling,
}

impl std::error::Error for EphemerisError {}

/// Provider of planet-centered satellite positions over time.
///
/// Implementations own the propagation model. Callers must treat an `Err` for an
/// out-of-range time as a hard failure instead of clamping.
pub trait PositionSource: Send + Sync {
    /// Position in kilometers at time `t` (seconds since the scheduling epoch).
    fn position_at(&self, t: i64) -> Result<Vec3D<f64>, EphemerisError>;

    /// Closed time span `[from, to]` for which `position_at` is defined.
    fn valid_range(&self) -> (i64, i64);

    /// Orbital period in seconds, if the source is periodic.
    fn period_s(&self) -> Option<f64> { None }

    /// Shared range check for implementors.
    fn check_range(&self, t: i64) -> Result<(), EphemerisError> {
        let (valid_from, valid_to) = self.valid_range();
        if t < valid_from || t > valid_to {
            Err(EphemerisError::OutOfRange { t, valid_from, valid_to })
        } else {
            Ok(())
        }
    }
}
