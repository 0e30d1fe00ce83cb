use super::position_source::{EphemerisError, PositionSource};
use crate::common::vec3d::Vec3D;
use std::f64::consts::TAU;

/// A circular Keplerian orbit around a spherical planet.
///
/// Serves as the reference [`PositionSource`] for the demo binary and the tests.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CircularOrbit {
    /// Orbit radius measured from the planet center, in kilometers.
    radius_km: f64,
    /// Inclination of the orbital plane, in degrees.
    inclination_deg: f64,
    /// Right ascension of the ascending node, in degrees.
    raan_deg: f64,
    /// Argument of latitude at `t = 0`, in degrees.
    phase_deg: f64,
    /// Valid span of the ephemeris, in seconds.
    valid_range: (i64, i64),
}

impl CircularOrbit {
    /// Standard gravitational parameter of the Earth in km^3/s^2.
    pub const MU_EARTH: f64 = 398_600.441_8;

    pub fn new(
        radius_km: f64,
        inclination_deg: f64,
        raan_deg: f64,
        phase_deg: f64,
        valid_range: (i64, i64),
    ) -> Self {
        Self {
            radius_km,
            inclination_deg,
            raan_deg,
            phase_deg,
            valid_range,
        }
    }

    pub fn radius_km(&self) -> f64 { self.radius_km }

    /// Checks the orbital elements, e.g. after deserializing them from a file.
    ///
    /// # Errors
    /// - [`EphemerisError::InvalidSampling`] for a non-positive or non-finite radius,
    ///   non-finite angles or an inverted valid range.
    pub fn validate(&self) -> Result<(), EphemerisError> {
        let angles = [self.inclination_deg, self.raan_deg, self.phase_deg];
        if !(self.radius_km.is_finite() && self.radius_km > 0.0)
            || !angles.iter().all(|a| a.is_finite())
            || self.valid_range.0 > self.valid_range.1
        {
            return Err(EphemerisError::InvalidSampling);
        }
        Ok(())
    }

    /// Mean motion in radians per second.
    pub fn mean_motion(&self) -> f64 { (Self::MU_EARTH / self.radius_km.powi(3)).sqrt() }

    /// Argument of latitude at time `t`, in radians.
    #[allow(clippy::cast_precision_loss)]
    fn arg_of_latitude(&self, t: i64) -> f64 {
        (self.phase_deg.to_radians() + self.mean_motion() * t as f64).rem_euclid(TAU)
    }
}

impl PositionSource for CircularOrbit {
    fn position_at(&self, t: i64) -> Result<Vec3D<f64>, EphemerisError> {
        self.check_range(t)?;
        let u = self.arg_of_latitude(t);
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_i, cos_i) = self.inclination_deg.to_radians().sin_cos();
        let (sin_o, cos_o) = self.raan_deg.to_radians().sin_cos();
        let r = self.radius_km;
        let pos = Vec3D::new(
            r * (cos_o * cos_u - sin_o * sin_u * cos_i),
            r * (sin_o * cos_u + cos_o * sin_u * cos_i),
            r * sin_u * sin_i,
        );
        Ok(pos)
    }

    fn valid_range(&self) -> (i64, i64) { self.valid_range }

    fn period_s(&self) -> Option<f64> { Some(TAU / self.mean_motion()) }
}
