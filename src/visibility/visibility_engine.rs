use super::{ground_target::GroundTarget, visibility_window::VisibilityWindow};
use crate::common::{math::EQUATORIAL_PLANET_RADIUS_KM, vec3d::Vec3D};
use crate::orbit::{EphemerisError, PositionSource};
use std::sync::Arc;
use strum_macros::Display;

/// Geometric configurations for which no elevation angle is defined.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The target sits at the planet center, so it has no outward normal.
    DegenerateTarget,
    /// Satellite and target coincide, so there is no line of sight.
    DegenerateSlantVector,
}

impl std::error::Error for GeometryError {}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum VisibilityError {
    Geometry(GeometryError),
    Ephemeris(EphemerisError),
    /// Scan steps must be strictly positive.
    InvalidStep,
    /// The target stayed visible for the whole step bound, a forward scan would not end.
    ScanLimitExceeded { start_t: i64, steps: usize },
    /// The worker evaluating this target did not complete.
    Aborted,
}

impl std::error::Error for VisibilityError {}

impl From<GeometryError> for VisibilityError {
    fn from(value: GeometryError) -> Self { VisibilityError::Geometry(value) }
}

impl From<EphemerisError> for VisibilityError {
    fn from(value: EphemerisError) -> Self { VisibilityError::Ephemeris(value) }
}

/// Tunables of the visibility computation.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct VisibilityConfig {
    /// Slant range below which a target counts as in range, in kilometers.
    ///
    /// Defaults to the planet radius. This is a range cutoff, not a true horizon test.
    pub horizon_range_km: f64,
    /// Minimum elevation angle above the local horizontal, inclusive.
    pub min_elevation_deg: f64,
    /// Time resolution of window scans, in seconds.
    pub step_s: i64,
    /// Step bound for forward scans when the position source has no known period.
    pub max_scan_steps: usize,
    /// Planet rotation applied to targets, zero for planet-fixed position sources.
    pub planet_rotation_rad_s: f64,
    /// Radius used to place targets on the surface, in kilometers.
    pub target_radius_km: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            horizon_range_km: EQUATORIAL_PLANET_RADIUS_KM,
            min_elevation_deg: 10.0,
            step_s: 10,
            max_scan_steps: 100_000,
            planet_rotation_rad_s: 0.0,
            target_radius_km: EQUATORIAL_PLANET_RADIUS_KM,
        }
    }
}

/// Elevation of the satellite above the local horizontal plane at `target`, in degrees.
///
/// Computed as `90° - angle(slant, outward_normal)` where `slant` points from the target
/// to the satellite and the outward normal points from the planet center through the target.
///
/// # Errors
/// - [`GeometryError::DegenerateTarget`] if `target` is the origin.
/// - [`GeometryError::DegenerateSlantVector`] if satellite and target coincide.
pub fn elevation_deg(sat_pos: Vec3D<f64>, target_pos: Vec3D<f64>) -> Result<f64, GeometryError> {
    let normal = target_pos.normalize().ok_or(GeometryError::DegenerateTarget)?;
    let slant = target_pos.to(&sat_pos);
    let cos_zenith = slant.cos_angle_to(&normal).ok_or(GeometryError::DegenerateSlantVector)?;
    Ok(90.0 - cos_zenith.acos().to_degrees())
}

/// Point-in-time visibility: slant range below `horizon_range_km` and elevation of at
/// least `min_elevation_deg` (inclusive).
pub fn is_visible(
    sat_pos: Vec3D<f64>,
    target_pos: Vec3D<f64>,
    min_elevation_deg: f64,
    horizon_range_km: f64,
) -> Result<bool, GeometryError> {
    let elevation = elevation_deg(sat_pos, target_pos)?;
    let slant_range = target_pos.to(&sat_pos).abs();
    Ok(slant_range < horizon_range_km && elevation >= min_elevation_deg)
}

/// Evaluates visibility of a single ground target from a satellite position source.
#[derive(Clone)]
pub struct VisibilityEngine {
    source: Arc<dyn PositionSource>,
    target: GroundTarget,
    config: VisibilityConfig,
}

impl VisibilityEngine {
    pub fn new(source: Arc<dyn PositionSource>, target: GroundTarget, config: VisibilityConfig) -> Self {
        Self { source, target, config }
    }

    pub fn target(&self) -> &GroundTarget { &self.target }

    /// Visibility of the target at time `t` for the given elevation mask.
    pub fn visible_at(&self, t: i64, min_elevation_deg: f64) -> Result<bool, VisibilityError> {
        let sat_pos = self.source.position_at(t)?;
        let target_pos = self.target.position_at(t);
        Ok(is_visible(sat_pos, target_pos, min_elevation_deg, self.config.horizon_range_km)?)
    }

    /// Extends visibility at `start_t` into the maximal contiguous window starting there.
    ///
    /// Steps forward by `step` while the target stays visible. The window never looks
    /// backward from `start_t`. The number of steps is bounded by one orbital period of the
    /// source, or by `max_scan_steps` for sources without a known period.
    ///
    /// # Returns
    /// - A visible window `[start_t, start_t + k * step]`, or a not-visible window of length 0.
    ///
    /// # Errors
    /// - [`VisibilityError::ScanLimitExceeded`] if the target never leaves visibility within the bound.
    /// - Geometry and ephemeris failures of any evaluated sample.
    pub fn compute_window(
        &self,
        start_t: i64,
        step: i64,
        min_elevation_deg: f64,
    ) -> Result<VisibilityWindow, VisibilityError> {
        if step <= 0 {
            return Err(VisibilityError::InvalidStep);
        }
        if !self.visible_at(start_t, min_elevation_deg)? {
            return Ok(VisibilityWindow::not_visible(self.target.id(), start_t));
        }
        let max_steps = self.step_bound(step);
        let (end, exhausted) = self.scan_forward(start_t, step, min_elevation_deg, max_steps)?;
        if exhausted {
            return Err(VisibilityError::ScanLimitExceeded { start_t, steps: max_steps });
        }
        Ok(VisibilityWindow::new(self.target.id(), start_t, end))
    }

    /// Collects all visibility windows with sample times in `[from, to]`, clipped to `to`.
    pub fn windows_in(
        &self,
        from: i64,
        to: i64,
        step: i64,
        min_elevation_deg: f64,
    ) -> Result<Vec<VisibilityWindow>, VisibilityError> {
        if step <= 0 {
            return Err(VisibilityError::InvalidStep);
        }
        let mut windows = Vec::new();
        let mut t = from;
        while t <= to {
            if self.visible_at(t, min_elevation_deg)? {
                // t <= to here, so the quotient is never negative
                let steps_left = usize::try_from((to - t) / step).unwrap_or_default();
                let (end, _) = self.scan_forward(t, step, min_elevation_deg, steps_left)?;
                windows.push(VisibilityWindow::new(self.target.id(), t, end));
                t = end;
            }
            t += step;
        }
        Ok(windows)
    }

    /// Advances from a visible `start_t` while visibility holds, for at most `max_steps` steps.
    ///
    /// # Returns
    /// - The last visible sample time and whether the step budget ran out while still visible.
    fn scan_forward(
        &self,
        start_t: i64,
        step: i64,
        min_elevation_deg: f64,
        max_steps: usize,
    ) -> Result<(i64, bool), VisibilityError> {
        let mut end = start_t;
        for _ in 0..max_steps {
            let next = end + step;
            if !self.visible_at(next, min_elevation_deg)? {
                return Ok((end, false));
            }
            end = next;
        }
        Ok((end, true))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn step_bound(&self, step: i64) -> usize {
        match self.source.period_s() {
            Some(period) if period.is_finite() && period > 0.0 => {
                (period / step as f64).ceil() as usize
            }
            _ => self.config.max_scan_steps,
        }
    }
}
