use super::position_source::{EphemerisError, PositionSource};
use crate::common::vec3d::Vec3D;

/// Position source backed by equally spaced position samples from an external propagator.
///
/// Positions between samples are linearly interpolated.
#[derive(Debug, Clone)]
pub struct SampledEphemeris {
    epoch: i64,
    step_s: i64,
    samples: Box<[Vec3D<f64>]>,
    period_s: Option<f64>,
}

impl SampledEphemeris {
    /// Creates a new sample table starting at `epoch` with `step_s` seconds between samples.
    ///
    /// # Errors
    /// - [`EphemerisError::InvalidSampling`] for an empty table or a non-positive step.
    /// - [`EphemerisError::NonFinitePosition`] if any sample is not finite.
    pub fn new(
        epoch: i64,
        step_s: i64,
        samples: Vec<Vec3D<f64>>,
        period_s: Option<f64>,
    ) -> Result<Self, EphemerisError> {
        if samples.is_empty() || step_s <= 0 {
            return Err(EphemerisError::InvalidSampling);
        }
        let bad_sample = samples
            .iter()
            .position(|p| !(p.x().is_finite() && p.y().is_finite() && p.z().is_finite()));
        if let Some(i) = bad_sample {
            let t = epoch + step_s * i64::try_from(i).unwrap_or(i64::MAX / step_s);
            return Err(EphemerisError::NonFinitePosition { t });
        }
        Ok(Self {
            epoch,
            step_s,
            samples: samples.into_boxed_slice(),
            period_s,
        })
    }

    /// Samples `source` every `step_s` seconds over its whole valid range.
    pub fn from_source(source: &dyn PositionSource, step_s: i64) -> Result<Self, EphemerisError> {
        if step_s <= 0 {
            return Err(EphemerisError::InvalidSampling);
        }
        let (from, to) = source.valid_range();
        let samples = (from..=to)
            .step_by(usize::try_from(step_s).map_err(|_| EphemerisError::InvalidSampling)?)
            .map(|t| source.position_at(t))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(from, step_s, samples, source.period_s())
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
}

impl PositionSource for SampledEphemeris {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn position_at(&self, t: i64) -> Result<Vec3D<f64>, EphemerisError> {
        self.check_range(t)?;
        let offset = t - self.epoch;
        let idx = (offset / self.step_s) as usize;
        let rem = offset % self.step_s;
        let first = self.samples[idx];
        if rem == 0 {
            return Ok(first);
        }
        let second = self.samples[idx + 1];
        let frac = rem as f64 / self.step_s as f64;
        Ok(first + (second - first) * frac)
    }

    fn valid_range(&self) -> (i64, i64) {
        let last = i64::try_from(self.samples.len() - 1).unwrap_or(i64::MAX);
        (self.epoch, self.epoch.saturating_add(last.saturating_mul(self.step_s)))
    }

    fn period_s(&self) -> Option<f64> { self.period_s }
}
