use super::validation::ValidationError;
use crate::common::math::great_circle_distance_km;

/// Capability record of the imaging satellite.
///
/// All quantities are loaded from configuration. Durations are in seconds,
/// memory in gigabytes, areas in square kilometers.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct SatelliteSpec {
    /// Onboard memory available for captures.
    memory_capacity_gb: f64,
    /// Memory consumed per square kilometer of imaged area.
    image_size_per_km2_gb: f64,
    /// Capture time needed per square kilometer of imaged area.
    image_duration_per_km2_sec: f64,
    /// Upper bound for a single capture.
    max_photo_duration_s: f64,
    /// Fixed instrument overhead between two captures.
    recalibration_time_s: i64,
    /// Characteristic ground speed used as a travel-time proxy.
    speed_kms_per_s: f64,
}

impl SatelliteSpec {
    pub fn new(
        memory_capacity_gb: f64,
        image_size_per_km2_gb: f64,
        image_duration_per_km2_sec: f64,
        max_photo_duration_s: f64,
        recalibration_time_s: i64,
        speed_kms_per_s: f64,
    ) -> Self {
        Self {
            memory_capacity_gb,
            image_size_per_km2_gb,
            image_duration_per_km2_sec,
            max_photo_duration_s,
            recalibration_time_s,
            speed_kms_per_s,
        }
    }

    pub fn memory_capacity_gb(&self) -> f64 { self.memory_capacity_gb }
    pub fn recalibration_s(&self) -> i64 { self.recalibration_time_s }
    pub fn speed_kms(&self) -> f64 { self.speed_kms_per_s }

    /// Checks that every rate and capacity is strictly positive and finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let params = [
            ("memory_capacity_gb", self.memory_capacity_gb),
            ("image_size_per_km2_gb", self.image_size_per_km2_gb),
            ("image_duration_per_km2_sec", self.image_duration_per_km2_sec),
            ("max_photo_duration_s", self.max_photo_duration_s),
            ("speed_kms_per_s", self.speed_kms_per_s),
        ];
        if let Some((name, _)) = params.iter().find(|(_, v)| !(*v > 0.0 && v.is_finite())) {
            return Err(ValidationError::NonPositiveSatelliteParameter(name));
        }
        if self.recalibration_time_s < 0 {
            return Err(ValidationError::NegativeRecalibration);
        }
        Ok(())
    }

    /// Capture duration for a target of `area_km2`, in whole seconds.
    ///
    /// The real-valued duration `min(area * rate, max_duration)` is rounded up so the
    /// integer schedule never reserves less time than the capture needs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn capture_duration_s(&self, area_km2: f64) -> i64 {
        (area_km2 * self.image_duration_per_km2_sec)
            .min(self.max_photo_duration_s)
            .ceil() as i64
    }

    /// Memory consumed by capturing a target of `area_km2`, in gigabytes.
    pub fn memory_usage_gb(&self, area_km2: f64) -> f64 { area_km2 * self.image_size_per_km2_gb }

    /// Travel time between two geographic coordinates in whole seconds (truncated).
    #[allow(clippy::cast_possible_truncation)]
    pub fn travel_time_s(&self, from: (f64, f64), to: (f64, f64)) -> i64 {
        (great_circle_distance_km(from, to) / self.speed_kms_per_s) as i64
    }
}
