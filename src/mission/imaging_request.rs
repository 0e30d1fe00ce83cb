use super::validation::ValidationError;

/// A single imaging request for a ground target. Immutable once loaded.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct ImagingRequest {
    /// Location label, doubles as the request identifier.
    location: String,
    /// Geographic coordinates as `(latitude_deg, longitude_deg)`.
    coordinates: (f64, f64),
    /// Value of capturing this request, higher is better.
    priority: i64,
    /// Area of the target region in square kilometers.
    area_size_km2: f64,
    /// Closed interval `[start, end]` in which the capture must begin and complete.
    time_window_sec: (i64, i64),
}

impl ImagingRequest {
    pub fn new(
        location: &str,
        coordinates: (f64, f64),
        priority: i64,
        area_size_km2: f64,
        time_window_sec: (i64, i64),
    ) -> Self {
        Self {
            location: location.to_string(),
            coordinates,
            priority,
            area_size_km2,
            time_window_sec,
        }
    }

    pub fn id(&self) -> &str { &self.location }
    pub fn coordinates(&self) -> (f64, f64) { self.coordinates }
    pub fn priority(&self) -> i64 { self.priority }
    pub fn area_km2(&self) -> f64 { self.area_size_km2 }
    pub fn window_start(&self) -> i64 { self.time_window_sec.0 }
    pub fn window_end(&self) -> i64 { self.time_window_sec.1 }
    pub fn window(&self) -> (i64, i64) { self.time_window_sec }

    /// Returns a copy of this request restricted to `window`.
    pub fn with_window(&self, window: (i64, i64)) -> Self {
        Self {
            time_window_sec: window,
            ..self.clone()
        }
    }

    /// Checks the request for values the scheduling model cannot represent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (lat, lon) = self.coordinates;
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(ValidationError::InvalidCoordinate);
        }
        if !(self.area_size_km2 > 0.0 && self.area_size_km2.is_finite()) {
            return Err(ValidationError::NonPositiveArea);
        }
        if self.priority <= 0 {
            return Err(ValidationError::NonPositivePriority);
        }
        if self.time_window_sec.0 > self.time_window_sec.1 {
            return Err(ValidationError::EmptyTimeWindow);
        }
        Ok(())
    }
}
