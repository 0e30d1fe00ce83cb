use super::{
    ground_target::GroundTarget,
    visibility_engine::{VisibilityConfig, VisibilityEngine, VisibilityError},
    visibility_window::VisibilityWindow,
};
use crate::mission::{ImagingRequest, SatelliteSpec};
use crate::orbit::PositionSource;
use crate::{error, info, log};
use futures::future::join_all;
use std::sync::Arc;
use strum_macros::Display;

/// Why the visibility pre-filter dropped a request.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum FilterRejection {
    /// The target is never visible inside the request's time window.
    NotVisible,
    /// The target is visible, but no single window is long enough for the capture.
    NoWindowFitsCapture,
    /// Visibility could not be evaluated for this request.
    Failed(VisibilityError),
}

/// Outcome of pre-filtering a request batch.
#[derive(Debug, Default)]
pub struct FilterReport {
    /// Admitted requests, their time windows narrowed to a visible sub-window.
    pub admitted: Vec<ImagingRequest>,
    /// Dropped requests by identifier, in input order.
    pub rejected: Vec<(String, FilterRejection)>,
}

/// Restricts requests to the parts of their time windows in which the target is visible.
///
/// Each request is evaluated independently on the blocking pool. A failure for one
/// request is reported for that request alone.
#[derive(Clone)]
pub struct VisibilityFilter {
    source: Arc<dyn PositionSource>,
    config: VisibilityConfig,
}

impl VisibilityFilter {
    pub fn new(source: Arc<dyn PositionSource>, config: VisibilityConfig) -> Self {
        Self { source, config }
    }

    /// Pre-filters `requests` against the visibility of their targets.
    pub async fn apply(&self, satellite: &SatelliteSpec, requests: Vec<ImagingRequest>) -> FilterReport {
        log!("Pre-filtering {} requests for visibility.", requests.len());
        let ids: Vec<String> = requests.iter().map(|r| r.id().to_string()).collect();
        let handles = requests.into_iter().map(|req| {
            let duration = satellite.capture_duration_s(req.area_km2());
            let filter = self.clone();
            tokio::task::spawn_blocking(move || filter.admit(&req, duration))
        });
        let mut report = FilterReport::default();
        for (id, joined) in ids.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(narrowed)) => report.admitted.push(narrowed),
                Ok(Err(reason)) => {
                    log!("Request {id} dropped by visibility pre-filter: {reason}");
                    report.rejected.push((id, reason));
                }
                Err(e) => {
                    error!("Visibility worker for request {id} failed: {e}");
                    report.rejected.push((id, FilterRejection::Failed(VisibilityError::Aborted)));
                }
            }
        }
        info!(
            "Visibility pre-filter admitted {} and rejected {} requests.",
            report.admitted.len(),
            report.rejected.len()
        );
        report
    }

    /// Narrows `req` to its longest visible window that can hold a capture of `duration`.
    ///
    /// Ties are resolved in favor of the earliest window.
    pub fn admit(&self, req: &ImagingRequest, duration: i64) -> Result<ImagingRequest, FilterRejection> {
        let windows = self.windows_for(req).map_err(FilterRejection::Failed)?;
        if windows.is_empty() {
            return Err(FilterRejection::NotVisible);
        }
        let best = windows
            .iter()
            .filter(|w| w.fits(duration))
            .fold(None::<&VisibilityWindow>, |best, w| match best {
                Some(b) if b.len() >= w.len() => Some(b),
                _ => Some(w),
            });
        best.map(|w| req.with_window(w.interval())).ok_or(FilterRejection::NoWindowFitsCapture)
    }

    /// All visibility windows of the request's target inside its time window.
    pub fn windows_for(&self, req: &ImagingRequest) -> Result<Vec<VisibilityWindow>, VisibilityError> {
        let target = GroundTarget::from_request(
            req,
            self.config.target_radius_km,
            self.config.planet_rotation_rad_s,
        );
        let engine = VisibilityEngine::new(Arc::clone(&self.source), target, self.config);
        engine.windows_in(
            req.window_start(),
            req.window_end(),
            self.config.step_s,
            self.config.min_elevation_deg,
        )
    }
}
