use super::imaging_request::ImagingRequest;
use crate::warn;
use std::collections::HashSet;
use strum_macros::Display;

/// Reasons a satellite record or an imaging request is rejected before model construction.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ValidationError {
    NonPositiveArea,
    EmptyTimeWindow,
    NonPositivePriority,
    InvalidCoordinate,
    DuplicateRequestId,
    NonPositiveSatelliteParameter(&'static str),
    NegativeRecalibration,
}

impl std::error::Error for ValidationError {}

/// Splits a request batch into valid requests and per-request validation failures.
///
/// A failing request never affects the others. Requests sharing an identifier with an
/// earlier valid request are rejected as [`ValidationError::DuplicateRequestId`].
///
/// # Returns
/// - `(valid, rejected)` where `rejected` holds `(request id, error)` pairs in input order.
pub fn validate_requests(
    requests: &[ImagingRequest],
) -> (Vec<ImagingRequest>, Vec<(String, ValidationError)>) {
    let mut seen = HashSet::new();
    let mut valid = Vec::with_capacity(requests.len());
    let mut rejected = Vec::new();
    for req in requests {
        let res = req.validate().and_then(|()| {
            if seen.insert(req.id()) { Ok(()) } else { Err(ValidationError::DuplicateRequestId) }
        });
        match res {
            Ok(()) => valid.push(req.clone()),
            Err(e) => {
                warn!("Rejecting request {}: {e}", req.id());
                rejected.push((req.id().to_string(), e));
            }
        }
    }
    (valid, rejected)
}
