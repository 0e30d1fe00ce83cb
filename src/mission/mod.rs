mod imaging_request;
mod satellite;
mod validation;

pub use imaging_request::ImagingRequest;
pub use satellite::SatelliteSpec;
pub use validation::{ValidationError, validate_requests};
