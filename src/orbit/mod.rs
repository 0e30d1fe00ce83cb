mod circular_orbit;
mod position_source;
mod sampled_ephemeris;

pub use circular_orbit::CircularOrbit;
pub use position_source::{EphemerisError, PositionSource};
pub use sampled_ephemeris::SampledEphemeris;
