use crate::common::{math::geodetic_to_cartesian, vec3d::Vec3D};
use crate::mission::ImagingRequest;

/// A ground target placed on the planet surface in the planet-centered frame.
///
/// With a non-zero `rotation_rad_s` the target rotates with the planet about the z axis,
/// for use with position sources expressed in an inertial frame.
#[derive(Debug, Clone)]
pub struct GroundTarget {
    id: String,
    /// Position at `t = 0`.
    base_pos: Vec3D<f64>,
    rotation_rad_s: f64,
}

impl GroundTarget {
    pub fn new(id: &str, base_pos: Vec3D<f64>, rotation_rad_s: f64) -> Self {
        Self {
            id: id.to_string(),
            base_pos,
            rotation_rad_s,
        }
    }

    /// Places the target of `request` on a sphere of `radius_km`.
    pub fn from_request(request: &ImagingRequest, radius_km: f64, rotation_rad_s: f64) -> Self {
        let (lat, lon) = request.coordinates();
        Self::new(request.id(), geodetic_to_cartesian(lat, lon, radius_km), rotation_rad_s)
    }

    pub fn id(&self) -> &str { &self.id }

    /// Target position at time `t`.
    #[allow(clippy::cast_precision_loss)]
    pub fn position_at(&self, t: i64) -> Vec3D<f64> {
        if self.rotation_rad_s == 0.0 {
            self.base_pos
        } else {
            self.base_pos.rotate_z(self.rotation_rad_s * t as f64)
        }
    }
}
