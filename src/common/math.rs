use super::vec3d::Vec3D;

/// Mean planetary radius used for surface (great-circle) distances, in kilometers.
pub const MEAN_PLANET_RADIUS_KM: f64 = 6371.0;

/// Equatorial planetary radius used for target placement and the default horizon range, in kilometers.
pub const EQUATORIAL_PLANET_RADIUS_KM: f64 = 6378.0;

/// Computes the great-circle surface distance between two geographic coordinates
/// using the haversine formula on a sphere of radius [`MEAN_PLANET_RADIUS_KM`].
///
/// # Arguments
/// - `a`: First coordinate as `(latitude_deg, longitude_deg)`.
/// - `b`: Second coordinate as `(latitude_deg, longitude_deg)`.
///
/// # Returns
/// - The surface distance in kilometers. Symmetric in its arguments.
pub fn great_circle_distance_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h marginally above 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    c * MEAN_PLANET_RADIUS_KM
}

/// Converts a geographic coordinate on a sphere into planet-centered cartesian coordinates.
///
/// # Arguments
/// - `lat_deg`: Latitude in degrees, positive north.
/// - `lon_deg`: Longitude in degrees, positive east.
/// - `radius`: Sphere radius, output is in the same unit.
pub fn geodetic_to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3D<f64> {
    let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
    Vec3D::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    )
}

/// Returns the smallest `f64` strictly greater than `value` (for finite, non-NaN input).
pub fn next_up(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        return value;
    }
    if value == 0.0 {
        return f64::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 { f64::from_bits(bits + 1) } else { f64::from_bits(bits - 1) }
}
