//! Coordinate transformation utilities for orbital sampling

use chrono::{DateTime, Utc};
use glam::DVec3;

/// Mean Earth radius in meters, spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geodetic position: longitude/latitude in radians, altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub longitude_rad: f64,
    pub latitude_rad: f64,
    pub altitude_m: f64,
}

impl Geodetic {
    pub fn new(longitude_rad: f64, latitude_rad: f64, altitude_m: f64) -> Self {
        Self {
            longitude_rad,
            latitude_rad,
            altitude_m,
        }
    }

    /// Earth-fixed Cartesian position in meters.
    pub fn to_cartesian(&self) -> DVec3 {
        let r = EARTH_RADIUS_M + self.altitude_m;
        let (sin_lat, cos_lat) = self.latitude_rad.sin_cos();
        let (sin_lon, cos_lon) = self.longitude_rad.sin_cos();
        DVec3::new(r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat)
    }
}

/// Approximate GMST (Greenwich Mean Sidereal Time) for visualization
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let secs = t.timestamp() as f64 + (t.timestamp_subsec_nanos() as f64) * 1e-9;
    let omega = std::f64::consts::TAU / 86164.0905_f64;
    (secs * omega).rem_euclid(std::f64::consts::TAU)
}

/// Rotate ECI (TEME) -> ECEF using simple GMST rotation about Z
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}

/// Geodetic position from an ECEF vector in kilometers (spherical Earth).
pub fn ecef_km_to_geodetic(ecef: DVec3) -> Geodetic {
    let r_m = ecef.length() * 1000.0;
    let unit = ecef.normalize_or_zero();
    Geodetic {
        longitude_rad: unit.y.atan2(unit.x),
        latitude_rad: unit.z.clamp(-1.0, 1.0).asin(),
        altitude_m: r_m - EARTH_RADIUS_M,
    }
}

/// Cartesian positions (meters) from a flat lon/lat/alt triple sequence.
/// Trailing elements that do not form a full triple are ignored.
pub fn cartesians_from_flat(flat: &[f64]) -> Vec<DVec3> {
    flat.chunks_exact(3)
        .map(|triple| Geodetic::new(triple[0], triple[1], triple[2]).to_cartesian())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_gmst_rad_range() {
        let test_time = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let gmst = gmst_rad(test_time);

        assert!(gmst >= 0.0);
        assert!(gmst < std::f64::consts::TAU);
    }

    #[test]
    fn test_eci_to_ecef_km() {
        let eci = DVec3::new(1000.0, 0.0, 0.0);
        let ecef = eci_to_ecef_km(eci, 0.0);

        // With no rotation, should be the same
        assert!((ecef.x - 1000.0).abs() < 1e-10);
        assert!(ecef.y.abs() < 1e-10);
        assert!(ecef.z.abs() < 1e-10);

        // A quarter turn moves +X onto -Y in the rotating frame
        let ecef_90 = eci_to_ecef_km(eci, std::f64::consts::FRAC_PI_2);
        assert!(ecef_90.x.abs() < 1e-10);
        assert!((ecef_90.y + 1000.0).abs() < 1e-10);
        assert!(ecef_90.z.abs() < 1e-10);
    }

    #[test]
    fn test_geodetic_cartesian_round_trip() {
        let g = Geodetic::new(0.5, -0.3, 420_000.0);
        let cart = g.to_cartesian();
        let back = ecef_km_to_geodetic(cart / 1000.0);

        assert!((back.longitude_rad - g.longitude_rad).abs() < 1e-9);
        assert!((back.latitude_rad - g.latitude_rad).abs() < 1e-9);
        assert!((back.altitude_m - g.altitude_m).abs() < 1e-3);
    }

    #[test]
    fn test_geodetic_poles() {
        let north = Geodetic::new(0.0, std::f64::consts::FRAC_PI_2, 0.0).to_cartesian();
        assert!(north.x.abs() < 1e-6);
        assert!(north.y.abs() < 1e-6);
        assert!((north.z - EARTH_RADIUS_M).abs() < 1e-6);
    }

    #[test]
    fn test_cartesians_from_flat_ignores_partial_triple() {
        let flat = [0.0, 0.0, 0.0, 1.0, 1.0];
        let points = cartesians_from_flat(&flat);
        assert_eq!(points.len(), 1, "partial trailing triple must be dropped");
    }
}
