//! Great-circle distance between two coordinates.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Distance to another coordinate in kilometers.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        calculate_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance in kilometers between two points given in degrees.
///
/// Identical points yield exactly `0.0`.
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAIPEI_101: (f64, f64) = (25.0330, 121.5654);
    const TAIPEI_MAIN_STATION: (f64, f64) = (25.0478, 121.5174);

    #[test]
    fn test_identical_points_are_zero() {
        let d = calculate_distance(TAIPEI_101.0, TAIPEI_101.1, TAIPEI_101.0, TAIPEI_101.1);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_taipei_101_to_main_station() {
        let d = calculate_distance(
            TAIPEI_101.0,
            TAIPEI_101.1,
            TAIPEI_MAIN_STATION.0,
            TAIPEI_MAIN_STATION.1,
        );
        assert!((d - 5.11).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(TAIPEI_101.0, TAIPEI_101.1);
        let b = Coordinate::new(TAIPEI_MAIN_STATION.0, TAIPEI_MAIN_STATION.1);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2 * pi * 6371 / 360
        let d = calculate_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(25.0, 121.0).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
