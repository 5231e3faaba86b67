//! crates/interntrack_core/src/geofence.rs
//!
//! Great-circle distance and the office radius check used to validate in-office check-ins.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Radius used when none is configured.
pub const DEFAULT_RADIUS_M: f64 = 150.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the WGS84 coordinate ranges.
    pub fn is_well_formed(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Office location and geofence radius, supplied by configuration at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfficeConfig {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
}

impl OfficeConfig {
    pub fn new(lat: f64, lng: f64, radius_m: f64) -> Self {
        Self { lat, lng, radius_m }
    }

    /// A zero coordinate means the office location was never set.
    pub fn is_configured(&self) -> bool {
        self.lat != 0.0 && self.lng != 0.0
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_RADIUS_M)
    }
}

/// The result of a geofence check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceOutcome {
    pub validated: bool,
    pub distance_m: Option<f64>,
}

impl GeofenceOutcome {
    pub const UNVALIDATED: GeofenceOutcome = GeofenceOutcome {
        validated: false,
        distance_m: None,
    };
}

/// Haversine distance in metres between two points.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Measures `point` against `center`; the radius bound is inclusive.
pub fn check_distance(point: GeoPoint, center: GeoPoint, radius_m: f64) -> GeofenceOutcome {
    let distance = haversine_m(point, center);
    GeofenceOutcome {
        validated: distance <= radius_m,
        distance_m: Some(distance),
    }
}

/// Decides whether a check-in claim is credible.
///
/// Nothing is measured unless the intern claims to be in the office, both coordinates are
/// present and well formed, and the office location is configured. Any other combination is
/// simply not validated; it is never an error.
pub fn validate(
    claimed_in_office: bool,
    lat: Option<f64>,
    lng: Option<f64>,
    office: &OfficeConfig,
) -> GeofenceOutcome {
    if !claimed_in_office || !office.is_configured() {
        return GeofenceOutcome::UNVALIDATED;
    }
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return GeofenceOutcome::UNVALIDATED;
    };
    let point = GeoPoint::new(lat, lng);
    if !point.is_well_formed() || !office.location().is_well_formed() {
        return GeofenceOutcome::UNVALIDATED;
    }
    check_distance(point, office.location(), office.radius_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_north_of(origin: GeoPoint, metres: f64) -> GeoPoint {
        GeoPoint::new(origin.lat + (metres / EARTH_RADIUS_M).to_degrees(), origin.lng)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(27.7, 85.3);
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let p = GeoPoint::new(27.7172, 85.3240);
        let q = GeoPoint::new(27.6710, 85.4298);
        assert!((haversine_m(p, q) - haversine_m(q, p)).abs() < 1e-9);
    }

    #[test]
    fn point_roughly_150m_east_of_origin() {
        let origin = GeoPoint::new(0.0, 0.0);
        let east = GeoPoint::new(0.0, 0.00135);
        let distance = haversine_m(origin, east);
        assert!((distance - 150.11).abs() < 0.05, "got {}", distance);

        for radius in [100.0, 150.0, 150.2, 500.0] {
            let outcome = check_distance(east, origin, radius);
            assert_eq!(outcome.validated, radius >= distance);
            assert_eq!(outcome.distance_m, Some(distance));
        }
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let office = GeoPoint::new(27.7, 85.3);
        let point = point_north_of(office, 150.0);
        let distance = haversine_m(point, office);
        assert!((distance - 150.0).abs() < 1e-6);

        assert!(check_distance(point, office, distance).validated);
        assert!(!check_distance(point, office, distance - 1e-6).validated);
    }

    #[test]
    fn not_claimed_skips_measurement() {
        let office = OfficeConfig::new(27.7, 85.3, 150.0);
        let outcome = validate(false, Some(27.7), Some(85.3), &office);
        assert_eq!(outcome, GeofenceOutcome::UNVALIDATED);
    }

    #[test]
    fn unconfigured_office_never_validates() {
        let office = OfficeConfig::default();
        assert_eq!(
            validate(true, Some(0.0), Some(0.0), &office),
            GeofenceOutcome::UNVALIDATED
        );
        let half_configured = OfficeConfig::new(27.7, 0.0, 150.0);
        assert_eq!(
            validate(true, Some(27.7), Some(0.0), &half_configured),
            GeofenceOutcome::UNVALIDATED
        );
    }

    #[test]
    fn missing_or_malformed_coordinates_are_not_validated() {
        let office = OfficeConfig::new(27.7, 85.3, 150.0);
        assert_eq!(validate(true, None, Some(85.3), &office), GeofenceOutcome::UNVALIDATED);
        assert_eq!(validate(true, Some(27.7), None, &office), GeofenceOutcome::UNVALIDATED);
        assert_eq!(
            validate(true, Some(f64::NAN), Some(85.3), &office),
            GeofenceOutcome::UNVALIDATED
        );
        assert_eq!(
            validate(true, Some(127.7), Some(85.3), &office),
            GeofenceOutcome::UNVALIDATED
        );
    }

    #[test]
    fn claimed_check_in_inside_and_outside_radius() {
        let office = OfficeConfig::new(27.7, 85.3, 150.0);
        let near = point_north_of(office.location(), 40.0);
        let far = point_north_of(office.location(), 400.0);

        let inside = validate(true, Some(near.lat), Some(near.lng), &office);
        assert!(inside.validated);
        assert!((inside.distance_m.unwrap() - 40.0).abs() < 1e-6);

        let outside = validate(true, Some(far.lat), Some(far.lng), &office);
        assert!(!outside.validated);
        assert!((outside.distance_m.unwrap() - 400.0).abs() < 1e-6);
    }
}
