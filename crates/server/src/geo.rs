//! Geofence evaluation.
//!
//! Zones are circles: a centre point plus a radius in meters. A submitted
//! location is inside a zone when its great-circle distance to the centre is
//! at or under the radius. Zone order matters: when zones overlap, the first
//! match in store order wins, so one alert fires per submission.

use serde::Serialize;

/// Mean Earth radius in meters, used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A circular geofence zone.
///
/// Serializes to the wire shape the dashboard map expects
/// (`name`/`lat`/`lon`/`radius`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    /// Zone name, echoed in alert messages.
    pub name: String,
    /// Centre latitude in degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Centre longitude in degrees.
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Radius in meters.
    #[serde(rename = "radius")]
    pub radius_m: f64,
}

/// Great-circle distance in meters between two coordinates, via haversine.
///
/// Accurate to well under a meter at geofence scales, which is far tighter
/// than consumer GPS accuracy.
#[must_use]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// The first zone in `zones` containing the point, if any.
///
/// A point exactly on a zone's boundary counts as inside.
#[must_use]
pub fn find_containing_zone(latitude: f64, longitude: f64, zones: &[Zone]) -> Option<&Zone> {
    zones.iter().find(|zone| {
        haversine_distance(latitude, longitude, zone.latitude, zone.longitude) <= zone.radius_m
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn zone(name: &str, lat: f64, lon: f64, radius_m: f64) -> Zone {
        Zone {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            radius_m,
        }
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let d = haversine_distance(48.8566, 2.3522, 48.8566, 2.3522);
        assert!(d.abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_one_degree_on_equator() {
        // One degree of longitude on the equator is R * pi / 180 meters.
        let d = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_194.926_644_558_73).abs() < 0.01);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = haversine_distance(52.52, 13.405, 48.8566, 2.3522);
        let back = haversine_distance(48.8566, 2.3522, 52.52, 13.405);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn test_point_inside_zone() {
        let zones = vec![zone("HQ", 48.8566, 2.3522, 500.0)];
        // ~150m from the centre
        let hit = find_containing_zone(48.8566, 2.3542, &zones);
        assert_eq!(hit.map(|z| z.name.as_str()), Some("HQ"));
    }

    #[test]
    fn test_point_outside_all_zones() {
        let zones = vec![
            zone("HQ", 48.8566, 2.3522, 500.0),
            zone("Depot", 48.86, 2.34, 200.0),
        ];
        assert!(find_containing_zone(51.5074, -0.1278, &zones).is_none());
    }

    #[test]
    fn test_no_zones_no_match() {
        assert!(find_containing_zone(48.8566, 2.3522, &[]).is_none());
    }

    #[test]
    fn test_boundary_point_is_inside() {
        // Radius set to the exact distance: on-the-line counts as inside.
        let d = haversine_distance(0.0, 0.0, 0.0, 1.0);
        let zones = vec![zone("Edge", 0.0, 0.0, d)];
        assert!(find_containing_zone(0.0, 1.0, &zones).is_some());
    }

    #[test]
    fn test_first_zone_wins_on_overlap() {
        let zones = vec![
            zone("Inner", 0.0, 0.0, 1000.0),
            zone("Outer", 0.0, 0.0, 5000.0),
        ];
        let hit = find_containing_zone(0.0, 0.0, &zones).unwrap();
        assert_eq!(hit.name, "Inner");

        let reversed: Vec<Zone> = zones.into_iter().rev().collect();
        let hit = find_containing_zone(0.0, 0.0, &reversed).unwrap();
        assert_eq!(hit.name, "Outer");
    }

    #[test]
    fn test_zone_serializes_to_map_shape() {
        let value = serde_json::to_value(zone("HQ", 48.8566, 2.3522, 500.0)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "HQ", "lat": 48.8566, "lon": 2.3522, "radius": 500.0 })
        );
    }
}
