use proptest::prelude::*;
use tsunami_evac::common::{DomainError, GeoCoord, PlanarCoord};
use tsunami_evac::domains::projection::{Proj4Projection, Projection, ProjectionBounds, DEFAULT_PROJ_DEFINITION};

const CENTRAL_MERIDIAN: f64 = -69.0;

fn zone_19_south() -> Proj4Projection {
    Proj4Projection::new(DEFAULT_PROJ_DEFINITION, ProjectionBounds::default()).unwrap()
}

#[test]
fn test_plaza_victoria_round_trip() {
    let projection = zone_19_south();
    let plaza = GeoCoord::new(-33.0446605, -71.6235577);

    let planar = projection.to_planar(plaza).unwrap();
    let back = projection.to_geo(planar).unwrap();

    assert!((back.lat - plaza.lat).abs() < 1e-8, "lat {} vs {}", back.lat, plaza.lat);
    assert!((back.lon - plaza.lon).abs() < 1e-8, "lon {} vs {}", back.lon, plaza.lon);
}

#[test]
fn test_nearby_points_are_metres_apart() {
    let projection = zone_19_south();
    let a = projection.to_planar(GeoCoord::new(-33.0446605, -71.6235577)).unwrap();
    // 0.001° of latitude is roughly 111 m
    let b = projection.to_planar(GeoCoord::new(-33.0436605, -71.6235577)).unwrap();

    let d = a.distance(&b);
    assert!(d > 105.0 && d < 115.0, "distance was {}", d);
    assert!(b.y > a.y, "northing must grow to the north");
}

#[test]
fn test_out_of_domain_coordinates_are_rejected() {
    let projection = zone_19_south();
    let bad = [
        GeoCoord::new(f64::NAN, -71.0),
        GeoCoord::new(-33.0, f64::INFINITY),
        GeoCoord::new(95.0, -71.0),
        GeoCoord::new(-85.0, -71.0),
        GeoCoord::new(48.85, 2.35),
        GeoCoord::new(-33.0, -80.0),
    ];
    for geo in bad {
        match projection.to_planar(geo) {
            Err(DomainError::InvalidCoordinate { .. }) => {}
            other => panic!("expected InvalidCoordinate for {:?}, got {:?}", geo, other),
        }
    }
}

#[test]
fn test_non_finite_planar_is_rejected() {
    let projection = zone_19_south();
    assert!(matches!(
        projection.to_geo(PlanarCoord::new(f64::NAN, 6_340_000.0)),
        Err(DomainError::InvalidCoordinate { .. })
    ));
}

#[test]
fn test_planar_far_outside_the_area_is_rejected() {
    let projection = zone_19_south();
    // Far east of the zone: unprojects to a longitude outside the bounds.
    assert!(matches!(
        projection.to_geo(PlanarCoord::new(3_000_000.0, 6_340_000.0)),
        Err(DomainError::InvalidCoordinate { .. })
    ));
}

#[test]
fn test_definition_is_configurable() {
    let stereographic = Proj4Projection::new(
        "+proj=sterea +lat_0=-33.0446605 +lon_0=-71.6235577 +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
        ProjectionBounds::default(),
    )
    .unwrap();
    let origin = stereographic.to_planar(GeoCoord::new(-33.0446605, -71.6235577)).unwrap();
    assert!(origin.x.abs() < 1e-3 && origin.y.abs() < 1e-3, "origin maps to {:?}", origin);
    assert!(stereographic.definition().starts_with("+proj=sterea"));
}

proptest! {
    #[test]
    fn property_round_trip_within_zone(lat in -60.0_f64..60.0, lon_offset in -3.0_f64..3.0) {
        let projection = zone_19_south();
        let geo = GeoCoord::new(lat, CENTRAL_MERIDIAN + lon_offset);

        let back = projection.to_geo(projection.to_planar(geo).unwrap()).unwrap();

        prop_assert!((back.lat - geo.lat).abs() < 1e-7);
        prop_assert!((back.lon - geo.lon).abs() < 1e-7);
    }
}
