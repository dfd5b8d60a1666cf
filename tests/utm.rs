use gridconvert::{angle, geodetic_to_utm, utm_to_geodetic, Error, Hemisphere, LatLon, Utm};

const TOLERANCE: f64 = 1e-5;

fn assert_round_trip(lat: f64, lon: f64) {
    let utm = geodetic_to_utm(lat, lon).unwrap();
    let back = utm_to_geodetic(&utm);

    assert!((back.latitude() - lat).abs() < TOLERANCE, "latitude {lat} came back as {}", back.latitude());
    assert!((back.longitude() - lon).abs() < TOLERANCE, "longitude {lon} came back as {}", back.longitude());

    // Projecting the recovered point again lands on the same grid position
    let again = geodetic_to_utm(back.latitude(), back.longitude()).unwrap();
    assert_eq!(again.zone(), utm.zone());
    assert_eq!(again.hemisphere(), utm.hemisphere());
    assert!((again.easting() - utm.easting()).abs() < 1e-3);
    assert!((again.northing() - utm.northing()).abs() < 1e-3);
}

#[test]
fn forward_inverse_round_trip() {
    for (lat, lon) in [
        (25.0, 35.0),
        (0.0, 0.0),
        (84.0, 5.0),
        (-80.5, 5.0),
        (45.0, 0.0),
        (89.999, 0.0),
        (-89.999, 0.0),
        (-33.856_784, 151.215_297),
        (64.135_338, -21.895_210),
    ] {
        assert_round_trip(lat, lon);
    }
}

#[test]
fn longitude_wraps_at_antimeridian() {
    let back = utm_to_geodetic(&geodetic_to_utm(10.0, 180.0).unwrap());
    assert_eq!(back.longitude(), -180.0);
    assert!((back.latitude() - 10.0).abs() < TOLERANCE);

    let back = utm_to_geodetic(&geodetic_to_utm(10.0, 185.0).unwrap());
    assert!((back.longitude() + 175.0).abs() < TOLERANCE);

    let back = utm_to_geodetic(&geodetic_to_utm(10.0, -190.0).unwrap());
    assert!((back.longitude() - 170.0).abs() < TOLERANCE);
}

#[test]
fn zone_follows_longitude() {
    assert_eq!(geodetic_to_utm(10.0, 180.0).unwrap().zone(), 1);
    assert_eq!(geodetic_to_utm(10.0, 185.0).unwrap().zone(), 1);
    assert_eq!(geodetic_to_utm(10.0, -190.0).unwrap().zone(), 59);
    assert_eq!(geodetic_to_utm(10.0, 179.5).unwrap().zone(), 60);
    // No Norway exception: 60N 5E stays in zone 31
    assert_eq!(geodetic_to_utm(60.0, 5.0).unwrap().zone(), 31);
}

#[test]
fn equator_and_hemispheres() {
    let utm = geodetic_to_utm(0.0, 3.0).unwrap();
    assert_eq!(utm.hemisphere(), Hemisphere::North);
    assert!((utm.easting() - 500_000.0).abs() < 1e-6);
    assert!(utm.northing().abs() < 1e-6);

    let utm = geodetic_to_utm(-1e-9, 3.0).unwrap();
    assert_eq!(utm.hemisphere(), Hemisphere::South);
    assert!((utm.northing() - 10_000_000.0).abs() < 1e-3);
}

#[test]
fn known_utm_values() {
    let lat = angle::parse_latitude("42°16'8.32\"N").unwrap();
    let lon = angle::parse_longitude("123°17'12.23\"E").unwrap();

    let utm = geodetic_to_utm(lat, lon).unwrap();

    assert_eq!(utm.zone(), 51);
    assert_eq!(utm.hemisphere(), Hemisphere::North);
    assert!((utm.northing() - 4_679_681.018).abs() < 1e-3, "northing {}", utm.northing());
    assert!((utm.easting() - 523_646.086).abs() < 1e-3, "easting {}", utm.easting());
}

#[test]
fn known_values_from_parsed_pair() {
    let coord: LatLon = "42°16'8.32\"N 123°17'12.23\"E".parse().unwrap();
    let utm = coord.to_utm();

    assert_eq!(utm.zone(), 51);
    assert!((utm.northing() - 4_679_681.018).abs() < 1e-3);
    assert!((utm.easting() - 523_646.086).abs() < 1e-3);
}

#[test]
fn explicit_origin_inverts() {
    let utm = Utm::create(17, Hemisphere::North, 0.0, 0.0).unwrap();
    let coord = utm_to_geodetic(&utm);

    assert!(coord.latitude().abs() < 1e-9);
    // Half a million meters west of the central meridian at -81
    assert!(coord.longitude() < -85.0 && coord.longitude() > -86.0);

    let back = Utm::from_latlon_in_zone(&coord, 17).unwrap();
    assert!(back.easting().abs() < 1e-3);
    assert!(back.northing().abs() < 1e-3);
}

#[test]
fn explicit_zone_matches_standard_zone_inside_it() {
    let coord = LatLon::create(45.0, 0.0).unwrap();
    assert_eq!(Utm::from_latlon_in_zone(&coord, 31).unwrap(), coord.to_utm());

    let neighbour = Utm::from_latlon_in_zone(&coord, 30).unwrap();
    assert_eq!(neighbour.zone(), 30);
    let back = neighbour.to_latlon();
    assert!((back.latitude() - 45.0).abs() < 1e-9);
    assert!(back.longitude().abs() < 1e-9);
}

#[test]
fn invalid_input_is_rejected() {
    assert!(matches!(geodetic_to_utm(90.5, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(geodetic_to_utm(-91.0, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(geodetic_to_utm(f64::NAN, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(geodetic_to_utm(0.0, f64::INFINITY), Err(Error::InvalidCoord(_))));

    assert!(matches!(Utm::create(0, Hemisphere::North, 500_000.0, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(61, Hemisphere::North, 500_000.0, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(17, Hemisphere::North, -0.5, 0.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(17, Hemisphere::South, 500_000.0, -200_000.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(17, Hemisphere::South, 500_000.0, 10_500_000.0), Err(Error::InvalidCoord(_))));

    let coord = LatLon::create(45.0, 0.0).unwrap();
    assert!(matches!(Utm::from_latlon_in_zone(&coord, 0), Err(Error::InvalidCoord(_))));
}

#[test]
fn negative_northings_are_rejected_in_both_hemispheres() {
    assert!(matches!(Utm::create(17, Hemisphere::North, 500_000.0, -1.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(17, Hemisphere::South, 500_000.0, -1.0), Err(Error::InvalidCoord(_))));
    assert!(matches!(Utm::create(17, Hemisphere::South, 500_000.0, -50_000.0), Err(Error::InvalidCoord(_))));
    // Would otherwise invert to a southern latitude while labelled North
    assert!(matches!(Utm::create(17, Hemisphere::North, 500_000.0, -5_000_000.0), Err(Error::InvalidCoord(_))));

    assert!(Utm::create(17, Hemisphere::North, 500_000.0, 0.0).is_ok());
    assert!(Utm::create(17, Hemisphere::South, 500_000.0, 0.0).is_ok());
}

#[test]
fn projected_points_pass_validation() {
    for (lat, lon) in [(89.999, 0.0), (-89.999, 0.0), (0.0, 180.0), (-1e-9, 3.0), (84.0, 5.0)] {
        let utm = geodetic_to_utm(lat, lon).unwrap();
        assert_eq!(
            Utm::create(utm.zone(), utm.hemisphere(), utm.easting(), utm.northing()).unwrap(),
            utm,
        );
    }
}
