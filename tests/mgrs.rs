use gridconvert::{geodetic_to_mgrs, geodetic_to_utm, mgrs_to_geodetic, Error, Hemisphere, LatLon, Mgrs, Utm};

fn assert_near(coord: &LatLon, lat: f64, lon: f64, tolerance: f64) {
    assert!(
        (coord.latitude() - lat).abs() < tolerance && (coord.longitude() - lon).abs() < tolerance,
        "{coord} is not within {tolerance} of {lat} {lon}",
    );
}

fn reencode(coord: &LatLon, precision: i32) -> String {
    let utm = geodetic_to_utm(coord.latitude(), coord.longitude()).unwrap();
    geodetic_to_mgrs(&utm, precision).unwrap()
}

#[test]
fn full_precision_round_trip() {
    let coord = mgrs_to_geodetic("17SLE0021200316").unwrap();

    assert_near(&coord, 39.729_349, -83.331_246, 1e-5);
    assert_eq!(reencode(&coord, 5), "17SLE0021200316");
}

#[test]
fn truncated_references_decode_nearby() {
    for (mgrs, tolerance) in [
        ("17SLE002003", 1e-3),
        ("17SLE0000", 1e-2),
        ("17SLE00", 1e-1),
    ] {
        let coord = mgrs_to_geodetic(mgrs).unwrap();
        assert_near(&coord, 39.729_349, -83.331_246, tolerance);
    }
}

#[test]
fn truncated_references_keep_their_cell() {
    for mgrs in ["17SLE002003", "17SLE0000", "17SLE00"] {
        let grid = Mgrs::parse_str(mgrs).unwrap();
        assert_eq!(grid.to_string(), mgrs);
        assert_eq!(Mgrs::from_utm(&grid.to_utm(), grid.precision()).unwrap().to_string(), mgrs);
    }

    // The center of the 100km square lies north of 40N, in band T
    let square = Mgrs::parse_str("17SLE").unwrap();
    assert_eq!(square.precision(), 0);
    assert_eq!(square.to_string(), "17SLE");
    assert_eq!(Mgrs::from_utm(&square.to_utm(), 0).unwrap().to_string(), "17TLE");
}

#[test]
fn lenient_parsing() {
    let coord = mgrs_to_geodetic("42S XD 90929 66948").unwrap();
    assert_near(&coord, 34.927, 71.090, 0.1);

    let compact = Mgrs::parse_str("42SXD9092966948").unwrap();
    for text in [
        "42S XD 90929 66948",
        "42SXD 9092966948",
        "42SXD 90929 66948",
        "  42sxd9092966948 ",
        "42 S XD 90929 66948",
    ] {
        assert_eq!(Mgrs::parse_str(text).unwrap(), compact, "{text}");
    }
}

#[test]
fn unequal_digit_groups() {
    let grid = Mgrs::parse_str("42S XD 909 66948").unwrap();

    assert_eq!(grid.precision(), 3);
    // Each axis is resolved at its own precision
    assert!((grid.easting() - 690_950.0).abs() < 1e-6);
    assert!((grid.northing() - 3_866_948.5).abs() < 1e-6);
    assert_eq!(grid.to_string(), "42SXD909669");
}

#[test]
fn reference_strings_reproduce() {
    for mgrs in [
        "17SLE0021200316",
        "18TWL8566411315",
        "42SXD9092966948",
        "17SLD0000000000",
        "17SLD9999999999",
    ] {
        let coord = mgrs_to_geodetic(mgrs).unwrap();
        assert_eq!(reencode(&coord, 5), mgrs);
    }
}

#[test]
fn encoded_locations_reproduce() {
    for (lat, lon) in [
        (0.000_1, 10.0),
        (-0.000_1, 10.0),
        (39.729_349, -83.331_246),
        (-54.8, -68.3),
        (83.5, 20.0),
        (-79.5, 160.0),
    ] {
        let utm = geodetic_to_utm(lat, lon).unwrap();
        let mgrs = geodetic_to_mgrs(&utm, 5).unwrap();
        let coord = mgrs_to_geodetic(&mgrs).unwrap();

        assert_near(&coord, lat, lon, 1e-5);
        assert_eq!(reencode(&coord, 5), mgrs);
    }
}

#[test]
fn equator_bands() {
    let north = LatLon::create(0.0, 3.0).unwrap().to_mgrs(5).unwrap();
    assert_eq!(north.band(), 'N');
    assert_eq!(north.to_string(), "31NEA0000000000");

    let south = Utm::create(31, Hemisphere::South, 500_000.0, 10_000_000.0).unwrap();
    let south = Mgrs::from_utm(&south, 5).unwrap();
    assert_eq!(south.band(), 'M');
    assert_eq!(south.to_string(), "31MEV0000099999");
}

#[test]
fn grid_zone_designation_only() {
    let grid = Mgrs::parse_str("17S").unwrap();

    assert_eq!(grid.precision(), -1);
    assert_eq!(grid.to_string(), "17S");

    let coord = grid.to_latlon();
    assert!((coord.longitude() + 81.0).abs() < 1e-9);
    assert!(coord.latitude() > 32.0 && coord.latitude() < 40.0);

    // Band X covers 72N to 84N, so its center sits near 78N rather than 76N
    let band_x = Mgrs::parse_str("17X").unwrap();
    assert_eq!(band_x.band(), 'X');
    assert_eq!(band_x.to_string(), "17X");
    let lat = band_x.to_latlon().latitude();
    assert!(lat > 77.0 && lat < 79.0, "band X center at {lat}");

    let lat = mgrs_to_geodetic("17W").unwrap().latitude();
    assert!(lat > 64.0 && lat < 72.0, "band W center at {lat}");

    let lat = mgrs_to_geodetic("17C").unwrap().latitude();
    assert!(lat > -80.0 && lat < -72.0, "band C center at {lat}");
}

#[test]
fn precision_is_validated() {
    let utm = geodetic_to_utm(39.729_349, -83.331_246).unwrap();

    assert!(matches!(geodetic_to_mgrs(&utm, 12), Err(Error::InvalidCoord(_))));
    assert!(matches!(geodetic_to_mgrs(&utm, -2), Err(Error::InvalidCoord(_))));
    assert_eq!(geodetic_to_mgrs(&utm, 1).unwrap(), "17SLE00");
    assert_eq!(geodetic_to_mgrs(&utm, 11).unwrap().len(), 5 + 22);
}

#[test]
fn precision_counts_digits_per_axis() {
    let utm = geodetic_to_utm(39.729_349, -83.331_246).unwrap();

    // 5 digits per axis is 1m, 10 digits in total
    assert_eq!(geodetic_to_mgrs(&utm, 5).unwrap(), "17SLE0021100316");
    // 10 digits per axis is 10µm, not 1m
    let fine = geodetic_to_mgrs(&utm, 10).unwrap();
    assert_eq!(fine.len(), 5 + 20);
    assert!(fine.starts_with("17SLE00211"));
}

#[test]
fn positions_outside_mgrs_utm_are_rejected() {
    let polar = geodetic_to_utm(89.999, 0.0).unwrap();
    assert!(matches!(geodetic_to_mgrs(&polar, 5), Err(Error::InvalidCoord(_))));

    let far_south = geodetic_to_utm(-85.0, 0.0).unwrap();
    assert!(matches!(geodetic_to_mgrs(&far_south, 5), Err(Error::InvalidCoord(_))));

    let outside_zone = Utm::create(17, Hemisphere::North, 50_000.0, 4_400_000.0).unwrap();
    assert!(matches!(geodetic_to_mgrs(&outside_zone, 5), Err(Error::InvalidCoord(_))));
}

#[test]
fn malformed_strings_are_rejected() {
    for mgrs in [
        "",
        "INVALID",
        "SLE0021200316",
        "617SLE0021200316",
        "0SLE0021200316",
        "61SLE0021200316",
        "17",
        "17ILE0021200316",
        "17OLE0021200316",
        "17ALE0021200316",
        "17ZLE0021200316",
        "17SL",
        "17SAE0021200316",
        "17SLW0021200316",
        "17SLL0021200316",
        "17SLE002120031",
        "17SLE00212003X6",
        "17SLE 00 21 20",
        "17S 0021200316",
        "17SLEX0021200316",
        "17SLÉ0021200316",
        "17SLE123456789012123456789012",
    ] {
        assert!(
            matches!(Mgrs::parse_str(mgrs), Err(Error::InvalidMgrs(_))),
            "{mgrs} should not parse",
        );
    }
}
