use std::fmt::Display;

use crate::{latlon::LatLon, utility::{dms, GeoMath}, mgrs::{self, Mgrs}, Error, ThisOrThat, projections::transverse_mercator::TransverseMercator};

pub(crate) mod zonespec {
    pub(crate) const MINUTMZONE: i32 = 1;
    pub(crate) const MAXUTMZONE: i32 = 60;
    /// Width of a zone in degrees of longitude
    pub(crate) const ZONE_WIDTH: i32 = 6;
}

const FALSE_EASTING: i32 = mgrs::UTMEASTING * mgrs::TILE;

// Indexed by hemisphere, [south, north]
const FALSE_NORTHING: [i32; 2] = [
    mgrs::MAXUTM_S_ROW * mgrs::TILE,
    mgrs::MINUTM_N_ROW * mgrs::TILE,
];

// Easting and northing are never negative. Northings run from zero at the
// south pole up to the quarter meridian, with one 100km tile to spare above.
const MAX_EASTING: i32 = (mgrs::MAXUTMCOL + 1) * mgrs::TILE;

const MAX_NORTHING: i32 = (mgrs::MAXUTM_S_ROW + 1) * mgrs::TILE;

/// Northern or southern half of a UTM zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn is_north(self) -> bool {
        self == Hemisphere::North
    }

    pub(crate) fn from_north(northp: bool) -> Hemisphere {
        northp.ternary(Hemisphere::North, Hemisphere::South)
    }

    fn index(self) -> usize {
        usize::from(self.is_north())
    }
}

/// Representation of a WGS84
/// [UTM](https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system)
/// point. When converted from lat/lon the zone is derived from the longitude
/// with the regular 6° rule; the Norway and Svalbard exceptions are not applied.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawUtm"))]
pub struct Utm {
    pub(crate) zone: i32,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

// Serialized form, checked by `Utm::create` when converted
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawUtm {
    zone: i32,
    #[serde(alias = "north")]
    hemisphere: Hemisphere,
    easting: f64,
    northing: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawUtm> for Utm {
    type Error = Error;

    fn try_from(raw: RawUtm) -> Result<Self, Self::Error> {
        Utm::create(raw.zone, raw.hemisphere, raw.easting, raw.northing)
    }
}

impl Utm {
    /// Internal-only constructor that doesn't check the coordinate
    pub(crate) fn new(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> Utm {
        Self {
            zone,
            hemisphere,
            easting,
            northing,
        }
    }

    /// Tries to create a UTM point from its constituent parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the zone is outside the range `[1, 60]`
    /// or the easting/northing fall outside the zone.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Hemisphere, Utm};
    ///
    /// let coord = Utm::create(18, Hemisphere::North, 585664.121, 4511315.422).unwrap();
    ///
    /// assert_eq!(coord.zone(), 18);
    /// assert_eq!(coord.hemisphere(), Hemisphere::North);
    /// assert!((coord.easting() - 585664.121).abs() < 1e-3);
    /// assert!((coord.northing() - 4511315.422).abs() < 1e-3);
    ///
    /// assert!(Utm::create(0, Hemisphere::North, 585664.121, 4511315.422).is_err());
    /// assert!(Utm::create(61, Hemisphere::North, 585664.121, 4511315.422).is_err());
    /// assert!(Utm::create(18, Hemisphere::North, -1.0, 4511315.422).is_err());
    /// ```
    pub fn create(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> Result<Utm, Error> {
        check_zone(zone)?;
        check_coords(hemisphere, easting, northing)?;

        Ok(Utm::new(zone, hemisphere, easting, northing))
    }

    /// Returns the UTM zone.
    pub fn zone(&self) -> i32 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Returns whether the coordinate is in the northern hemisphere.
    pub fn is_north(&self) -> bool {
        self.hemisphere.is_north()
    }

    /// Returns the UTM easting in meters.
    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Returns the UTM northing in meters.
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts from [`LatLon`] to [`Utm`]
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{LatLon, Utm};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let converted = Utm::from_latlon(&coord);
    ///
    /// assert_eq!(converted.zone(), 18);
    /// assert!(converted.is_north());
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn from_latlon(value: &LatLon) -> Utm {
        let zone = standard_zone(value.longitude);
        project(value, zone)
    }

    /// Converts from [`LatLon`] to [`Utm`] in the given zone rather than the
    /// one containing the point. Useful for keeping a feature that straddles a
    /// zone boundary in a single grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the zone is outside the range `[1, 60]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{LatLon, Utm};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let converted = Utm::from_latlon_in_zone(&coord, 19).unwrap();
    ///
    /// assert_eq!(converted.zone(), 19);
    /// assert!(converted.easting() < 500_000.0);
    ///
    /// let back = converted.to_latlon();
    /// assert!((back.latitude() - coord.latitude()).abs() < 1e-9);
    /// assert!((back.longitude() - coord.longitude()).abs() < 1e-9);
    /// ```
    pub fn from_latlon_in_zone(value: &LatLon, zone: i32) -> Result<Utm, Error> {
        check_zone(zone)?;
        log::trace!("Projecting {value} into UTM zone {zone}");
        Ok(project(value, zone))
    }

    /// Converts from [`Utm`] to [`LatLon`]
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Hemisphere, LatLon, Utm};
    ///
    /// let coord_utm = Utm::create(18, Hemisphere::North, 585664.121, 4511315.422).unwrap();
    ///
    /// let converted = coord_utm.to_latlon();
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - 40.748333).abs() < 1e-6);
    /// assert!((converted.longitude() + 73.985278).abs() < 1e-6);
    /// ```
    pub fn to_latlon(&self) -> LatLon {
        let x = self.easting - f64::from(FALSE_EASTING);
        let y = self.northing - f64::from(FALSE_NORTHING[self.hemisphere.index()]);

        TransverseMercator::utm().to_latlon(central_meridian(self.zone), x, y)
    }

    /// Converts from [`Mgrs`] to [`Utm`]. The position is the center of the
    /// grid cell named by the MGRS reference.
    pub fn from_mgrs(value: &Mgrs) -> Utm {
        value.utm
    }

    /// Converts from [`Utm`] to [`Mgrs`] with `precision` digits per axis.
    ///
    /// # Errors
    ///
    /// See [`Mgrs::from_utm`].
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Hemisphere, Utm};
    ///
    /// let coord_utm = Utm::create(18, Hemisphere::North, 585664.15, 4511315.45).unwrap();
    ///
    /// assert_eq!(coord_utm.to_mgrs(5).unwrap().to_string(), "18TWL8566411315");
    /// assert_eq!(coord_utm.to_mgrs(2).unwrap().to_string(), "18TWL8511");
    /// ```
    pub fn to_mgrs(&self, precision: i32) -> Result<Mgrs, Error> {
        Mgrs::from_utm(self, precision)
    }
}

fn project(value: &LatLon, zone: i32) -> Utm {
    let hemisphere = Hemisphere::from_north(value.is_north());
    let lon0 = central_meridian(zone);

    let (x, y) = TransverseMercator::utm().from_latlon(lon0, value.latitude, value.longitude);

    Utm {
        zone,
        hemisphere,
        easting: x + f64::from(FALSE_EASTING),
        northing: y + f64::from(FALSE_NORTHING[hemisphere.index()]),
    }
}

pub(crate) fn central_meridian(zone: i32) -> f64 {
    f64::from(zonespec::ZONE_WIDTH * zone - dms::HD - zonespec::ZONE_WIDTH / 2)
}

/// Maps a longitude to its regular 6° zone, so [-180,-174) is zone 1 and
/// [174,180) is zone 60.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn standard_zone(lon: f64) -> i32 {
    let lon = lon.ang_normalize();
    let zone = ((lon + f64::from(dms::HD)) / f64::from(zonespec::ZONE_WIDTH)).floor() as i32 + 1;

    zone.clamp(zonespec::MINUTMZONE, zonespec::MAXUTMZONE)
}

fn check_zone(zone: i32) -> Result<(), Error> {
    if (zonespec::MINUTMZONE..=zonespec::MAXUTMZONE).contains(&zone) {
        Ok(())
    } else {
        Err(Error::InvalidCoord(format!(
            "Zone {zone} not in range [{}, {}]",
            zonespec::MINUTMZONE,
            zonespec::MAXUTMZONE,
        )))
    }
}

/// Checks easting/northing against the extent of a UTM zone. Neither may be
/// negative, whatever the hemisphere.
pub(crate) fn check_coords(hemisphere: Hemisphere, x: f64, y: f64) -> Result<(), Error> {
    let label = hemisphere.is_north().ternary("N", "S");

    if !(0.0..=f64::from(MAX_EASTING)).contains(&x) {
        return Err(Error::InvalidCoord(
            format!(
                "Easting {:.2}km not in UTM range for {label} hemisphere [0.00km, {:.2}km]",
                x / 1000.0,
                f64::from(MAX_EASTING) / 1000.0,
            )
        ));
    }

    if !(0.0..=f64::from(MAX_NORTHING)).contains(&y) {
        return Err(Error::InvalidCoord(
            format!(
                "Northing {:.2}km not in UTM range for {label} hemisphere [0.00km, {:.2}km]",
                y / 1000.0,
                f64::from(MAX_NORTHING) / 1000.0,
            )
        ));
    }

    Ok(())
}

impl Display for Utm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {:.3} {:.3}",
            self.zone,
            self.is_north().ternary("N", "S"),
            self.easting,
            self.northing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_boundaries() {
        assert_eq!(standard_zone(-180.0), 1);
        assert_eq!(standard_zone(180.0), 1);
        assert_eq!(standard_zone(-174.0), 2);
        assert_eq!(standard_zone(-0.000_001), 30);
        assert_eq!(standard_zone(0.0), 31);
        assert_eq!(standard_zone(179.999), 60);
        assert_eq!(standard_zone(185.0), 1);
        assert_eq!(standard_zone(-190.0), 59);
    }

    #[test]
    fn central_meridians() {
        assert_eq!(central_meridian(1), -177.0);
        assert_eq!(central_meridian(17), -81.0);
        assert_eq!(central_meridian(31), 3.0);
        assert_eq!(central_meridian(60), 177.0);
    }

    #[test]
    fn ranges_reject_negative_values() {
        assert!(check_coords(Hemisphere::North, 0.0, 0.0).is_ok());
        assert!(check_coords(Hemisphere::North, 1_000_000.0, 9_997_853.0).is_ok());
        assert!(check_coords(Hemisphere::North, 1_000_001.0, 0.0).is_err());
        assert!(check_coords(Hemisphere::North, 500_000.0, 10_100_001.0).is_err());
        assert!(check_coords(Hemisphere::North, 500_000.0, -1.0).is_err());
        assert!(check_coords(Hemisphere::North, 500_000.0, -5_000_000.0).is_err());
        assert!(check_coords(Hemisphere::South, 500_000.0, 2_146.0).is_ok());
        assert!(check_coords(Hemisphere::South, 500_000.0, 10_000_000.0).is_ok());
        assert!(check_coords(Hemisphere::South, 500_000.0, 10_600_000.0).is_err());
        assert!(check_coords(Hemisphere::South, 500_000.0, -1.0).is_err());
        assert!(check_coords(Hemisphere::South, -1.0, 5_000_000.0).is_err());
        assert!(check_coords(Hemisphere::North, f64::NAN, 0.0).is_err());
        assert!(check_coords(Hemisphere::North, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn display_uses_millimeters() {
        let utm = Utm::new(51, Hemisphere::North, 523_646.086_1, 4_679_681.018_4);
        assert_eq!(utm.to_string(), "51N 523646.086 4679681.018");
    }
}
