use std::{fmt::Display, str::FromStr};

use crate::{angle, utm::Utm, mgrs::Mgrs, utility::GeoMath, Error, ParseCoord};

/// Mean radius of Earth in meters
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius>
const EARTH_MEAN_RADIUS_M: f64 = 6371.0088 * 1000.0;

/// Surface an [`Altitude`] is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceLevel {
    /// Height above the WGS84 ellipsoid
    Ellipsoid,
    /// Height above the local terrain
    Terrain,
    /// Height above the model origin
    Origin,
}

impl Display for ReferenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReferenceLevel::Ellipsoid => "ellipsoid",
            ReferenceLevel::Terrain => "terrain",
            ReferenceLevel::Origin => "origin",
        };
        f.write_str(label)
    }
}

/// Height of a point in meters together with the surface it is relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Altitude {
    #[cfg_attr(feature = "serde", serde(alias = "alt"))]
    pub meters: f64,
    pub reference: ReferenceLevel,
}

/// Representation of a WGS84 Latitude/Longitude point. Can be converted
/// to/from [`Utm`] and [`Mgrs`].
///
/// Longitude is always held in the range `[-180, 180)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLatLon"))]
pub struct LatLon {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) altitude: Option<Altitude>,
}

/// Unchecked [`LatLon`] as read from serialized data, validated by
/// [`LatLon::create`] on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLatLon {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
    #[serde(default)]
    altitude: Option<Altitude>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLatLon> for LatLon {
    type Error = Error;

    fn try_from(raw: RawLatLon) -> Result<Self, Self::Error> {
        let coord = LatLon::create(raw.latitude, raw.longitude)?;

        Ok(LatLon {
            altitude: raw.altitude,
            ..coord
        })
    }
}

impl LatLon {
    /// Internal-only constructor that doesn't check the bounds of lat/lon
    pub(crate) fn new(lat: f64, lon: f64) -> LatLon {
        Self {
            latitude: lat,
            longitude: lon,
            altitude: None,
        }
    }

    /// Tries to create a latitude/longitude point from a lat/lon pair.
    /// * Latitude must be in range [-90,90]
    /// * Longitude may be any finite value and is normalized into [-180,180)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if latitude is out of range or either
    /// value is not finite.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// assert_eq!(coord.latitude(), 40.748333);
    /// assert_eq!(coord.longitude(), -73.985278);
    ///
    /// let wrapped = LatLon::create(0.0, 185.0).unwrap();
    /// assert!((wrapped.longitude() + 175.0).abs() < 1e-12);
    ///
    /// let antimeridian = LatLon::create(0.0, 180.0).unwrap();
    /// assert_eq!(antimeridian.longitude(), -180.0);
    ///
    /// assert!(LatLon::create(100.0, 0.0).is_err());
    /// assert!(LatLon::create(0.0, f64::NAN).is_err());
    /// ```
    pub fn create(lat: f64, lon: f64) -> Result<LatLon, Error> {
        if !(-90_f64..=90_f64).contains(&lat) {
            Err(Error::InvalidCoord(format!("Latitude {lat} outside of valid range [-90, 90].")))
        } else if !lon.is_finite() {
            Err(Error::InvalidCoord(format!("Longitude {lon} is not a finite number.")))
        } else {
            Ok(LatLon::new(lat, lon.ang_normalize()))
        }
    }

    /// Returns a copy of this point carrying the given altitude.
    ///
    /// # Example
    /// ```
    /// use gridconvert::{LatLon, ReferenceLevel};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278)
    ///     .unwrap()
    ///     .with_altitude(381.0, ReferenceLevel::Terrain);
    /// let altitude = coord.altitude().unwrap();
    /// assert_eq!(altitude.meters, 381.0);
    /// assert_eq!(altitude.reference, ReferenceLevel::Terrain);
    /// ```
    pub fn with_altitude(self, meters: f64, reference: ReferenceLevel) -> LatLon {
        Self {
            altitude: Some(Altitude { meters, reference }),
            ..self
        }
    }

    /// Returns the latitude value.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude value.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn altitude(&self) -> Option<Altitude> {
        self.altitude
    }

    /// Returns whether the current point is in the northern hemisphere.
    /// The equator counts as north.
    ///
    /// # Example
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// assert!(LatLon::create(40.748333, -73.985278).unwrap().is_north());
    /// assert!(LatLon::create(0.0, 10.0).unwrap().is_north());
    /// assert!(!LatLon::create(-40.748333, -73.985278).unwrap().is_north());
    /// ```
    pub fn is_north(&self) -> bool {
        self.latitude >= 0.0
    }

    /// Returns the distance in meters between two [`LatLon`] points
    /// using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
    /// Uses the [mean radius of the Earth](https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius)
    /// in the calculation: `6371.0088`
    pub fn haversine(&self, other: &LatLon) -> f64 {
        let lat1_r = self.latitude.to_radians();
        let lat2_r = other.latitude.to_radians();

        2.0 * EARTH_MEAN_RADIUS_M * (
            ((other.latitude - self.latitude).to_radians() / 2.0).sin().powi(2) +
            lat1_r.cos() * lat2_r.cos() *
            ((other.longitude - self.longitude).to_radians() / 2.0).sin().powi(2)
        ).sqrt().asin()
    }

    /// Converts from [`Utm`] to [`LatLon`]
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Hemisphere, LatLon, Utm};
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    /// let coord_utm = Utm::create(18, Hemisphere::North, 585664.121, 4511315.422).unwrap();
    ///
    /// let converted = LatLon::from_utm(&coord_utm);
    ///
    /// // Check if the converted coordinate is accurate to 6 decimals (same as reference)
    /// assert!((converted.latitude() - coord.latitude()).abs() < 1e-6);
    /// assert!((converted.longitude() - coord.longitude()).abs() < 1e-6);
    /// ```
    pub fn from_utm(value: &Utm) -> LatLon {
        value.to_latlon()
    }

    /// Converts from [`LatLon`] to [`Utm`], picking the zone from the longitude.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let converted = LatLon::create(40.748333, -73.985278).unwrap().to_utm();
    ///
    /// assert_eq!(converted.zone(), 18);
    /// assert!(converted.is_north());
    /// // Check if the converted coordinate is accurate to 3 decimals (same as reference)
    /// assert!((converted.easting() - 585664.121).abs() < 1e-3);
    /// assert!((converted.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn to_utm(&self) -> Utm {
        Utm::from_latlon(self)
    }

    /// Converts from [`Mgrs`] to [`LatLon`]
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{LatLon, Mgrs};
    ///
    /// let coord_mgrs = Mgrs::parse_str("18TWL8566411315").unwrap();
    /// let converted = LatLon::from_mgrs(&coord_mgrs);
    ///
    /// assert!((converted.latitude() - 40.748333).abs() < 1e-5);
    /// assert!((converted.longitude() + 73.985278).abs() < 1e-5);
    /// ```
    pub fn from_mgrs(value: &Mgrs) -> LatLon {
        value.to_latlon()
    }

    /// Converts from [`LatLon`] to [`Mgrs`] with `precision` digits per axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the precision is out of range or the
    /// point lies outside the UTM part of MGRS (south of 80°S or well north of 84°N).
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::LatLon;
    ///
    /// let coord = LatLon::create(40.748333, -73.985278).unwrap();
    ///
    /// let converted = coord.to_mgrs(5).unwrap();
    ///
    /// assert_eq!(converted.to_string(), "18TWL8566411315");
    /// ```
    pub fn to_mgrs(&self, precision: i32) -> Result<Mgrs, Error> {
        Mgrs::from_latlon(self, precision)
    }
}

impl ParseCoord for LatLon {
    /// Parses a latitude/longitude pair. The two halves may be separated by a
    /// comma or semicolon, follow a `N`/`S` hemisphere letter, or be two bare
    /// whitespace separated numbers. Each half is read by [`angle::parse_latitude`]
    /// and [`angle::parse_longitude`].
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let (lat, lon) = split_pair(value.trim())
            .ok_or_else(|| Error::InvalidCoord(format!("Cannot split '{value}' into latitude and longitude")))?;

        LatLon::create(angle::parse_latitude(lat)?, angle::parse_longitude(lon)?)
    }
}

impl FromStr for LatLon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_coord(s)
    }
}

fn split_pair(value: &str) -> Option<(&str, &str)> {
    if let Some(pair) = value.split_once([',', ';']) {
        return Some(pair);
    }

    // A trailing hemisphere letter ends the latitude half
    if let Some(idx) = value.find(['N', 'S', 'n', 's']) {
        let (lat, lon) = value.split_at(idx + 1);
        if !lon.trim().is_empty() {
            // Leading hemisphere letter, e.g. "N42 E123", belongs to the latitude
            if lat.trim().len() == 1 {
                return value[idx + 1..]
                    .find(['E', 'W', 'e', 'w'])
                    .map(|end| value.split_at(idx + 1 + end));
            }
            return Some((lat, lon));
        }
    }

    let mut pieces = value.split_whitespace();
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some(lat), Some(lon), None) => Some((lat, lon)),
        _ => None,
    }
}

impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude);
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude);
        write!(f, "{lat} {lon}")?;

        if let Some(altitude) = self.altitude {
            let mut buf = ryu::Buffer::new();
            write!(f, " {}m {}", buf.format(altitude.meters), altitude.reference)?;
        }

        Ok(())
    }
}
