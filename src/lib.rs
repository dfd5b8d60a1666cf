//! Conversions between WGS84 latitude/longitude, UTM and MGRS grid references.
//!
//! ```
//! use gridconvert::{geodetic_to_mgrs, geodetic_to_utm, mgrs_to_geodetic, utm_to_geodetic};
//!
//! let position = mgrs_to_geodetic("17S LE 00212 00316").unwrap();
//! assert!((position.latitude() - 39.729349).abs() < 1e-5);
//! assert!((position.longitude() + 83.331246).abs() < 1e-5);
//!
//! let utm = geodetic_to_utm(position.latitude(), position.longitude()).unwrap();
//! assert_eq!(utm.zone(), 17);
//! assert_eq!(geodetic_to_mgrs(&utm, 5).unwrap(), "17SLE0021200316");
//!
//! let back = utm_to_geodetic(&utm);
//! assert!((back.latitude() - position.latitude()).abs() < 1e-9);
//! ```
#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use thiserror::Error;

pub mod angle;
pub mod latlon;
pub mod mgrs;
pub mod utm;

pub use latlon::{Altitude, LatLon, ReferenceLevel};
pub use mgrs::Mgrs;
pub use utm::{Hemisphere, Utm};

pub(crate) mod projections {
    pub mod transverse_mercator;
}

pub(crate) mod constants;
pub(crate) mod utility;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A latitude, longitude, zone, easting, northing or precision outside its domain.
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
    /// Text that is not a well-formed MGRS grid reference.
    #[error("MGRS String is invalid: {0}")]
    InvalidMgrs(String),
}

pub trait ParseCoord {
    /// Parses a coordinate from its textual form.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing why the text was rejected.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any coordinate type implementing [`ParseCoord`].
///
/// # Errors
///
/// Propagates the error of the target type's parser.
///
/// ```
/// use gridconvert::{LatLon, Mgrs};
///
/// let grid: Mgrs = gridconvert::from_str("42SXD9092966948").unwrap();
/// let point: LatLon = gridconvert::from_str("34.927 71.090").unwrap();
///
/// assert!(grid.to_latlon().haversine(&point) < 1_000.0);
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

/// Projects a latitude/longitude in degrees to UTM. The longitude may be any
/// finite value and is normalized first; the zone is derived from it.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if the latitude is outside [-90, 90] or
/// either value is not finite.
pub fn geodetic_to_utm(lat: f64, lon: f64) -> Result<Utm, Error> {
    LatLon::create(lat, lon).map(|coord| coord.to_utm())
}

/// Inverse projection of a UTM coordinate. The longitude of the result is in
/// [-180, 180).
pub fn utm_to_geodetic(utm: &Utm) -> LatLon {
    utm.to_latlon()
}

/// Decodes an MGRS grid reference to the center of the cell it names.
///
/// # Errors
///
/// Returns [`Error::InvalidMgrs`] if the reference is malformed.
pub fn mgrs_to_geodetic(mgrs: &str) -> Result<LatLon, Error> {
    Mgrs::parse_str(mgrs).map(|grid| grid.to_latlon())
}

/// Encodes a UTM coordinate as an MGRS grid reference.
///
/// `precision` counts digits **per axis**, not in total: 0 is a 100km square,
/// 1 is 10km, through 5 for 1m. A reference with 10 digits in total is
/// `precision` 5; passing 10 yields 10 digits per axis, a 10µm reference.
/// The maximum is 11 (1µm), and -1 writes the grid zone designation only.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if the precision or position cannot be
/// expressed in MGRS.
///
/// # Usage
///
/// ```
/// use gridconvert::{geodetic_to_mgrs, geodetic_to_utm};
///
/// let utm = geodetic_to_utm(39.729349, -83.331246).unwrap();
///
/// assert_eq!(geodetic_to_mgrs(&utm, 5).unwrap(), "17SLE0021100316");
/// assert_eq!(geodetic_to_mgrs(&utm, 2).unwrap(), "17SLE0000");
/// assert_eq!(geodetic_to_mgrs(&utm, 10).unwrap().len(), "17SLE".len() + 20);
/// ```
pub fn geodetic_to_mgrs(utm: &Utm, precision: i32) -> Result<String, Error> {
    Mgrs::from_utm(utm, precision).map(|grid| grid.to_string())
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }
}
