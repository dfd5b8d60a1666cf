//! Parsing and formatting of textual latitude/longitude values, as typed by
//! users: decimal degrees, degrees with decimal minutes, and
//! degrees-minutes-seconds.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::{utility::dms, Error};

lazy_static! {
    static ref ANGLE: Regex = Regex::new(
        r#"(?xi)
        ^
        (?P<sign>[+-])?\s*
        (?P<pre>[NSEW])?\s*
        (?P<deg>\d+(?:\.\d+)?)
        (?:
            \s*(?:°|º|:|\s)\s*
            (?P<min>\d+(?:\.\d+)?)
            (?:
                \s*(?:'|′|:|\s)\s*
                (?P<sec>\d+(?:\.\d+)?)
                \s*(?:"|″|'')?
            |
                \s*(?:'|′)?
            )
        |
            \s*(?:°|º)?
        )
        \s*(?P<post>[NSEW])?
        $
        "#
    ).expect("angle pattern is valid");
}

/// Textual layout of an angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordFormat {
    /// `42.268978`
    DecimalDegrees,
    /// `42°16.1387'N`
    DegreesMinutes,
    /// `42°16'08.32"N`
    DegreesMinutesSeconds,
}

impl CoordFormat {
    /// Reports which layout `value` is written in, or `None` if it is not a
    /// recognizable angle.
    ///
    /// # Example
    /// ```
    /// use gridconvert::angle::CoordFormat;
    ///
    /// assert_eq!(CoordFormat::detect("-83.331246"), Some(CoordFormat::DecimalDegrees));
    /// assert_eq!(CoordFormat::detect("42°16.1387'N"), Some(CoordFormat::DegreesMinutes));
    /// assert_eq!(CoordFormat::detect("42 16 8.32 N"), Some(CoordFormat::DegreesMinutesSeconds));
    /// assert_eq!(CoordFormat::detect("forty two"), None);
    /// ```
    pub fn detect(value: &str) -> Option<CoordFormat> {
        ANGLE.captures(value.trim()).map(|caps| format_of(&caps))
    }
}

fn format_of(caps: &Captures) -> CoordFormat {
    if caps.name("sec").is_some() {
        CoordFormat::DegreesMinutesSeconds
    } else if caps.name("min").is_some() {
        CoordFormat::DegreesMinutes
    } else {
        CoordFormat::DecimalDegrees
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => f64::from(dms::QD),
            Axis::Longitude => f64::from(dms::HD),
        }
    }

    fn hemispheres(self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        })
    }
}

/// Parses a latitude in decimal degrees, degrees and decimal minutes, or
/// degrees-minutes-seconds, with an optional sign or `N`/`S` letter.
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if the text is not an angle, names an
/// east/west hemisphere, or is outside [-90, 90].
///
/// # Usage
///
/// ```
/// use gridconvert::angle::parse_latitude;
///
/// let lat = parse_latitude("42°16'8.32\"N").unwrap();
/// assert!((lat - 42.268978).abs() < 1e-6);
///
/// assert_eq!(parse_latitude("12 30 S").unwrap(), -12.5);
/// assert_eq!(parse_latitude("-12.5").unwrap(), -12.5);
/// assert!(parse_latitude("91").is_err());
/// assert!(parse_latitude("12E").is_err());
/// ```
pub fn parse_latitude(value: &str) -> Result<f64, Error> {
    parse_angle(value, Axis::Latitude)
}

/// Parses a longitude, see [`parse_latitude`]. Accepts `E`/`W` letters and
/// values in [-180, 180].
///
/// # Errors
///
/// Returns [`Error::InvalidCoord`] if the text is not an angle, names a
/// north/south hemisphere, or is outside [-180, 180].
///
/// # Usage
///
/// ```
/// use gridconvert::angle::parse_longitude;
///
/// let lon = parse_longitude("123:17:12.23E").unwrap();
/// assert!((lon - 123.286731).abs() < 1e-6);
///
/// assert_eq!(parse_longitude("W83.5").unwrap(), -83.5);
/// assert!(parse_longitude("-83.5W").is_err());
/// ```
pub fn parse_longitude(value: &str) -> Result<f64, Error> {
    parse_angle(value, Axis::Longitude)
}

fn parse_angle(value: &str, axis: Axis) -> Result<f64, Error> {
    let invalid = |reason: &str| Error::InvalidCoord(format!("Invalid {axis} '{value}': {reason}"));

    let caps = ANGLE
        .captures(value.trim())
        .ok_or_else(|| invalid("not a recognized angle"))?;

    let hemisphere = match (caps.name("pre"), caps.name("post")) {
        (Some(_), Some(_)) => return Err(invalid("more than one hemisphere letter")),
        (Some(letter), None) | (None, Some(letter)) => letter.as_str().chars().next().map(|c| c.to_ascii_uppercase()),
        (None, None) => None,
    };

    let (positive, negative) = axis.hemispheres();
    let negate = match hemisphere {
        Some(letter) if letter == positive => false,
        Some(letter) if letter == negative => true,
        Some(letter) => return Err(invalid(&format!("hemisphere {letter} does not apply"))),
        None => false,
    };

    let sign = caps.name("sign").map(|m| m.as_str());
    if hemisphere.is_some() && sign == Some("-") {
        return Err(invalid("both a negative sign and a hemisphere letter"));
    }

    let field = |name: &str| -> Result<Option<f64>, Error> {
        caps.name(name)
            .map(|m| m.as_str().parse::<f64>().map_err(|e| invalid(&e.to_string())))
            .transpose()
    };

    let degrees = field("deg")?.unwrap_or_default();
    let minutes = field("min")?;
    let seconds = field("sec")?;

    let is_fractional = |name: &str| caps.name(name).is_some_and(|m| m.as_str().contains('.'));

    if minutes.is_some() && is_fractional("deg") {
        return Err(invalid("fractional degrees followed by minutes"));
    }
    if seconds.is_some() && is_fractional("min") {
        return Err(invalid("fractional minutes followed by seconds"));
    }

    let minutes = minutes.unwrap_or_default();
    let seconds = seconds.unwrap_or_default();

    if minutes >= f64::from(dms::DM) {
        return Err(invalid("minutes must be less than 60"));
    }
    if seconds >= f64::from(dms::MS) {
        return Err(invalid("seconds must be less than 60"));
    }

    let magnitude = degrees + minutes / f64::from(dms::DM) + seconds / f64::from(dms::DS);

    if magnitude > axis.limit() {
        return Err(invalid(&format!("outside of [-{0}, {0}]", axis.limit())));
    }

    if negate || sign == Some("-") {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Writes a latitude in the given layout.
///
/// # Usage
///
/// ```
/// use gridconvert::angle::{format_latitude, CoordFormat};
///
/// let lat = 42.0 + 16.0 / 60.0 + 8.32 / 3600.0;
///
/// assert_eq!(format_latitude(lat, CoordFormat::DegreesMinutesSeconds), "42°16'08.32\"N");
/// assert_eq!(format_latitude(lat, CoordFormat::DegreesMinutes), "42°16.1387'N");
/// assert_eq!(format_latitude(-lat, CoordFormat::DecimalDegrees), "-42.268978");
/// ```
pub fn format_latitude(value: f64, format: CoordFormat) -> String {
    format_angle(value, format, Axis::Latitude)
}

/// Writes a longitude in the given layout, see [`format_latitude`].
///
/// ```
/// use gridconvert::angle::{format_longitude, CoordFormat};
///
/// assert_eq!(format_longitude(-83.5, CoordFormat::DegreesMinutesSeconds), "83°30'00.00\"W");
/// ```
pub fn format_longitude(value: f64, format: CoordFormat) -> String {
    format_angle(value, format, Axis::Longitude)
}

#[allow(clippy::cast_possible_truncation)]
fn format_angle(value: f64, format: CoordFormat, axis: Axis) -> String {
    let (positive, negative) = axis.hemispheres();
    let hemisphere = if value < 0.0 { negative } else { positive };
    let ds = i64::from(dms::DS);
    let dm = i64::from(dms::DM);

    match format {
        CoordFormat::DecimalDegrees => format!("{value:.6}"),
        CoordFormat::DegreesMinutes => {
            // Ten-thousandths of a minute
            let total = (value.abs() * f64::from(dms::DM) * 1e4).round() as i64;
            let degrees = total / (dm * 10_000);
            let minutes = total % (dm * 10_000);
            format!("{degrees}°{:02}.{:04}'{hemisphere}", minutes / 10_000, minutes % 10_000)
        }
        CoordFormat::DegreesMinutesSeconds => {
            // Hundredths of a second
            let total = (value.abs() * f64::from(dms::DS) * 100.0).round() as i64;
            let degrees = total / (ds * 100);
            let rest = total % (ds * 100);
            let minutes = rest / (dm * 100);
            let hundredths = rest % (dm * 100);
            format!("{degrees}°{minutes:02}'{:02}.{:02}\"{hemisphere}", hundredths / 100, hundredths % 100)
        }
    }
}
