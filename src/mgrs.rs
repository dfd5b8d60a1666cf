use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use num::Integer;

use crate::{Error, utm::{zonespec::{MINUTMZONE, MAXUTMZONE}, Hemisphere, Utm}, utility::{dms, GeoMath}, ThisOrThat, latlon::LatLon, ParseCoord};

const UTMCOLS: &[&str] = &["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
const UTMROW: &str = "ABCDEFGHJKLMNPQRSTUV";
const LATBAND: &str = "CDEFGHJKLMNPQRSTUVWX";
// Polar bands belong to UPS, which is not supported
const UPSBAND: &str = "ABYZ";

pub(crate) const TILE: i32 = 100_000;
pub(crate) const MINUTMCOL: i32 = 1;
pub(crate) const MAXUTMCOL: i32 = 9;
pub(crate) const MINUTM_S_ROW: i32 = 10;
pub(crate) const MAXUTM_S_ROW: i32 = 100;
pub(crate) const MINUTM_N_ROW: i32 = 0;
pub(crate) const MAXUTM_N_ROW: i32 = 95;
pub(crate) const UTMEASTING: i32 = 5;
pub(crate) const UTM_N_SHIFT: i32 = (MAXUTM_S_ROW - MINUTM_N_ROW) * TILE;

// MGRS limits in tiles, indexed by hemisphere [south, north]. Closed below,
// open above.
const MIN_NORTHING: [i32; 2] = [
    MINUTM_S_ROW,
    MINUTM_N_ROW + MINUTM_S_ROW - MAXUTM_S_ROW,
];

const MAX_NORTHING: [i32; 2] = [
    MAXUTM_S_ROW + MAXUTM_N_ROW - MINUTM_N_ROW,
    MAXUTM_N_ROW,
];

pub const BASE: i32 = 10;
pub const UTM_ROW_PERIOD: i32 = 20;
pub const UTM_EVEN_ROW_SHIFT: i32 = 5;
/// Maximum number of digits per axis; 5 digits is 1m, 11 digits is 1µm.
pub const MAX_PRECISION: i32 = 5 + 6;
pub const MULT: i32 = 1_000_000;

lazy_static! {
    // Latitudes closer than this to the equator take their band from the hemisphere
    static ref ANG_EPS: f64 = 2_f64.powi(-(f64::MANTISSA_DIGITS as i32 - 7));
    // Nudge applied to coordinates sitting exactly on an open upper limit
    static ref COORD_EPS: f64 = 2_f64.powi(-(f64::MANTISSA_DIGITS as i32 - 25));
}

/// A [MGRS](https://en.wikipedia.org/wiki/Military_Grid_Reference_System)
/// grid reference: a UTM position, its latitude band and the number of digits
/// per axis used to write it.
///
/// A precision of `-1` denotes a grid zone designation only (e.g. `17S`),
/// `0` a 100km square (`17SLE`), up to `5` for 1m and `11` for 1µm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mgrs {
    pub(crate) utm: Utm,
    pub(crate) band: i32,
    pub(crate) precision: i32,
}

impl Mgrs {
    pub fn zone(&self) -> i32 {
        self.utm.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.utm.hemisphere
    }

    pub fn is_north(&self) -> bool {
        self.utm.is_north()
    }

    /// Returns the latitude band letter.
    ///
    /// # Example
    /// ```
    /// use gridconvert::Mgrs;
    ///
    /// assert_eq!(Mgrs::parse_str("17SLE0021200316").unwrap().band(), 'S');
    /// ```
    #[allow(clippy::cast_sign_loss)]
    pub fn band(&self) -> char {
        LATBAND.as_bytes()[(self.band + 10) as usize] as char
    }

    pub fn easting(&self) -> f64 {
        self.utm.easting
    }

    pub fn northing(&self) -> f64 {
        self.utm.northing
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Parses an MGRS string. Case and whitespace are not significant, and
    /// easting and northing may be given as separate groups of digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMgrs`] if the string is not a valid UTM grid reference.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::Mgrs;
    ///
    /// let compact = Mgrs::parse_str("42SXD9092966948").unwrap();
    /// let spaced = Mgrs::parse_str("42S XD 90929 66948").unwrap();
    ///
    /// assert_eq!(compact, spaced);
    /// assert_eq!(spaced.to_string(), "42SXD9092966948");
    /// assert!(Mgrs::parse_str("61SXD9092966948").is_err());
    /// ```
    pub fn parse_str(mgrs_str: &str) -> Result<Mgrs, Error> {
        Self::from_str(mgrs_str)
    }

    /// Builds a grid reference for a lat/lon point.
    ///
    /// # Errors
    ///
    /// See [`Mgrs::from_utm`].
    pub fn from_latlon(value: &LatLon, precision: i32) -> Result<Mgrs, Error> {
        encode(&Utm::from_latlon(value), value.latitude, precision)
    }

    /// Converts from [`Mgrs`] to [`LatLon`], yielding the center of the cell.
    pub fn to_latlon(&self) -> LatLon {
        self.utm.to_latlon()
    }

    /// Builds a grid reference for a UTM point with `precision` digits per axis.
    /// Digits are truncated, so the reference names the cell containing the point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoord`] if the precision is not in `[-1, 11]`, the
    /// point lies outside the MGRS extent of its zone, or its latitude falls
    /// outside the UTM bands of MGRS.
    ///
    /// # Usage
    ///
    /// ```
    /// use gridconvert::{Hemisphere, Mgrs, Utm};
    ///
    /// let utm = Utm::create(17, Hemisphere::North, 300212.7, 4400316.2).unwrap();
    ///
    /// assert_eq!(Mgrs::from_utm(&utm, 5).unwrap().to_string(), "17SLE0021200316");
    /// assert_eq!(Mgrs::from_utm(&utm, 3).unwrap().to_string(), "17SLE002003");
    /// assert_eq!(Mgrs::from_utm(&utm, 0).unwrap().to_string(), "17SLE");
    /// assert_eq!(Mgrs::from_utm(&utm, -1).unwrap().to_string(), "17S");
    /// assert!(Mgrs::from_utm(&utm, 12).is_err());
    /// ```
    pub fn from_utm(value: &Utm, precision: i32) -> Result<Mgrs, Error> {
        let lat = value.to_latlon().latitude;
        encode(value, lat, precision)
    }

    pub fn to_utm(&self) -> Utm {
        self.utm
    }
}

#[allow(clippy::cast_possible_truncation)]
fn encode(value: &Utm, lat: f64, precision: i32) -> Result<Mgrs, Error> {
    if !(-1..=MAX_PRECISION).contains(&precision) {
        return Err(Error::InvalidCoord(format!("MGRS precision {precision} not in [-1, {MAX_PRECISION}]")));
    }

    if !(MINUTMZONE..=MAXUTMZONE).contains(&value.zone) {
        return Err(Error::InvalidCoord(format!("Zone {} not in [{MINUTMZONE}, {MAXUTMZONE}]", value.zone)));
    }

    let (northp, x, y) = check_coords(value.is_north(), value.easting, value.northing)?;

    // Correct fuzziness in latitude near equator
    let band = (lat.abs() < *ANG_EPS).ternary(northp.ternary(0, -1), to_latitude_band(lat));

    let (xh, yh) = {
        let (ix, iy) = micrometers(x, y);
        let m = i64::from(MULT) * i64::from(TILE);
        (ix.div_euclid(m) as i32, iy.div_euclid(m) as i32)
    };

    let col_idx = xh - MINUTMCOL;
    let row_idx = utm_row(band, col_idx, yh % UTM_ROW_PERIOD);

    if row_idx != yh - northp.ternary(MINUTM_N_ROW, MAXUTM_S_ROW) {
        return Err(Error::InvalidCoord(format!(
            "Latitude {lat} is inconsistent with UTM coordinates {value}",
        )));
    }

    Ok(Mgrs {
        utm: Utm::new(value.zone, Hemisphere::from_north(northp), x, y),
        band,
        precision,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn micrometers(x: f64, y: f64) -> (i64, i64) {
    (
        (x * f64::from(MULT)).floor() as i64,
        (y * f64::from(MULT)).floor() as i64,
    )
}

fn utm_row(band_idx: i32, col_idx: i32, row_idx: i32) -> i32 {
    let c = 100.0 * (8.0 * f64::from(band_idx) + 4.0) / f64::from(dms::QD);
    let northp = band_idx >= 0;
    // These are safe bounds on the rows
    //  band_idx  minrow maxrow
    //   -10      -90    -81
    //    -9      -80    -72
    //    -8      -71    -63
    //    -7      -63    -54
    //    -6      -54    -45
    //    -5      -45    -36
    //    -4      -36    -27
    //    -3      -27    -18
    //    -2      -18     -9
    //    -1       -9     -1
    //     0        0      8
    //     1        8     17
    //     2       17     26
    //     3       26     35
    //     4       35     44
    //     5       44     53
    //     6       53     62
    //     7       62     70
    //     8       71     79
    //     9       80     94

    #[allow(clippy::cast_possible_truncation)]
    let min_row = if band_idx > -10 {
        (c - 4.3 - 0.1 * f64::from(u8::from(northp))).floor() as i32
    } else {
        -90
    };

    #[allow(clippy::cast_possible_truncation)]
    let max_row = if band_idx < 9 {
        (c + 4.4 - 0.1 * f64::from(u8::from(northp))).floor() as i32
    } else {
        94
    };

    let base_row = (min_row + max_row) / 2 - UTM_ROW_PERIOD / 2;
    // Offset row_idx by the multiple of UTM_ROW_PERIOD which brings it as close as
    // possible to the center of the latitude band, (min_row + max_row) / 2.
    // (Add MAXUTM_S_ROW = 5 * UTM_ROW_PERIOD to ensure operand is positive.)
    let mut row_idx = (row_idx - base_row + MAXUTM_S_ROW) % UTM_ROW_PERIOD + base_row;

    if !(min_row..=max_row).contains(&row_idx) {
        // Outside the safe bounds, so need to check...
        // Northing = 71e5 and 80e5 intersect band boundaries
        //   y = 71e5 in scol = 2 (x = [3e5,4e5] and x = [6e5,7e5])
        //   y = 80e5 in scol = 1 (x = [2e5,3e5] and x = [7e5,8e5])
        // This holds for the WGS84 ellipsoid.

        // Fold [-10,-1] -> [9,0]
        let safe_band = (band_idx >= 0).ternary(band_idx, -band_idx - 1);
        // Fold [-90,-1] -> [89,0]
        let safe_row = (row_idx >= 0).ternary(row_idx, -row_idx - 1);
        // Fold [4,7] -> [3,0]
        let safe_col = (col_idx < 4).ternary(col_idx, -col_idx + 7);

        if !(
            (safe_row == 70 && safe_band == 8 && safe_col >= 2) ||
            (safe_row == 71 && safe_band == 7 && safe_col <= 2) ||
            (safe_row == 79 && safe_band == 9 && safe_col >= 1) ||
            (safe_row == 80 && safe_band == 8 && safe_col <= 1)
        ) {
            row_idx = MAXUTM_S_ROW;
        }
    }

    row_idx
}

pub(crate) fn to_latitude_band(lat: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let lat_int = lat.floor() as i32;
    (-10).max(9.min((lat_int + 80).div_euclid(8) - 10))
}

/// Checks the coordinates against the MGRS extent of a UTM zone, folds
/// northings into the hemisphere they belong to, and shifts coordinates lying
/// exactly on an open upper limit down into the last cell.
#[allow(clippy::cast_possible_truncation)]
fn check_coords(northp: bool, x: f64, y: f64) -> Result<(bool, f64, f64), Error> {
    let tile = f64::from(TILE);
    let x_int = (x / tile).floor() as i32;
    let y_int = (y / tile).floor() as i32;
    let ind = usize::from(northp);
    let label = northp.ternary("N", "S");

    let mut x_new = x;
    let mut y_new = y;

    if !(MINUTMCOL..MAXUTMCOL).contains(&x_int) {
        if x_int == MAXUTMCOL && x.eps_eq(f64::from(MAXUTMCOL) * tile) {
            x_new -= *COORD_EPS;
        } else {
            return Err(Error::InvalidCoord(
                format!(
                    "Easting {:.2}km not in MGRS/UTM range for {label} hemisphere [{:.2}km, {:.2}km)",
                    x / 1000.0,
                    MINUTMCOL * (TILE / 1000),
                    MAXUTMCOL * (TILE / 1000),
                )
            ));
        }
    }

    if !(MIN_NORTHING[ind]..MAX_NORTHING[ind]).contains(&y_int) {
        if y_int == MAX_NORTHING[ind] && y.eps_eq(f64::from(MAX_NORTHING[ind]) * tile) {
            y_new -= *COORD_EPS;
        } else {
            return Err(Error::InvalidCoord(
                format!(
                    "Northing {:.2}km not in MGRS/UTM range for {label} hemisphere [{:.2}km, {:.2}km)",
                    y / 1000.0,
                    MIN_NORTHING[ind] * (TILE / 1000),
                    MAX_NORTHING[ind] * (TILE / 1000),
                )
            ));
        }
    }

    let (northp_new, y_new) = if northp && y_int < MINUTM_N_ROW {
        log::debug!("Folding northing {y} into the southern hemisphere");
        (false, y_new + f64::from(UTM_N_SHIFT))
    } else if !northp && y_int >= MAXUTM_S_ROW {
        if y.eps_eq(f64::from(MAXUTM_S_ROW) * tile) {
            // On the equator, keep the southern hemisphere
            (northp, y_new - *COORD_EPS)
        } else {
            log::debug!("Folding northing {y} into the northern hemisphere");
            (true, y_new - f64::from(UTM_N_SHIFT))
        }
    } else {
        (northp, y_new)
    };

    Ok((northp_new, x_new, y_new))
}

/// Splits the numeric part of a reference into easting and northing digits.
#[allow(clippy::cast_sign_loss)]
fn split_digits(value: &str) -> Result<(&str, &str), Error> {
    let groups = value.split_whitespace().collect::<Vec<_>>();

    let (easting, northing) = match groups.as_slice() {
        [] => ("", ""),
        [run] => {
            if !run.bytes().all(|c| c.is_ascii_digit()) {
                return Err(Error::InvalidMgrs(format!("Encountered a non-digit in {run}")));
            }
            if run.len().is_odd() {
                return Err(Error::InvalidMgrs(format!("Not an even number of digits in {run}")));
            }
            run.split_at(run.len() / 2)
        }
        [easting, northing] => {
            if easting.len() != northing.len() {
                log::debug!("Easting {easting} and northing {northing} have different precisions");
            }
            (*easting, *northing)
        }
        _ => return Err(Error::InvalidMgrs(format!("Too many groups of digits in {value}"))),
    };

    for digits in [easting, northing] {
        if !digits.bytes().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidMgrs(format!("Encountered a non-digit in {digits}")));
        }
        if digits.len() > MAX_PRECISION as usize {
            return Err(Error::InvalidMgrs(format!("More than {MAX_PRECISION} digits in {digits}")));
        }
    }

    Ok((easting, northing))
}

/// Position in meters of the center of the cell named by `digits` within
/// the tile `tile_idx`.
#[allow(clippy::cast_precision_loss)]
fn cell_center(tile_idx: i32, digits: &str) -> f64 {
    let (value, unit) = digits
        .bytes()
        .fold((i64::from(tile_idx), 1_i64), |(value, unit), c| {
            (i64::from(BASE) * value + i64::from(c - b'0'), i64::from(BASE) * unit)
        });

    f64::from(TILE) * (2 * value + 1) as f64 / (2 * unit) as f64
}

impl ParseCoord for Mgrs {
    #[allow(clippy::too_many_lines)]
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let value = value.trim().to_ascii_uppercase();

        if value.starts_with("INV") {
            return Err(Error::InvalidMgrs("Starts with 'INV'".to_string()));
        }

        // Everything before the first digit that follows a letter is the grid
        // zone and square; the rest holds the easting/northing digits.
        let split = value
            .char_indices()
            .skip_while(|(_, c)| !c.is_ascii_alphabetic())
            .find(|(_, c)| c.is_ascii_digit())
            .map_or(value.len(), |(i, _)| i);
        let (head, digits) = value.split_at(split);
        let head = head
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>();

        if !head.is_ascii() {
            return Err(Error::InvalidMgrs(format!("Non-ASCII characters in {value}")));
        }

        let chars = head.as_bytes();

        let p = chars.iter().take_while(|c| c.is_ascii_digit()).count();

        if p == 0 {
            return Err(Error::InvalidMgrs(format!("Missing UTM zone in {value}, polar (UPS) references are not supported")));
        }

        if p > 2 {
            return Err(Error::InvalidMgrs(format!("More than 2 digits at start of MGRS {}", &head[..p])));
        }

        let zone = head[..p]
            .parse::<i32>()
            .map_err(|e| Error::InvalidMgrs(format!("Zone {} is not a number: {e}", &head[..p])))?;

        // Check if zone is within valid range
        if !(MINUTMZONE..=MAXUTMZONE).contains(&zone) {
            return Err(Error::InvalidMgrs(format!("Zone {zone} not in [{MINUTMZONE},{MAXUTMZONE}]")));
        }

        let Some(&band_char) = chars.get(p) else {
            return Err(Error::InvalidMgrs(format!("Too short: {value}")));
        };
        let band_char = band_char as char;

        if UPSBAND.contains(band_char) {
            return Err(Error::InvalidMgrs(format!("Polar band {band_char} is not supported")));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let band_idx = LATBAND
            .find(band_char)
            .ok_or_else(|| Error::InvalidMgrs(format!("Band letter {band_char} not in UTM set {LATBAND}")))? as i32;

        let northp = band_idx >= 10;
        let zonem = zone - 1;
        let square = &head[p + 1..];

        match square.len() {
            0 if digits.trim().is_empty() => {
                // Grid zone only: approx length of a degree of meridian arc in units of tile
                let deg = f64::from(UTM_N_SHIFT) / f64::from(dms::QD * TILE);
                let x = f64::from(UTMEASTING * TILE);
                let y_add = northp.ternary(0.0, f64::from(UTM_N_SHIFT));
                // Band X spans 12 degrees, 72N to 84N
                let center = if band_idx == 19 { 78.0 } else { 8.0 * (f64::from(band_idx) - 9.5) };
                let y = (center * deg + 0.5).floor() * f64::from(TILE) + y_add;

                return Ok(Mgrs {
                    utm: Utm::new(zone, Hemisphere::from_north(northp), x, y),
                    band: band_idx - 10,
                    precision: -1,
                });
            }
            0 => return Err(Error::InvalidMgrs(format!("Missing 100km square in {value}"))),
            1 => return Err(Error::InvalidMgrs(format!("Missing row letter in {value}"))),
            2 => {}
            _ => return Err(Error::InvalidMgrs(format!("Unexpected characters {} after grid zone {}", &square[2..], &head[..=p]))),
        }

        #[allow(clippy::cast_sign_loss)]
        let col = UTMCOLS[(zonem % 3) as usize];
        let col_char = square.as_bytes()[0] as char;
        let row_char = square.as_bytes()[1] as char;

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let col_idx = col
            .find(col_char)
            .ok_or_else(|| Error::InvalidMgrs(format!("Column letter {col_char} not in zone {zone} set {col}")))? as i32;

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let mut row_idx = UTMROW
            .find(row_char)
            .ok_or_else(|| Error::InvalidMgrs(format!("Row letter {row_char} not in UTM set {UTMROW}")))? as i32;

        if zonem.is_odd() {
            row_idx = (row_idx + UTM_ROW_PERIOD - UTM_EVEN_ROW_SHIFT) % UTM_ROW_PERIOD;
        }

        let band = band_idx - 10;

        row_idx = utm_row(band, col_idx, row_idx);
        if row_idx == MAXUTM_S_ROW {
            return Err(Error::InvalidMgrs(format!("Block {square} not in zone/band {}", &head[..=p])));
        }

        let row_idx = northp.ternary(row_idx, row_idx + MAXUTM_S_ROW);
        let col_idx = col_idx + MINUTMCOL;

        let (easting, northing) = split_digits(digits)?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let precision = easting.len().min(northing.len()) as i32;

        Ok(Mgrs {
            utm: Utm::new(
                zone,
                Hemisphere::from_north(northp),
                cell_center(col_idx, easting),
                cell_center(row_idx, northing),
            ),
            band,
            precision,
        })
    }
}

impl FromStr for Mgrs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_coord(s)
    }
}

impl Display for Mgrs {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}{}", self.utm.zone, self.band())?;

        if self.precision < 0 {
            return Ok(());
        }

        let zonem = self.utm.zone - 1;
        let (ix, iy) = micrometers(self.utm.easting, self.utm.northing);
        let m = i64::from(MULT) * i64::from(TILE);

        let xh = ix.div_euclid(m);
        let yh = iy.div_euclid(m);

        let col_idx = (xh - i64::from(MINUTMCOL)) as usize;
        let row_idx = (yh + i64::from(zonem.is_odd().ternary(UTM_EVEN_ROW_SHIFT, 0)))
            .rem_euclid(i64::from(UTM_ROW_PERIOD)) as usize;

        write!(
            f,
            "{}{}",
            UTMCOLS[(zonem % 3) as usize].as_bytes()[col_idx] as char,
            UTMROW.as_bytes()[row_idx] as char,
        )?;

        if self.precision > 0 {
            let d = i64::from(BASE).pow((MAX_PRECISION - self.precision) as u32);
            let ex = (ix - m * xh) / d;
            let ny = (iy - m * yh) / d;
            let width = self.precision as usize;

            write!(f, "{ex:0width$}{ny:0width$}")?;
        }

        Ok(())
    }
}
