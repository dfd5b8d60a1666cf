use std::f64::consts::PI;

use num::Complex;

use crate::{latlon::LatLon, utility::{polyval, GeoMath, dms}, ThisOrThat, constants::{WGS84_A, WGS84_F, UTM_K0}};

// ================================
// Transverse Mercator Constants
// ================================

// Krüger series to sixth order in the third flattening n
const B1_COEFF: [f64; 5] = [
    // b1*(n+1), polynomial in n2 of order 3
    1., 4., 64., 256., 256.,
];  // count = 5

#[allow(clippy::unreadable_literal)]
const ALP_COEFF: [f64; 27] = [
    // alp[1]/n^1, polynomial in n of order 5
    31564., -66675., 34440., 47250., -100800., 75600., 151200.,
    // alp[2]/n^2, polynomial in n of order 4
    -1983433., 863232., 748608., -1161216., 524160., 1935360.,
    // alp[3]/n^3, polynomial in n of order 3
    670412., 406647., -533952., 184464., 725760.,
    // alp[4]/n^4, polynomial in n of order 2
    6601661., -7732800., 2230245., 7257600.,
    // alp[5]/n^5, polynomial in n of order 1
    -13675556., 3438171., 7983360.,
    // alp[6]/n^6, polynomial in n of order 0
    212378941., 319334400.,
];  // count = 27

#[allow(clippy::unreadable_literal)]
const BET_COEFF: [f64; 27] = [
    // bet[1]/n^1, polynomial in n of order 5
    384796., -382725., -6720., 932400., -1612800., 1209600., 2419200.,
    // bet[2]/n^2, polynomial in n of order 4
    -1118711., 1695744., -1174656., 258048., 80640., 3870720.,
    // bet[3]/n^3, polynomial in n of order 3
    22276., -16929., -15984., 12852., 362880.,
    // bet[4]/n^4, polynomial in n of order 2
    -830251., -158400., 197865., 7257600.,
    // bet[5]/n^5, polynomial in n of order 1
    -435388., 453717., 15966720.,
    // bet[6]/n^6, polynomial in n of order 0
    20648693., 638668800.,
];  // count = 27

const MAXPOW: usize = 6;

const A: f64 = WGS84_A;
const F: f64 = WGS84_F;
const M: usize = MAXPOW / 2;
const N: f64 = F / (2. - F);
const E2: f64 = F * (2. - F);

/// Transverse Mercator projection of the WGS84 ellipsoid. Works in meters
/// relative to the central meridian and the equator; false easting and
/// northing are applied by the caller.
pub(crate) struct TransverseMercator {
    k0: f64,
    es: f64,
    a1: f64,
    alp: [f64; MAXPOW + 1],
    bet: [f64; MAXPOW + 1],
}

impl TransverseMercator {
    pub fn utm() -> TransverseMercator {
        let es = (F < 0.).ternary(-1., 1.) * E2.abs().sqrt();

        let b1 = polyval(&B1_COEFF[0..=M], N.powi(2)) / (B1_COEFF[M + 1] * (1. + N));
        // a1 is the equivalent radius for computing the circumference of
        // ellipse.
        let a1 = b1 * A;

        let mut alp = [0_f64; MAXPOW + 1];
        let mut bet = [0_f64; MAXPOW + 1];

        let mut o = 0;
        let mut d = N;

        for l in 1..=MAXPOW {
            let m = MAXPOW - l;
            alp[l] = d * polyval(&ALP_COEFF[o..=o+m], N) / ALP_COEFF[o + m + 1];
            bet[l] = d * polyval(&BET_COEFF[o..=o+m], N) / BET_COEFF[o + m + 1];
            o += m + 2;
            d *= N;
        }

        Self {
            k0: UTM_K0,
            es,
            a1,
            alp,
            bet,
        }
    }

    /// Projects `lat`/`lon` onto the plane tangent along `lon0`. Returns `(x, y)`.
    pub fn from_latlon(&self, lon0: f64, lat: f64, lon: f64) -> (f64, f64) {
        let lon = lon0.ang_diff(lon);

        let mut lat_sign = lat.is_sign_negative().ternary(-1., 1.);
        let lon_sign = lon.is_sign_negative().ternary(-1., 1.);

        let lat = lat * lat_sign;
        let mut lon = lon * lon_sign;

        let backside = lon > f64::from(dms::QD);
        if backside {
            if lat.is_zero() {
                lat_sign = -1.;
            }
            lon = f64::from(dms::HD) - lon;
        }

        let (sphi, cphi) = lat.to_radians().sin_cos();
        let (slam, clam) = lon.to_radians().sin_cos();

        let (xip, etap) = if lat.eps_eq(f64::from(dms::QD)) {
            (PI / 2., 0.)
        } else {
            let taup = (sphi / cphi).taupf(self.es);
            (taup.atan2(clam), (slam / taup.hypot(clam)).asinh())
        };

        let c0 = (2. * xip).cos();
        let ch0 = (2. * etap).cosh();
        let s0 = (2. * xip).sin();
        let sh0 = (2. * etap).sinh();

        let a = Complex::new(2. * c0 * ch0, -2. * s0 * sh0);
        let mut n = MAXPOW;

        let mut y0 = Complex::new((n % 2 == 1).ternary(self.alp[n], 0.), 0.);
        let mut y1 = Complex::default();

        if n % 2 == 1 {
            n -= 1;
        }

        // Clenshaw summation of the alpha series
        while n > 0 {
            y1 = a * y0 - y1 + self.alp[n];
            n -= 1;
            y0 = a * y1 - y0 + self.alp[n];
            n -= 1;
        }

        let a = Complex::new(s0 * ch0, c0 * sh0);
        let y1 = Complex::new(xip, etap) + a * y0;

        let xi = backside.ternary(PI - y1.re, y1.re);
        let eta = y1.im;

        let x = self.a1 * self.k0 * eta * lon_sign;
        let y = self.a1 * self.k0 * xi * lat_sign;

        (x, y)
    }

    /// Inverse of [`TransverseMercator::from_latlon`]. The returned longitude
    /// is normalized into [-180, 180).
    pub fn to_latlon(&self, lon0: f64, x: f64, y: f64) -> LatLon {
        let mut xi = y / (self.a1 * self.k0);
        let mut eta = x / (self.a1 * self.k0);

        let xi_sign = xi.is_sign_negative().ternary(-1., 1.);
        let eta_sign = eta.is_sign_negative().ternary(-1., 1.);

        xi *= xi_sign;
        eta *= eta_sign;

        let backside = xi > PI/2.;
        if backside {
            xi = PI - xi;
        }

        let c0 = (2. * xi).cos();
        let ch0 = (2. * eta).cosh();
        let s0 = (2. * xi).sin();
        let sh0 = (2. * eta).sinh();

        let a = Complex::new(2. * c0 * ch0, -2. * s0 * sh0);
        let mut n = MAXPOW;

        let mut y0 = Complex::new((n % 2 == 1).ternary(-self.bet[n], 0.), 0.);
        let mut y1 = Complex::default();

        if n % 2 == 1 {
            n -= 1;
        }

        while n > 0 {
            y1 = a * y0 - y1 - self.bet[n];
            n -= 1;
            y0 = a * y1 - y0 - self.bet[n];
            n -= 1;
        }

        let a = Complex::new(s0 * ch0, c0 * sh0);
        let y1 = Complex::new(xi, eta) + a * y0;
        // Ignoring k and gamma

        let xip = y1.re;
        let etap = y1.im;
        let s = etap.sinh();
        let c = 0_f64.max(xip.cos());
        let r = s.hypot(c);

        let (mut lat, mut lon) = if r.is_zero() {
            (f64::from(dms::QD), 0.)
        } else {
            let lon = s.atan2(c).to_degrees();
            let tau = (xip.sin() / r).tauf(self.es);

            (tau.atan().to_degrees(), lon)
        };

        lat *= xi_sign;
        if backside {
            lon = f64::from(dms::HD) - lon;
        }
        lon *= eta_sign;

        LatLon::new(lat, (lon + lon0).ang_normalize())
    }
}
