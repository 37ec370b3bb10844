//! Satellite position from orbit polynomials.
//!
//! The satellite operator encodes the orbit as a catalog of 8th-order
//! Chebyshev polynomials, each valid over a bounded time interval.
//! Reference: Appendix A in the MSG Level 1.5 Image Data Format
//! Description.

use crate::core::time::get_cds_time;
use crate::types::{SeviriError, SeviriResult};
use chrono::{DateTime, Duration, Utc};

/// Default search window for the closest-interval fallback, in hours.
pub const DEFAULT_MAX_DELTA_HOURS: i64 = 6;

/// Evaluate a Chebyshev polynomial over the given domain.
///
/// The header stores the leading coefficient doubled relative to the
/// standard basis, hence the `0.5 * c0` subtraction.
pub fn chebyshev(coefs: &[f64], time: f64, domain: (f64, f64)) -> f64 {
    if coefs.is_empty() {
        return 0.0;
    }
    let (left, right) = domain;
    let t = (2.0 * time - (left + right)) / (right - left);
    // Clenshaw recurrence
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for &c in coefs.iter().skip(1).rev() {
        let next = 2.0 * t * b1 - b2 + c;
        b2 = b1;
        b1 = next;
    }
    t * b1 - b2 + coefs[0] - 0.5 * coefs[0]
}

/// Evaluate Chebyshev polynomials for three dimensions (x, y, z).
///
/// All three coefficient sets must be defined over the same domain.
pub fn chebyshev_3d(
    coefs: &(Vec<f64>, Vec<f64>, Vec<f64>),
    time: f64,
    domain: (f64, f64),
) -> (f64, f64, f64) {
    let (x_coefs, y_coefs, z_coefs) = coefs;
    (
        chebyshev(x_coefs, time, domain),
        chebyshev(y_coefs, time, domain),
        chebyshev(z_coefs, time, domain),
    )
}

/// Polynomial encoding the satellite position over one validity interval.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPolynomial {
    /// (x, y, z) Chebyshev coefficient vectors, in kilometers.
    pub coefs: (Vec<f64>, Vec<f64>, Vec<f64>),
    pub start_time: DateTime<Utc>,
    /// Exclusive end of the validity interval.
    pub end_time: DateTime<Utc>,
}

impl OrbitPolynomial {
    /// Get the satellite position in earth-centered cartesian coordinates.
    ///
    /// Returns (x, y, z) in meters.
    pub fn evaluate(&self, time: DateTime<Utc>) -> (f64, f64, f64) {
        let domain = (
            self.start_time.timestamp_micros() as f64,
            self.end_time.timestamp_micros() as f64,
        );
        let t = time.timestamp_micros() as f64;
        let (x, y, z) = chebyshev_3d(&self.coefs, t, domain);
        (x * 1000.0, y * 1000.0, z * 1000.0)
    }
}

/// Raw orbit polynomial record as stored in the level 1.5 header.
///
/// Validity bounds are CDS times (days and milliseconds of day since
/// 1958-01-01); the exact epoch marks a missing entry.
#[derive(Debug, Clone)]
pub struct OrbitRecord {
    pub start_day: i64,
    pub start_msec: i64,
    pub end_day: i64,
    pub end_msec: i64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Find the orbit polynomial applicable at a given timestamp.
///
/// Validity intervals are generally non-overlapping, but there are
/// intentional gaps around satellite manoeuvres: flight dynamics products
/// describe the orbit before and after a manoeuvre separately and never
/// interpolate across it. The two pre-manoeuvre element sets may also
/// overlap, in which case they describe the same orbit with negligible
/// variation.
pub struct OrbitPolynomialFinder {
    polynomials: Vec<OrbitPolynomial>,
}

impl OrbitPolynomialFinder {
    pub fn new(polynomials: Vec<OrbitPolynomial>) -> Self {
        Self { polynomials }
    }

    /// Build the catalog from raw header records, skipping entries whose
    /// validity bounds carry the fill value.
    pub fn from_records(records: &[OrbitRecord]) -> Self {
        let polynomials = records
            .iter()
            .filter_map(|r| {
                let start_time = get_cds_time(r.start_day, r.start_msec)?;
                let end_time = get_cds_time(r.end_day, r.end_msec)?;
                Some(OrbitPolynomial {
                    coefs: (r.x.clone(), r.y.clone(), r.z.clone()),
                    start_time,
                    end_time,
                })
            })
            .collect();
        Self::new(polynomials)
    }

    pub fn polynomials(&self) -> &[OrbitPolynomial] {
        &self.polynomials
    }

    /// Get the orbit polynomial valid for the given time.
    ///
    /// If several intervals enclose the timestamp the most recently issued
    /// one wins. With no enclosing interval, the interval whose centre is
    /// closest is used instead - but only within `max_delta` hours, and a
    /// warning is emitted.
    pub fn get_orbit_polynomial(
        &self,
        time: DateTime<Utc>,
        max_delta: i64,
    ) -> SeviriResult<OrbitPolynomial> {
        if let Some(index) = self.enclosing_interval(time) {
            return Ok(self.polynomials[index].clone());
        }
        let (index, distance) = self
            .closest_interval(time)
            .ok_or(SeviriError::NoValidOrbitParams { time, max_delta })?;
        if distance < Duration::hours(max_delta) {
            log::warn!("No orbit polynomial valid for {}. Using closest match.", time);
            Ok(self.polynomials[index].clone())
        } else {
            Err(SeviriError::NoValidOrbitParams { time, max_delta })
        }
    }

    /// Index of the enclosing interval with the latest start, if any.
    fn enclosing_interval(&self, time: DateTime<Utc>) -> Option<usize> {
        self.polynomials
            .iter()
            .enumerate()
            .filter(|(_, p)| p.start_time <= time && time < p.end_time)
            .max_by_key(|(_, p)| p.start_time)
            .map(|(index, _)| index)
    }

    /// Index of the interval whose centre is closest, and its distance.
    fn closest_interval(&self, time: DateTime<Utc>) -> Option<(usize, Duration)> {
        self.polynomials
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let centre = p.start_time + (p.end_time - p.start_time) / 2;
                let distance = if time >= centre { time - centre } else { centre - time };
                (index, distance)
            })
            .min_by_key(|&(_, distance)| distance)
    }
}

/// Get the satellite position in geodetic coordinates.
///
/// Evaluates the polynomial at `time` and converts the earth-centered
/// cartesian result to longitude [deg east], latitude [deg north] and
/// altitude [m] on the ellipsoid given by its semi-major and semi-minor
/// axes in meters.
pub fn get_satpos(
    orbit_polynomial: &OrbitPolynomial,
    time: DateTime<Utc>,
    semi_major_axis: f64,
    semi_minor_axis: f64,
) -> (f64, f64, f64) {
    let (x, y, z) = orbit_polynomial.evaluate(time);
    ecef_to_geodetic(x, y, z, semi_major_axis, semi_minor_axis)
}

/// Closed-form (Bowring) conversion from earth-centered cartesian to
/// geodetic coordinates.
fn ecef_to_geodetic(x: f64, y: f64, z: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let e2 = (a * a - b * b) / (a * a);
    let ep2 = (a * a - b * b) / (b * b);
    let p = (x * x + y * y).sqrt();
    let theta = (z * a).atan2(p * b);
    let lon = y.atan2(x);
    let lat = (z + ep2 * b * theta.sin().powi(3)).atan2(p - e2 * a * theta.cos().powi(3));
    let n = a / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
    let alt = p / lat.cos() - n;
    (lon.to_degrees(), lat.to_degrees(), alt)
}
