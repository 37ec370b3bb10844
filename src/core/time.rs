//! CDS time decoding and repeat-cycle helpers.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

fn cds_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1958, 1, 1, 0, 0, 0).unwrap()
}

/// Compute a timestamp from days since 1958-01-01 and milliseconds of day.
///
/// The exact epoch (days=0, msecs=0) is the fill value in the level 1.5
/// headers and decodes to `None`.
pub fn get_cds_time(days: i64, msecs: i64) -> Option<DateTime<Utc>> {
    if days == 0 && msecs == 0 {
        return None;
    }
    Some(cds_epoch() + Duration::days(days) + Duration::milliseconds(msecs))
}

/// Decode parallel day/millisecond vectors, e.g. scanline acquisition times.
pub fn get_cds_time_slice(days: &[i64], msecs: &[i64]) -> Vec<Option<DateTime<Utc>>> {
    days.iter()
        .zip(msecs)
        .map(|(&d, &m)| get_cds_time(d, m))
        .collect()
}

/// Round a timestamp to a multiple of the given duration, e.g. the nominal
/// repeat cycle start to a multiple of 15 minutes.
pub fn round_nom_time(date: DateTime<Utc>, time_delta: Duration) -> DateTime<Utc> {
    let round_to = time_delta.num_seconds();
    if round_to <= 0 {
        return date;
    }
    let seconds = date.time().num_seconds_from_midnight() as i64;
    let rounding = (seconds + round_to / 2) / round_to * round_to;
    date + Duration::seconds(rounding - seconds)
        - Duration::microseconds(date.timestamp_subsec_micros() as i64)
}
