//! Static radiometric constants for the SEVIRI instrument family.
//!
//! All tables are immutable and baked into the binary; they are safe to
//! read concurrently from any number of calibration calls.

use crate::types::{Channel, MeirinkVersion, Platform};
use chrono::{DateTime, TimeZone, Utc};

/// First radiation constant, mW m-2 sr-1 (cm-1)-4
pub const C1: f64 = 1.19104273e-5;
/// Second radiation constant, K (cm-1)-1
pub const C2: f64 = 1.43877523;

pub const VISIR_NUM_COLUMNS: usize = 3712;
pub const VISIR_NUM_LINES: usize = 3712;
pub const HRV_NUM_COLUMNS: usize = 11136;
pub const HRV_NUM_LINES: usize = 11136;

/// Nominal repeat cycle duration in minutes.
pub const REPEAT_CYCLE_DURATION: i64 = 15;
/// Repeat cycle duration of the rapid scanning service, in minutes.
pub const REPEAT_CYCLE_DURATION_RSS: i64 = 5;

/// Planck-inversion constants for one IR channel of one platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanckCoefs {
    /// Central wavenumber, cm-1
    pub vc: f64,
    pub alpha: f64,
    pub beta: f64,
}

/// Quadratic fit coefficients for the spectral-to-effective BT conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BtFitCoefs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Band solar irradiance F in mW m-2 (cm-1)-1, solar channels only.
pub fn solar_irradiance(platform: Platform, channel: Channel) -> Option<f64> {
    let f = match platform {
        // Meteosat-8
        Platform::Meteosat8 => match channel {
            Channel::Hrv => 78.7599,
            Channel::Vis006 => 65.2296,
            Channel::Vis008 => 73.0127,
            Channel::Ir016 => 62.3715,
            _ => return None,
        },
        // Meteosat-9
        Platform::Meteosat9 => match channel {
            Channel::Hrv => 79.0113,
            Channel::Vis006 => 65.2065,
            Channel::Vis008 => 73.1869,
            Channel::Ir016 => 61.9923,
            _ => return None,
        },
        // Meteosat-10
        Platform::Meteosat10 => match channel {
            Channel::Hrv => 78.9416,
            Channel::Vis006 => 65.5148,
            Channel::Vis008 => 73.1807,
            Channel::Ir016 => 62.0208,
            _ => return None,
        },
        // Meteosat-11
        Platform::Meteosat11 => match channel {
            Channel::Hrv => 79.0035,
            Channel::Vis006 => 65.2656,
            Channel::Vis008 => 73.1692,
            Channel::Ir016 => 61.9416,
            _ => return None,
        },
    };
    Some(f)
}

/// Planck constants VC/ALPHA/BETA, IR channels only.
pub fn planck_coefs(platform: Platform, channel: Channel) -> Option<PlanckCoefs> {
    let (vc, alpha, beta) = match platform {
        // Meteosat-8
        Platform::Meteosat8 => match channel {
            Channel::Ir039 => (2567.33, 0.9956, 3.41),
            Channel::Wv062 => (1598.103, 0.9962, 2.218),
            Channel::Wv073 => (1362.081, 0.9991, 0.478),
            Channel::Ir087 => (1149.069, 0.9996, 0.179),
            Channel::Ir097 => (1034.343, 0.9999, 0.06),
            Channel::Ir108 => (930.647, 0.9983, 0.625),
            Channel::Ir120 => (839.66, 0.9988, 0.397),
            Channel::Ir134 => (752.387, 0.9981, 0.578),
            _ => return None,
        },
        // Meteosat-9
        Platform::Meteosat9 => match channel {
            Channel::Ir039 => (2568.832, 0.9954, 3.438),
            Channel::Wv062 => (1600.548, 0.9963, 2.185),
            Channel::Wv073 => (1360.330, 0.9991, 0.47),
            Channel::Ir087 => (1148.620, 0.9996, 0.179),
            Channel::Ir097 => (1035.289, 0.9999, 0.056),
            Channel::Ir108 => (931.7, 0.9983, 0.64),
            Channel::Ir120 => (836.445, 0.9988, 0.408),
            Channel::Ir134 => (751.792, 0.9981, 0.561),
            _ => return None,
        },
        // Meteosat-10
        Platform::Meteosat10 => match channel {
            Channel::Ir039 => (2547.771, 0.9915, 2.9002),
            Channel::Wv062 => (1595.621, 0.9960, 2.0337),
            Channel::Wv073 => (1360.337, 0.9991, 0.4340),
            Channel::Ir087 => (1148.130, 0.9996, 0.1714),
            Channel::Ir097 => (1034.715, 0.9999, 0.0527),
            Channel::Ir108 => (929.842, 0.9983, 0.6084),
            Channel::Ir120 => (838.659, 0.9988, 0.3882),
            Channel::Ir134 => (750.653, 0.9982, 0.5390),
            _ => return None,
        },
        // Meteosat-11
        Platform::Meteosat11 => match channel {
            Channel::Ir039 => (2555.280, 0.9916, 2.9438),
            Channel::Wv062 => (1596.080, 0.9959, 2.0780),
            Channel::Wv073 => (1361.748, 0.9990, 0.4929),
            Channel::Ir087 => (1147.433, 0.9996, 0.1731),
            Channel::Ir097 => (1034.851, 0.9998, 0.0597),
            Channel::Ir108 => (931.122, 0.9983, 0.6256),
            Channel::Ir120 => (839.113, 0.9988, 0.4002),
            Channel::Ir134 => (748.585, 0.9981, 0.5635),
            _ => return None,
        },
    };
    Some(PlanckCoefs { vc, alpha, beta })
}

/// Polynomial coefficients for the spectral-effective BT fits, IR channels only.
pub fn bt_fit(channel: Channel) -> Option<BtFitCoefs> {
    let (a, b, c) = match channel {
        Channel::Ir039 => (0.0, 1.011751900, -3.550400),
        Channel::Wv062 => (0.00001805700, 1.000255533, -1.790930),
        Channel::Wv073 => (0.00000231818, 1.000668281, -0.456166),
        Channel::Ir087 => (-0.00002332000, 1.011803400, -1.507390),
        Channel::Ir097 => (-0.00002055330, 1.009370670, -1.030600),
        Channel::Ir108 => (-0.00007392770, 1.032889800, -3.296740),
        Channel::Ir120 => (-0.00007009840, 1.031314600, -3.181090),
        Channel::Ir134 => (-0.00007293450, 1.030424800, -2.645950),
        _ => return None,
    };
    Some(BtFitCoefs { a, b, c })
}

/// Epoch for the Meirink re-calibration.
pub fn meirink_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// Meirink (A, B) coefficient pair for a platform/channel, if tabulated.
///
/// A is given in uW m-2 sr-1 (cm-1)-1 and B in the same units per
/// 1000 days. From Meirink, Roebeling and Stammes, 2013:
/// Inter-calibration of polar imager solar channels using SEVIRI,
/// Atm. Meas. Tech., 6, 2495-2508, doi:10.5194/amt-6-2495-2013.
/// The 2023 entries were obtained from
/// https://msgcpp.knmi.nl/solar-channel-calibration.html
pub fn meirink_coefs(
    version: MeirinkVersion,
    platform: Platform,
    channel: Channel,
) -> Option<(f64, f64)> {
    let MeirinkVersion::V2023 = version;
    let pair = match platform {
        // Meteosat-8
        Platform::Meteosat8 => match channel {
            Channel::Vis006 => (24.346, 0.3739),
            Channel::Vis008 => (30.989, 0.3111),
            Channel::Ir016 => (22.869, 0.0065),
            _ => return None,
        },
        // Meteosat-9
        Platform::Meteosat9 => match channel {
            Channel::Vis006 => (21.026, 0.2556),
            Channel::Vis008 => (26.875, 0.1835),
            Channel::Ir016 => (21.394, 0.0498),
            _ => return None,
        },
        // Meteosat-10
        Platform::Meteosat10 => match channel {
            Channel::Vis006 => (19.829, 0.5856),
            Channel::Vis008 => (25.284, 0.6787),
            Channel::Ir016 => (23.066, -0.0286),
            _ => return None,
        },
        // Meteosat-11
        Platform::Meteosat11 => match channel {
            Channel::Vis006 => (20.515, 0.3600),
            Channel::Vis008 => (25.803, 0.4844),
            Channel::Ir016 => (22.354, -0.0187),
            _ => return None,
        },
    };
    Some(pair)
}
