//! sevirine: A Fast, Modular SEVIRI Level 1.5 Calibration and Orbit Toolkit
//!
//! This library converts raw SEVIRI instrument counts into radiance,
//! reflectance and brightness temperature, and derives the satellite
//! position at arbitrary timestamps from the orbit polynomials stored in
//! the level 1.5 headers. File format decoding and I/O are out of scope;
//! the caller hands in pre-parsed arrays and header fields.
//!
//! # Calibration
//!
//! Counts are converted to radiance with one of several coefficient
//! sources, selected per channel via [`CalibrationMode`]:
//!
//! - `NOMINAL`: the nominal coefficients from the file header (default).
//! - `GSICS`: inter-calibration coefficients where available (IR
//!   channels); channels without GSICS entries fall back to nominal.
//! - `MEIRINK-2023`: visible-channel slopes from an inter-calibration
//!   with Aqua-MODIS (Meirink et al. 2013), drifting linearly with time.
//!
//! External coefficients take precedence over all of the above and can be
//! mixed per channel: channels without an override use the chosen mode.
//! Coefficients must be given in mW m-2 sr-1 (cm-1)-1.
//!
//! Solar channels are further calibrated to reflectance, including the
//! Sun-Earth distance correction recommended by EUMETSAT; IR channels to
//! brightness temperature using the spectral or effective radiance model
//! selected by the header's radiance-type flag.
//!
//! ```
//! use sevirine::core::{create_coef_catalog, NominalCoefficients};
//! use sevirine::core::{CalibParams, CalibrationHandler, ScanParams};
//! use sevirine::{CalibrationLevel, CalibrationMode, Channel, Platform};
//! use chrono::{TimeZone, Utc};
//! use ndarray::array;
//!
//! let nominal = NominalCoefficients::new(Channel::Ir108, 0.2156, -10.4);
//! let handler = CalibrationHandler::new(
//!     CalibParams {
//!         mode: CalibrationMode::Nominal,
//!         internal_coefs: create_coef_catalog(&nominal, None, None),
//!         external_coefs: Default::default(),
//!         radiance_type: 2,
//!     },
//!     ScanParams {
//!         platform: Platform::Meteosat11,
//!         channel: Channel::Ir108,
//!         scan_time: Utc.with_ymd_and_hms(2020, 6, 10, 12, 0, 0).unwrap(),
//!     },
//! );
//! let counts = array![[0.0_f32, 200.0, 700.0]];
//! let bt = handler
//!     .calibrate(&counts, CalibrationLevel::BrightnessTemperature)
//!     .unwrap();
//! assert!(bt[[0, 0]].is_nan());
//! assert!(bt[[0, 2]] > bt[[0, 1]]);
//! ```
//!
//! # Orbit
//!
//! [`core::OrbitPolynomialFinder`] selects the Chebyshev polynomial set
//! whose validity interval covers a query time (closest match within a
//! bounded window when none does), and [`core::get_satpos`] evaluates it
//! to a geodetic position.
//!
//! # Quality masking
//!
//! [`core::mask_bad_quality`] replaces scan lines flagged bad by the
//! per-line quality records with NaN.

pub mod constants;
pub mod core;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    CalibrationLevel, CalibrationMode, Channel, ChannelImage, Coefficients, LineFlags,
    MeirinkVersion, Platform, SeviriError, SeviriResult,
};

pub use core::{CalibrationHandler, OrbitPolynomial, OrbitPolynomialFinder};
