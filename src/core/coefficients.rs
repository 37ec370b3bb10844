//! Selection of calibration coefficients.
//!
//! A calibration call builds a catalog of gain/offset pairs from up to
//! three sources (nominal, GSICS, Meirink) and resolves a single pair per
//! channel, honouring user-supplied external overrides.

use crate::constants::{meirink_coefs, meirink_epoch};
use crate::types::{
    CalibrationMode, Channel, Coefficients, MeirinkVersion, Platform, SeviriError, SeviriResult,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Coefficient pairs per calibration mode per channel.
pub type CoefficientCatalog = HashMap<CalibrationMode, HashMap<Channel, Coefficients>>;

/// Provenance of a picked coefficient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientSource {
    /// Pair from the internal catalog under the given mode.
    Mode(CalibrationMode),
    /// User-supplied override.
    External,
}

impl std::fmt::Display for CoefficientSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoefficientSource::Mode(mode) => write!(f, "{}", mode),
            CoefficientSource::External => write!(f, "EXTERNAL"),
        }
    }
}

/// Coefficient pair together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickedCoefs {
    pub coefs: Coefficients,
    pub source: CoefficientSource,
}

/// Per-channel wish: either a calibration mode or an explicit pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibChoice {
    Mode(CalibrationMode),
    External(Coefficients),
}

/// Nominal calibration coefficients from the file header.
#[derive(Debug, Clone, Copy)]
pub struct NominalCoefficients {
    pub channel: Channel,
    pub gain: f64,
    pub offset: f64,
}

impl NominalCoefficients {
    pub fn new(channel: Channel, gain: f64, offset: f64) -> Self {
        Self { channel, gain, offset }
    }

    fn contribute(&self, catalog: &mut CoefficientCatalog) {
        catalog.entry(CalibrationMode::Nominal).or_default().insert(
            self.channel,
            Coefficients {
                gain: self.gain,
                offset: self.offset,
            },
        );
    }
}

/// GSICS inter-calibration coefficients from the file header.
#[derive(Debug, Clone, Copy)]
pub struct GsicsCoefficients {
    pub channel: Channel,
    pub gain: f64,
    pub offset: f64,
}

impl GsicsCoefficients {
    pub fn new(channel: Channel, gain: f64, offset: f64) -> Self {
        Self { channel, gain, offset }
    }

    /// If no GSICS coefficients are available they are set to zero in the file.
    fn is_available(&self) -> bool {
        self.gain != 0.0 && self.offset != 0.0
    }

    fn contribute(&self, catalog: &mut CoefficientCatalog) {
        if self.is_available() {
            // The file stores the GSICS offset in counts.
            catalog.entry(CalibrationMode::Gsics).or_default().insert(
                self.channel,
                Coefficients {
                    gain: self.gain,
                    offset: self.offset * self.gain,
                },
            );
        }
    }
}

/// Re-calibration of the SEVIRI visible channels slope (see Meirink 2013).
#[derive(Debug, Clone, Copy)]
pub struct MeirinkCoefficients {
    pub platform: Platform,
    pub channel: Channel,
    pub scan_time: DateTime<Utc>,
}

impl MeirinkCoefficients {
    pub fn new(platform: Platform, channel: Channel, scan_time: DateTime<Utc>) -> Self {
        Self { platform, channel, scan_time }
    }

    /// Compute the slope for the visible channel calibration according to
    /// Meirink 2013:
    ///
    /// ```text
    /// S = A + B * 1.e-3 * Day
    /// ```
    ///
    /// S is here in uW m-2 sr-1 (cm-1)-1. EUMETSAT calibration is given in
    /// mW m-2 sr-1 (cm-1)-1, so an extra factor of 1/1000 must be applied.
    pub fn get_slope(coefs: (f64, f64), acquisition_time: DateTime<Utc>) -> f64 {
        let (a, b) = coefs;
        let delta_t = (acquisition_time - meirink_epoch()).num_seconds() as f64;
        let s = a + b * delta_t / (3600.0 * 24.0) / 1000.0;
        s / 1000.0
    }

    /// Nominal offset is reused, the re-calibration only adjusts the slope.
    fn contribute(&self, offset: f64, catalog: &mut CoefficientCatalog) {
        for version in [MeirinkVersion::V2023] {
            if let Some(pair) = meirink_coefs(version, self.platform, self.channel) {
                let gain = Self::get_slope(pair, self.scan_time);
                catalog
                    .entry(CalibrationMode::Meirink(version))
                    .or_default()
                    .insert(self.channel, Coefficients { gain, offset });
            }
        }
    }
}

/// Merge the available coefficient sources into a catalog.
pub fn create_coef_catalog(
    nominal: &NominalCoefficients,
    gsics: Option<&GsicsCoefficients>,
    meirink: Option<&MeirinkCoefficients>,
) -> CoefficientCatalog {
    let mut catalog = CoefficientCatalog::new();
    nominal.contribute(&mut catalog);
    if let Some(gsics) = gsics {
        gsics.contribute(&mut catalog);
    }
    if let Some(meirink) = meirink {
        meirink.contribute(nominal.offset, &mut catalog);
    }
    catalog
}

/// Pick the coefficient pair to use for a channel.
///
/// External overrides win unconditionally. Otherwise the wished mode is
/// looked up in the catalog, falling back to `default` and then `fallback`.
/// An exhausted lookup chain is a data integrity error: nominal
/// coefficients exist for every channel by construction.
pub struct CoefficientPicker<'a> {
    catalog: &'a CoefficientCatalog,
    wishlist: HashMap<Channel, CalibChoice>,
    default: CalibrationMode,
    fallback: CalibrationMode,
}

impl<'a> CoefficientPicker<'a> {
    pub fn new(
        catalog: &'a CoefficientCatalog,
        wishlist: HashMap<Channel, CalibChoice>,
        default: CalibrationMode,
        fallback: CalibrationMode,
    ) -> Self {
        Self { catalog, wishlist, default, fallback }
    }

    pub fn get_coefs(&self, channel: Channel) -> SeviriResult<PickedCoefs> {
        let choice = self
            .wishlist
            .get(&channel)
            .copied()
            .unwrap_or(CalibChoice::Mode(self.default));
        match choice {
            CalibChoice::External(coefs) => {
                log::info!("Using external calibration coefficients for channel {}", channel);
                Ok(PickedCoefs {
                    coefs,
                    source: CoefficientSource::External,
                })
            }
            CalibChoice::Mode(mode) => self.lookup(channel, mode),
        }
    }

    fn lookup(&self, channel: Channel, wished: CalibrationMode) -> SeviriResult<PickedCoefs> {
        for mode in [wished, self.default, self.fallback] {
            if let Some(coefs) = self.catalog.get(&mode).and_then(|m| m.get(&channel)) {
                if mode != wished {
                    log::warn!(
                        "No {} calibration coefficients for channel {}, using {} instead",
                        wished,
                        channel,
                        mode
                    );
                }
                return Ok(PickedCoefs {
                    coefs: *coefs,
                    source: CoefficientSource::Mode(mode),
                });
            }
        }
        Err(SeviriError::MissingCoefficients(channel))
    }
}
