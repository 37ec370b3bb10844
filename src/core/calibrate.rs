//! Conversion of raw counts to radiance, reflectance and brightness
//! temperature.

use crate::constants::{bt_fit, planck_coefs, solar_irradiance, C1, C2};
use crate::core::coefficients::{CalibChoice, CoefficientPicker, CoefficientCatalog, PickedCoefs};
use crate::types::{
    CalibrationLevel, CalibrationMode, Channel, ChannelImage, Coefficients, Platform, SeviriError,
    SeviriResult,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashMap;

/// Sun-Earth distance in AU for the given time.
///
/// Harmonic approximation around the perihelion (Jan 3), good to ~1e-4 AU.
pub fn sun_earth_distance(time: DateTime<Utc>) -> f64 {
    let day_of_year = time.ordinal() as f64 + time.num_seconds_from_midnight() as f64 / 86400.0;
    1.0 - 0.0167 * (2.0 * std::f64::consts::PI * (day_of_year - 3.0) / 365.256363).cos()
}

/// Scale reflectances to their value at 1 AU.
///
/// The solar irradiance reaching the Earth varies with the inverse square
/// of the Sun-Earth distance.
pub fn apply_earthsun_distance_correction(
    reflectance: &ChannelImage,
    time: DateTime<Utc>,
) -> ChannelImage {
    let d = sun_earth_distance(time);
    let corr = (d * d) as f32;
    reflectance.mapv(|r| r * corr)
}

/// SEVIRI calibration algorithms.
///
/// Pure physical transforms; coefficient selection lives in
/// [`CalibrationHandler`].
#[derive(Debug, Clone, Copy)]
pub struct CalibrationAlgorithm {
    platform: Platform,
    scan_time: DateTime<Utc>,
}

impl CalibrationAlgorithm {
    pub fn new(platform: Platform, scan_time: DateTime<Utc>) -> Self {
        Self { platform, scan_time }
    }

    /// Calibrate counts to radiance.
    ///
    /// Non-positive counts carry no signal and become NaN; the linear
    /// transform is clipped at zero so no negative radiance escapes.
    pub fn convert_to_radiance(
        &self,
        counts: &ChannelImage,
        gain: f32,
        offset: f32,
    ) -> ChannelImage {
        counts.mapv(|c| {
            if c > 0.0 {
                (c * gain + offset).max(0.0)
            } else {
                f32::NAN
            }
        })
    }

    /// Parallel counts-to-radiance conversion for full-disk images.
    ///
    /// Scan lines are independent, so the image is split along the line
    /// axis and each line converted on its own worker.
    #[cfg(feature = "parallel")]
    pub fn convert_to_radiance_parallel(
        &self,
        counts: &ChannelImage,
        gain: f32,
        offset: f32,
    ) -> ChannelImage {
        use ndarray::Axis;
        use rayon::prelude::*;

        let mut radiance = counts.to_owned();
        radiance
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut line| {
                line.mapv_inplace(|c| {
                    if c > 0.0 {
                        (c * gain + offset).max(0.0)
                    } else {
                        f32::NAN
                    }
                })
            });
        radiance
    }

    /// Calibrate radiance to reflectance [%].
    ///
    /// Uses the method described in "Conversion from radiances to
    /// reflectances for SEVIRI warm channels",
    /// https://www-cdn.eumetsat.int/files/2020-04/pdf_msg_seviri_rad2refl.pdf
    pub fn vis_calibrate(&self, radiance: &ChannelImage, solar_irradiance: f64) -> ChannelImage {
        let scale = (std::f64::consts::PI * 100.0 / solar_irradiance) as f32;
        let reflectance = radiance.mapv(|l| l * scale);
        apply_earthsun_distance_correction(&reflectance, self.scan_time)
    }

    /// Calibrate radiance to brightness temperature.
    ///
    /// `cal_type` is the radiance-type flag from the file header:
    /// 1 for spectral radiance, 2 for effective radiance.
    pub fn ir_calibrate(
        &self,
        radiance: &ChannelImage,
        channel: Channel,
        cal_type: u8,
    ) -> SeviriResult<ChannelImage> {
        match cal_type {
            1 => self.srads2bt(radiance, channel),
            2 => self.erads2bt(radiance, channel),
            other => Err(SeviriError::UnknownCalibrationType(other)),
        }
    }

    /// Convert spectral radiance to brightness temperature.
    fn srads2bt(&self, radiance: &ChannelImage, channel: Channel) -> SeviriResult<ChannelImage> {
        let fit = bt_fit(channel).ok_or(SeviriError::InvalidCalibration {
            calibration: CalibrationLevel::BrightnessTemperature,
            channel,
        })?;
        let vc = self.wavenumber(channel)?;
        Ok(radiance.mapv(|l| {
            let temp = tl15(l as f64, vc);
            (fit.a * temp * temp + fit.b * temp + fit.c) as f32
        }))
    }

    /// Convert effective radiance to brightness temperature.
    fn erads2bt(&self, radiance: &ChannelImage, channel: Channel) -> SeviriResult<ChannelImage> {
        let coefs = planck_coefs(self.platform, channel).ok_or(SeviriError::InvalidCalibration {
            calibration: CalibrationLevel::BrightnessTemperature,
            channel,
        })?;
        Ok(radiance.mapv(|l| ((tl15(l as f64, coefs.vc) - coefs.beta) / coefs.alpha) as f32))
    }

    fn wavenumber(&self, channel: Channel) -> SeviriResult<f64> {
        planck_coefs(self.platform, channel)
            .map(|c| c.vc)
            .ok_or(SeviriError::InvalidCalibration {
                calibration: CalibrationLevel::BrightnessTemperature,
                channel,
            })
    }
}

/// Compute the L15 equivalent blackbody temperature.
fn tl15(radiance: f64, wavenumber: f64) -> f64 {
    (C2 * wavenumber) / ((1.0 / radiance) * C1 * wavenumber.powi(3) + 1.0).ln()
}

/// Calibration configuration for one scan.
#[derive(Debug, Clone)]
pub struct CalibParams {
    pub mode: CalibrationMode,
    pub internal_coefs: CoefficientCatalog,
    pub external_coefs: HashMap<Channel, Coefficients>,
    /// Radiance-type flag from the file header (1 or 2).
    pub radiance_type: u8,
}

/// Identity of one scan of one channel.
#[derive(Debug, Clone, Copy)]
pub struct ScanParams {
    pub platform: Platform,
    pub channel: Channel,
    pub scan_time: DateTime<Utc>,
}

/// Calibration handler for SEVIRI HRIT-, native- and netCDF-formats.
///
/// Handles selection of calibration coefficients and calls the appropriate
/// calibration algorithm.
pub struct CalibrationHandler {
    calib_params: CalibParams,
    scan_params: ScanParams,
    algo: CalibrationAlgorithm,
}

impl CalibrationHandler {
    pub fn new(calib_params: CalibParams, scan_params: ScanParams) -> Self {
        let algo = CalibrationAlgorithm::new(scan_params.platform, scan_params.scan_time);
        Self { calib_params, scan_params, algo }
    }

    /// Calibrate the given counts to the requested level.
    pub fn calibrate(
        &self,
        counts: &ChannelImage,
        calibration: CalibrationLevel,
    ) -> SeviriResult<ChannelImage> {
        // Configuration problems must surface before any array work.
        self.check_level(calibration)?;
        if calibration == CalibrationLevel::Counts {
            return Ok(counts.clone());
        }

        let picked = self.get_coefs()?;
        log::debug!(
            "Calibrating channel {} to {} with {} coefficients (gain={}, offset={})",
            self.scan_params.channel,
            calibration,
            picked.source,
            picked.coefs.gain,
            picked.coefs.offset
        );
        let radiance = self.algo.convert_to_radiance(
            counts,
            picked.coefs.gain as f32,
            picked.coefs.offset as f32,
        );

        match calibration {
            CalibrationLevel::Radiance => Ok(radiance),
            CalibrationLevel::Reflectance => {
                let f = solar_irradiance(self.scan_params.platform, self.scan_params.channel)
                    .ok_or(SeviriError::InvalidCalibration {
                        calibration,
                        channel: self.scan_params.channel,
                    })?;
                Ok(self.algo.vis_calibrate(&radiance, f))
            }
            CalibrationLevel::BrightnessTemperature => self.algo.ir_calibrate(
                &radiance,
                self.scan_params.channel,
                self.calib_params.radiance_type,
            ),
            CalibrationLevel::Counts => unreachable!("handled above"),
        }
    }

    /// Get the calibration coefficients resolved for this channel.
    pub fn get_coefs(&self) -> SeviriResult<PickedCoefs> {
        let picker = CoefficientPicker::new(
            &self.calib_params.internal_coefs,
            self.calib_wishlist(),
            CalibrationMode::Nominal,
            CalibrationMode::Nominal,
        );
        picker.get_coefs(self.scan_params.channel)
    }

    /// Every channel wants the global mode, external overrides layered on top.
    fn calib_wishlist(&self) -> HashMap<Channel, CalibChoice> {
        let mut wishlist: HashMap<Channel, CalibChoice> = Channel::ALL
            .iter()
            .map(|&ch| (ch, CalibChoice::Mode(self.calib_params.mode)))
            .collect();
        for (&channel, &coefs) in &self.calib_params.external_coefs {
            wishlist.insert(channel, CalibChoice::External(coefs));
        }
        wishlist
    }

    fn check_level(&self, calibration: CalibrationLevel) -> SeviriResult<()> {
        let channel = self.scan_params.channel;
        match calibration {
            CalibrationLevel::Reflectance if !channel.is_visible() => {
                Err(SeviriError::InvalidCalibration { calibration, channel })
            }
            CalibrationLevel::BrightnessTemperature if channel.is_visible() => {
                Err(SeviriError::InvalidCalibration { calibration, channel })
            }
            CalibrationLevel::BrightnessTemperature
                if !matches!(self.calib_params.radiance_type, 1 | 2) =>
            {
                Err(SeviriError::UnknownCalibrationType(self.calib_params.radiance_type))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coefficients::{create_coef_catalog, NominalCoefficients};
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use ndarray::array;

    fn scan_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 6, 10, 12, 0, 0).unwrap()
    }

    fn algo() -> CalibrationAlgorithm {
        CalibrationAlgorithm::new(Platform::Meteosat11, scan_time())
    }

    fn ir108_handler(radiance_type: u8) -> CalibrationHandler {
        let nominal = NominalCoefficients::new(Channel::Ir108, 0.2156, -10.4);
        let calib_params = CalibParams {
            mode: CalibrationMode::Nominal,
            internal_coefs: create_coef_catalog(&nominal, None, None),
            external_coefs: HashMap::new(),
            radiance_type,
        };
        let scan_params = ScanParams {
            platform: Platform::Meteosat11,
            channel: Channel::Ir108,
            scan_time: scan_time(),
        };
        CalibrationHandler::new(calib_params, scan_params)
    }

    #[test]
    fn test_convert_to_radiance_masks_non_positive_counts() {
        let counts = array![[0.0_f32, -5.0, 100.0, 1023.0]];
        let radiance = algo().convert_to_radiance(&counts, 0.2156, -10.4);
        assert!(radiance[[0, 0]].is_nan());
        assert!(radiance[[0, 1]].is_nan());
        assert_abs_diff_eq!(radiance[[0, 2]], 100.0 * 0.2156 - 10.4, epsilon = 1e-4);
        assert!(radiance.iter().all(|&r| r.is_nan() || r >= 0.0));
    }

    #[test]
    fn test_convert_to_radiance_clips_negative_results() {
        // Small counts with a negative offset would go below zero.
        let counts = array![[1.0_f32, 2.0]];
        let radiance = algo().convert_to_radiance(&counts, 0.2156, -10.4);
        assert_eq!(radiance[[0, 0]], 0.0);
        assert_eq!(radiance[[0, 1]], 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_radiance_matches_serial() {
        let counts = array![
            [0.0_f32, -1.0, 1.0, 100.0, 1023.0],
            [50.0, 0.0, 500.0, 900.0, 48.0],
        ];
        let serial = algo().convert_to_radiance(&counts, 0.2156, -10.4);
        let parallel = algo().convert_to_radiance_parallel(&counts, 0.2156, -10.4);
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    #[test]
    fn test_ir_calibration_types_are_distinct_formulas() {
        let radiance = array![[5.0_f32, 20.0, 60.0, 100.0]];
        let bt1 = algo().ir_calibrate(&radiance, Channel::Ir108, 1).unwrap();
        let bt2 = algo().ir_calibrate(&radiance, Channel::Ir108, 2).unwrap();
        for (a, b) in bt1.iter().zip(bt2.iter()) {
            assert!((a - b).abs() > 1e-3);
        }
    }

    #[test]
    fn test_ir_calibration_monotonic_in_radiance() {
        let radiance = array![[5.0_f32, 20.0, 60.0, 100.0, 150.0]];
        for cal_type in [1, 2] {
            let bt = algo()
                .ir_calibrate(&radiance, Channel::Ir108, cal_type)
                .unwrap();
            for w in bt.as_slice().unwrap().windows(2) {
                assert!(w[1] > w[0], "BT not monotonic for type {}", cal_type);
            }
        }
    }

    #[test]
    fn test_ir_calibrate_plausible_temperature() {
        // ~80 mW m-2 sr-1 (cm-1)-1 at 10.8um corresponds to a warm scene.
        let radiance = array![[80.0_f32]];
        let bt = algo().ir_calibrate(&radiance, Channel::Ir108, 2).unwrap();
        assert!(bt[[0, 0]] > 250.0 && bt[[0, 0]] < 310.0);
    }

    #[test]
    fn test_unknown_radiance_type_is_fatal() {
        let radiance = array![[5.0_f32]];
        let err = algo().ir_calibrate(&radiance, Channel::Ir108, 3).unwrap_err();
        assert!(matches!(err, SeviriError::UnknownCalibrationType(3)));
    }

    #[test]
    fn test_vis_calibrate_scales_by_solar_irradiance() {
        let radiance = array![[10.0_f32]];
        let refl = algo().vis_calibrate(&radiance, 65.2656);
        let d = sun_earth_distance(scan_time());
        let expected = 10.0 * std::f64::consts::PI * 100.0 / 65.2656 * d * d;
        assert_abs_diff_eq!(refl[[0, 0]] as f64, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_sun_earth_distance_seasonal_range() {
        let perihelion = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap();
        let aphelion = Utc.with_ymd_and_hms(2020, 7, 4, 0, 0, 0).unwrap();
        assert!(sun_earth_distance(perihelion) < 0.984);
        assert!(sun_earth_distance(aphelion) > 1.016);
    }

    #[test]
    fn test_counts_level_is_identity() {
        let handler = ir108_handler(2);
        let counts = array![[0.0_f32, 50.0, 1023.0]];
        let out = handler.calibrate(&counts, CalibrationLevel::Counts).unwrap();
        assert_eq!(out, counts);
    }

    #[test]
    fn test_reflectance_for_ir_channel_fails_before_computation() {
        let handler = ir108_handler(2);
        let counts = array![[50.0_f32]];
        let err = handler
            .calibrate(&counts, CalibrationLevel::Reflectance)
            .unwrap_err();
        assert!(matches!(
            err,
            SeviriError::InvalidCalibration {
                calibration: CalibrationLevel::Reflectance,
                channel: Channel::Ir108,
            }
        ));
    }

    #[test]
    fn test_bad_radiance_type_fails_before_computation() {
        let handler = ir108_handler(7);
        let counts = array![[50.0_f32]];
        let err = handler
            .calibrate(&counts, CalibrationLevel::BrightnessTemperature)
            .unwrap_err();
        assert!(matches!(err, SeviriError::UnknownCalibrationType(7)));
    }

    #[test]
    fn test_file_coefficients_round_trip_through_handler() {
        let handler = ir108_handler(2);
        let picked = handler.get_coefs().unwrap();
        assert_eq!(picked.coefs.gain, 0.2156);
        assert_eq!(picked.coefs.offset, -10.4);
    }
}
