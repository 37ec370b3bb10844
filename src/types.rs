use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Real-valued channel image (lines x columns)
pub type ChannelImage = Array2<f32>;

/// Per-scanline quality flag vector
pub type LineFlags = Array1<u8>;

/// The twelve SEVIRI spectral channels.
///
/// Channels are identified by their index (1-12) in the level 1.5 header
/// and by a canonical name such as "IR_108".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Vis006,
    Vis008,
    Ir016,
    Ir039,
    Wv062,
    Wv073,
    Ir087,
    Ir097,
    Ir108,
    Ir120,
    Ir134,
    Hrv,
}

impl Channel {
    /// All channels in header order.
    pub const ALL: [Channel; 12] = [
        Channel::Vis006,
        Channel::Vis008,
        Channel::Ir016,
        Channel::Ir039,
        Channel::Wv062,
        Channel::Wv073,
        Channel::Ir087,
        Channel::Ir097,
        Channel::Ir108,
        Channel::Ir120,
        Channel::Ir134,
        Channel::Hrv,
    ];

    /// Channel from its 1-based header index.
    pub fn from_index(index: u8) -> Option<Channel> {
        match index {
            1..=12 => Some(Channel::ALL[index as usize - 1]),
            _ => None,
        }
    }

    /// 1-based header index.
    pub fn index(self) -> u8 {
        Channel::ALL.iter().position(|&c| c == self).unwrap() as u8 + 1
    }

    /// Canonical channel name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Vis006 => "VIS006",
            Channel::Vis008 => "VIS008",
            Channel::Ir016 => "IR_016",
            Channel::Ir039 => "IR_039",
            Channel::Wv062 => "WV_062",
            Channel::Wv073 => "WV_073",
            Channel::Ir087 => "IR_087",
            Channel::Ir097 => "IR_097",
            Channel::Ir108 => "IR_108",
            Channel::Ir120 => "IR_120",
            Channel::Ir134 => "IR_134",
            Channel::Hrv => "HRV",
        }
    }

    /// Channel from its canonical name.
    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Solar (visible / near-IR) channels are calibrated to reflectance,
    /// all others to brightness temperature.
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            Channel::Hrv | Channel::Vis006 | Channel::Vis008 | Channel::Ir016
        )
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Meteosat Second Generation platforms carrying the SEVIRI instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Meteosat8,
    Meteosat9,
    Meteosat10,
    Meteosat11,
}

impl Platform {
    /// Platform from the numeric spacecraft id found in the file header.
    pub fn from_id(id: u16) -> Option<Platform> {
        match id {
            321 => Some(Platform::Meteosat8),
            322 => Some(Platform::Meteosat9),
            323 => Some(Platform::Meteosat10),
            324 => Some(Platform::Meteosat11),
            _ => None,
        }
    }

    /// Numeric spacecraft id.
    pub fn id(self) -> u16 {
        match self {
            Platform::Meteosat8 => 321,
            Platform::Meteosat9 => 322,
            Platform::Meteosat10 => 323,
            Platform::Meteosat11 => 324,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Meteosat8 => "Meteosat-8",
            Platform::Meteosat9 => "Meteosat-9",
            Platform::Meteosat10 => "Meteosat-10",
            Platform::Meteosat11 => "Meteosat-11",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Version of the Meirink visible-channel recalibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeirinkVersion {
    V2023,
}

impl MeirinkVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            MeirinkVersion::V2023 => "2023",
        }
    }
}

/// Calibration coefficient selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationMode {
    Nominal,
    Gsics,
    Meirink(MeirinkVersion),
}

impl std::fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationMode::Nominal => write!(f, "NOMINAL"),
            CalibrationMode::Gsics => write!(f, "GSICS"),
            CalibrationMode::Meirink(v) => write!(f, "MEIRINK-{}", v.as_str()),
        }
    }
}

impl FromStr for CalibrationMode {
    type Err = SeviriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOMINAL" => Ok(CalibrationMode::Nominal),
            "GSICS" => Ok(CalibrationMode::Gsics),
            "MEIRINK-2023" => Ok(CalibrationMode::Meirink(MeirinkVersion::V2023)),
            other => Err(SeviriError::InvalidCalibMode(other.to_string())),
        }
    }
}

/// Target level of the calibration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationLevel {
    Counts,
    Radiance,
    Reflectance,
    BrightnessTemperature,
}

impl std::fmt::Display for CalibrationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CalibrationLevel::Counts => "counts",
            CalibrationLevel::Radiance => "radiance",
            CalibrationLevel::Reflectance => "reflectance",
            CalibrationLevel::BrightnessTemperature => "brightness_temperature",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CalibrationLevel {
    type Err = SeviriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counts" => Ok(CalibrationLevel::Counts),
            "radiance" => Ok(CalibrationLevel::Radiance),
            "reflectance" => Ok(CalibrationLevel::Reflectance),
            "brightness_temperature" => Ok(CalibrationLevel::BrightnessTemperature),
            other => Err(SeviriError::InvalidLevel(other.to_string())),
        }
    }
}

/// Gain/offset pair in mW m-2 sr-1 (cm-1)-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub gain: f64,
    pub offset: f64,
}

/// Error types for SEVIRI processing
#[derive(Debug, thiserror::Error)]
pub enum SeviriError {
    #[error("Invalid calibration mode: {0}. Choose one of NOMINAL, GSICS, MEIRINK-2023")]
    InvalidCalibMode(String),

    #[error("Invalid calibration level: {0}. Choose one of counts, radiance, reflectance, brightness_temperature")]
    InvalidLevel(String),

    #[error("Invalid calibration {calibration} for channel {channel}")]
    InvalidCalibration {
        calibration: CalibrationLevel,
        channel: Channel,
    },

    #[error("Unknown calibration type: {0} (expected 1=spectral or 2=effective radiance)")]
    UnknownCalibrationType(u8),

    #[error("No calibration coefficients available for channel {0}")]
    MissingCoefficients(Channel),

    #[error("Unable to find orbit coefficients valid for {time} +/- {max_delta} hours")]
    NoValidOrbitParams { time: DateTime<Utc>, max_delta: i64 },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Result type for SEVIRI operations
pub type SeviriResult<T> = Result<T, SeviriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_index_round_trip() {
        for (i, ch) in Channel::ALL.iter().enumerate() {
            assert_eq!(Channel::from_index(i as u8 + 1), Some(*ch));
            assert_eq!(ch.index(), i as u8 + 1);
        }
        assert_eq!(Channel::from_index(0), None);
        assert_eq!(Channel::from_index(13), None);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Ir108.name(), "IR_108");
        assert_eq!(Channel::from_name("HRV"), Some(Channel::Hrv));
        assert_eq!(Channel::from_name("IR_109"), None);
    }

    #[test]
    fn test_visible_channels() {
        let vis: Vec<_> = Channel::ALL.iter().filter(|c| c.is_visible()).collect();
        assert_eq!(
            vis,
            vec![&Channel::Vis006, &Channel::Vis008, &Channel::Ir016, &Channel::Hrv]
        );
    }

    #[test]
    fn test_calibration_mode_parsing() {
        assert_eq!(
            "NOMINAL".parse::<CalibrationMode>().unwrap(),
            CalibrationMode::Nominal
        );
        assert_eq!(
            "MEIRINK-2023".parse::<CalibrationMode>().unwrap(),
            CalibrationMode::Meirink(MeirinkVersion::V2023)
        );
        let err = "MEIRINK-1999".parse::<CalibrationMode>().unwrap_err();
        assert!(err.to_string().contains("MEIRINK-1999"));
        assert!(err.to_string().contains("NOMINAL"));
    }

    #[test]
    fn test_platform_ids() {
        assert_eq!(Platform::from_id(321), Some(Platform::Meteosat8));
        assert_eq!(Platform::from_id(324), Some(Platform::Meteosat11));
        assert_eq!(Platform::from_id(325), None);
        assert_eq!(Platform::Meteosat10.id(), 323);
        assert_eq!(Platform::Meteosat10.name(), "Meteosat-10");
    }
}
