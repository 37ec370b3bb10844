//! Core SEVIRI processing modules

pub mod calibrate;
pub mod coefficients;
pub mod geometry;
pub mod orbit;
pub mod quality;
pub mod time;
pub mod unpack;

// Re-export main types
pub use calibrate::{
    apply_earthsun_distance_correction, sun_earth_distance, CalibParams, CalibrationAlgorithm,
    CalibrationHandler, ScanParams,
};
pub use coefficients::{
    create_coef_catalog, CalibChoice, CoefficientCatalog, CoefficientPicker, CoefficientSource,
    GsicsCoefficients, MeirinkCoefficients, NominalCoefficients, PickedCoefs,
};
pub use geometry::{
    area_extent, pad_data_horizontally, pad_data_vertically, AreaExtentParams,
};
pub use orbit::{
    chebyshev, chebyshev_3d, get_satpos, OrbitPolynomial, OrbitPolynomialFinder, OrbitRecord,
    DEFAULT_MAX_DELTA_HOURS,
};
pub use quality::{bad_quality_line_mask, mask_bad_quality};
pub use time::{get_cds_time, get_cds_time_slice, round_nom_time};
pub use unpack::dec10216;
