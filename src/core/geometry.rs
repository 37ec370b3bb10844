//! Area extent arithmetic and full-disk padding helpers.

use crate::types::{SeviriError, SeviriResult};
use ndarray::{concatenate, Array2, Axis};
use num_traits::Float;

/// Parameters describing the pixel-grid bounds of a geostationary scene.
///
/// Row and column numbers follow the MSG pixel numbering standard: column
/// indices increase westward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaExtentParams {
    /// Center point of the projection.
    pub center_point: f64,
    /// Northmost row number.
    pub north: f64,
    /// Eastmost column number.
    pub east: f64,
    /// Southmost row number.
    pub south: f64,
    /// Westmost column number.
    pub west: f64,
    /// Pixel resolution in meters in east-west direction.
    pub column_step: f64,
    /// Pixel resolution in meters in south-north direction.
    pub line_step: f64,
    pub column_offset: f64,
    pub line_offset: f64,
}

impl AreaExtentParams {
    /// Parameters with zero column/line offsets.
    pub fn new(
        center_point: f64,
        north: f64,
        east: f64,
        south: f64,
        west: f64,
        column_step: f64,
        line_step: f64,
    ) -> Self {
        Self {
            center_point,
            north,
            east,
            south,
            west,
            column_step,
            line_step,
            column_offset: 0.0,
            line_offset: 0.0,
        }
    }
}

/// Calculate the area extent seen by a geostationary satellite.
///
/// Returns the projected-plane bounding box of the scene as
/// (lower_left_x, lower_left_y, upper_right_x, upper_right_y).
///
/// For Earth model 2 and full disk VISIR, (center_point - west - 0.5 +
/// column_offset) must be -1856.5. See MSG Level 1.5 Image Data Format
/// Description Figure 7 - Alignment and numbering of the non-HRV pixels.
pub fn area_extent(params: &AreaExtentParams) -> (f64, f64, f64, f64) {
    let ll_c = (params.center_point - params.east + 0.5 + params.column_offset) * params.column_step;
    let ll_l = (params.north - params.center_point + 0.5 + params.line_offset) * params.line_step;
    let ur_c = (params.center_point - params.west - 0.5 + params.column_offset) * params.column_step;
    let ur_l = (params.south - params.center_point - 0.5 + params.line_offset) * params.line_step;
    (ll_c, ll_l, ur_c, ur_l)
}

/// Create a padding area filled with no data.
pub fn get_padding_area<T: Float>(shape: (usize, usize)) -> Array2<T> {
    Array2::from_elem(shape, T::nan())
}

/// Pad the data given east and west bounds and the desired final size.
///
/// Bounds are 1-based column numbers of the data within the final grid.
pub fn pad_data_horizontally<T: Float>(
    data: &Array2<T>,
    final_size: (usize, usize),
    east_bound: usize,
    west_bound: usize,
) -> SeviriResult<Array2<T>> {
    if east_bound < 1
        || west_bound < east_bound
        || west_bound - east_bound != data.ncols() - 1
        || west_bound > final_size.1
    {
        return Err(SeviriError::ShapeMismatch(format!(
            "east and west bounds ({}, {}) do not match data shape {:?}",
            east_bound,
            west_bound,
            data.dim()
        )));
    }
    let nlines = final_size.0;
    let padding_east = get_padding_area((nlines, east_bound - 1));
    let padding_west = get_padding_area((nlines, final_size.1 - west_bound));
    concatenate(
        Axis(1),
        &[padding_east.view(), data.view(), padding_west.view()],
    )
    .map_err(|e| SeviriError::ShapeMismatch(e.to_string()))
}

/// Pad the data given south and north bounds and the desired final size.
///
/// Bounds are 1-based line numbers of the data within the final grid.
pub fn pad_data_vertically<T: Float>(
    data: &Array2<T>,
    final_size: (usize, usize),
    south_bound: usize,
    north_bound: usize,
) -> SeviriResult<Array2<T>> {
    if south_bound < 1
        || north_bound < south_bound
        || north_bound - south_bound != data.nrows() - 1
        || north_bound > final_size.0
    {
        return Err(SeviriError::ShapeMismatch(format!(
            "south and north bounds ({}, {}) do not match data shape {:?}",
            south_bound,
            north_bound,
            data.dim()
        )));
    }
    let ncols = final_size.1;
    let padding_south = get_padding_area((south_bound - 1, ncols));
    let padding_north = get_padding_area((final_size.0 - north_bound, ncols));
    concatenate(
        Axis(0),
        &[padding_south.view(), data.view(), padding_north.view()],
    )
    .map_err(|e| SeviriError::ShapeMismatch(e.to_string()))
}
