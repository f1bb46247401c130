//! Design and target matrix packing.

use presage_filter::IndexMap;
use tracing::info;

use crate::capture::TelemetryCapture;
use crate::config::DesignConfig;
use crate::error::DesignError;

/// The regression design matrix handed to the external solver.
///
/// `n_data_rows` rows of lagged samples, optionally followed by
/// `n_cols` identity-scaled penalty rows. Row-major:
/// `data[m * n_cols + dt * n_pix_in + pix]`.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    n_rows: usize,
    n_cols: usize,
    n_data_rows: usize,
    n_pix_in: usize,
    order: usize,
    data: Vec<f32>,
}

impl DesignMatrix {
    /// Returns the total row count, penalty block included.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the column count (`NBpixin * PForder`).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns the row count excluding the penalty block (`NBmvec`).
    pub fn n_data_rows(&self) -> usize {
        self.n_data_rows
    }

    /// Returns the active input count.
    pub fn n_pix_in(&self) -> usize {
        self.n_pix_in
    }

    /// Returns the filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns true if the penalty block is present.
    pub fn regularized(&self) -> bool {
        self.n_rows > self.n_data_rows
    }

    /// Returns the element at `(row, col)`.
    #[inline(always)]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.n_cols + col]
    }

    /// Returns one row as a contiguous slice.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Returns the flat row-major data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Target values paired with the design matrix rows.
///
/// Row `m` holds the active output variables observed `PFlatency` frames
/// after the design row's current sample.
#[derive(Debug, Clone)]
pub struct TargetMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f32>,
}

impl TargetMatrix {
    /// Returns the row count (`NBmvec`).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the active output count.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns the element at `(row, col)`.
    #[inline(always)]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.n_cols + col]
    }

    /// Returns one row as a contiguous slice.
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Returns the flat row-major data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Computes `NBmvec` for a capture length, failing if no row fits.
///
/// The `-2` margin tolerates a later latency adjustment of up to one
/// frame without reading past the capture.
fn row_count(nbspl: usize, order: usize, latency: f32) -> Result<usize, DesignError> {
    let margin = order as i64 + latency.floor() as i64 + 2;
    let nbmvec = nbspl as i64 - margin;
    if nbmvec < 1 {
        return Err(DesignError::InsufficientSamples {
            nbspl,
            required: margin as usize,
        });
    }
    Ok(nbmvec as usize)
}

/// Sample index anchoring design row `m`: the earliest choice for which
/// every lag `dt` in `[0, order)` stays in range.
#[inline(always)]
fn anchor(m: usize, order: usize) -> usize {
    m + order - 1
}

/// Builds the design matrix from a telemetry capture.
///
/// Row `m` packs, at column `dt * NBpixin + pix`, the value of active
/// input `pix` at lag `dt` behind the row's current sample. With
/// regularization enabled, `mvecsize` extra rows carry `reg_lambda` on
/// the diagonal, penalizing large filter coefficients in the external
/// solve.
///
/// # Errors
///
/// Configuration errors from [`DesignConfig::validate`], selection errors
/// from the index map, and [`DesignError::InsufficientSamples`] when the
/// capture is too short.
pub fn build_design_matrix(
    capture: &TelemetryCapture,
    input_mask: Option<&[f32]>,
    config: &DesignConfig,
) -> Result<DesignMatrix, DesignError> {
    config.validate()?;
    let map = IndexMap::select(capture.grid_shape(), input_mask)?;
    let order = config.order();

    let n_data_rows = row_count(capture.nbspl(), order, config.latency())?;
    let n_pix_in = map.len();
    let n_cols = n_pix_in * order;
    let n_rows = if config.regularize() {
        n_data_rows + n_cols
    } else {
        n_data_rows
    };

    info!(
        n_pix_in,
        grid_cells = capture.ncells(),
        nbmvec = n_data_rows,
        mvecsize = n_cols,
        order,
        regularized = config.regularize(),
        "building design matrix"
    );

    let means = config.remove_mean().then(|| capture.cell_means());
    let mut data = vec![0.0f32; n_rows * n_cols];

    for m in 0..n_data_rows {
        let t_m = anchor(m, order);
        let row = &mut data[m * n_cols..(m + 1) * n_cols];
        for dt in 0..order {
            for (pix, &pos) in map.positions().iter().enumerate() {
                let mut v = capture.value(pos, t_m - dt);
                if let Some(means) = &means {
                    v -= means[pos];
                }
                row[dt * n_pix_in + pix] = v;
            }
        }
    }

    if config.regularize() {
        let lambda = config.reg_lambda() as f32;
        for j in 0..n_cols {
            data[(n_data_rows + j) * n_cols + j] = lambda;
        }
    }

    Ok(DesignMatrix {
        n_rows,
        n_cols,
        n_data_rows,
        n_pix_in,
        order,
        data,
    })
}

/// Builds the target matrix paired with [`build_design_matrix`].
///
/// Row `m` holds the active *output* variables at `t_m + latency`, the
/// values the filter is trained to predict. With no output mask, every
/// variable is a target. Fractional latency interpolates linearly between
/// the two bracketing samples; the design matrix's `-2` row margin keeps
/// the upper bracket inside the capture.
pub fn build_target_matrix(
    capture: &TelemetryCapture,
    output_mask: Option<&[f32]>,
    config: &DesignConfig,
) -> Result<TargetMatrix, DesignError> {
    config.validate()?;
    let map = IndexMap::select(capture.grid_shape(), output_mask)?;
    let order = config.order();

    let n_rows = row_count(capture.nbspl(), order, config.latency())?;
    let n_cols = map.len();

    let means = config.remove_mean().then(|| capture.cell_means());
    let mut data = vec![0.0f32; n_rows * n_cols];

    for m in 0..n_rows {
        let t = anchor(m, order) as f32 + config.latency();
        let k0 = t.floor() as usize;
        let alpha = t - k0 as f32;
        debug_assert!(k0 + 1 < capture.nbspl());

        let row = &mut data[m * n_cols..(m + 1) * n_cols];
        for (pix, &pos) in map.positions().iter().enumerate() {
            let v0 = capture.value(pos, k0);
            let v1 = capture.value(pos, k0 + 1);
            let mut v = (1.0 - alpha) * v0 + alpha * v1;
            if let Some(means) = &means {
                v -= means[pos];
            }
            row[pix] = v;
        }
    }

    Ok(TargetMatrix {
        n_rows,
        n_cols,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(order: usize, latency: f32) -> DesignConfig {
        DesignConfig::new(order)
            .with_latency(latency)
            .with_remove_mean(false)
    }

    /// Single-variable ramp capture: value at sample t is t.
    fn ramp(nbspl: usize) -> TelemetryCapture {
        TelemetryCapture::from_2d(1, nbspl, (0..nbspl).map(|t| t as f32).collect()).unwrap()
    }

    #[test]
    fn row_count_formula() {
        // nbspl=100, order=10, latency=2.7 -> 100 - 10 - 2 - 2 = 86.
        assert_eq!(row_count(100, 10, 2.7).unwrap(), 86);
        assert_eq!(row_count(100, 10, 0.0).unwrap(), 88);
    }

    #[test]
    fn lag_packing_single_variable() {
        let capture = ramp(20);
        let design = build_design_matrix(&capture, None, &plain(3, 0.0)).unwrap();

        assert_eq!(design.n_data_rows(), 20 - 3 - 2);
        // Row m anchors at t_m = m + 2; column dt holds t_m - dt.
        assert_eq!(design.row(0), &[2.0, 1.0, 0.0]);
        assert_eq!(design.row(5), &[7.0, 6.0, 5.0]);
    }

    #[test]
    fn lag_packing_is_variable_major_within_steps() {
        // 2 variables: value(pix, t) = 10 t + pix.
        let nbspl = 12;
        let data: Vec<f32> = (0..nbspl)
            .flat_map(|t| [10.0 * t as f32, 10.0 * t as f32 + 1.0])
            .collect();
        let capture = TelemetryCapture::from_2d(2, nbspl, data).unwrap();

        let design = build_design_matrix(&capture, None, &plain(2, 0.0)).unwrap();
        // Row m=0: t_m = 1. Column dt*2 + pix = 10*(t_m - dt) + pix.
        assert_eq!(design.row(0), &[10.0, 11.0, 0.0, 1.0]);
    }

    #[test]
    fn masked_inputs_shrink_columns() {
        let nbspl = 10;
        let data: Vec<f32> = (0..nbspl * 3).map(|i| i as f32).collect();
        let capture = TelemetryCapture::from_2d(3, nbspl, data).unwrap();
        let mask = [1.0, 0.0, 1.0];

        let design = build_design_matrix(&capture, Some(&mask), &plain(2, 0.0)).unwrap();
        assert_eq!(design.n_pix_in(), 2);
        assert_eq!(design.n_cols(), 4);
    }

    #[test]
    fn regularization_appends_identity_block() {
        let capture = ramp(30);
        let config = DesignConfig::new(4)
            .with_remove_mean(false)
            .with_regularization(0.25);
        let design = build_design_matrix(&capture, None, &config).unwrap();

        assert!(design.regularized());
        assert_eq!(design.n_rows(), design.n_data_rows() + design.n_cols());
        for j in 0..design.n_cols() {
            for c in 0..design.n_cols() {
                let want = if c == j { 0.25 } else { 0.0 };
                assert_eq!(design.value(design.n_data_rows() + j, c), want);
            }
        }
    }

    #[test]
    fn mean_removal_zeroes_constant_variable() {
        let capture = TelemetryCapture::from_2d(1, 15, vec![4.5; 15]).unwrap();
        let config = DesignConfig::new(3);
        let design = build_design_matrix(&capture, None, &config).unwrap();
        assert!(design.as_slice().iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn insufficient_samples_fails() {
        let capture = ramp(10);
        let err = build_design_matrix(&capture, None, &plain(10, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            DesignError::InsufficientSamples {
                nbspl: 10,
                required: 12
            }
        ));
    }

    #[test]
    fn target_integer_latency_picks_exact_sample() {
        let capture = ramp(20);
        let target = build_target_matrix(&capture, None, &plain(3, 2.0)).unwrap();
        // Row m: t = (m + 2) + 2, exact sample.
        assert_eq!(target.value(0, 0), 4.0);
        assert_eq!(target.value(3, 0), 7.0);
    }

    #[test]
    fn target_fractional_latency_interpolates() {
        let capture = ramp(20);
        let target = build_target_matrix(&capture, None, &plain(3, 1.5)).unwrap();
        // On a ramp, linear interpolation reproduces t exactly.
        assert!((target.value(0, 0) - 3.5).abs() < 1e-5);
    }

    #[test]
    fn target_rows_match_design_rows() {
        let capture = ramp(50);
        let config = plain(5, 2.7).with_regularization(0.1);
        let design = build_design_matrix(&capture, None, &config).unwrap();
        let target = build_target_matrix(&capture, None, &config).unwrap();
        assert_eq!(target.n_rows(), design.n_data_rows());
    }

    #[test]
    fn output_mask_independent_of_input_mask() {
        let nbspl = 10;
        let data: Vec<f32> = (0..nbspl * 3).map(|i| i as f32).collect();
        let capture = TelemetryCapture::from_2d(3, nbspl, data).unwrap();

        let config = plain(2, 0.0);
        let design = build_design_matrix(&capture, Some(&[1.0, 1.0, 0.0]), &config).unwrap();
        let target = build_target_matrix(&capture, Some(&[0.0, 0.0, 1.0]), &config).unwrap();
        assert_eq!(design.n_pix_in(), 2);
        assert_eq!(target.n_cols(), 1);
    }
}
