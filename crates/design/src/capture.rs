//! Owned snapshot of a recorded telemetry block.

use presage_filter::GridShape;

use crate::error::DesignError;

/// A telemetry capture: `nbspl` samples of an `xsize x ysize` variable
/// grid (`ysize == 1` for a 2-D variables-by-samples capture).
///
/// The capture is owned by the builder for the build's duration, so a
/// live writer of the originating stream cannot perturb the regression.
/// Layout is sample-major: `data[t * xsize * ysize + xy]`.
#[derive(Debug, Clone)]
pub struct TelemetryCapture {
    xsize: usize,
    ysize: usize,
    nbspl: usize,
    data: Vec<f32>,
}

impl TelemetryCapture {
    /// Wraps a 2-D capture: `nvars` variables by `nbspl` samples.
    pub fn from_2d(nvars: usize, nbspl: usize, data: Vec<f32>) -> Result<Self, DesignError> {
        Self::checked(nvars, 1, nbspl, data)
    }

    /// Wraps a 3-D capture: an `xsize x ysize` grid by `nbspl` samples.
    pub fn from_3d(
        xsize: usize,
        ysize: usize,
        nbspl: usize,
        data: Vec<f32>,
    ) -> Result<Self, DesignError> {
        Self::checked(xsize, ysize, nbspl, data)
    }

    /// Wraps a capture from raw shape metadata, as read from a stream.
    ///
    /// The last axis is the sample axis.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidRank`] for any rank other than 2
    /// or 3.
    pub fn from_shape(shape: &[usize], data: Vec<f32>) -> Result<Self, DesignError> {
        match *shape {
            [xsize, nbspl] => Self::checked(xsize, 1, nbspl, data),
            [xsize, ysize, nbspl] => Self::checked(xsize, ysize, nbspl, data),
            _ => Err(DesignError::InvalidRank { naxis: shape.len() }),
        }
    }

    fn checked(
        xsize: usize,
        ysize: usize,
        nbspl: usize,
        data: Vec<f32>,
    ) -> Result<Self, DesignError> {
        let expected = xsize * ysize * nbspl;
        if data.len() != expected {
            return Err(DesignError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            xsize,
            ysize,
            nbspl,
            data,
        })
    }

    /// Returns the variable-grid shape.
    pub fn grid_shape(&self) -> GridShape {
        GridShape::new(self.xsize, self.ysize)
    }

    /// Returns the variable count per sample.
    pub fn ncells(&self) -> usize {
        self.xsize * self.ysize
    }

    /// Returns the sample count.
    pub fn nbspl(&self) -> usize {
        self.nbspl
    }

    /// Returns the value of grid cell `xy` at sample `t`.
    #[inline(always)]
    pub fn value(&self, xy: usize, t: usize) -> f32 {
        self.data[t * self.xsize * self.ysize + xy]
    }

    /// Returns one full sample as a contiguous slice.
    pub fn sample(&self, t: usize) -> &[f32] {
        let n = self.xsize * self.ysize;
        &self.data[t * n..(t + 1) * n]
    }

    /// Computes the per-cell time average over all samples.
    ///
    /// The filter expects zero-mean regressors, so builders subtract this
    /// from every packed value when mean removal is enabled.
    pub fn cell_means(&self) -> Vec<f32> {
        let n = self.ncells();
        let mut acc = vec![0.0f64; n];
        for t in 0..self.nbspl {
            for (xy, a) in acc.iter_mut().enumerate() {
                *a += self.value(xy, t) as f64;
            }
        }
        acc.into_iter()
            .map(|a| (a / self.nbspl as f64) as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_d_layout() {
        // 2 variables, 3 samples.
        let c = TelemetryCapture::from_2d(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(c.ncells(), 2);
        assert_eq!(c.nbspl(), 3);
        assert_eq!(c.value(0, 0), 1.0);
        assert_eq!(c.value(1, 2), 6.0);
        assert_eq!(c.sample(1), &[3.0, 4.0]);
    }

    #[test]
    fn three_d_flattens_grid() {
        let c = TelemetryCapture::from_3d(2, 2, 2, (0..8).map(|i| i as f32).collect()).unwrap();
        assert_eq!(c.ncells(), 4);
        assert_eq!(c.grid_shape().ysize(), 2);
        assert_eq!(c.value(3, 1), 7.0);
    }

    #[test]
    fn from_shape_rank_check() {
        assert!(TelemetryCapture::from_shape(&[2, 5], vec![0.0; 10]).is_ok());
        assert!(TelemetryCapture::from_shape(&[2, 2, 5], vec![0.0; 20]).is_ok());

        let err = TelemetryCapture::from_shape(&[10], vec![0.0; 10]).unwrap_err();
        assert!(matches!(err, DesignError::InvalidRank { naxis: 1 }));
        let err = TelemetryCapture::from_shape(&[2, 2, 2, 2], vec![0.0; 16]).unwrap_err();
        assert!(matches!(err, DesignError::InvalidRank { naxis: 4 }));
    }

    #[test]
    fn length_mismatch_fails() {
        let err = TelemetryCapture::from_2d(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            DesignError::DataLengthMismatch {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn cell_means() {
        let c = TelemetryCapture::from_2d(2, 3, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]).unwrap();
        let means = c.cell_means();
        assert!((means[0] - 2.0).abs() < 1e-6);
        assert!((means[1] - 20.0).abs() < 1e-6);
    }
}
