//! Dense predictive filter matrix.

use crate::error::FilterError;

/// Dense linear operator mapping a lagged-history vector to the predicted
/// output vector.
///
/// Row-major with the output index as the slow axis:
/// `data[o * n_hist + h]` is the weight of history slot `h` in output `o`.
/// Immutable once loaded; produced by an external least-squares solver.
#[derive(Debug, Clone)]
pub struct FilterMatrix {
    /// History rows: active inputs times retained time steps.
    n_hist: usize,
    /// Output mode count.
    n_out: usize,
    data: Vec<f32>,
}

impl FilterMatrix {
    /// Wraps a flat coefficient array.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MatrixLengthMismatch`] if `data.len()` is not
    /// `n_hist * n_out`.
    pub fn new(n_hist: usize, n_out: usize, data: Vec<f32>) -> Result<Self, FilterError> {
        let expected = n_hist * n_out;
        if data.len() != expected {
            return Err(FilterError::MatrixLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            n_hist,
            n_out,
            data,
        })
    }

    /// Returns the history row count (`NBmodeIN * K`).
    pub fn n_hist(&self) -> usize {
        self.n_hist
    }

    /// Returns the output mode count.
    pub fn n_out(&self) -> usize {
        self.n_out
    }

    /// Returns the weight of history slot `h` in output `o`.
    #[inline(always)]
    pub fn coeff(&self, o: usize, h: usize) -> f32 {
        self.data[o * self.n_hist + h]
    }

    /// Returns the coefficient row for output `o`.
    #[inline]
    pub fn row(&self, o: usize) -> &[f32] {
        &self.data[o * self.n_hist..(o + 1) * self.n_hist]
    }

    /// Returns the flat coefficients, output-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Derives the retained time-step count K for a given active-input
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MatrixShapeMismatch`] if the history rows do
    /// not divide evenly into whole time steps.
    pub fn steps_for(&self, n_active: usize) -> Result<usize, FilterError> {
        if n_active == 0 || self.n_hist % n_active != 0 {
            return Err(FilterError::MatrixShapeMismatch {
                rows: self.n_hist,
                n_active,
            });
        }
        Ok(self.n_hist / n_active)
    }
}
