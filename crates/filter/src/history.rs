//! Sliding window of recent active-input samples.

use crate::error::FilterError;
use crate::mask::IndexMap;

/// Flat buffer holding the last K samples of the N active input variables.
///
/// Layout is variable-major within each time step:
/// `buf[tstep * n_active + var]`, with slot 0 the most recent sample.
/// During the first K cycles some slots still hold their zero
/// initialization; that is accepted warm-up behavior, not an error.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    n_active: usize,
    n_steps: usize,
    buf: Vec<f32>,
}

impl HistoryBuffer {
    /// Creates a zero-filled buffer for `n_active` variables over
    /// `n_steps` time steps.
    pub fn new(n_active: usize, n_steps: usize) -> Self {
        Self {
            n_active,
            n_steps,
            buf: vec![0.0; n_active * n_steps],
        }
    }

    /// Returns the active-variable count per time step.
    pub fn n_active(&self) -> usize {
        self.n_active
    }

    /// Returns the retained time-step count K.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the full flat window, ready for multiplication.
    pub fn as_slice(&self) -> &[f32] {
        &self.buf
    }

    /// Returns the variables of time step `tstep` (0 = newest).
    pub fn slot(&self, tstep: usize) -> &[f32] {
        &self.buf[tstep * self.n_active..(tstep + 1) * self.n_active]
    }

    /// Copies the newest measurement into slot 0 through the index map.
    ///
    /// Older slots are left untouched; they are moved down by
    /// [`shift_down`](HistoryBuffer::shift_down) only after the cycle's
    /// multiply has consumed them.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::IndexMapMismatch`] if the map's active count
    /// differs from the buffer's, and [`FilterError::InputTooSmall`] if the
    /// sample does not cover every grid position the map addresses.
    pub fn load_newest(&mut self, input: &[f32], map: &IndexMap) -> Result<(), FilterError> {
        if map.len() != self.n_active {
            return Err(FilterError::IndexMapMismatch {
                expected: self.n_active,
                actual: map.len(),
            });
        }
        if let Some(&max_pos) = map.positions().last() {
            if max_pos >= input.len() {
                return Err(FilterError::InputTooSmall {
                    required: max_pos + 1,
                    actual: input.len(),
                });
            }
        }
        for (mi, &pos) in map.positions().iter().enumerate() {
            self.buf[mi] = input[pos];
        }
        Ok(())
    }

    /// Moves every time step down by one slot, freeing slot 0 for the next
    /// cycle's measurement. The oldest sample falls off the end.
    pub fn shift_down(&mut self) {
        for tstep in (1..self.n_steps).rev() {
            let (src_start, dst_start) = ((tstep - 1) * self.n_active, tstep * self.n_active);
            self.buf
                .copy_within(src_start..src_start + self.n_active, dst_start);
        }
    }
}
