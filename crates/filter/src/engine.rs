//! Per-cycle filter application.

use presage_stream::Stream;
use tracing::info;

use crate::backend::MultiplyBackend;
use crate::error::FilterError;
use crate::history::HistoryBuffer;
use crate::mask::IndexMap;
use crate::matrix::FilterMatrix;

/// One compute step per control frame.
///
/// The hosting real-time scheduler owns the loop, frame timing, and
/// cancellation; implementors only compute a single cycle. When the host
/// signals stop, the in-flight cycle completes — there is no mid-multiply
/// abort.
pub trait CycleCompute {
    /// Consumes the current input sample and publishes one prediction.
    fn compute_cycle(&mut self, input: &[f32], out: &mut Stream) -> Result<(), FilterError>;
}

/// Applies the predictive filter once per control cycle.
///
/// Owns the history window and the filter matrix exclusively for the
/// run's duration. The per-cycle order is fixed: newest sample into
/// slot 0, multiply (publishing the result), then shift-down. Shifting
/// after the multiply keeps buffer maintenance off the critical path
/// between buffer-ready and signal-post.
pub struct FilterApplyEngine {
    matrix: FilterMatrix,
    index_map: IndexMap,
    history: HistoryBuffer,
    backend: Box<dyn MultiplyBackend>,
    initialized: bool,
    cycle: u64,
}

impl FilterApplyEngine {
    /// Builds an engine from the loaded filter matrix, the active-input
    /// index map, and the selected multiply backend.
    ///
    /// The retained time-step count K is derived from the matrix shape:
    /// `K = history_rows / active_inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MatrixShapeMismatch`] if the matrix rows do
    /// not divide into whole time steps for this index map.
    pub fn new(
        matrix: FilterMatrix,
        index_map: IndexMap,
        backend: Box<dyn MultiplyBackend>,
    ) -> Result<Self, FilterError> {
        let n_active = index_map.len();
        let n_steps = matrix.steps_for(n_active)?;

        info!(
            active_inputs = n_active,
            grid_cells = index_map.grid_shape().ncells(),
            output_modes = matrix.n_out(),
            time_steps = n_steps,
            backend = backend.label(),
            "predictive filter configured"
        );

        Ok(Self {
            matrix,
            index_map,
            history: HistoryBuffer::new(n_active, n_steps),
            backend,
            initialized: false,
            cycle: 0,
        })
    }

    /// Returns the active-input count.
    pub fn n_active(&self) -> usize {
        self.index_map.len()
    }

    /// Returns the retained time-step count K.
    pub fn n_steps(&self) -> usize {
        self.history.n_steps()
    }

    /// Returns the output mode count.
    pub fn n_out(&self) -> usize {
        self.matrix.n_out()
    }

    /// Returns the number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns the history window (slot 0 newest).
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}

impl CycleCompute for FilterApplyEngine {
    fn compute_cycle(&mut self, input: &[f32], out: &mut Stream) -> Result<(), FilterError> {
        // Newest measurement into slot 0; older slots were moved down at
        // the end of the previous cycle.
        self.history.load_newest(input, &self.index_map)?;

        if !self.initialized {
            self.backend.initialize(&self.matrix)?;
            self.initialized = true;
        }
        self.backend.apply(self.history.as_slice(), out)?;

        // Move older measurements down now, after the result is out, to
        // save time between buffer-ready and signal-post.
        self.history.shift_down();
        self.cycle += 1;
        Ok(())
    }
}
