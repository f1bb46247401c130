//! CPU and GPU matrix-vector multiply backends.
//!
//! One backend is selected at setup from the parsed device set and kept
//! for the run: there is no mid-run fallback, because the GPU path commits
//! its buffer bindings at initialization.

use presage_stream::Stream;

use crate::error::FilterError;
use crate::matrix::FilterMatrix;

/// Per-cycle matrix-vector multiply, CPU or GPU.
///
/// `initialize` runs once, on the first cycle, with the filter matrix;
/// `apply` runs every cycle with the current history window and the output
/// stream. Both paths must produce numerically equivalent outputs within
/// floating-point tolerance for identical inputs.
pub trait MultiplyBackend {
    /// One-time setup with the filter matrix.
    fn initialize(&mut self, matrix: &FilterMatrix) -> Result<(), FilterError>;

    /// Computes `out[o] = sum_h matrix[o][h] * history[h]` and publishes
    /// the result to consumers.
    fn apply(&mut self, history: &[f32], out: &mut Stream) -> Result<(), FilterError>;

    /// Backend label for the setup log line.
    fn label(&self) -> &'static str;
}

/// Direct dense double loop on the CPU.
///
/// Summation runs in ascending history order so results are reproducible
/// bit-for-bit across runs. Publication is inline: write flag up, all
/// outputs written, consumers posted, flag down, update counter bumped.
#[derive(Debug, Default)]
pub struct DenseCpuMultiply {
    matrix: Option<FilterMatrix>,
}

impl DenseCpuMultiply {
    /// Creates an uninitialized CPU backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MultiplyBackend for DenseCpuMultiply {
    fn initialize(&mut self, matrix: &FilterMatrix) -> Result<(), FilterError> {
        self.matrix = Some(matrix.clone());
        Ok(())
    }

    fn apply(&mut self, history: &[f32], out: &mut Stream) -> Result<(), FilterError> {
        let matrix = self
            .matrix
            .as_ref()
            .ok_or(FilterError::BackendUninitialized)?;
        let n_out = matrix.n_out();
        if history.len() != matrix.n_hist() {
            return Err(FilterError::HistoryLengthMismatch {
                expected: matrix.n_hist(),
                actual: history.len(),
            });
        }
        if out.nelement() < n_out {
            return Err(FilterError::OutputTooSmall {
                name: out.name().to_string(),
                nelement: out.nelement(),
                required: n_out,
            });
        }

        out.begin_write();
        let outbuf = out.as_mut_slice();
        for mi in 0..n_out {
            let mut acc = 0.0f32;
            for (h, &v) in history.iter().enumerate() {
                acc += v * matrix.coeff(mi, h);
            }
            outbuf[mi] = acc;
        }
        out.post();
        out.end_write();
        out.increment_count();
        Ok(())
    }

    fn label(&self) -> &'static str {
        "cpu"
    }
}

/// External batched matrix-multiply collaborator, e.g. a CUDA service.
///
/// Kernel internals are out of scope here; this is only the dispatch
/// contract. `execute` blocks until the result is ready for publication,
/// preserving per-cycle ordering, and the executor performs publication
/// itself (write flag, post, counter) on its output bindings.
pub trait GpuExecutor {
    /// One-time upload of the filter matrix and binding of the history and
    /// output buffers to the given devices.
    fn setup(
        &mut self,
        config_index: u32,
        matrix: &FilterMatrix,
        devices: &[u32],
    ) -> Result<(), FilterError>;

    /// Runs one batched multiply: `out = alpha * M * history + beta * out`.
    fn execute(
        &mut self,
        config_index: u32,
        history: &[f32],
        out: &mut Stream,
        alpha: f32,
        beta: f32,
    ) -> Result<(), FilterError>;
}

/// Slot used to register the predictive-filter multiply with the executor,
/// keeping it apart from other multiplies the host may run.
const GPU_MATMULT_CONF_INDEX: u32 = 2;

/// GPU dispatch: setup once, then one execute call per cycle with
/// overwrite scaling (`alpha = 1.0`, `beta = 0.0`).
pub struct BatchedGpuMultiply<E> {
    executor: E,
    devices: Vec<u32>,
}

impl<E: GpuExecutor> BatchedGpuMultiply<E> {
    /// Creates a GPU backend over the given executor and device list.
    pub fn new(executor: E, devices: Vec<u32>) -> Self {
        Self { executor, devices }
    }

    /// Returns the configured device list.
    pub fn devices(&self) -> &[u32] {
        &self.devices
    }
}

impl<E: GpuExecutor> MultiplyBackend for BatchedGpuMultiply<E> {
    fn initialize(&mut self, matrix: &FilterMatrix) -> Result<(), FilterError> {
        self.executor
            .setup(GPU_MATMULT_CONF_INDEX, matrix, &self.devices)
    }

    fn apply(&mut self, history: &[f32], out: &mut Stream) -> Result<(), FilterError> {
        self.executor
            .execute(GPU_MATMULT_CONF_INDEX, history, out, 1.0, 0.0)
    }

    fn label(&self) -> &'static str {
        "gpu"
    }
}
