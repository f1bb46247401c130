//! Online application of a linear predictive filter.
//!
//! Each control cycle, the engine predicts a vector of output variables
//! from the recent history of the active input variables:
//!
//! ```text
//! output[o] = sum_h filter[o][h] * history[h]
//! ```
//!
//! where `history` is a flat sliding window of the last K samples of the
//! N active inputs, packed variable-major within each time step.
//!
//! # Architecture
//!
//! ```text
//! FilterApplyEngine::compute_cycle()
//!   ├─ HistoryBuffer::load_newest()   (history.rs, via IndexMap)
//!   ├─ MultiplyBackend::apply()       (backend.rs, CPU or GPU)
//!   │    └─ publication: write flag, post, update counter
//!   └─ HistoryBuffer::shift_down()
//! ```
//!
//! The shift-down runs strictly after the multiply so the publication of
//! cycle `t` never waits on buffer maintenance.
//!
//! # Quick start
//!
//! ```
//! use presage_filter::{
//!     CycleCompute, DenseCpuMultiply, FilterApplyEngine, FilterMatrix, GridShape, IndexMap,
//! };
//! use presage_stream::StreamStore;
//!
//! // 2 inputs, 3 time steps, 1 output, all-ones filter.
//! let map = IndexMap::select(GridShape::new(2, 1), None).unwrap();
//! let matrix = FilterMatrix::new(6, 1, vec![1.0; 6]).unwrap();
//! let mut engine =
//!     FilterApplyEngine::new(matrix, map, Box::new(DenseCpuMultiply::new())).unwrap();
//!
//! let mut store = StreamStore::new();
//! let binding = presage_filter::resolve_output_binding(&mut store, "outPF", "outmask", 1).unwrap();
//!
//! let out = store.resolve_mut(&binding.data).unwrap();
//! engine.compute_cycle(&[1.0, 1.0], out).unwrap();
//! assert_eq!(out.as_slice()[0], 2.0);
//! ```

mod backend;
mod binding;
mod engine;
mod error;
mod gpuset;
mod history;
mod mask;
mod matrix;

pub use backend::{BatchedGpuMultiply, DenseCpuMultiply, GpuExecutor, MultiplyBackend};
pub use binding::{resolve_output_binding, OutputBinding};
pub use engine::{CycleCompute, FilterApplyEngine};
pub use error::FilterError;
pub use gpuset::{parse_gpu_set, MAX_GPU_DEVICES};
pub use history::HistoryBuffer;
pub use mask::{GridShape, IndexMap};
pub use matrix::FilterMatrix;
