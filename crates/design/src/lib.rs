//! Offline construction of the lagged-sample regression matrices.
//!
//! From a recorded telemetry capture, this crate packs the design matrix
//! (lagged values of the active input variables) and the paired target
//! matrix (active output variables observed one latency later). An
//! external regularized least-squares / SVD pseudo-inverse solver turns
//! the pair into the filter matrix consumed by `presage_filter`.
//!
//! # Dimensions
//!
//! For a capture of `nbspl` samples, filter order `PForder` and latency
//! `PFlatency`:
//!
//! ```text
//! NBmvec   = nbspl - PForder - floor(PFlatency) - 2
//! mvecsize = NBpixin * PForder
//! ```
//!
//! The design matrix is `NBmvec x mvecsize`, extended by `mvecsize`
//! identity-scaled penalty rows when regularization is enabled. Row `m`
//! packs, at column `dt * NBpixin + pix`, the value of active input `pix`
//! observed `dt` frames behind the row's current sample.
//!
//! # Quick start
//!
//! ```
//! use presage_design::{build_design_matrix, DesignConfig, TelemetryCapture};
//!
//! // 3 variables, 40 samples of zeros.
//! let capture = TelemetryCapture::from_2d(3, 40, vec![0.0; 120]).unwrap();
//! let config = DesignConfig::new(5).with_latency(1.2);
//! let design = build_design_matrix(&capture, None, &config).unwrap();
//!
//! assert_eq!(design.n_rows(), 40 - 5 - 1 - 2);
//! assert_eq!(design.n_cols(), 3 * 5);
//! ```

mod builder;
mod capture;
mod config;
mod error;

pub use builder::{build_design_matrix, build_target_matrix, DesignMatrix, TargetMatrix};
pub use capture::TelemetryCapture;
pub use config::DesignConfig;
pub use error::DesignError;
