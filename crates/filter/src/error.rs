//! Error types for the presage_filter crate.

use presage_stream::StreamError;

/// Error type for filter setup and per-cycle computation.
///
/// Everything here is either a setup-time configuration error (safe to
/// fail loudly once, before the loop starts) or a precondition violation
/// surfaced during a cycle. There is no retry path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FilterError {
    /// Returned when a selection mask does not cover the variable grid.
    #[error("mask length {actual} does not match grid size {expected}")]
    MaskLengthMismatch {
        /// Grid cell count.
        expected: usize,
        /// Mask element count.
        actual: usize,
    },

    /// Returned when a mask selects no variables.
    #[error("selection mask has no active cells")]
    NoActiveCells,

    /// Returned when the filter matrix row count is not a multiple of the
    /// active-input count, so no whole number of time steps fits.
    #[error("filter matrix has {rows} history rows, not divisible by {n_active} active inputs")]
    MatrixShapeMismatch {
        /// History rows in the filter matrix.
        rows: usize,
        /// Active input count.
        n_active: usize,
    },

    /// Returned when the matrix data length disagrees with its dimensions.
    #[error("filter matrix data length {actual}, expected {expected}")]
    MatrixLengthMismatch {
        /// `rows * n_out`.
        expected: usize,
        /// Provided data length.
        actual: usize,
    },

    /// Returned when the history window length disagrees with the filter
    /// matrix history dimension.
    #[error("history window has {actual} elements, filter matrix expects {expected}")]
    HistoryLengthMismatch {
        /// History rows in the filter matrix.
        expected: usize,
        /// History window length.
        actual: usize,
    },

    /// Returned when an index map does not match the buffer it fills.
    #[error("index map has {actual} active positions, buffer holds {expected} per step")]
    IndexMapMismatch {
        /// Active-variable count the buffer was sized for.
        expected: usize,
        /// Active positions in the index map.
        actual: usize,
    },

    /// Returned when an input sample is too short for the index map.
    #[error("input sample has {actual} elements, index map addresses up to {required}")]
    InputTooSmall {
        /// Highest flat position addressed, plus one.
        required: usize,
        /// Input sample length.
        actual: usize,
    },

    /// Returned when the output data stream cannot hold all output modes.
    #[error("output stream {name} has {nelement} elements, needs {required}")]
    OutputTooSmall {
        /// Output data stream name.
        name: String,
        /// Element count of the existing stream.
        nelement: usize,
        /// Output mode count.
        required: usize,
    },

    /// Returned when output data and mask streams disagree in shape.
    #[error(
        "output streams {data} {data_shape:?} and {mask} {mask_shape:?} are incompatible"
    )]
    BindingShapeMismatch {
        /// Output data stream name.
        data: String,
        /// Output mask stream name.
        mask: String,
        /// Shape of the data stream.
        data_shape: Vec<usize>,
        /// Shape of the mask stream.
        mask_shape: Vec<usize>,
    },

    /// Returned when GPU backend initialization fails. Fatal: the run
    /// cannot proceed without a working backend.
    #[error("GPU backend initialization failed: {reason}")]
    BackendInit {
        /// Backend-reported cause.
        reason: String,
    },

    /// Returned when a GPU execute call fails mid-run.
    #[error("GPU backend execute failed: {reason}")]
    BackendExecute {
        /// Backend-reported cause.
        reason: String,
    },

    /// Returned when a multiply backend is used before its one-time
    /// initialization.
    #[error("multiply backend used before initialization")]
    BackendUninitialized,

    /// Stream store error during binding resolution.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = FilterError::MatrixShapeMismatch {
            rows: 61,
            n_active: 6,
        };
        assert_eq!(
            err.to_string(),
            "filter matrix has 61 history rows, not divisible by 6 active inputs"
        );

        let err = FilterError::OutputTooSmall {
            name: "outPF".to_string(),
            nelement: 3,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "output stream outPF has 3 elements, needs 5"
        );
    }
}
