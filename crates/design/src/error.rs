//! Error types for the presage_design crate.

use presage_filter::FilterError;

/// Error type for telemetry capture handling and matrix construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DesignError {
    /// Returned when the capture is neither 2-D nor 3-D.
    #[error("invalid telemetry capture rank: naxis = {naxis}, expected 2 or 3")]
    InvalidRank {
        /// Axis count of the offending capture.
        naxis: usize,
    },

    /// Returned when the capture data length disagrees with its shape.
    #[error("capture data length {actual}, shape implies {expected}")]
    DataLengthMismatch {
        /// Element count implied by the shape.
        expected: usize,
        /// Provided data length.
        actual: usize,
    },

    /// Returned when the capture is too short for the requested order and
    /// latency.
    #[error("capture has {nbspl} samples, need more than {required} for this order and latency")]
    InsufficientSamples {
        /// Samples in the capture.
        nbspl: usize,
        /// Minimum sample count that would leave at least one row.
        required: usize,
    },

    /// Returned when the filter order is zero.
    #[error("filter order must be at least 1")]
    InvalidOrder,

    /// Returned when the latency is negative or non-finite.
    #[error("invalid latency {latency}: must be finite and non-negative")]
    InvalidLatency {
        /// The rejected latency, in frames.
        latency: f32,
    },

    /// Returned when the regularization coefficient is negative or
    /// non-finite.
    #[error("invalid regularization coefficient {lambda}")]
    InvalidLambda {
        /// The rejected coefficient.
        lambda: f64,
    },

    /// Variable selection error from the shared index selector.
    #[error(transparent)]
    Select(#[from] FilterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = DesignError::InvalidRank { naxis: 4 };
        assert_eq!(
            err.to_string(),
            "invalid telemetry capture rank: naxis = 4, expected 2 or 3"
        );

        let err = DesignError::InsufficientSamples {
            nbspl: 10,
            required: 14,
        };
        assert!(err.to_string().contains("10 samples"));
    }
}
