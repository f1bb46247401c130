//! Configuration for design matrix construction.

use crate::error::DesignError;

/// Parameters for one design-matrix build.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use presage_design::DesignConfig;
///
/// let config = DesignConfig::new(10)
///     .with_latency(2.7)
///     .with_regularization(0.001);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DesignConfig {
    /// Filter order: lagged time steps packed per row.
    order: usize,
    /// Latency between a row's current sample and its target, in frames.
    latency: f32,
    /// Regularization coefficient for the identity penalty block.
    reg_lambda: f64,
    /// Whether the penalty block is appended at all.
    regularize: bool,
    /// Whether per-variable time averages are subtracted before packing.
    remove_mean: bool,
}

impl DesignConfig {
    /// Creates a configuration with the given filter order.
    ///
    /// Defaults: `latency = 0.0`, no regularization, mean removal on.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            latency: 0.0,
            reg_lambda: 0.0,
            regularize: false,
            remove_mean: true,
        }
    }

    /// Sets the latency in frames (fractional allowed).
    pub fn with_latency(mut self, latency: f32) -> Self {
        self.latency = latency;
        self
    }

    /// Enables the identity penalty block with the given coefficient.
    pub fn with_regularization(mut self, reg_lambda: f64) -> Self {
        self.reg_lambda = reg_lambda;
        self.regularize = true;
        self
    }

    /// Sets whether per-variable time averages are subtracted.
    pub fn with_remove_mean(mut self, remove_mean: bool) -> Self {
        self.remove_mean = remove_mean;
        self
    }

    /// Returns the filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the latency in frames.
    pub fn latency(&self) -> f32 {
        self.latency
    }

    /// Returns the regularization coefficient.
    pub fn reg_lambda(&self) -> f64 {
        self.reg_lambda
    }

    /// Returns true if the penalty block is appended.
    pub fn regularize(&self) -> bool {
        self.regularize
    }

    /// Returns true if mean removal is enabled.
    pub fn remove_mean(&self) -> bool {
        self.remove_mean
    }

    /// Validates this configuration before any allocation happens.
    ///
    /// Returns an error if the order is zero, the latency is negative or
    /// non-finite, or the regularization coefficient is negative or
    /// non-finite.
    pub fn validate(&self) -> Result<(), DesignError> {
        if self.order == 0 {
            return Err(DesignError::InvalidOrder);
        }
        if !self.latency.is_finite() || self.latency < 0.0 {
            return Err(DesignError::InvalidLatency {
                latency: self.latency,
            });
        }
        if !self.reg_lambda.is_finite() || self.reg_lambda < 0.0 {
            return Err(DesignError::InvalidLambda {
                lambda: self.reg_lambda,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = DesignConfig::new(10);
        assert_eq!(cfg.order(), 10);
        assert_eq!(cfg.latency(), 0.0);
        assert!(!cfg.regularize());
        assert!(cfg.remove_mean());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_chaining() {
        let cfg = DesignConfig::new(5)
            .with_latency(2.7)
            .with_regularization(0.001)
            .with_remove_mean(false);
        assert_eq!(cfg.latency(), 2.7);
        assert!(cfg.regularize());
        assert_eq!(cfg.reg_lambda(), 0.001);
        assert!(!cfg.remove_mean());
    }

    #[test]
    fn invalid_order() {
        assert!(matches!(
            DesignConfig::new(0).validate().unwrap_err(),
            DesignError::InvalidOrder
        ));
    }

    #[test]
    fn invalid_latency() {
        let cfg = DesignConfig::new(1).with_latency(-0.1);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            DesignError::InvalidLatency { .. }
        ));
        let cfg = DesignConfig::new(1).with_latency(f32::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn invalid_lambda() {
        let cfg = DesignConfig::new(1).with_regularization(-1.0);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            DesignError::InvalidLambda { lambda } if lambda == -1.0
        ));
        assert!(DesignConfig::new(1)
            .with_regularization(f64::INFINITY)
            .validate()
            .is_err());
    }
}
