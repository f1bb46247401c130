//! Output data and mask stream reconciliation.

use presage_stream::StreamStore;
use tracing::info;

use crate::error::FilterError;

/// Resolved output bindings for a run.
#[derive(Debug, Clone)]
pub struct OutputBinding {
    /// Output data stream name.
    pub data: String,
    /// Output mask stream name.
    pub mask: String,
    /// Output mode count.
    pub n_out: usize,
}

/// Reconciles the output data and mask streams before the loop starts.
///
/// Checked in priority order:
///
/// 1. Both exist: shapes must match exactly (axis count and every size).
/// 2. Only data exists: it must hold at least `n_out` elements; a mask is
///    created with the same shape, fully active.
/// 3. Only mask exists: data is created with the mask's shape.
/// 4. Neither exists: both are created as dense `n_out x 1` vectors, the
///    mask fully active.
///
/// Runs once at setup; never re-runs mid-loop.
///
/// # Errors
///
/// Returns [`FilterError::BindingShapeMismatch`] in case 1 and
/// [`FilterError::OutputTooSmall`] in case 2; both are fatal
/// configuration errors.
pub fn resolve_output_binding(
    store: &mut StreamStore,
    data_name: &str,
    mask_name: &str,
    n_out: usize,
) -> Result<OutputBinding, FilterError> {
    let data_exists = store.resolve_or_warn(data_name).is_some();
    let mask_exists = store.resolve_or_warn(mask_name).is_some();

    match (data_exists, mask_exists) {
        (true, true) => {
            let data_shape = store.resolve(data_name)?.shape().to_vec();
            let mask_shape = store.resolve(mask_name)?.shape().to_vec();
            if data_shape != mask_shape {
                return Err(FilterError::BindingShapeMismatch {
                    data: data_name.to_string(),
                    mask: mask_name.to_string(),
                    data_shape,
                    mask_shape,
                });
            }
        }
        (true, false) => {
            let nelement = store.resolve(data_name)?.nelement();
            if nelement < n_out {
                return Err(FilterError::OutputTooSmall {
                    name: data_name.to_string(),
                    nelement,
                    required: n_out,
                });
            }
            let mask = store.create_like(mask_name, data_name)?;
            mask.as_mut_slice().fill(1.0);
        }
        (false, true) => {
            store.create_like(data_name, mask_name)?;
        }
        (false, false) => {
            store.create(data_name, &[n_out, 1])?;
            let mask = store.create(mask_name, &[n_out, 1])?;
            mask.as_mut_slice().fill(1.0);
        }
    }

    info!(
        data = data_name,
        mask = mask_name,
        n_out, "output bindings resolved"
    );

    Ok(OutputBinding {
        data: data_name.to_string(),
        mask: mask_name.to_string(),
        n_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Case 1: both exist with matching shapes.
    #[test]
    fn both_exist_matching() {
        let mut store = StreamStore::new();
        store.create("outPF", &[5, 1]).unwrap();
        store.create("outmask", &[5, 1]).unwrap();
        let binding = resolve_output_binding(&mut store, "outPF", "outmask", 5).unwrap();
        assert_eq!(binding.n_out, 5);
    }

    // Case 1: both exist, shapes differ.
    #[test]
    fn both_exist_mismatched_is_fatal() {
        let mut store = StreamStore::new();
        store.create("outPF", &[5, 1]).unwrap();
        store.create("outmask", &[5, 2]).unwrap();
        let err = resolve_output_binding(&mut store, "outPF", "outmask", 5).unwrap_err();
        assert!(matches!(err, FilterError::BindingShapeMismatch { .. }));
    }

    #[test]
    fn axis_count_mismatch_is_fatal() {
        let mut store = StreamStore::new();
        store.create("outPF", &[5]).unwrap();
        store.create("outmask", &[5, 1]).unwrap();
        let err = resolve_output_binding(&mut store, "outPF", "outmask", 5).unwrap_err();
        assert!(matches!(err, FilterError::BindingShapeMismatch { .. }));
    }

    // Case 2: data exists, large enough; mask is created fully active.
    #[test]
    fn data_only_creates_full_mask() {
        let mut store = StreamStore::new();
        store.create("outPF", &[8, 1]).unwrap();
        resolve_output_binding(&mut store, "outPF", "outmask", 5).unwrap();

        let mask = store.resolve("outmask").unwrap();
        assert_eq!(mask.shape(), &[8, 1]);
        assert!(mask.as_slice().iter().all(|&v| v == 1.0));
    }

    // Case 2: data exists but is too small.
    #[test]
    fn data_too_small_is_fatal() {
        let mut store = StreamStore::new();
        store.create("outPF", &[3, 1]).unwrap();
        let err = resolve_output_binding(&mut store, "outPF", "outmask", 5).unwrap_err();
        assert!(matches!(
            err,
            FilterError::OutputTooSmall {
                nelement: 3,
                required: 5,
                ..
            }
        ));
        // No mask was created on the failure path.
        assert!(!store.contains("outmask"));
    }

    // Case 3: mask exists, data is created with its shape.
    #[test]
    fn mask_only_creates_data() {
        let mut store = StreamStore::new();
        store.create("outmask", &[6, 1]).unwrap();
        resolve_output_binding(&mut store, "outPF", "outmask", 6).unwrap();

        let data = store.resolve("outPF").unwrap();
        assert_eq!(data.shape(), &[6, 1]);
    }

    // Case 4: neither exists.
    #[test]
    fn neither_exists_creates_both() {
        let mut store = StreamStore::new();
        resolve_output_binding(&mut store, "outPF", "outmask", 4).unwrap();

        let data = store.resolve("outPF").unwrap();
        assert_eq!(data.shape(), &[4, 1]);
        let mask = store.resolve("outmask").unwrap();
        assert_eq!(mask.shape(), &[4, 1]);
        assert!(mask.as_slice().iter().all(|&v| v == 1.0));
    }
}
