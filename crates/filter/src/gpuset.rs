//! Colon-delimited GPU device-set parsing.

/// Highest device index considered when scanning a device-set string.
pub const MAX_GPU_DEVICES: u32 = 20;

/// Parses a colon-delimited GPU device set such as `":2:3:5:"`.
///
/// Each candidate device `i` in `0..MAX_GPU_DEVICES` is selected iff the
/// token `:i:` appears as a substring. An empty result means the CPU path.
///
/// ```
/// use presage_filter::parse_gpu_set;
///
/// assert_eq!(parse_gpu_set(":2:3:5:"), vec![2, 3, 5]);
/// assert!(parse_gpu_set("").is_empty());
/// ```
pub fn parse_gpu_set(s: &str) -> Vec<u32> {
    (0..MAX_GPU_DEVICES)
        .filter(|i| s.contains(&format!(":{i}:")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_example() {
        assert_eq!(parse_gpu_set(":2:3:5:"), vec![2, 3, 5]);
    }

    #[test]
    fn empty_and_bare_colon_mean_cpu() {
        assert!(parse_gpu_set("").is_empty());
        assert!(parse_gpu_set(":").is_empty());
    }

    #[test]
    fn two_digit_device_is_not_confused_with_single_digits() {
        assert_eq!(parse_gpu_set(":12:"), vec![12]);
    }

    #[test]
    fn single_device() {
        assert_eq!(parse_gpu_set(":0:"), vec![0]);
    }

    #[test]
    fn out_of_range_candidates_ignored() {
        assert!(parse_gpu_set(":99:").is_empty());
    }
}
