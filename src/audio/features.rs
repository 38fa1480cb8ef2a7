//! Frequency feature extraction.
//!
//! Reduces the byte-scaled spectrum snapshot to a three-element feature
//! vector: the bin array is partitioned into three contiguous groups by
//! shrinking ceiling division and each group is averaged. Zero-valued
//! features mean "no signal" and are filtered out before consumers divide
//! or gate on them, so downstream code must tolerate a short vector.

/// Partition `bins` into at most `groups` contiguous slices.
///
/// Cuts `ceil(remaining / divisor)` bins per group, with the divisor
/// starting at `groups` and shrinking by one after each cut. For
/// `bins.len() >= groups` this yields exactly `groups` slices whose sizes
/// sum to the input length; shorter inputs yield fewer slices.
pub fn split_bins(bins: &[u8], groups: usize) -> Vec<&[u8]> {
    let mut result = Vec::with_capacity(groups);
    let mut offset = 0;
    let mut divisor = groups;

    while offset < bins.len() && divisor > 0 {
        let size = (bins.len() - offset).div_ceil(divisor);
        result.push(&bins[offset..offset + size]);
        offset += size;
        divisor -= 1;
    }

    result
}

/// Mean of each group as the raw (unfiltered) feature vector.
pub fn feature_vector(bins: &[u8]) -> Vec<f32> {
    split_bins(bins, 3)
        .iter()
        .map(|group| {
            let sum: u32 = group.iter().map(|&bin| bin as u32).sum();
            sum as f32 / group.len() as f32
        })
        .collect()
}

/// Drop exact-zero entries; consumers gate and divide on what remains.
pub fn filter_silent(features: Vec<f32>) -> Vec<f32> {
    features.into_iter().filter(|&value| value != 0.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(bins: &[u8]) -> Vec<usize> {
        split_bins(bins, 3).iter().map(|group| group.len()).collect()
    }

    #[test]
    fn test_split_sizes_follow_shrinking_ceiling_rule() {
        assert_eq!(sizes(&[0; 10]), vec![4, 3, 3]);
        assert_eq!(sizes(&[0; 9]), vec![3, 3, 3]);
        assert_eq!(sizes(&[0; 1024]), vec![342, 341, 341]);
    }

    #[test]
    fn test_split_sizes_sum_to_input_length() {
        for n in 3..200 {
            let bins = vec![0u8; n];
            let parts = sizes(&bins);
            assert_eq!(parts.len(), 3, "n={n}");
            assert_eq!(parts.iter().sum::<usize>(), n, "n={n}");
        }
    }

    #[test]
    fn test_degenerate_inputs_yield_fewer_groups() {
        assert!(sizes(&[]).is_empty());
        assert_eq!(sizes(&[7]), vec![1]);
        assert_eq!(sizes(&[7, 7]), vec![1, 1]);
    }

    #[test]
    fn test_feature_vector_is_group_means() {
        // Groups: [10, 20, 30, 40], [50, 60, 70], [80, 90, 100]
        let bins = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];
        let features = feature_vector(&bins);
        assert_eq!(features, vec![25.0, 60.0, 90.0]);
    }

    #[test]
    fn test_uniform_spectrum_yields_uniform_features() {
        let bins = vec![150u8; 1024];
        assert_eq!(feature_vector(&bins), vec![150.0, 150.0, 150.0]);
    }

    #[test]
    fn test_silent_groups_are_filtered() {
        // First group all zero -> feature 0 -> absent downstream
        let bins = [0, 0, 0, 0, 50, 60, 70, 80, 90, 100];
        let filtered = filter_silent(feature_vector(&bins));
        assert_eq!(filtered, vec![60.0, 90.0]);

        let silence = vec![0u8; 32];
        assert!(filter_silent(feature_vector(&silence)).is_empty());
    }
}
