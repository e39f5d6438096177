//! Merge Step

/// Merge the sorted runs `[left, mid]` and `[mid + 1, right]` in place
///
/// Both runs are copied into temporaries first, so `buffer[left..=right]`
/// is the only region written.
pub fn merge<T: Ord + Clone>(buffer: &mut [T], left: usize, mid: usize, right: usize) {
    let lower = buffer[left..=mid].to_vec();
    let upper = buffer[mid + 1..=right].to_vec();
    merge_into(&mut buffer[left..=right], &lower, &upper);
}

/// Merge two sorted runs into `out`, which must hold exactly both runs
pub(crate) fn merge_into<T: Ord + Clone>(out: &mut [T], lower: &[T], upper: &[T]) {
    debug_assert_eq!(out.len(), lower.len() + upper.len());

    let (mut i, mut j, mut k) = (0, 0, 0);

    while i < lower.len() && j < upper.len() {
        // Ties go to the lower run, which keeps the sort stable
        if lower[i] <= upper[j] {
            out[k] = lower[i].clone();
            i += 1;
        } else {
            out[k] = upper[j].clone();
            j += 1;
        }
        k += 1;
    }

    let rest = lower.len() - i;
    out[k..k + rest].clone_from_slice(&lower[i..]);
    out[k + rest..].clone_from_slice(&upper[j..]);
}
