//! Sequential Merge Sort
//!
//! Single-threaded reference path. Used below the parallel threshold,
//! inside dispatched tasks, and as a standalone baseline.

use crate::merge::merge;

/// Sort `buffer[left..=right]` ascending, stable
///
/// A no-op when `left >= right`. Panics if `right` is out of bounds.
pub fn sequential_sort<T: Ord + Clone>(buffer: &mut [T], left: usize, right: usize) {
    if left >= right {
        return;
    }

    let mid = left + (right - left) / 2;
    sequential_sort(buffer, left, mid);
    sequential_sort(buffer, mid + 1, right);
    merge(buffer, left, mid, right);
}

/// Sort the whole buffer on the calling thread
pub fn sequential_sort_all<T: Ord + Clone>(buffer: &mut [T]) {
    if let Some(right) = buffer.len().checked_sub(1) {
        sequential_sort(buffer, 0, right);
    }
}
