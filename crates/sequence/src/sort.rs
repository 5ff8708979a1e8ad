//! Stable comparison sort used by `Sequence::sort_by`.
//!
//! Top-down merge sort that ping-pongs between the data and one scratch copy,
//! finishing short runs with insertion sort.

use std::cmp::Ordering;

use crate::TUNED_PARAMS;

pub(crate) fn merge_sort_by<T, F>(data: &mut [T], compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = data.len();
    if len < 2 {
        return;
    }
    if is_sorted_by(data, compare) {
        return;
    }

    let mut buf = data.to_vec();
    merge_sort_recursive(&mut buf, data, 0, len, compare);
}

fn merge_sort_recursive<T, F>(
    src: &mut [T],
    dst: &mut [T],
    left: usize,
    right: usize,
    compare: &mut F,
)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = right - left;
    if len <= TUNED_PARAMS.insertion_threshold {
        dst[left..right].clone_from_slice(&src[left..right]);
        insertion_sort_by(&mut dst[left..right], compare);
        return;
    }

    let mid = left + (len >> 1);

    merge_sort_recursive(dst, src, left, mid, compare);
    merge_sort_recursive(dst, src, mid, right, compare);

    if compare(&src[mid - 1], &src[mid]) != Ordering::Greater {
        dst[left..right].clone_from_slice(&src[left..right]);
        return;
    }

    merge_ranges(src, dst, left, mid, right, compare);
}

fn merge_ranges<T, F>(
    src: &[T],
    dst: &mut [T],
    left: usize,
    mid: usize,
    right: usize,
    compare: &mut F,
)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut i = left;
    let mut j = mid;
    let mut k = left;

    // Ties take from the left run.
    while i < mid && j < right {
        if compare(&src[i], &src[j]) != Ordering::Greater {
            dst[k] = src[i].clone();
            i += 1;
        } else {
            dst[k] = src[j].clone();
            j += 1;
        }
        k += 1;
    }

    if i < mid {
        dst[k..(k + (mid - i))].clone_from_slice(&src[i..mid]);
    } else if j < right {
        dst[k..(k + (right - j))].clone_from_slice(&src[j..right]);
    }
}

fn insertion_sort_by<T, F>(data: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..data.len() {
        let mut j = i;
        while j > 0 && compare(&data[j - 1], &data[i]) == Ordering::Greater {
            j -= 1;
        }
        data[j..=i].rotate_right(1);
    }
}

fn is_sorted_by<T, F>(data: &[T], compare: &mut F) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    data.windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}
