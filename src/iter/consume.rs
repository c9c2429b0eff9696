use std::{cmp::Ordering, collections::VecDeque};

/// Consumes `seq` entirely and returns how many items it had.
///
/// Never returns for an endless sequence.
pub fn drain<I: IntoIterator>(seq: I) -> usize {
    seq.into_iter().fold(0, |count, _| count + 1)
}

/// Returns the last `n` items of `seq` in order, or all of them if there are fewer.
///
/// Consumes `seq` entirely while keeping at most `n` items at a time.
///
/// # Examples
///
/// ```
/// assert_eq!(seqs::last_n(1..=10, 3), [8, 9, 10]);
/// assert_eq!(seqs::last_n(1..=2, 3), [1, 2]);
/// ```
pub fn last_n<I: IntoIterator>(seq: I, n: usize) -> Vec<I::Item> {
    let iter = seq.into_iter();
    if n == 0 {
        drain(iter);
        return Vec::new();
    }

    let mut ring = VecDeque::with_capacity(n);
    for item in iter {
        if ring.len() == n {
            ring.pop_front();
        }
        ring.push_back(item);
    }
    ring.into()
}

/// Returns `true` if both sequences have equal items in the same order and end
/// together.
///
/// Stops at the first difference. Never returns for two equal endless sequences.
#[inline]
pub fn equal<A, B>(a: A, b: B) -> bool
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialEq<B::Item>,
{
    a.into_iter().eq(b)
}

/// Like [`equal()`], but compares items with `eq`, which may take different types.
///
/// # Examples
///
/// ```
/// let nums = [1, 2, 3];
/// let strs = ["1", "2", "3"];
/// assert!(seqs::equal_by(nums, strs, |n, s| n.to_string() == s));
/// ```
pub fn equal_by<A, B, F>(a: A, b: B, mut eq: F) -> bool
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> bool,
{
    let mut b = b.into_iter();
    for x in a {
        let Some(y) = b.next() else {
            return false;
        };
        if !eq(x, y) {
            return false;
        }
    }
    b.next().is_none()
}

/// Compares two sequences lexicographically.
///
/// A sequence that is a strict prefix of the other compares [`Less`](Ordering::Less).
#[inline]
pub fn compare<A, B>(a: A, b: B) -> Ordering
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    A::Item: Ord,
{
    a.into_iter().cmp(b)
}

/// Like [`compare()`], but compares items with `cmp`.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
///
/// let by_len = |a: &str, b: &str| a.len().cmp(&b.len());
/// assert_eq!(seqs::compare_by(["ab", "c"], ["xy", "zz"], by_len), Ordering::Less);
/// ```
pub fn compare_by<A, B, F>(a: A, b: B, mut cmp: F) -> Ordering
where
    A: IntoIterator,
    B: IntoIterator,
    F: FnMut(A::Item, B::Item) -> Ordering,
{
    let mut b = b.into_iter();
    for x in a {
        let Some(y) = b.next() else {
            return Ordering::Greater;
        };
        match cmp(x, y) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    if b.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}
