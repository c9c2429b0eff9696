use std::iter::{Flatten, FusedIterator};

/// Creates a sequence over the given items.
///
/// # Examples
///
/// ```
/// let seq = seqs::from(["a", "b", "c"]);
/// assert_eq!(seq.collect::<String>(), "abc");
/// ```
#[inline]
pub fn from<T, const N: usize>(items: [T; N]) -> std::array::IntoIter<T, N> {
    items.into_iter()
}

/// Creates a sequence that yields nothing.
#[inline]
pub fn empty<T>() -> std::iter::Empty<T> {
    std::iter::empty()
}

/// Creates the endless sequence `start`, `start + step`, `start + 2 * step`, ...
///
/// The values wrap around on overflow.
///
/// # Examples
///
/// ```
/// let odds: Vec<_> = seqs::ints(1, 2).take(4).collect();
/// assert_eq!(odds, [1, 3, 5, 7]);
///
/// let down: Vec<_> = seqs::ints(3, -1).take(5).collect();
/// assert_eq!(down, [3, 2, 1, 0, -1]);
/// ```
pub fn ints(start: i64, step: i64) -> Ints {
    Ints { next: start, step }
}

/// An endless arithmetic sequence of integers.
///
/// This `struct` is created by [`ints()`]. See its documentation for more.
#[derive(Debug, Clone)]
pub struct Ints {
    next: i64,
    step: i64,
}

impl Iterator for Ints {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        self.next = self.next.wrapping_add(self.step);
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl FusedIterator for Ints {}

/// Concatenates the given sequences.
///
/// Each sequence is opened only once the previous one has ended, and dropped right
/// after it ends.
///
/// # Examples
///
/// ```
/// let seq = seqs::concat([vec![1, 2], vec![], vec![3]]);
/// assert_eq!(seq.collect::<Vec<_>>(), [1, 2, 3]);
/// ```
#[inline]
pub fn concat<S>(seqs: S) -> Flatten<S::IntoIter>
where
    S: IntoIterator<Item: IntoIterator>,
{
    seqs.into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{Gauge, Tracked};

    proptest! {
        #[test]
        fn concat_matches_flatten(seqs in propvec(propvec(any::<u8>(), ..=5), ..=5)) {
            let expected: Vec<_> = seqs.iter().flatten().copied().collect();
            prop_assert_eq!(concat(seqs).collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn from_and_empty() {
        assert_eq!(from([1, 2, 3]).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(empty::<String>().count(), 0);
        // Every call gives a fresh sequence.
        assert_eq!(empty::<String>().count(), 0);
    }

    #[test]
    fn concat_releases_each_input_when_it_ends() {
        let gauge = Gauge::default();
        let mut seq = concat([
            Tracked::with_gauge(vec![1], &gauge),
            Tracked::with_gauge(vec![2, 3], &gauge),
        ]);
        // Both inputs exist up front, inside the array.
        assert_eq!(gauge.live(), 2);

        assert_eq!(seq.next(), Some(1));
        assert_eq!(seq.next(), Some(2));
        assert_eq!(gauge.live(), 1);
        assert_eq!(seq.next(), Some(3));
        assert_eq!(seq.next(), None);
        assert_eq!(gauge.live(), 0);
    }

    #[test]
    fn ints_counts_from_start() {
        assert_eq!(ints(0, 1).take(10).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert_eq!(ints(5, 0).take(3).collect::<Vec<_>>(), [5, 5, 5]);
    }
}
