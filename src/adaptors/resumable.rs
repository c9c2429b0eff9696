use std::iter::FusedIterator;

/// An iterator whose iteration can be paused and resumed from where it left off,
/// and whose input is released explicitly.
///
/// Breaking out of a `for item in &mut resumable` loop leaves the cursor in place;
/// a later loop over `&mut resumable` continues with the next item. The input is
/// released when it is exhausted, when [`stop()`](Resumable::stop) is called, or
/// when the `Resumable` is dropped, whichever happens first.
///
/// This `struct` is created by [`SeqExt::resumable()`](crate::SeqExt::resumable).
///
/// # Examples
///
/// ```
/// use seqs::prelude::*;
///
/// let mut nums = (1..=6).resumable();
///
/// let mut first = vec![];
/// for num in &mut nums {
///     first.push(num);
///     if num == 2 {
///         break;
///     }
/// }
///
/// let rest: Vec<_> = nums.by_ref().take(2).collect();
/// assert_eq!((first, rest), (vec![1, 2], vec![3, 4]));
///
/// nums.stop();
/// assert_eq!(nums.next(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Resumable<I> {
    iter: Option<I>,
}

impl<I> Resumable<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter: Some(iter) }
    }

    /// Releases the input. Calling it again does nothing.
    pub fn stop(&mut self) {
        if self.iter.take().is_some() {
            tracing::trace!("resumable sequence stopped");
        }
    }

    /// Returns `true` once the input has been released.
    pub fn is_stopped(&self) -> bool {
        self.iter.is_none()
    }
}

impl<I: Iterator> Iterator for Resumable<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.as_mut()?.next();
        if item.is_none() {
            self.iter = None;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<I: Iterator> FusedIterator for Resumable<I> {}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::test_utils::Tracked;

    #[test]
    fn resumes_where_it_left_off() {
        let mut seq = (0..10).resumable();

        let first: Vec<_> = seq.by_ref().take(3).collect();
        let second: Vec<_> = seq.by_ref().take(3).collect();
        let rest: Vec<_> = seq.by_ref().collect();

        assert_eq!(first, [0, 1, 2]);
        assert_eq!(second, [3, 4, 5]);
        assert_eq!(rest, [6, 7, 8, 9]);
        assert!(seq.is_stopped());
    }

    #[test]
    fn stop_is_idempotent_and_releases() {
        let (source, gauge) = Tracked::new(0..10);
        let mut seq = source.resumable();
        assert_eq!(seq.next(), Some(0));

        seq.stop();
        assert_eq!(gauge.live(), 0);
        seq.stop();
        assert_eq!(seq.next(), None);
        assert_eq!(gauge.pulls(), 1);
    }

    #[test]
    fn resumes_a_generator() {
        let mut seq = generate(|y| {
            for n in 0..5 {
                if y.send(n).is_break() {
                    return;
                }
            }
        })
        .resumable();

        for n in &mut seq {
            if n == 1 {
                break;
            }
        }
        assert_eq!(seq.collect::<Vec<_>>(), [2, 3, 4]);
    }
}
