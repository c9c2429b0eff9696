use std::{fmt::Debug, iter::FusedIterator};

/// A sequence whose first item has already been pulled, and is restored in front
/// of the remaining items.
///
/// Unlike [`Peekable`](std::iter::Peekable), the first item is pulled eagerly when
/// this iterator is created, so that emptiness can be reported by value.
/// If the input turns out to be empty, it is released (dropped) right away.
///
/// This `struct` is created by [`SeqExt::peek_first()`](crate::SeqExt::peek_first)
/// and [`SeqExt::check_empty()`](crate::SeqExt::check_empty).
/// See their documentation for more.
pub struct Peeked<I: Iterator> {
    head: Option<I::Item>,
    rest: Option<I>,
}

impl<I: Iterator> Peeked<I> {
    pub(crate) fn new(mut iter: I) -> Self {
        match iter.next() {
            Some(head) => Self {
                head: Some(head),
                rest: Some(iter),
            },
            None => Self {
                head: None,
                rest: None,
            },
        }
    }

    /// Returns the first item that has not been yielded yet, if it was pulled at creation.
    ///
    /// Once that item is yielded, this returns `None`.
    pub fn first(&self) -> Option<&I::Item> {
        self.head.as_ref()
    }

    /// Returns `true` if the input had no items at all.
    pub fn was_empty(&self) -> bool {
        self.head.is_none() && self.rest.is_none()
    }
}

impl<I: Iterator> Iterator for Peeked<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(head) = self.head.take() {
            return Some(head);
        }

        let rest = self.rest.as_mut()?;
        let item = rest.next();
        if item.is_none() {
            self.rest = None;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let extra = usize::from(self.head.is_some());
        let (lower, upper) = self
            .rest
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint);
        (
            lower.saturating_add(extra),
            upper.and_then(|upper| upper.checked_add(extra)),
        )
    }
}

impl<I: Iterator> FusedIterator for Peeked<I> {}

impl<I> Debug for Peeked<I>
where
    I: Iterator<Item: Debug> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peeked")
            .field("head", &self.head)
            .field("rest", &self.rest)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::test_utils::Tracked;

    #[test]
    fn first_item_is_restored() {
        let peeked = [1, 2, 3].into_iter().peek_first();
        assert_eq!(peeked.first(), Some(&1));
        assert_eq!(peeked.size_hint(), (3, Some(3)));
        assert_eq!(peeked.collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn check_empty() {
        let (seq, empty) = [4, 5].into_iter().check_empty();
        assert!(!empty);
        assert_eq!(seq.collect::<Vec<_>>(), [4, 5]);

        let (seq, empty) = std::iter::empty::<i32>().check_empty();
        assert!(empty);
        assert!(seq.was_empty());
        assert_eq!(seq.count(), 0);
    }

    #[test]
    fn empty_input_is_released_immediately() {
        let (source, live) = Tracked::new(std::iter::empty::<i32>());
        let (seq, empty) = source.check_empty();
        assert!(empty);
        assert_eq!(live.live(), 0);
        drop(seq);
    }

    #[test]
    fn abandoning_releases_the_input() {
        let (source, live) = Tracked::new(0..100);
        let mut seq = source.peek_first();
        assert_eq!(seq.next(), Some(0));
        assert_eq!(seq.next(), Some(1));
        assert_eq!(live.live(), 1);
        assert_eq!(live.pulls(), 2);

        drop(seq);
        assert_eq!(live.live(), 0);
    }
}
