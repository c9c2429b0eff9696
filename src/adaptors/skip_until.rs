use std::{fmt::Debug, iter::FusedIterator};

/// An iterator that discards items until one satisfies a predicate,
/// then passes that item and everything after it through.
///
/// This `struct` is created by [`SeqExt::skip_until()`](crate::SeqExt::skip_until).
/// See its documentation for more.
#[derive(Clone)]
pub struct SkipUntil<I, F> {
    iter: I,
    // `None` once the predicate has been satisfied. It is never called again.
    pred: Option<F>,
}

impl<I, F> SkipUntil<I, F> {
    pub(crate) fn new(iter: I, pred: F) -> Self {
        Self {
            iter,
            pred: Some(pred),
        }
    }
}

impl<I, F> Iterator for SkipUntil<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.pred {
            None => self.iter.next(),
            Some(pred) => {
                let item = self.iter.find(pred)?;
                self.pred = None;
                Some(item)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        match self.pred {
            None => (lower, upper),
            Some(_) => (0, upper),
        }
    }
}

impl<I, F> FusedIterator for SkipUntil<I, F>
where
    I: FusedIterator,
    F: FnMut(&I::Item) -> bool,
{
}

impl<I: Debug, F> Debug for SkipUntil<I, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkipUntil")
            .field("iter", &self.iter)
            .field("skipping", &self.pred.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn predicate_is_not_called_after_the_first_match() {
        let mut calls = 0;
        let got: Vec<_> = [1, 2, 5, 1, 6, 0]
            .into_iter()
            .skip_until(|&n| {
                calls += 1;
                n > 4
            })
            .collect();

        assert_eq!(got, [5, 1, 6, 0]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn never_satisfied() {
        assert_eq!((1..10).skip_until(|&n| n > 100).count(), 0);
    }
}
