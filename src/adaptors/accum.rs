use std::{fmt::Debug, iter::FusedIterator};

use crate::ErrorSlot;

/// An iterator that yields every intermediate value of a fold.
///
/// This `struct` is created by [`SeqExt::accum()`](crate::SeqExt::accum).
/// See its documentation for more.
#[derive(Clone)]
pub struct Accum<I, A, F> {
    iter: I,
    // `None` only while `f` is running, or after it panicked.
    accum: Option<A>,
    f: F,
}

impl<I, A, F> Accum<I, A, F> {
    pub(crate) fn new(iter: I, init: A, f: F) -> Self {
        Self {
            iter,
            accum: Some(init),
            f,
        }
    }
}

impl<I, A, F> Iterator for Accum<I, A, F>
where
    I: Iterator,
    A: Clone,
    F: FnMut(A, I::Item) -> A,
{
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next()?;
        let accum = (self.f)(self.accum.take()?, item);
        self.accum = Some(accum.clone());
        Some(accum)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, A, F> FusedIterator for Accum<I, A, F>
where
    I: FusedIterator,
    A: Clone,
    F: FnMut(A, I::Item) -> A,
{
}

impl<I: Debug, A: Debug, F> Debug for Accum<I, A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accum")
            .field("iter", &self.iter)
            .field("accum", &self.accum)
            .finish()
    }
}

/// An iterator that yields every intermediate value of a fallible fold,
/// stopping at the first error.
///
/// The error is recorded in the [`ErrorSlot`] returned alongside this iterator.
///
/// This `struct` is created by [`SeqExt::try_accum()`](crate::SeqExt::try_accum)
/// and [`SeqExt::try_accum_into()`](crate::SeqExt::try_accum_into).
/// See their documentation for more.
pub struct TryAccum<I, A, F, E> {
    iter: I,
    // `None` once stopped.
    accum: Option<A>,
    f: F,
    slot: ErrorSlot<E>,
}

impl<I, A, F, E> TryAccum<I, A, F, E> {
    pub(crate) fn new(iter: I, init: A, f: F, slot: ErrorSlot<E>) -> Self {
        Self {
            iter,
            accum: Some(init),
            f,
            slot,
        }
    }
}

impl<I, A, F, E> Iterator for TryAccum<I, A, F, E>
where
    I: Iterator,
    A: Clone,
    F: FnMut(A, I::Item) -> Result<A, E>,
{
    type Item = A;

    fn next(&mut self) -> Option<Self::Item> {
        // Another stage sharing the slot may have failed already.
        if self.accum.is_none() || self.slot.is_set() {
            self.accum = None;
            return None;
        }

        let item = self.iter.next()?;
        let accum = self.accum.take()?;
        match (self.f)(accum, item) {
            Ok(accum) => {
                self.accum = Some(accum.clone());
                Some(accum)
            }
            Err(err) => {
                self.slot.set(err);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.accum.is_none() {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

impl<I, A, F, E> FusedIterator for TryAccum<I, A, F, E>
where
    I: FusedIterator,
    A: Clone,
    F: FnMut(A, I::Item) -> Result<A, E>,
{
}

impl<I: Debug, A: Debug, F, E: Debug> Debug for TryAccum<I, A, F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryAccum")
            .field("iter", &self.iter)
            .field("accum", &self.accum)
            .field("slot", &self.slot)
            .finish()
    }
}
