use std::cmp::Ordering;

use crate::{
    Accum, CommBoth, CommLeft, Dup, ErrorSlot, Merge, OrdCmp, Pages, Peeked, Resumable, SkipUntil,
    TryAccum, TryMap, Uniq, ZipAll, ZipOrDefault,
};

/// Extends [`Iterator`] with the sequence combinators of this crate.
///
/// This trait is automatically implemented for all [`Iterator`] types.
pub trait SeqExt: Iterator {
    /// Creates an iterator that yields every intermediate value of a fold.
    ///
    /// The first call to `f` receives `init`; each later call receives the value the
    /// previous call returned. This is [`fold()`](Iterator::fold) that reports its
    /// progress.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let sums: Vec<_> = [1, 2, 3, 4].into_iter().accum(0, |sum, n| sum + n).collect();
    /// assert_eq!(sums, [1, 3, 6, 10]);
    /// ```
    #[inline]
    fn accum<A, F>(self, init: A, f: F) -> Accum<Self, A, F>
    where
        Self: Sized,
        A: Clone,
        F: FnMut(A, Self::Item) -> A,
    {
        Accum::new(self, init, f)
    }

    /// Like [`accum()`](SeqExt::accum), but `f` may fail.
    ///
    /// The first error ends the iterator and is recorded in the returned
    /// [`ErrorSlot`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let (products, err) = [2_u8, 8, 16, 2]
    ///     .into_iter()
    ///     .try_accum(1_u8, |acc, n| acc.checked_mul(n).ok_or("overflow"));
    ///
    /// assert_eq!(products.collect::<Vec<_>>(), [2, 16]);
    /// assert_eq!(err.get(), Some(&"overflow"));
    /// ```
    #[inline]
    fn try_accum<A, E, F>(self, init: A, f: F) -> (TryAccum<Self, A, F, E>, ErrorSlot<E>)
    where
        Self: Sized,
        A: Clone,
        F: FnMut(A, Self::Item) -> Result<A, E>,
    {
        let slot = ErrorSlot::new();
        (TryAccum::new(self, init, f, slot.clone()), slot)
    }

    /// Like [`try_accum()`](SeqExt::try_accum), but records the error in an existing
    /// slot.
    ///
    /// The iterator also stops as soon as another user of `slot` records an error.
    #[inline]
    fn try_accum_into<A, E, F>(self, init: A, f: F, slot: &ErrorSlot<E>) -> TryAccum<Self, A, F, E>
    where
        Self: Sized,
        A: Clone,
        F: FnMut(A, Self::Item) -> Result<A, E>,
    {
        TryAccum::new(self, init, f, slot.clone())
    }

    /// Maps every item with a fallible closure.
    ///
    /// The first error ends the iterator and is recorded in the returned
    /// [`ErrorSlot`], which should be checked once the iterator is drained.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let (nums, err) = ["1", "2", "three"].into_iter().try_map(str::parse::<i32>);
    ///
    /// assert_eq!(nums.collect::<Vec<_>>(), [1, 2]);
    /// assert!(err.is_set());
    /// ```
    #[inline]
    fn try_map<U, E, F>(self, f: F) -> (TryMap<Self, F, E>, ErrorSlot<E>)
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Result<U, E>,
    {
        let slot = ErrorSlot::new();
        (TryMap::new(self, f, slot.clone()), slot)
    }

    /// Like [`try_map()`](SeqExt::try_map), but records the error in an existing slot.
    ///
    /// Sharing one slot between the stages of a pipeline stops every stage after the
    /// first error anywhere, and keeps that first error.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::{ErrorSlot, prelude::*};
    ///
    /// let slot = ErrorSlot::new();
    /// let halves: Vec<_> = ["4", "x", "8"]
    ///     .into_iter()
    ///     .try_map_into(|s| s.parse::<u32>().map_err(|_| "not a number"), &slot)
    ///     .try_map_into(|n| if n % 2 == 0 { Ok(n / 2) } else { Err("odd") }, &slot)
    ///     .collect();
    ///
    /// assert_eq!(halves, [2]);
    /// assert_eq!(slot.get(), Some(&"not a number"));
    /// ```
    #[inline]
    fn try_map_into<U, E, F>(self, f: F, slot: &ErrorSlot<E>) -> TryMap<Self, F, E>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Result<U, E>,
    {
        TryMap::new(self, f, slot.clone())
    }

    /// Removes adjacent duplicates.
    ///
    /// Only runs of equal items are collapsed; an item equal to an earlier,
    /// non-adjacent one is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let got: Vec<_> = [1, 2, 1, 1, 2, 2, 3].into_iter().uniq().collect();
    /// assert_eq!(got, [1, 2, 1, 2, 3]);
    /// ```
    #[inline]
    #[allow(clippy::type_complexity)]
    fn uniq(self) -> Uniq<Self, fn(&Self::Item, &Self::Item) -> bool>
    where
        Self: Sized,
        Self::Item: PartialEq + Clone,
    {
        let eq: fn(&Self::Item, &Self::Item) -> bool = PartialEq::eq;
        Uniq::new(self, eq)
    }

    /// Removes adjacent items that `eq` considers equal.
    #[inline]
    fn uniq_by<F>(self, eq: F) -> Uniq<Self, F>
    where
        Self: Sized,
        Self::Item: Clone,
        F: FnMut(&Self::Item, &Self::Item) -> bool,
    {
        Uniq::new(self, eq)
    }

    /// Groups the items into pages of `size` items. The last page may be shorter.
    ///
    /// No empty page is ever yielded.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let pages: Vec<_> = (1..=7).pages(3).collect();
    /// assert_eq!(pages, [vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    /// ```
    #[inline]
    fn pages(self, size: usize) -> Pages<Self>
    where
        Self: Sized,
    {
        Pages::new(self, size)
    }

    /// Skips items until the first one that satisfies `pred`.
    ///
    /// That item and every later one are yielded, and `pred` is not called again.
    /// Unlike [`skip_while()`](Iterator::skip_while), the predicate says when to
    /// *start*.
    #[inline]
    fn skip_until<F>(self, pred: F) -> SkipUntil<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        SkipUntil::new(self, pred)
    }

    /// Iterates `self` and `other` in lockstep until **both** have ended.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::{Zipped, prelude::*};
    ///
    /// let got: Vec<_> = [1, 2].into_iter().zip_all(["a"]).collect();
    /// assert_eq!(got, [Zipped::Both(1, "a"), Zipped::Left(2)]);
    /// ```
    #[inline]
    fn zip_all<J>(self, other: J) -> ZipAll<Self, J::IntoIter>
    where
        Self: Sized,
        J: IntoIterator,
    {
        ZipAll::new(self, other.into_iter())
    }

    /// Like [`zip_all()`](SeqExt::zip_all), but fills the side that ended first with
    /// default values.
    #[inline]
    fn zip_or_default<J>(self, other: J) -> ZipOrDefault<Self, J::IntoIter>
    where
        Self: Sized,
        J: IntoIterator,
    {
        ZipOrDefault::new(self, other.into_iter())
    }

    /// Merges two sequences sorted in ascending order into one sorted sequence.
    ///
    /// Equal items from `self` come before those from `other`.
    /// To merge more than two sequences, see [`merge_all()`](crate::merge_all).
    #[inline]
    fn merge<J>(self, other: J) -> Merge<Self, J::IntoIter, OrdCmp<Self::Item>>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Ord,
    {
        let cmp: OrdCmp<Self::Item> = Ord::cmp;
        Merge::new(self, other.into_iter(), cmp)
    }

    /// Merges two sequences sorted by `cmp` into one sequence sorted by `cmp`.
    #[inline]
    fn merge_by<J, F>(self, other: J, cmp: F) -> Merge<Self, J::IntoIter, F>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        Merge::new(self, other.into_iter(), cmp)
    }

    /// Yields the items of `self` that have no equal counterpart in `right`.
    ///
    /// Both sequences must be sorted in ascending order. Each item of `right` cancels
    /// at most one equal item of `self`, so duplicates are matched one for one.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let left = [1, 2, 3, 4];
    /// let right = [2, 4, 6, 8];
    ///
    /// assert_eq!(left.into_iter().comm_left(right).collect::<Vec<_>>(), [1, 3]);
    /// assert_eq!(left.into_iter().comm_right(right).collect::<Vec<_>>(), [6, 8]);
    /// assert_eq!(left.into_iter().comm_both(right).collect::<Vec<_>>(), [2, 4]);
    /// ```
    #[inline]
    fn comm_left<J>(self, right: J) -> CommLeft<Self, J::IntoIter, OrdCmp<Self::Item>>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Ord,
    {
        let cmp: OrdCmp<Self::Item> = Ord::cmp;
        CommLeft::new(self, right.into_iter(), cmp)
    }

    /// Like [`comm_left()`](SeqExt::comm_left), for sequences sorted by `cmp`.
    #[inline]
    fn comm_left_by<J, F>(self, right: J, cmp: F) -> CommLeft<Self, J::IntoIter, F>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        CommLeft::new(self, right.into_iter(), cmp)
    }

    /// Yields the items of `right` that have no equal counterpart in `self`.
    ///
    /// This is [`comm_left()`](SeqExt::comm_left) with the sides swapped.
    #[inline]
    fn comm_right<J>(self, right: J) -> CommLeft<J::IntoIter, Self, OrdCmp<Self::Item>>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Ord,
    {
        let cmp: OrdCmp<Self::Item> = Ord::cmp;
        CommLeft::new(right.into_iter(), self, cmp)
    }

    /// Like [`comm_right()`](SeqExt::comm_right), for sequences sorted by `cmp`.
    #[inline]
    fn comm_right_by<J, F>(self, right: J, cmp: F) -> CommLeft<J::IntoIter, Self, F>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        CommLeft::new(right.into_iter(), self, cmp)
    }

    /// Yields the items of `self` that have an equal counterpart in `right`.
    ///
    /// Stops pulling `self` as soon as `right` has ended.
    #[inline]
    fn comm_both<J>(self, right: J) -> CommBoth<Self, J::IntoIter, OrdCmp<Self::Item>>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        Self::Item: Ord,
    {
        let cmp: OrdCmp<Self::Item> = Ord::cmp;
        CommBoth::new(self, right.into_iter(), cmp)
    }

    /// Like [`comm_both()`](SeqExt::comm_both), for sequences sorted by `cmp`.
    #[inline]
    fn comm_both_by<J, F>(self, right: J, cmp: F) -> CommBoth<Self, J::IntoIter, F>
    where
        Self: Sized,
        J: IntoIterator<Item = Self::Item>,
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        CommBoth::new(self, right.into_iter(), cmp)
    }

    /// Splits this iterator into `n` copies that may be consumed independently.
    ///
    /// See [`dup()`](crate::dup) for the details.
    #[inline]
    fn dup(self, n: usize) -> Vec<Dup<Self::Item>>
    where
        Self: Sized + Send + 'static,
        Self::Item: Clone + Send + 'static,
    {
        crate::dup(self, n)
    }

    /// Makes this iterator resumable after breaking out of a `for` loop over it, and
    /// stoppable with [`Resumable::stop()`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let mut seq = (1..=6).resumable();
    /// for n in &mut seq {
    ///     if n == 2 {
    ///         break;
    ///     }
    /// }
    /// assert_eq!(seq.collect::<Vec<_>>(), [3, 4, 5, 6]);
    /// ```
    #[inline]
    fn resumable(self) -> Resumable<Self>
    where
        Self: Sized,
    {
        Resumable::new(self)
    }

    /// Pulls the first item right away so it can be inspected with
    /// [`Peeked::first()`], then yields it again followed by the rest.
    #[inline]
    fn peek_first(self) -> Peeked<Self>
    where
        Self: Sized,
    {
        Peeked::new(self)
    }

    /// Checks whether this iterator is empty without losing its first item.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqs::prelude::*;
    ///
    /// let (seq, empty) = "a b".split(' ').check_empty();
    /// assert!(!empty);
    /// assert_eq!(seq.collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    #[inline]
    fn check_empty(self) -> (Peeked<Self>, bool)
    where
        Self: Sized,
    {
        let peeked = Peeked::new(self);
        let empty = peeked.was_empty();
        (peeked, empty)
    }

    /// Consumes the iterator and returns its last `n` items in order.
    ///
    /// See [`last_n()`](crate::last_n).
    #[inline]
    fn last_n(self, n: usize) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        crate::last_n(self, n)
    }

    /// Consumes the iterator and returns how many items it had.
    #[inline]
    fn drain(self) -> usize
    where
        Self: Sized,
    {
        crate::drain(self)
    }
}

impl<I: Iterator> SeqExt for I {}
