use std::iter::{Fuse, FusedIterator};

/// A pair of values drawn from two sequences iterated in lockstep,
/// one of which may already have ended.
///
/// This is the item type of [`ZipAll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zipped<A, B> {
    /// Both sequences produced a value.
    Both(A, B),
    /// Only the left sequence produced a value; the right one has ended.
    Left(A),
    /// Only the right sequence produced a value; the left one has ended.
    Right(B),
}

impl<A, B> Zipped<A, B> {
    /// Returns the left value, if present.
    pub fn left(self) -> Option<A> {
        match self {
            Self::Both(a, _) | Self::Left(a) => Some(a),
            Self::Right(_) => None,
        }
    }

    /// Returns the right value, if present.
    pub fn right(self) -> Option<B> {
        match self {
            Self::Both(_, b) | Self::Right(b) => Some(b),
            Self::Left(_) => None,
        }
    }

    /// Splits into both halves, each of which may be missing.
    pub fn into_options(self) -> (Option<A>, Option<B>) {
        match self {
            Self::Both(a, b) => (Some(a), Some(b)),
            Self::Left(a) => (Some(a), None),
            Self::Right(b) => (None, Some(b)),
        }
    }

    /// Fills a missing half with its default value.
    pub fn or_default(self) -> (A, B)
    where
        A: Default,
        B: Default,
    {
        let (a, b) = self.into_options();
        (a.unwrap_or_default(), b.unwrap_or_default())
    }
}

#[cfg(feature = "itertools")]
impl<A, B> From<Zipped<A, B>> for itertools::EitherOrBoth<A, B> {
    fn from(zipped: Zipped<A, B>) -> Self {
        match zipped {
            Zipped::Both(a, b) => Self::Both(a, b),
            Zipped::Left(a) => Self::Left(a),
            Zipped::Right(b) => Self::Right(b),
        }
    }
}

#[cfg(feature = "itertools")]
impl<A, B> From<itertools::EitherOrBoth<A, B>> for Zipped<A, B> {
    fn from(either: itertools::EitherOrBoth<A, B>) -> Self {
        match either {
            itertools::EitherOrBoth::Both(a, b) => Self::Both(a, b),
            itertools::EitherOrBoth::Left(a) => Self::Left(a),
            itertools::EitherOrBoth::Right(b) => Self::Right(b),
        }
    }
}

/// An iterator that iterates two sequences in lockstep until both have ended.
///
/// This `struct` is created by [`SeqExt::zip_all()`](crate::SeqExt::zip_all).
/// See its documentation for more.
#[derive(Debug, Clone)]
pub struct ZipAll<A, B> {
    a: Fuse<A>,
    b: Fuse<B>,
}

impl<A: Iterator, B: Iterator> ZipAll<A, B> {
    pub(crate) fn new(a: A, b: B) -> Self {
        Self {
            a: a.fuse(),
            b: b.fuse(),
        }
    }
}

impl<A: Iterator, B: Iterator> Iterator for ZipAll<A, B> {
    type Item = Zipped<A::Item, B::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.a.next(), self.b.next()) {
            (Some(a), Some(b)) => Some(Zipped::Both(a, b)),
            (Some(a), None) => Some(Zipped::Left(a)),
            (None, Some(b)) => Some(Zipped::Right(b)),
            (None, None) => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_lower, a_upper) = self.a.size_hint();
        let (b_lower, b_upper) = self.b.size_hint();
        let upper = match (a_upper, b_upper) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        (a_lower.max(b_lower), upper)
    }
}

impl<A: Iterator, B: Iterator> FusedIterator for ZipAll<A, B> {}

/// An iterator over pairs drawn from two sequences in lockstep, filling
/// the side that ended first with default values.
///
/// This `struct` is created by [`SeqExt::zip_or_default()`](crate::SeqExt::zip_or_default).
/// See its documentation for more.
#[derive(Debug, Clone)]
pub struct ZipOrDefault<A, B> {
    inner: ZipAll<A, B>,
}

impl<A: Iterator, B: Iterator> ZipOrDefault<A, B> {
    pub(crate) fn new(a: A, b: B) -> Self {
        Self {
            inner: ZipAll::new(a, b),
        }
    }
}

impl<A, B> Iterator for ZipOrDefault<A, B>
where
    A: Iterator<Item: Default>,
    B: Iterator<Item: Default>,
{
    type Item = (A::Item, B::Item);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Zipped::or_default)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<A, B> FusedIterator for ZipOrDefault<A, B>
where
    A: Iterator<Item: Default>,
    B: Iterator<Item: Default>,
{
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use super::Zipped;
    use crate::prelude::*;

    proptest! {
        #[test]
        fn halves_reconstruct_the_inputs(
            xs in propvec(any::<i8>(), ..=8),
            ys in propvec(any::<u8>(), ..=8),
        ) {
            let zipped: Vec<_> = xs.iter().copied().zip_all(ys.iter().copied()).collect();
            prop_assert_eq!(zipped.len(), xs.len().max(ys.len()));

            let lefts: Vec<_> = zipped.iter().filter_map(|z| z.left()).collect();
            let rights: Vec<_> = zipped.iter().filter_map(|z| z.right()).collect();
            prop_assert_eq!(lefts, xs);
            prop_assert_eq!(rights, ys);
        }
    }

    #[test]
    fn longer_side_continues() {
        let got: Vec<_> = [1, 2, 3].into_iter().zip_all(["a"]).collect();
        assert_eq!(
            got,
            [Zipped::Both(1, "a"), Zipped::Left(2), Zipped::Left(3)]
        );

        let got: Vec<_> = std::iter::empty::<i32>().zip_all([7, 8]).collect();
        assert_eq!(got, [Zipped::Right(7), Zipped::Right(8)]);
    }

    #[test]
    fn or_default_fills_the_missing_side() {
        let got: Vec<_> = [1, 2, 3].into_iter().zip_or_default(["a"]).collect();
        assert_eq!(got, [(1, "a"), (2, ""), (3, "")]);
    }

    #[cfg(feature = "itertools")]
    #[test]
    fn agrees_with_itertools() {
        use itertools::{EitherOrBoth, Itertools};

        let ours: Vec<EitherOrBoth<_, _>> = (0..5).zip_all(10..12).map(Into::into).collect();
        let theirs: Vec<_> = (0..5).zip_longest(10..12).collect();
        assert_eq!(ours, theirs);
    }
}
