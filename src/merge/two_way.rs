use std::{
    cmp::Ordering,
    fmt::Debug,
    iter::{Fuse, FusedIterator},
};

/// An iterator that merges two sorted sequences.
///
/// When items compare equal, the ones from the left sequence come first.
///
/// This `struct` is created by [`SeqExt::merge()`](crate::SeqExt::merge)
/// and [`SeqExt::merge_by()`](crate::SeqExt::merge_by).
/// See their documentation for more.
pub struct Merge<L, R, F>
where
    L: Iterator,
{
    left: Fuse<L>,
    right: Fuse<R>,
    // Pulled but not yet yielded.
    left_head: Option<L::Item>,
    right_head: Option<L::Item>,
    cmp: F,
}

impl<L, R, F> Merge<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
{
    pub(crate) fn new(left: L, right: R, cmp: F) -> Self {
        Self {
            left: left.fuse(),
            right: right.fuse(),
            left_head: None,
            right_head: None,
            cmp,
        }
    }
}

impl<L, R, F> Iterator for Merge<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
    type Item = L::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.left_head.is_none() {
            self.left_head = self.left.next();
        }
        if self.right_head.is_none() {
            self.right_head = self.right.next();
        }

        match (&self.left_head, &self.right_head) {
            (Some(left), Some(right)) if (self.cmp)(left, right) == Ordering::Greater => {
                self.right_head.take()
            }
            (Some(_), _) => self.left_head.take(),
            (None, _) => self.right_head.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let heads = usize::from(self.left_head.is_some()) + usize::from(self.right_head.is_some());
        let (left_lower, left_upper) = self.left.size_hint();
        let (right_lower, right_upper) = self.right.size_hint();

        let lower = left_lower
            .saturating_add(right_lower)
            .saturating_add(heads);
        let upper = left_upper
            .zip(right_upper)
            .and_then(|(l, r)| l.checked_add(r)?.checked_add(heads));
        (lower, upper)
    }
}

impl<L, R, F> FusedIterator for Merge<L, R, F>
where
    L: Iterator,
    R: Iterator<Item = L::Item>,
    F: FnMut(&L::Item, &L::Item) -> Ordering,
{
}

impl<L, R, F> Debug for Merge<L, R, F>
where
    L: Iterator<Item: Debug> + Debug,
    R: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Merge")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("left_head", &self.left_head)
            .field("right_head", &self.right_head)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use crate::prelude::*;

    proptest! {
        #[test]
        fn merged_is_sorted_permutation(
            mut xs in propvec(-50..50_i32, ..=10),
            mut ys in propvec(-50..50_i32, ..=10),
        ) {
            xs.sort();
            ys.sort();

            let mut expected = [xs.clone(), ys.clone()].concat();
            expected.sort();

            let merged = xs.into_iter().merge(ys);
            prop_assert_eq!(merged.collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn left_wins_ties() {
        let left = [(1, 'l'), (2, 'l')];
        let right = [(1, 'r'), (2, 'r'), (3, 'r')];

        let got: Vec<_> = left
            .into_iter()
            .merge_by(right, |a, b| a.0.cmp(&b.0))
            .collect();
        assert_eq!(
            got,
            [(1, 'l'), (1, 'r'), (2, 'l'), (2, 'r'), (3, 'r')]
        );
    }

    #[test]
    fn unsorted_inputs_keep_every_item() {
        let got: Vec<_> = [3, 1].into_iter().merge([2, 0]).collect();
        assert_eq!(got, [2, 0, 3, 1]);
    }
}
