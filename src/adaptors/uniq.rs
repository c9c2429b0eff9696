use std::{fmt::Debug, iter::FusedIterator};

/// An iterator that removes adjacent duplicates.
///
/// This `struct` is created by [`SeqExt::uniq()`](crate::SeqExt::uniq)
/// and [`SeqExt::uniq_by()`](crate::SeqExt::uniq_by).
/// See their documentation for more.
#[derive(Clone)]
pub struct Uniq<I: Iterator, F> {
    iter: I,
    // The last item yielded.
    prev: Option<I::Item>,
    eq: F,
}

impl<I: Iterator, F> Uniq<I, F> {
    pub(crate) fn new(iter: I, eq: F) -> Self {
        Self {
            iter,
            prev: None,
            eq,
        }
    }
}

impl<I, F> Iterator for Uniq<I, F>
where
    I: Iterator<Item: Clone>,
    F: FnMut(&I::Item, &I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.prev.take() {
            None => self.iter.next()?,
            Some(prev) => {
                let eq = &mut self.eq;
                let found = self.iter.find(|item| !eq(&prev, item));
                // Keep `prev` if the input ended, so a resumed input still dedups.
                match found {
                    Some(item) => item,
                    None => {
                        self.prev = Some(prev);
                        return None;
                    }
                }
            }
        };

        self.prev = Some(item.clone());
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        // With nothing yielded yet, a non-empty input yields at least one item.
        let lower = if self.prev.is_none() { lower.min(1) } else { 0 };
        (lower, upper)
    }
}

impl<I, F> FusedIterator for Uniq<I, F>
where
    I: FusedIterator<Item: Clone>,
    F: FnMut(&I::Item, &I::Item) -> bool,
{
}

impl<I, F> Debug for Uniq<I, F>
where
    I: Iterator<Item: Debug> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uniq")
            .field("iter", &self.iter)
            .field("prev", &self.prev)
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
        fn matches_vec_dedup(nums in propvec(0..4_i32, ..=16)) {
            let mut expected = nums.clone();
            expected.dedup();

            prop_assert_eq!(nums.into_iter().uniq().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn only_adjacent_duplicates() {
        let got: Vec<_> = [1, 1, 2, 2, 2, 3].into_iter().uniq().collect();
        assert_eq!(got, [1, 2, 3]);

        let got: Vec<_> = [1, 2, 1, 1, 2, 2, 3].into_iter().uniq().collect();
        assert_eq!(got, [1, 2, 1, 2, 3]);
    }

    #[test]
    fn custom_equality() {
        let got: Vec<_> = ["a", "A", "b", "B", "b", "a"]
            .into_iter()
            .uniq_by(|x, y| x.eq_ignore_ascii_case(y))
            .collect();

        assert_eq!(got, ["a", "b", "a"]);
    }
}
