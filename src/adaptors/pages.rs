use std::iter::FusedIterator;

/// An iterator over pages of up to a fixed number of items.
///
/// This `struct` is created by [`SeqExt::pages()`](crate::SeqExt::pages).
/// See its documentation for more.
#[derive(Debug, Clone)]
pub struct Pages<I> {
    iter: I,
    size: usize,
}

impl<I> Pages<I> {
    pub(crate) fn new(iter: I, size: usize) -> Self {
        assert!(size != 0, "page size must be non-zero");
        Self { iter, size }
    }
}

impl<I: Iterator> Iterator for Pages<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut page = Vec::with_capacity(self.size);
        page.extend(self.iter.by_ref().take(self.size));
        (!page.is_empty()).then_some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|upper| upper.div_ceil(self.size)),
        )
    }
}

impl<I: FusedIterator> FusedIterator for Pages<I> {}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use crate::prelude::*;

    proptest! {
        #[test]
        fn matches_slice_chunks(
            nums in propvec(any::<u8>(), ..=20),
            size in 1..=6_usize,
        ) {
            let expected: Vec<_> = nums.chunks(size).map(<[u8]>::to_vec).collect();
            let pages = nums.iter().copied().pages(size);
            prop_assert_eq!(pages.size_hint(), (expected.len(), Some(expected.len())));
            prop_assert_eq!(pages.collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn last_page_is_short() {
        let got: Vec<_> = (1..=7).pages(3).collect();
        assert_eq!(got, [vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn empty_input_has_no_pages() {
        assert_eq!(std::iter::empty::<i32>().pages(4).count(), 0);
    }

    #[test]
    #[should_panic = "page size must be non-zero"]
    fn zero_page_size() {
        let _ = (1..3).pages(0);
    }
}
