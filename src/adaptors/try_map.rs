use std::{fmt::Debug, iter::FusedIterator};

use crate::ErrorSlot;

/// An iterator that maps items with a fallible closure, stopping at the first error.
///
/// The error is recorded in the [`ErrorSlot`] returned alongside this iterator.
///
/// This `struct` is created by [`SeqExt::try_map()`](crate::SeqExt::try_map)
/// and [`SeqExt::try_map_into()`](crate::SeqExt::try_map_into).
/// See their documentation for more.
pub struct TryMap<I, F, E> {
    iter: I,
    f: F,
    slot: ErrorSlot<E>,
    stopped: bool,
}

impl<I, F, E> TryMap<I, F, E> {
    pub(crate) fn new(iter: I, f: F, slot: ErrorSlot<E>) -> Self {
        Self {
            iter,
            f,
            slot,
            stopped: false,
        }
    }
}

impl<I, F, U, E> Iterator for TryMap<I, F, E>
where
    I: Iterator,
    F: FnMut(I::Item) -> Result<U, E>,
{
    type Item = U;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.slot.is_set() {
            self.stopped = true;
            return None;
        }

        match (self.f)(self.iter.next()?) {
            Ok(item) => Some(item),
            Err(err) => {
                self.stopped = true;
                self.slot.set(err);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stopped {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

impl<I, F, U, E> FusedIterator for TryMap<I, F, E>
where
    I: FusedIterator,
    F: FnMut(I::Item) -> Result<U, E>,
{
}

impl<I: Debug, F, E: Debug> Debug for TryMap<I, F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryMap")
            .field("iter", &self.iter)
            .field("slot", &self.slot)
            .field("stopped", &self.stopped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::num::ParseIntError;

    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use crate::{ErrorSlot, prelude::*};

    proptest! {
        #[test]
        fn stops_right_before_the_first_failure(
            nums in propvec(-20..20_i32, ..=12),
        ) {
            let (mapped, err) = nums.iter().try_map(|&num| {
                if num < 0 { Err(num) } else { Ok(num * 2) }
            });

            let expected: Vec<_> = nums.iter().take_while(|&&num| num >= 0).map(|num| num * 2).collect();
            prop_assert_eq!(mapped.collect::<Vec<_>>(), expected);
            prop_assert_eq!(err.get(), nums.iter().find(|&&num| num < 0));
        }
    }

    #[test]
    fn the_same_error_value_reaches_the_slot() {
        let (parsed, err) = ["7", "8", "nine", "10"]
            .into_iter()
            .try_map(str::parse::<u8>);

        assert_eq!(parsed.collect::<Vec<_>>(), [7, 8]);

        let expected: ParseIntError = "nine".parse::<u8>().unwrap_err();
        assert_eq!(err.get(), Some(&expected));
    }

    #[test]
    fn shared_slot_stops_the_outer_stage() {
        let slot = ErrorSlot::new();

        let inner = [1, 2, 3, 4, 5]
            .into_iter()
            .try_map_into(|n| if n == 3 { Err("inner") } else { Ok(n) }, &slot);
        let outer = inner.try_map_into(|n| if n == 5 { Err("outer") } else { Ok(n * 10) }, &slot);

        assert_eq!(outer.collect::<Vec<_>>(), [10, 20]);
        assert_eq!(slot.get(), Some(&"inner"));
    }

    #[test]
    fn outer_failure_stops_pulling() {
        let slot = ErrorSlot::new();
        let mut pulled = 0;

        let outer = (1..)
            .inspect(|_| pulled += 1)
            .try_map_into(|n| if n == 2 { Err("outer") } else { Ok(n) }, &slot);

        assert_eq!(outer.collect::<Vec<_>>(), [1]);
        assert_eq!(pulled, 2);
        assert_eq!(slot.get(), Some(&"outer"));
    }
}
