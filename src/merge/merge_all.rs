use std::{cmp::Ordering, fmt::Debug, iter::FusedIterator, mem};

use super::OrdCmp;

/// An iterator that merges any number of sorted sequences into one sorted sequence.
///
/// The current head of every input is kept and scanned linearly for the smallest,
/// which suits the small fan-in this is meant for. When several heads compare equal,
/// the one from the input listed first wins. Exhausted inputs are dropped right away,
/// and once a single input is left its items are passed through without comparing.
///
/// This `struct` is created by [`merge_all()`] and [`merge_all_by()`].
/// See their documentation for more.
pub struct MergeAll<I: Iterator, F> {
    state: State<I>,
    cmp: F,
}

enum State<I: Iterator> {
    // The inputs have not been pulled yet.
    Pending(Vec<I>),
    // At least two inputs are alive, in their original order.
    Scanning(Vec<Head<I>>),
    // Only one input is left. Its head (if any) comes before the rest of it.
    Passthrough { head: Option<I::Item>, iter: I },
    Done,
}

struct Head<I: Iterator> {
    item: I::Item,
    iter: I,
}

impl<I: Iterator, F> MergeAll<I, F> {
    fn new(inputs: Vec<I>, cmp: F) -> Self {
        let state = match <[I; 1]>::try_from(inputs) {
            Ok([iter]) => State::Passthrough { head: None, iter },
            Err(inputs) if inputs.is_empty() => State::Done,
            Err(inputs) => State::Pending(inputs),
        };
        Self { state, cmp }
    }
}

impl<I, F> MergeAll<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    fn prime(inputs: Vec<I>) -> State<I> {
        let heads: Vec<_> = inputs
            .into_iter()
            .filter_map(|mut iter| Some(Head { item: iter.next()?, iter }))
            .collect();
        Self::settle(heads)
    }

    // Picks the state that fits the number of live inputs.
    fn settle(mut heads: Vec<Head<I>>) -> State<I> {
        match heads.len() {
            0 => State::Done,
            1 => {
                let Head { item, iter } = heads.swap_remove(0);
                State::Passthrough {
                    head: Some(item),
                    iter,
                }
            }
            _ => State::Scanning(heads),
        }
    }

    fn position_of_min(heads: &[Head<I>], cmp: &mut F) -> usize {
        let mut best = 0;
        for i in 1..heads.len() {
            // Strictly less, so that the earlier input wins ties.
            if cmp(&heads[i].item, &heads[best].item) == Ordering::Less {
                best = i;
            }
        }
        best
    }
}

impl<I, F> Iterator for MergeAll<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let State::Pending(inputs) = &mut self.state {
            let inputs = mem::take(inputs);
            self.state = Self::prime(inputs);
        }

        match &mut self.state {
            State::Pending(_) | State::Done => None,
            State::Passthrough { head, iter } => {
                let item = head.take().or_else(|| iter.next());
                if item.is_none() {
                    self.state = State::Done;
                }
                item
            }
            State::Scanning(heads) => {
                let best = Self::position_of_min(heads, &mut self.cmp);
                match heads[best].iter.next() {
                    Some(next) => Some(mem::replace(&mut heads[best].item, next)),
                    None => {
                        // Keep the remaining inputs in order for tie-breaking.
                        let Head { item, iter } = heads.remove(best);
                        drop(iter);
                        let heads = mem::take(heads);
                        self.state = Self::settle(heads);
                        Some(item)
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        fn add(
            (lower, upper): (usize, Option<usize>),
            (l, u): (usize, Option<usize>),
        ) -> (usize, Option<usize>) {
            (
                lower.saturating_add(l),
                upper.zip(u).and_then(|(a, b)| a.checked_add(b)),
            )
        }

        match &self.state {
            State::Done => (0, Some(0)),
            State::Pending(inputs) => inputs
                .iter()
                .map(Iterator::size_hint)
                .fold((0, Some(0)), add),
            State::Passthrough { head, iter } => {
                let head = usize::from(head.is_some());
                add((head, Some(head)), iter.size_hint())
            }
            State::Scanning(heads) => heads
                .iter()
                .map(|head| add((1, Some(1)), head.iter.size_hint()))
                .fold((0, Some(0)), add),
        }
    }
}

impl<I, F> FusedIterator for MergeAll<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
}

impl<I: Iterator, F> Debug for MergeAll<I, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (state, live) = match &self.state {
            State::Pending(inputs) => ("pending", inputs.len()),
            State::Scanning(heads) => ("scanning", heads.len()),
            State::Passthrough { .. } => ("passthrough", 1),
            State::Done => ("done", 0),
        };
        f.debug_struct("MergeAll")
            .field("state", &state)
            .field("live_inputs", &live)
            .finish()
    }
}

/// Merges any number of sequences sorted in ascending order into one sorted sequence.
///
/// Every item of every input appears exactly once. Equal items keep the order of
/// the inputs they came from. If an input is not sorted, the output is not sorted
/// either, but still contains every item.
///
/// # Examples
///
/// ```
/// use seqs::merge_all;
///
/// let merged = merge_all([vec![3, 6, 9], vec![1, 4, 7, 10], vec![2, 5, 8]]);
/// assert!(merged.eq(1..=10));
/// ```
pub fn merge_all<S>(
    seqs: S,
) -> MergeAll<<S::Item as IntoIterator>::IntoIter, OrdCmp<<S::Item as IntoIterator>::Item>>
where
    S: IntoIterator<Item: IntoIterator<Item: Ord>>,
{
    let cmp: OrdCmp<<S::Item as IntoIterator>::Item> = Ord::cmp;
    merge_all_by(seqs, cmp)
}

/// Merges any number of sequences sorted by `cmp` into one sequence sorted by `cmp`.
///
/// See [`merge_all()`] for the details.
///
/// # Examples
///
/// ```
/// use seqs::merge_all_by;
///
/// let merged: Vec<_> = merge_all_by(
///     [vec![9, 5, 1], vec![8, 2], vec![7]],
///     |a: &i32, b: &i32| b.cmp(a),
/// )
/// .collect();
/// assert_eq!(merged, [9, 8, 7, 5, 2, 1]);
/// ```
pub fn merge_all_by<S, F>(seqs: S, cmp: F) -> MergeAll<<S::Item as IntoIterator>::IntoIter, F>
where
    S: IntoIterator<Item: IntoIterator>,
    F: FnMut(
        &<S::Item as IntoIterator>::Item,
        &<S::Item as IntoIterator>::Item,
    ) -> Ordering,
{
    MergeAll::new(seqs.into_iter().map(IntoIterator::into_iter).collect(), cmp)
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec as propvec;
    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{Gauge, Tracked};

    proptest! {
        #[test]
        fn sorted_permutation_of_all_inputs(
            mut inputs in propvec(propvec(-30..30_i32, ..=8), ..=5),
        ) {
            for input in &mut inputs {
                input.sort();
            }
            let mut expected = inputs.concat();
            expected.sort();

            let merged = merge_all(inputs);
            let (lower, _) = merged.size_hint();
            let merged: Vec<_> = merged.collect();
            prop_assert_eq!(lower, expected.len());
            prop_assert_eq!(merged, expected);
        }

        #[test]
        fn stable_across_inputs(
            keys in propvec(propvec(0..4_u8, ..=6), 1..=4),
        ) {
            let inputs: Vec<Vec<(u8, usize)>> = keys
                .into_iter()
                .enumerate()
                .map(|(source, mut keys)| {
                    keys.sort();
                    keys.into_iter().map(|key| (key, source)).collect()
                })
                .collect();

            let mut expected = inputs.concat();
            // Stable sort by key keeps the input order among equal keys.
            expected.sort_by_key(|&(key, _)| key);

            let merged: Vec<_> = merge_all_by(inputs, |a, b| a.0.cmp(&b.0)).collect();
            prop_assert_eq!(merged, expected);
        }
    }

    #[test]
    fn three_inputs() {
        let merged: Vec<_> = merge_all([vec![3, 6, 9], vec![1, 4, 7, 10], vec![2, 5, 8]]).collect();
        assert_eq!(merged, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn zero_and_one_input() {
        assert_eq!(merge_all(Vec::<Vec<i32>>::new()).count(), 0);
        assert_eq!(merge_all([vec![5, 1, 3]]).collect::<Vec<_>>(), [5, 1, 3]);
    }

    #[test]
    fn nothing_is_pulled_before_the_first_item_is_requested() {
        let gauge = Gauge::default();
        let merged = merge_all([
            Tracked::with_gauge(vec![1, 3], &gauge),
            Tracked::with_gauge(vec![2], &gauge),
        ]);
        assert_eq!(gauge.pulls(), 0);
        drop(merged);
        assert_eq!(gauge.live(), 0);
    }

    #[test]
    fn exhausted_inputs_are_released_at_once() {
        let gauge = Gauge::default();
        let mut merged = merge_all([
            Tracked::with_gauge(vec![1], &gauge),
            Tracked::with_gauge(vec![2, 4, 6], &gauge),
            Tracked::with_gauge(vec![3, 5], &gauge),
        ]);

        assert_eq!(merged.next(), Some(1));
        // The first input ran dry while being refilled.
        assert_eq!(gauge.live(), 2);
        assert_eq!(merged.by_ref().take(3).collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(merged.next(), Some(5));
        assert_eq!(gauge.live(), 1);
        assert_eq!(merged.by_ref().collect::<Vec<_>>(), [6]);
        assert_eq!(gauge.live(), 0);
    }

    #[test]
    fn abandoning_releases_every_input() {
        let gauge = Gauge::default();
        let mut merged = merge_all((0..4).map(|i| Tracked::with_gauge((i..).step_by(4), &gauge)));
        assert_eq!(merged.by_ref().take(10).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert_eq!(gauge.live(), 4);

        drop(merged);
        assert_eq!(gauge.live(), 0);
    }
}
