use std::{
    collections::VecDeque,
    fmt::Debug,
    iter::FusedIterator,
    panic,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::feed::Feed;

/// One of the `n` parts of a sequence created by [`partition()`].
///
/// A part yields the items whose key is its index, in their original order. Parts
/// may be consumed at different paces, from different threads, and the original
/// sequence is pulled exactly once per item. An item waits in its part's queue
/// until that part reads it; items of a dropped part are discarded as they arrive.
///
/// Dropping a part retires it. Once every part has retired, the background thread
/// stops pulling and drops the original sequence.
///
/// # Panics
///
/// If pulling the original sequence or computing a key panics, the part that was
/// waiting for the next item resumes that panic, and every other part panics once
/// its queue is empty.
pub struct Partition<T> {
    shared: Arc<Shared<T>>,
    index: usize,
    retired: bool,
}

struct Shared<T> {
    queues: Mutex<Queues<T>>,
    // Lock order: `feed`, then `queues`.
    feed: Feed<(usize, T)>,
}

struct Queues<T> {
    // `None` once the part has retired.
    parts: Vec<Option<VecDeque<T>>>,
    live: usize,
    exhausted: bool,
    panicked: bool,
}

impl<T> Queues<T> {
    fn pop(&mut self, index: usize) -> Option<T> {
        self.parts[index].as_mut()?.pop_front()
    }

    fn has_next(&self, index: usize) -> bool {
        self.parts[index].as_ref().is_some_and(|queue| !queue.is_empty())
    }

    fn push(&mut self, index: usize, item: T) {
        if let Some(queue) = &mut self.parts[index] {
            queue.push_back(item);
        }
    }

    // Returns `true` if it was the last live part.
    fn retire(&mut self, index: usize) -> bool {
        if self.parts[index].take().is_none() {
            return false;
        }
        self.live -= 1;
        self.live == 0
    }
}

impl<T> Shared<T> {
    fn queues(&self) -> MutexGuard<'_, Queues<T>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Splits a sequence into `n` parts, routing each item to the part `key` returns.
///
/// `key` runs on the background thread that pulls `seq`, once per item, and must
/// return an index below `n`.
/// No thread is spawned if `n` is zero; the sequence is simply dropped.
///
/// # Panics
///
/// The parts panic if `key` returns an index of `n` or more. See [`Partition`].
///
/// # Examples
///
/// ```
/// use std::thread;
/// use seqs::partition;
///
/// let parts = partition(0..10_usize, 3, |n| n % 3);
///
/// let residues: Vec<Vec<_>> = thread::scope(|s| {
///     let handles: Vec<_> = parts
///         .into_iter()
///         .map(|part| s.spawn(|| part.collect()))
///         .collect();
///     handles.into_iter().map(|h| h.join().unwrap()).collect()
/// });
///
/// assert_eq!(residues, [vec![0, 3, 6, 9], vec![1, 4, 7], vec![2, 5, 8]]);
/// ```
pub fn partition<I, K>(seq: I, n: usize, mut key: K) -> Vec<Partition<I::Item>>
where
    I: IntoIterator<IntoIter: Send + 'static>,
    I::Item: Send + 'static,
    K: FnMut(&I::Item) -> usize + Send + 'static,
{
    if n == 0 {
        return Vec::new();
    }

    let keyed = seq.into_iter().map(move |item| {
        let index = key(&item);
        assert!(index < n, "partition key {index} is out of range for {n} parts");
        (index, item)
    });
    let feed = Feed::spawn(keyed);
    tracing::debug!(parts = n, "spawned partition producer");

    let shared = Arc::new(Shared {
        queues: Mutex::new(Queues {
            parts: (0..n).map(|_| Some(VecDeque::new())).collect(),
            live: n,
            exhausted: false,
            panicked: false,
        }),
        feed,
    });

    (0..n)
        .map(|index| Partition {
            shared: Arc::clone(&shared),
            index,
            retired: false,
        })
        .collect()
}

impl<T> Partition<T> {
    /// Returns the number of items waiting in the queues of all live parts.
    pub fn buffered(&self) -> usize {
        self.shared.queues().parts.iter().flatten().map(VecDeque::len).sum()
    }

    /// Returns the number of parts that have not retired yet.
    pub fn live(&self) -> usize {
        self.shared.queues().live
    }

    fn retire(&mut self) {
        if self.retired {
            return;
        }
        self.retired = true;

        let last = self.shared.queues().retire(self.index);
        tracing::trace!(index = self.index, last, "partition consumer retired");
        if last {
            self.shared.feed.close();
        }
    }
}

impl<T> Iterator for Partition<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.retired {
            return None;
        }

        loop {
            {
                let mut queues = self.shared.queues();
                if let Some(item) = queues.pop(self.index) {
                    return Some(item);
                }
                if queues.exhausted {
                    let panicked = queues.panicked;
                    drop(queues);
                    self.retire();
                    if panicked {
                        panic!("the partitioned sequence panicked");
                    }
                    return None;
                }
            }

            let mut feed = self.shared.feed.lock();
            if self.shared.queues().has_next(self.index) {
                continue;
            }

            // Items for other parts are queued on the way.
            let received = feed.recv();

            let mut queues = self.shared.queues();
            match received {
                Ok(Some((index, item))) => queues.push(index, item),
                Ok(None) => queues.exhausted = true,
                Err(payload) => {
                    queues.exhausted = true;
                    queues.panicked = true;
                    drop(queues);
                    drop(feed);
                    self.retire();
                    panic::resume_unwind(payload);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.retired {
            return (0, Some(0));
        }

        let queues = self.shared.queues();
        let queued = queues.parts[self.index].as_ref().map_or(0, VecDeque::len);
        if queues.exhausted {
            (queued, Some(queued))
        } else {
            (queued, None)
        }
    }
}

impl<T> FusedIterator for Partition<T> {}

impl<T> Drop for Partition<T> {
    fn drop(&mut self) {
        self.retire();
    }
}

impl<T> Debug for Partition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("index", &self.index)
            .field("retired", &self.retired)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use proptest::collection::vec as propvec;
    use proptest::prelude::*;
    use rand::{RngExt, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::test_utils::Tracked;

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn parts_are_filters_of_the_input(
            nums in propvec(any::<u16>(), ..=40),
            n in 1..=4_usize,
            seed in any::<u64>(),
        ) {
            let (source, gauge) = Tracked::new(nums.clone());
            let mut parts: Vec<_> = partition(source, n, move |&num| usize::from(num) % n)
                .into_iter()
                .enumerate()
                .collect();
            let mut seen = vec![Vec::new(); n];
            let mut rng = StdRng::seed_from_u64(seed);

            while !parts.is_empty() {
                let i = rng.random_range(0..parts.len());
                let (index, part) = &mut parts[i];
                match part.next() {
                    Some(num) => seen[*index].push(num),
                    None => {
                        parts.remove(i);
                    }
                }
            }

            for (index, part) in seen.iter().enumerate() {
                let expected: Vec<_> = nums
                    .iter()
                    .copied()
                    .filter(|&num| usize::from(num) % n == index)
                    .collect();
                prop_assert_eq!(part, &expected);
            }
            prop_assert_eq!(gauge.pulls(), nums.len());
        }
    }

    #[test]
    fn residues_in_parallel() {
        let parts = partition(0..10_usize, 3, |n| n % 3);
        let residues: Vec<Vec<_>> = thread::scope(|s| {
            let handles: Vec<_> = parts
                .into_iter()
                .map(|part| s.spawn(|| part.collect()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(residues, [vec![0, 3, 6, 9], vec![1, 4, 7], vec![2, 5, 8]]);
    }

    #[test]
    fn dropped_part_buffers_nothing() {
        let mut parts = partition(0..1_000_usize, 2, |n| n % 2);
        let mut evens = parts.remove(0);
        drop(parts);
        assert_eq!(evens.live(), 1);

        while let Some(n) = evens.next() {
            assert_eq!(n % 2, 0);
            assert_eq!(evens.buffered(), 0);
        }
        assert_eq!(evens.live(), 0);
    }

    #[test]
    fn slow_part_keeps_only_its_own_items() {
        let mut parts = partition(0..100, 2, |n| usize::from(*n >= 90));
        let mut high = parts.pop().unwrap();
        let low = parts.pop().unwrap();

        // Reaching the first high item queues every low one.
        assert_eq!(high.next(), Some(90));
        assert_eq!(high.buffered(), 90);
        assert_eq!(high.size_hint(), (0, None));

        assert!(low.eq(0..90));
        assert!(high.eq(91..100));
    }

    #[test]
    fn zero_parts() {
        let (source, gauge) = Tracked::new(0..10);
        assert!(partition(source, 0, |_| 0).is_empty());
        assert_eq!(gauge.live(), 0);
        assert_eq!(gauge.pulls(), 0);
    }

    #[test]
    fn empty_part() {
        let mut parts = partition(vec![1_usize, 3, 5], 2, |n| n % 2);
        assert_eq!(parts[0].next(), None);
        assert_eq!(parts[0].size_hint(), (0, Some(0)));
        assert!(parts.remove(1).eq([1, 3, 5]));
    }

    #[test]
    fn abandoning_every_part_stops_the_producer() {
        let (source, gauge) = Tracked::new(0_usize..);
        let mut parts = partition(source, 2, |n| n % 2);

        assert_eq!(parts[1].by_ref().take(3).collect::<Vec<_>>(), [1, 3, 5]);
        drop(parts);

        assert!(wait_until(|| gauge.live() == 0));
        // Six items were routed, and the producer may have pulled one more ahead.
        assert!(gauge.pulls() <= 7);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn key_out_of_range() {
        let mut parts = partition(0..10_usize, 2, |n| *n);
        parts[0].by_ref().for_each(drop);
    }

    #[test]
    fn input_panic_reaches_every_part() {
        let input = (0..10_usize).map(|n| if n == 4 { panic!("input failed") } else { n });
        let parts = partition(input, 2, |n| n % 2);

        let mut outcomes = Vec::new();
        for part in parts {
            let mut seen = Vec::new();
            let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                part.for_each(|n| seen.push(n));
            }));
            outcomes.push((outcome.is_err(), seen));
        }

        assert_eq!(outcomes, [(true, vec![0, 2]), (true, vec![1, 3])]);
    }
}
