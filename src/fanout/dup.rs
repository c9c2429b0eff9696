use std::{
    collections::VecDeque,
    fmt::Debug,
    iter::FusedIterator,
    panic,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::feed::Feed;

/// One of the `n` copies of a sequence created by [`dup()`].
///
/// Every copy yields the same items, in the same order, as the original sequence
/// would have. Copies may be consumed at different paces, from different threads.
///
/// The original sequence is pulled exactly once per item by a background thread.
/// Items are kept in a buffer shared by all copies for as long as some copy still
/// has to read them, so the buffer grows with the distance between the copy that is
/// furthest ahead and the one that is furthest behind. Nothing bounds that distance:
/// a copy that is neither read nor dropped keeps every later item alive.
///
/// Dropping a copy retires it. Once every copy has retired, the background thread
/// stops pulling and drops the original sequence.
///
/// # Panics
///
/// If pulling the original sequence panics, the copy that was waiting for the next
/// item resumes that panic, and every other copy panics once it has yielded the
/// items buffered before it.
pub struct Dup<T> {
    shared: Arc<Shared<T>>,
    index: usize,
    retired: bool,
}

struct Shared<T> {
    buffer: Mutex<Buffer<T>>,
    // Lock order: `feed`, then `buffer`.
    feed: Feed<T>,
}

struct Buffer<T> {
    // Items at absolute positions `low..low + pending.len()`.
    pending: VecDeque<T>,
    low: usize,
    // The absolute position of the next item of each copy. `None` once retired.
    offsets: Vec<Option<usize>>,
    live: usize,
    // The original sequence has ended.
    exhausted: bool,
    // It ended by panicking.
    panicked: bool,
}

impl<T> Buffer<T> {
    fn high(&self) -> usize {
        self.low + self.pending.len()
    }

    fn has_next(&self, index: usize) -> bool {
        self.offsets[index].is_some_and(|offset| offset < self.high())
    }

    fn read(&mut self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        let offset = self.offsets[index]?;
        let item = self.pending.get(offset - self.low)?.clone();
        self.offsets[index] = Some(offset + 1);
        if offset == self.low {
            self.trim();
        }
        Some(item)
    }

    // Evicts everything below the slowest live copy.
    fn trim(&mut self) {
        let low = self
            .offsets
            .iter()
            .flatten()
            .copied()
            .min()
            .unwrap_or_else(|| self.high());
        self.pending.drain(..low - self.low);
        self.low = low;
    }

    // Returns `true` if it was the last live copy.
    fn retire(&mut self, index: usize) -> bool {
        if self.offsets[index].take().is_none() {
            return false;
        }
        self.live -= 1;
        self.trim();
        self.live == 0
    }
}

impl<T> Shared<T> {
    fn buffer(&self) -> MutexGuard<'_, Buffer<T>> {
        // Every update leaves the buffer consistent, even if a `clone()` panicked.
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Duplicates a sequence into `n` sequences that each yield every item of it.
///
/// See [`Dup`] for how the copies share the original sequence.
/// No thread is spawned if `n` is zero; the sequence is simply dropped.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use seqs::dup;
///
/// let [evens, odds]: [_; 2] = dup(1..=10, 2).try_into().unwrap();
///
/// let (evens, odds) = thread::scope(|s| {
///     let evens = s.spawn(|| evens.filter(|n| n % 2 == 0).collect::<Vec<_>>());
///     let odds = s.spawn(|| odds.filter(|n| n % 2 == 1).collect::<Vec<_>>());
///     (evens.join().unwrap(), odds.join().unwrap())
/// });
///
/// assert_eq!(evens, [2, 4, 6, 8, 10]);
/// assert_eq!(odds, [1, 3, 5, 7, 9]);
/// ```
pub fn dup<I>(seq: I, n: usize) -> Vec<Dup<I::Item>>
where
    I: IntoIterator<IntoIter: Send + 'static>,
    I::Item: Clone + Send + 'static,
{
    if n == 0 {
        return Vec::new();
    }

    let feed = Feed::spawn(seq.into_iter());
    tracing::debug!(consumers = n, "spawned dup producer");

    let shared = Arc::new(Shared {
        buffer: Mutex::new(Buffer {
            pending: VecDeque::new(),
            low: 0,
            offsets: vec![Some(0); n],
            live: n,
            exhausted: false,
            panicked: false,
        }),
        feed,
    });

    (0..n)
        .map(|index| Dup {
            shared: Arc::clone(&shared),
            index,
            retired: false,
        })
        .collect()
}

impl<T> Dup<T> {
    /// Returns the number of items currently retained for the slowest copies.
    pub fn buffered(&self) -> usize {
        self.shared.buffer().pending.len()
    }

    /// Returns the number of copies that have not retired yet.
    pub fn live(&self) -> usize {
        self.shared.buffer().live
    }

    fn retire(&mut self) {
        if self.retired {
            return;
        }
        self.retired = true;

        let last = self.shared.buffer().retire(self.index);
        tracing::trace!(index = self.index, last, "dup consumer retired");
        if last {
            self.shared.feed.close();
        }
    }
}

impl<T: Clone> Iterator for Dup<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.retired {
            return None;
        }

        loop {
            {
                let mut buffer = self.shared.buffer();
                if let Some(item) = buffer.read(self.index) {
                    return Some(item);
                }
                if buffer.exhausted {
                    let panicked = buffer.panicked;
                    drop(buffer);
                    self.retire();
                    if panicked {
                        panic!("the duplicated sequence panicked");
                    }
                    return None;
                }
            }

            let mut feed = self.shared.feed.lock();
            // Another copy may have pulled while we waited for the feed.
            if self.shared.buffer().has_next(self.index) {
                continue;
            }

            // Blocks without holding `buffer`.
            let received = feed.recv();

            let mut buffer = self.shared.buffer();
            match received {
                Ok(Some(item)) => buffer.pending.push_back(item),
                Ok(None) => buffer.exhausted = true,
                Err(payload) => {
                    buffer.exhausted = true;
                    buffer.panicked = true;
                    drop(buffer);
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

        let buffer = self.shared.buffer();
        let buffered = buffer.offsets[self.index].map_or(0, |offset| buffer.high() - offset);
        if buffer.exhausted {
            (buffered, Some(buffered))
        } else {
            (buffered, None)
        }
    }
}

impl<T: Clone> FusedIterator for Dup<T> {}

impl<T> Drop for Dup<T> {
    fn drop(&mut self) {
        self.retire();
    }
}

impl<T> Debug for Dup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dup")
            .field("index", &self.index)
            .field("retired", &self.retired)
            .finish_non_exhaustive()
    }
}
