use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Counts how many [`Tracked`] sequences are alive and how many items they yielded.
#[derive(Debug, Clone, Default)]
pub(crate) struct Gauge {
    live: Arc<AtomicUsize>,
    pulls: Arc<AtomicUsize>,
}

impl Gauge {
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }
}

/// A sequence that reports to a [`Gauge`] when it yields and when it is dropped.
#[derive(Debug)]
pub(crate) struct Tracked<I> {
    iter: I,
    gauge: Gauge,
}

impl<I: Iterator> Tracked<I> {
    pub fn new(iterable: impl IntoIterator<IntoIter = I>) -> (Self, Gauge) {
        let gauge = Gauge::default();
        (Self::with_gauge(iterable, &gauge), gauge)
    }

    pub fn with_gauge(iterable: impl IntoIterator<IntoIter = I>, gauge: &Gauge) -> Self {
        gauge.live.fetch_add(1, Ordering::SeqCst);
        Self {
            iter: iterable.into_iter(),
            gauge: gauge.clone(),
        }
    }
}

impl<I: Iterator> Iterator for Tracked<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next()?;
        self.gauge.pulls.fetch_add(1, Ordering::SeqCst);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I> Drop for Tracked<I> {
    fn drop(&mut self) {
        self.gauge.live.fetch_sub(1, Ordering::SeqCst);
    }
}
