use std::{
    sync::{
        Mutex, MutexGuard, PoisonError,
        mpsc::{self, Receiver},
    },
    thread::{self, JoinHandle},
};

/// The hand-off from a background thread that pulls the input sequence.
///
/// Whoever holds the lock is the only consumer waiting on the producer. Consumers
/// keep their own buffer behind a separate lock and take this one first.
pub(super) struct Feed<T> {
    producer: Mutex<Option<Producer<T>>>,
}

struct Producer<T> {
    rx: Receiver<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Feed<T> {
    /// Spawns the thread that pulls `iter`, one item per hand-off.
    pub(super) fn spawn<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(0);
        let handle = thread::spawn(move || {
            for item in iter {
                // Fails once the feed was closed.
                if tx.send(item).is_err() {
                    tracing::debug!("every consumer is gone, producer stops early");
                    return;
                }
            }
            tracing::trace!("fan-out input exhausted");
        });

        Self {
            producer: Mutex::new(Some(Producer { rx, handle })),
        }
    }
}

impl<T> Feed<T> {
    pub(super) fn lock(&self) -> FeedGuard<'_, T> {
        FeedGuard(self.producer.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drops the receiving end, so the producer's pending hand-off fails and it
    /// drops the input. The thread is not joined.
    pub(super) fn close(&self) {
        self.lock().0.take();
    }
}

pub(super) struct FeedGuard<'a, T>(MutexGuard<'a, Option<Producer<T>>>);

impl<T> FeedGuard<'_, T> {
    /// Blocks until the producer hands over its next item.
    ///
    /// Returns `Ok(None)` once the input has ended, after joining the producer, and
    /// the panic payload instead if pulling the input panicked.
    pub(super) fn recv(&mut self) -> thread::Result<Option<T>> {
        if let Some(producer) = self.0.as_ref()
            && let Ok(item) = producer.rx.recv()
        {
            return Ok(Some(item));
        }

        match self.0.take() {
            Some(producer) => producer.handle.join().map(|()| None),
            None => Ok(None),
        }
    }
}
