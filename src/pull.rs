//! Pull-style cursors over push-style generators.

use std::{
    fmt::Debug,
    iter::FusedIterator,
    ops::ControlFlow,
    panic,
    sync::mpsc::{self, Receiver, SyncSender},
    thread::{self, JoinHandle},
};

/// The handle a generator passed to [`generate()`] pushes its items through.
pub struct Yield<T> {
    values: SyncSender<T>,
    demand: Receiver<()>,
}

impl<T> Yield<T> {
    /// Hands `item` to the consumer and waits until it asks for the next one.
    ///
    /// Returns [`ControlFlow::Break`] once the consumer has released the cursor.
    /// The generator should return then; further calls keep returning `Break`.
    pub fn send(&mut self, item: T) -> ControlFlow<()> {
        if self.values.send(item).is_err() || self.demand.recv().is_err() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl<T> Debug for Yield<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Yield").finish_non_exhaustive()
    }
}

/// A pull cursor over a push-style generator.
///
/// The generator runs on its own thread. It starts on the first
/// [`next()`](Iterator::next) call and is parked inside [`Yield::send()`] between
/// items, so it never runs ahead of the consumer.
///
/// This `struct` is created by [`generate()`]. See its documentation for more.
pub struct Pull<T> {
    // `(demand, values)`. `None` once released or exhausted.
    channels: Option<(SyncSender<()>, Receiver<T>)>,
    handle: Option<JoinHandle<()>>,
}

/// Turns a push-style generator into a pull cursor.
///
/// `producer` pushes its items through the [`Yield`] it is given and returns when it
/// is done, or as soon as [`Yield::send()`] reports that the consumer is gone.
/// A panic in `producer` is resumed in the thread that pulls the cursor.
///
/// # Examples
///
/// ```
/// use seqs::generate;
///
/// let mut fib = generate(|y| {
///     let (mut a, mut b) = (0_u64, 1);
///     while y.send(a).is_continue() {
///         (a, b) = (b, a + b);
///     }
/// });
///
/// assert_eq!(fib.by_ref().take(8).collect::<Vec<_>>(), [0, 1, 1, 2, 3, 5, 8, 13]);
///
/// // The generator is told to stop.
/// fib.release();
/// assert_eq!(fib.next(), None);
/// ```
pub fn generate<T, F>(producer: F) -> Pull<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Yield<T>) + Send + 'static,
{
    let (values_tx, values_rx) = mpsc::sync_channel(0);
    let (demand_tx, demand_rx) = mpsc::sync_channel(0);

    let handle = thread::spawn(move || {
        // Wait for the first pull.
        if demand_rx.recv().is_err() {
            return;
        }
        let mut y = Yield {
            values: values_tx,
            demand: demand_rx,
        };
        producer(&mut y);
    });

    Pull {
        channels: Some((demand_tx, values_rx)),
        handle: Some(handle),
    }
}

impl<T> Pull<T> {
    /// Detaches the generator for good.
    ///
    /// The generator sees [`ControlFlow::Break`] from its pending or next
    /// [`Yield::send()`]. Calling this more than once has no further effect.
    pub fn release(&mut self) {
        if self.channels.take().is_some() {
            tracing::trace!("pull cursor released");
        }
        // Not joined: the generator may be busy computing its next item.
        self.handle.take();
    }

    /// Returns `true` once the cursor is exhausted or released.
    pub fn is_released(&self) -> bool {
        self.channels.is_none()
    }

    fn finish(&mut self) {
        self.channels = None;
        if let Some(handle) = self.handle.take()
            && let Err(payload) = handle.join()
        {
            panic::resume_unwind(payload);
        }
    }
}

impl<T> Iterator for Pull<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (demand, values) = self.channels.as_ref()?;
        // Fails only if the generator has already returned; `recv` reports that.
        let _ = demand.send(());
        match values.recv() {
            Ok(item) => Some(item),
            Err(_) => {
                self.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.channels {
            Some(_) => (0, None),
            None => (0, Some(0)),
        }
    }
}

impl<T> FusedIterator for Pull<T> {}

impl<T> Drop for Pull<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T> Debug for Pull<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pull")
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::{Duration, Instant},
    };

    use super::*;

    fn counting(limit: usize, sent: Arc<AtomicUsize>) -> Pull<usize> {
        generate(move |y| {
            for n in 0..limit {
                sent.fetch_add(1, Ordering::SeqCst);
                if y.send(n).is_break() {
                    return;
                }
            }
        })
    }

    #[test]
    fn yields_everything_then_ends() {
        let seq = counting(5, Arc::default());
        assert_eq!(seq.collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn lazy_until_first_pull() {
        let sent = Arc::new(AtomicUsize::new(0));
        let mut seq = counting(5, Arc::clone(&sent));

        thread::sleep(Duration::from_millis(20));
        assert_eq!(sent.load(Ordering::SeqCst), 0);

        assert_eq!(seq.next(), Some(0));
        assert_eq!(seq.next(), Some(1));
        // The generator is parked inside `send` until the next pull.
        thread::sleep(Duration::from_millis(20));
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn release_stops_the_generator() {
        let stopped = Arc::new(AtomicBool::new(false));
        let mut seq = {
            let stopped = Arc::clone(&stopped);
            generate(move |y| {
                let mut n = 0_u64;
                while y.send(n).is_continue() {
                    n += 1;
                }
                stopped.store(true, Ordering::SeqCst);
            })
        };

        assert_eq!(seq.by_ref().take(3).count(), 3);
        seq.release();
        seq.release();
        assert!(seq.is_released());
        assert_eq!(seq.next(), None);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !stopped.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn dropping_before_first_pull() {
        let sent = Arc::new(AtomicUsize::new(0));
        drop(counting(5, Arc::clone(&sent)));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_generator() {
        let mut seq = generate(|_: &mut Yield<i32>| {});
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.size_hint(), (0, Some(0)));
    }

    #[test]
    #[should_panic(expected = "generator failed")]
    fn panics_are_resumed() {
        let seq = generate(|y| {
            let _ = y.send(1);
            panic!("generator failed");
        });
        seq.for_each(drop);
    }
}
