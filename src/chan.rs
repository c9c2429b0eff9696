//! Bridges between sequences and `std::sync::mpsc` channels.

use std::{
    fmt::Debug,
    iter::FusedIterator,
    panic,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, SyncSender},
    },
    thread::{self, JoinHandle},
};

use crate::{CancelToken, Error, ErrorSlot};

// Why a blocking channel operation gave up.
enum Stopped {
    // The other end of the channel is gone.
    Disconnected,
    Canceled(Error),
}

fn recv_cancellable<T>(rx: &Receiver<T>, token: &CancelToken) -> Result<T, Stopped> {
    loop {
        token.check().map_err(Stopped::Canceled)?;
        match rx.recv_timeout(token.wait_slice()) {
            Ok(item) => return Ok(item),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(Stopped::Disconnected),
        }
    }
}

// The token is checked once per item. A send already waiting for the receiver
// completes, so at most one item is delivered after the token fires.
fn send_cancellable<T>(tx: &SyncSender<T>, item: T, token: &CancelToken) -> Result<(), Stopped> {
    token.check().map_err(Stopped::Canceled)?;
    tx.send(item).map_err(|_| Stopped::Disconnected)
}

/// A sequence over the values received from a channel.
///
/// This `struct` is created by [`from_channel()`] and [`from_channel_cancellable()`].
/// See their documentation for more.
pub struct FromChannel<T> {
    // `None` once the sequence has ended.
    rx: Option<Receiver<T>>,
    cancel: Option<(CancelToken, ErrorSlot<Error>)>,
}

/// Creates a sequence over the values received from `rx`.
///
/// The sequence ends when every sender has been dropped.
pub fn from_channel<T>(rx: Receiver<T>) -> FromChannel<T> {
    FromChannel {
        rx: Some(rx),
        cancel: None,
    }
}

/// Creates a sequence over the values received from `rx` that also ends once `token`
/// fires.
///
/// The cancellation error is recorded in the returned slot. Once the token has fired
/// no further value is yielded, even if one is already waiting in the channel.
///
/// # Examples
///
/// ```
/// use std::{sync::mpsc, time::Duration};
/// use seqs::{CancelToken, Error, from_channel_cancellable};
///
/// let (tx, rx) = mpsc::channel::<i32>();
/// let token = CancelToken::with_timeout(Duration::from_millis(10));
/// let (seq, err) = from_channel_cancellable(rx, token);
///
/// // Nothing is ever sent, but the sequence still ends.
/// assert_eq!(seq.count(), 0);
/// assert!(matches!(err.get(), Some(Error::DeadlineExceeded)));
/// drop(tx);
/// ```
pub fn from_channel_cancellable<T>(
    rx: Receiver<T>,
    token: CancelToken,
) -> (FromChannel<T>, ErrorSlot<Error>) {
    let slot = ErrorSlot::new();
    let seq = FromChannel {
        rx: Some(rx),
        cancel: Some((token, slot.clone())),
    };
    (seq, slot)
}

impl<T> Iterator for FromChannel<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let rx = self.rx.as_ref()?;
        let item = match &self.cancel {
            None => rx.recv().ok(),
            Some((token, slot)) => match recv_cancellable(rx, token) {
                Ok(item) => Some(item),
                Err(Stopped::Disconnected) => None,
                Err(Stopped::Canceled(err)) => {
                    tracing::debug!(%err, "channel sequence canceled");
                    slot.set(err);
                    None
                }
            },
        };

        if item.is_none() {
            self.rx = None;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.rx {
            Some(_) => (0, None),
            None => (0, Some(0)),
        }
    }
}

impl<T> FusedIterator for FromChannel<T> {}

impl<T> Debug for FromChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromChannel")
            .field("done", &self.rx.is_none())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Drains `seq` on a background thread into the returned channel.
///
/// The channel has no capacity: each value is pulled from `seq` only after the
/// previous one has been received. Dropping the receiver stops the thread, which then
/// drops `seq`.
///
/// # Examples
///
/// ```
/// let rx = seqs::to_channel(0..10);
/// assert_eq!(rx.iter().sum::<i32>(), 45);
/// ```
pub fn to_channel<I>(seq: I) -> Receiver<I::Item>
where
    I: IntoIterator<IntoIter: Send + 'static>,
    I::Item: Send + 'static,
{
    let iter = seq.into_iter();
    let (tx, rx) = mpsc::sync_channel(0);
    thread::spawn(move || {
        for item in iter {
            if tx.send(item).is_err() {
                return;
            }
        }
    });
    rx
}

/// Like [`to_channel()`], but the background thread also stops once `token` fires.
///
/// The token is checked before each value is sent. A value already offered to the
/// receiver when the token fires is still delivered.
///
/// The cancellation error is recorded in the returned slot before the channel is
/// closed, so it can be inspected as soon as the receiver reports disconnection.
pub fn to_channel_cancellable<I>(seq: I, token: CancelToken) -> (Receiver<I::Item>, ErrorSlot<Error>)
where
    I: IntoIterator<IntoIter: Send + 'static>,
    I::Item: Send + 'static,
{
    let iter = seq.into_iter();
    let slot = ErrorSlot::new();
    let (tx, rx) = mpsc::sync_channel(0);

    let producer_slot = slot.clone();
    thread::spawn(move || {
        for item in iter {
            match send_cancellable(&tx, item, &token) {
                Ok(()) => {}
                Err(Stopped::Disconnected) => return,
                Err(Stopped::Canceled(err)) => {
                    tracing::debug!(%err, "channel producer canceled");
                    producer_slot.set(err);
                    return;
                }
            }
        }
    });

    (rx, slot)
}

/// The sending half handed to the closure of [`go()`] and [`go_cancellable()`].
pub struct Emitter<T> {
    tx: SyncSender<T>,
    token: Option<CancelToken>,
    // Set once the consumer has dropped the sequence.
    abandoned: Arc<AtomicBool>,
}

impl<T> Emitter<T> {
    /// Sends one value to the sequence, waiting until the consumer takes it.
    ///
    /// Fails with [`Error::Canceled`] once the consumer has dropped the sequence, or
    /// with the token's error once the token has fired. The closure should return
    /// then, typically by propagating the error with `?`.
    ///
    /// A consumer that stops early is not an error: if the closure returns the
    /// [`Error::Canceled`] caused by the consumer leaving, nothing is recorded.
    pub fn send(&self, item: T) -> Result<(), Error> {
        let sent = match &self.token {
            None => self.tx.send(item).map_err(|_| Stopped::Disconnected),
            Some(token) => send_cancellable(&self.tx, item, token),
        };

        sent.map_err(|stopped| match stopped {
            Stopped::Disconnected => {
                self.abandoned.store(true, Ordering::Release);
                Error::Canceled
            }
            Stopped::Canceled(err) => err,
        })
    }
}

impl<T> Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("cancellable", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// A sequence over the values emitted by a closure running on its own thread.
///
/// This `struct` is created by [`go()`] and [`go_cancellable()`].
/// See their documentation for more.
pub struct Go<T> {
    rx: Option<Receiver<T>>,
    handle: Option<JoinHandle<()>>,
}

/// Runs `f` on a new thread and returns a sequence over the values it emits.
///
/// The error `f` returns, if any, is recorded in the returned slot. The slot is
/// written before the sequence reports its end. Dropping the sequence early makes
/// [`Emitter::send()`] fail so that `f` can return, but records nothing. A panic in `f` is resumed in the
/// thread that drains the sequence.
///
/// # Examples
///
/// ```
/// use seqs::{Error, go};
///
/// let (pairs, err) = go(|emit| {
///     emit.send((1, 2))?;
///     emit.send((3, 4))?;
///     Err(Error::driver("connection reset"))
/// });
///
/// assert_eq!(pairs.collect::<Vec<_>>(), [(1, 2), (3, 4)]);
/// assert_eq!(err.get().unwrap().to_string(), "driver: connection reset");
/// ```
pub fn go<T, F>(f: F) -> (Go<T>, ErrorSlot<Error>)
where
    T: Send + 'static,
    F: FnOnce(Emitter<T>) -> Result<(), Error> + Send + 'static,
{
    spawn_go(None, f)
}

/// Like [`go()`], but [`Emitter::send()`] also fails once `token` fires.
pub fn go_cancellable<T, F>(token: CancelToken, f: F) -> (Go<T>, ErrorSlot<Error>)
where
    T: Send + 'static,
    F: FnOnce(Emitter<T>) -> Result<(), Error> + Send + 'static,
{
    spawn_go(Some(token), f)
}

fn spawn_go<T, F>(token: Option<CancelToken>, f: F) -> (Go<T>, ErrorSlot<Error>)
where
    T: Send + 'static,
    F: FnOnce(Emitter<T>) -> Result<(), Error> + Send + 'static,
{
    let slot = ErrorSlot::new();
    let (tx, rx) = mpsc::sync_channel(0);

    let producer_slot = slot.clone();
    let handle = thread::spawn(move || {
        let abandoned = Arc::new(AtomicBool::new(false));
        let emitter = Emitter {
            tx,
            token,
            abandoned: Arc::clone(&abandoned),
        };

        match f(emitter) {
            Ok(()) => {}
            Err(Error::Canceled) if abandoned.load(Ordering::Acquire) => {
                tracing::trace!("consumer left, emitting closure stopped");
            }
            Err(err) => {
                tracing::debug!(%err, "emitting closure failed");
                producer_slot.set(err);
            }
        }
    });

    let seq = Go {
        rx: Some(rx),
        handle: Some(handle),
    };
    (seq, slot)
}

impl<T> Iterator for Go<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Ok(item) = self.rx.as_ref()?.recv() {
            return Some(item);
        }

        self.rx = None;
        // The emitter is gone, but the closure may not have returned its error yet.
        if let Some(handle) = self.handle.take()
            && let Err(payload) = handle.join()
        {
            panic::resume_unwind(payload);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.rx {
            Some(_) => (0, None),
            None => (0, Some(0)),
        }
    }
}

impl<T> FusedIterator for Go<T> {}

impl<T> Debug for Go<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Go")
            .field("done", &self.rx.is_none())
            .finish_non_exhaustive()
    }
}
