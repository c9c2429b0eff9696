use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::Error;

/// How often blocking bridges wake up to look at their [`CancelToken`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A cooperative cancellation signal shared between a producer and its consumer.
///
/// Clones observe the same signal. A token fires either when [`cancel()`](CancelToken::cancel)
/// is called on any clone, or when its deadline (if any) passes.
///
/// # Examples
///
/// ```
/// use seqs::{CancelToken, Error};
///
/// let token = CancelToken::new();
/// let other = token.clone();
/// assert!(token.check().is_ok());
///
/// other.cancel();
/// assert!(matches!(token.check(), Err(Error::Canceled)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    canceled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Creates a token that only fires when canceled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that also fires once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(Inner {
                canceled: AtomicBool::new(false),
                deadline: Some(deadline),
            }),
        }
    }

    /// Creates a token that also fires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Fires the token for every clone.
    pub fn cancel(&self) {
        self.inner.canceled.store(true, Ordering::Release);
    }

    /// Returns `true` if the token has fired.
    pub fn is_canceled(&self) -> bool {
        self.check().is_err()
    }

    /// Returns the cancellation error if the token has fired.
    ///
    /// An explicit [`cancel()`](CancelToken::cancel) takes precedence over the deadline.
    pub fn check(&self) -> Result<(), Error> {
        if self.inner.canceled.load(Ordering::Acquire) {
            return Err(Error::Canceled);
        }

        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// How long a blocking wait may last before the token has to be checked again.
    pub(crate) fn wait_slice(&self) -> Duration {
        match self.inner.deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_reaches_every_clone() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_canceled());

        token.cancel();
        assert!(clone.is_canceled());
        assert!(matches!(clone.check(), Err(Error::Canceled)));
    }

    #[test]
    fn deadline() {
        let token = CancelToken::with_deadline(Instant::now());
        assert!(matches!(token.check(), Err(Error::DeadlineExceeded)));
        assert_eq!(token.wait_slice(), Duration::ZERO);

        let token = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(token.check().is_ok());
        assert_eq!(token.wait_slice(), POLL_INTERVAL);

        token.cancel();
        assert!(matches!(token.check(), Err(Error::Canceled)));
    }
}
