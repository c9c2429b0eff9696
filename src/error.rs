//! Errors and the late-bound error slot shared by fallible sequences.

use std::{
    fmt::{self, Debug},
    io,
    sync::{Arc, OnceLock},
};

/// The error type of the sequences in this crate that talk to the outside world
/// (channels, readers and database cursors).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation was canceled through a [`CancelToken`](crate::CancelToken),
    /// or the consumer of the sequence went away.
    #[error("operation canceled")]
    Canceled,

    /// The deadline of a [`CancelToken`](crate::CancelToken) passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// An I/O error from the underlying reader.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A column value could not be decoded into the requested type.
    #[error("decoding column {column}: expected {expected}, found {found}")]
    Decode {
        /// Zero-based position of the column in the row.
        column: usize,
        /// The Rust type that was requested.
        expected: &'static str,
        /// The kind of value that was found.
        found: &'static str,
    },

    /// A row did not have the shape of the requested record type.
    #[error("row has {found} columns but the record type has {expected} fields")]
    Shape {
        /// Number of fields of the record type.
        expected: usize,
        /// Number of columns in the row.
        found: usize,
    },

    /// An error reported by a database driver.
    #[error("driver: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Several errors happened while finishing one sequence, in the order they happened.
    #[error("{}", DisplayJoined(.0))]
    Joined(Vec<Error>),
}

impl Error {
    /// Wraps an error reported by a database driver.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }

    /// Returns `true` if this error (or any error joined in it) is a cancellation.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Self::Canceled | Self::DeadlineExceeded => true,
            Self::Joined(errors) => errors.iter().any(Self::is_cancellation),
            _ => false,
        }
    }

    /// Combines two optional errors. Both present gives [`Error::Joined`].
    pub(crate) fn join(first: Option<Self>, second: Option<Self>) -> Option<Self> {
        match (first, second) {
            (Some(first), Some(second)) => Some(Self::Joined(vec![first, second])),
            (first, second) => first.or(second),
        }
    }
}

struct DisplayJoined<'a>(&'a [Error]);

impl fmt::Display for DisplayJoined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// A shared, write-once cell that receives the terminal error of a sequence.
///
/// Iterators have no per-item error slot, so the fallible sequences in this crate
/// stop at their first error and record it here instead.
/// The slot is only meaningful **after** the sequence has been drained (or dropped):
/// an unset slot while the sequence is still running says nothing.
///
/// Only the first error written is kept. Handles are cheap to clone and every clone
/// observes the same cell, so one slot may be shared by several stages of a pipeline
/// (see [`SeqExt::try_map_into()`](crate::SeqExt::try_map_into)).
///
/// # Examples
///
/// ```
/// use seqs::prelude::*;
///
/// let (nums, err) = ["1", "2", "x", "4"]
///     .into_iter()
///     .try_map(|s| s.parse::<i32>());
///
/// assert_eq!(nums.collect::<Vec<_>>(), [1, 2]);
/// assert!(err.check().is_err());
/// ```
pub struct ErrorSlot<E> {
    cell: Arc<OnceLock<E>>,
}

impl<E> ErrorSlot<E> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// Records `err` unless an error has already been recorded.
    ///
    /// Returns `true` if `err` was stored.
    pub fn set(&self, err: E) -> bool {
        self.cell.set(err).is_ok()
    }

    /// Returns the recorded error, if any.
    pub fn get(&self) -> Option<&E> {
        self.cell.get()
    }

    /// Returns `true` if an error has been recorded.
    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns `Err` with the recorded error, or `Ok(())` if there is none.
    pub fn check(&self) -> Result<(), &E> {
        match self.cell.get() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Takes the recorded error out of the slot.
    ///
    /// Returns `None` if no error was recorded or if other handles to this slot
    /// are still alive (for example, the sequence has not been dropped yet).
    pub fn into_inner(self) -> Option<E> {
        Arc::into_inner(self.cell).and_then(OnceLock::into_inner)
    }
}

impl<E> Clone for ErrorSlot<E> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<E> Default for ErrorSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Debug> Debug for ErrorSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorSlot").field(&self.cell.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_wins() {
        let slot = ErrorSlot::new();
        let other = slot.clone();

        assert!(slot.check().is_ok());
        assert!(other.set("first"));
        assert!(!slot.set("second"));
        assert_eq!(slot.get(), Some(&"first"));
        assert_eq!(slot.check(), Err(&"first"));

        drop(other);
        assert_eq!(slot.into_inner(), Some("first"));
    }

    #[test]
    fn into_inner_needs_the_last_handle() {
        let slot = ErrorSlot::new();
        let other = slot.clone();
        slot.set(1);
        assert_eq!(slot.into_inner(), None);
        assert_eq!(other.get(), Some(&1));
    }

    #[test]
    fn joined_display_and_cancellation() {
        let err = Error::join(
            Some(Error::Shape {
                expected: 2,
                found: 3,
            }),
            Some(Error::Canceled),
        )
        .unwrap();

        assert!(err.is_cancellation());
        assert_eq!(
            err.to_string(),
            "row has 3 columns but the record type has 2 fields\noperation canceled"
        );

        assert!(Error::join(None, None).is_none());
        assert!(matches!(
            Error::join(None, Some(Error::DeadlineExceeded)),
            Some(Error::DeadlineExceeded)
        ));
        assert!(!Error::driver("boom").is_cancellation());
    }
}
