//! Line and word sequences over buffered readers.

use std::{
    collections::VecDeque,
    fmt::Debug,
    io::{self, BufRead},
    iter::FusedIterator,
};

use crate::ErrorSlot;

/// A sequence over the lines of a reader, without their line terminators.
///
/// This `struct` is created by [`lines()`]. See its documentation for more.
pub struct Lines<R> {
    reader: R,
    slot: ErrorSlot<io::Error>,
    done: bool,
}

/// Creates a sequence over the lines of `reader`.
///
/// Each line is yielded without its trailing `\n` or `\r\n`. A final line without a
/// terminator is still yielded; an empty reader yields nothing.
///
/// The first read error (including invalid UTF-8) ends the sequence and is recorded
/// in the returned slot. Nothing is read from `reader` after that.
///
/// # Examples
///
/// ```
/// let text = "first\r\nsecond\n\nlast";
/// let (lines, err) = seqs::lines(text.as_bytes());
///
/// assert_eq!(lines.collect::<Vec<_>>(), ["first", "second", "", "last"]);
/// assert!(!err.is_set());
/// ```
pub fn lines<R: BufRead>(reader: R) -> (Lines<R>, ErrorSlot<io::Error>) {
    let slot = ErrorSlot::new();
    let lines = Lines {
        reader,
        slot: slot.clone(),
        done: false,
    };
    (lines, slot)
}

impl<R> Lines<R> {
    /// Consumes the sequence, returning the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(err) => {
                self.done = true;
                self.slot.set(err);
                None
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Lines<R> {}

impl<R: Debug> Debug for Lines<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lines")
            .field("reader", &self.reader)
            .field("done", &self.done)
            .finish()
    }
}

/// A sequence over the whitespace-separated words of a reader.
///
/// This `struct` is created by [`words()`]. See its documentation for more.
pub struct Words<R> {
    lines: Lines<R>,
    pending: VecDeque<String>,
}

/// Creates a sequence over the whitespace-separated words of `reader`.
///
/// Words never span lines. Errors are handled like in [`lines()`].
///
/// # Examples
///
/// ```
/// let text = "In Congress, July 4, 1776\n\n  The unanimous Declaration";
/// let (words, _) = seqs::words(text.as_bytes());
///
/// assert_eq!(
///     words.take(6).collect::<Vec<_>>(),
///     ["In", "Congress,", "July", "4,", "1776", "The"],
/// );
/// ```
pub fn words<R: BufRead>(reader: R) -> (Words<R>, ErrorSlot<io::Error>) {
    let (lines, slot) = lines(reader);
    let words = Words {
        lines,
        pending: VecDeque::new(),
    };
    (words, slot)
}

impl<R: BufRead> Iterator for Words<R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Some(word);
            }
            let line = self.lines.next()?;
            self.pending
                .extend(line.split_whitespace().map(String::from));
        }
    }
}

impl<R: BufRead> FusedIterator for Words<R> {}

impl<R: Debug> Debug for Words<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Words")
            .field("lines", &self.lines)
            .field("pending", &self.pending)
            .finish()
    }
}
