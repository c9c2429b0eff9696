//! Lazy sequence combinators, with fan-out, ordered merging and pull cursors.
//!
//! A *sequence* here is simply an [`Iterator`]. Pulling is [`next()`](Iterator::next),
//! pushing is [`try_for_each()`](Iterator::try_for_each) with a [`ControlFlow`], and
//! abandoning a sequence early is dropping it: every adaptor owns its inputs, so
//! dropping the outermost one releases everything underneath.
//!
//! On top of that, this crate adds what [`std::iter`] does not have:
//!
//! - [`dup()`] fans one sequence out into several copies that can be consumed at
//!   different paces, even from different threads, while the original is pulled
//!   only once per item. [`partition()`] routes each item to one of several
//!   sequences instead.
//! - [`merge_all()`] and the `comm_*` methods of [`SeqExt`] work on sorted
//!   sequences: k-way merging, and the set differences and intersection of two
//!   sorted sequences.
//! - [`SeqExt::peek_first()`], [`SeqExt::check_empty()`] and
//!   [`SeqExt::resumable()`] look ahead without losing items, and pause iteration
//!   without losing the cursor.
//! - [`generate()`] turns a push-style generator into a pull cursor.
//! - Bridges to channels ([`to_channel()`], [`from_channel()`], [`go()`]), readers
//!   ([`lines()`], [`words()`]) and database cursors ([`query`]).
//!
//! # Errors
//!
//! An [`Iterator`] has nowhere to put an error, so fallible sequences stop at their
//! first error and record it in an [`ErrorSlot`] returned next to them:
//!
//! ```
//! use seqs::prelude::*;
//!
//! let (nums, err) = ["10", "20", "x"].into_iter().try_map(str::parse::<u32>);
//! let total: u32 = nums.sum();
//!
//! // Only meaningful once the sequence is drained.
//! assert_eq!(total, 30);
//! assert!(err.check().is_err());
//! ```
//!
//! # Fan-out
//!
//! ```
//! use std::thread;
//! use seqs::prelude::*;
//!
//! let mut copies = (1..=10).dup(2);
//! let odds = copies.pop().unwrap();
//! let evens = copies.pop().unwrap();
//!
//! let (evens, odds) = thread::scope(|s| {
//!     let evens = s.spawn(|| evens.filter(|n| n % 2 == 0).collect::<Vec<_>>());
//!     let odds = s.spawn(|| odds.filter(|n| n % 2 == 1).collect::<Vec<_>>());
//!     (evens.join().unwrap(), odds.join().unwrap())
//! });
//!
//! assert_eq!(evens, [2, 4, 6, 8, 10]);
//! assert_eq!(odds, [1, 3, 5, 7, 9]);
//! ```
//!
//! [`ControlFlow`]: std::ops::ControlFlow

#![cfg_attr(docsrs, feature(doc_cfg))]

mod adaptors;
mod cancel;
mod chan;
mod error;
mod fanout;
mod iter;
mod merge;
pub mod prelude;
mod pull;
pub mod query;
mod text;

pub use adaptors::*;
pub use cancel::*;
pub use chan::*;
pub use error::*;
pub use fanout::*;
pub use iter::*;
pub use merge::*;
pub use pull::*;
pub use text::*;

#[cfg(test)]
mod test_utils;
