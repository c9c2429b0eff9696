//! Re-exports commonly used items from this crate.
//!
//! This module is intended to be imported with a wildcard, providing
//! convenient access to the most frequently used traits and functions.
//!
//! # Example
//!
//! ```
//! use seqs::prelude::*;
//! ```

pub use crate::{
    CancelToken, ErrorSlot, SeqExt, dup, generate, merge_all, merge_all_by, partition,
};
