mod comm;
mod merge_all;
mod two_way;

use std::cmp::Ordering;

pub use comm::*;
pub use merge_all::*;
pub use two_way::*;

/// The comparator used by the `Ord`-based merge functions.
pub type OrdCmp<T> = fn(&T, &T) -> Ordering;
