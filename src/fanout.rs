//! Fan-out of one sequence into several sequences fed by one background producer.

mod dup;
mod feed;
mod partition;

pub use dup::*;
pub use partition::*;
