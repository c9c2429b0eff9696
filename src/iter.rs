//! Sources, consumers and the [`SeqExt`] extension trait.

mod consume;
mod seq_ext;
mod source;

pub use consume::*;
pub use seq_ext::*;
pub use source::*;
