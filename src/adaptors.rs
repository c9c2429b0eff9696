mod accum;
mod pages;
mod peek;
mod resumable;
mod skip_until;
mod try_map;
mod uniq;
mod zip_all;

pub use accum::*;
pub use pages::*;
pub use peek::*;
pub use resumable::*;
pub use skip_until::*;
pub use try_map::*;
pub use uniq::*;
pub use zip_all::*;
