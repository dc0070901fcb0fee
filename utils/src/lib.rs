pub mod bits;
pub mod hash;
pub mod map;

pub use bits::*;
pub use hash::*;
pub use map::*;
