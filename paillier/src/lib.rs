pub mod arith;
pub mod ciphertext;
pub mod error;
pub mod keygen;
pub mod keys;
pub mod packing;
pub mod paillier;
#[cfg(test)]
mod tests;

pub use ciphertext::*;
pub use error::*;
pub use keygen::*;
pub use keys::*;
pub use packing::*;
pub use paillier::*;

pub use rug::Integer;
pub use sampling::source::Source;
