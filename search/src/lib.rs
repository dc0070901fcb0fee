pub mod config;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod plaintext;
pub mod querier;
pub mod ranking;
pub mod score;
pub mod scorer;
#[cfg(test)]
mod tests;
pub mod vector;

pub use config::*;
pub use corpus::*;
pub use encoder::*;
pub use error::*;
pub use pipeline::*;
pub use querier::*;
pub use ranking::*;
pub use score::*;
pub use scorer::*;
pub use vector::*;
