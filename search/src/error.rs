use rug::Integer;
use thiserror::Error;

/// Errors of a query. Any error raised by a single entry or bit fails
/// the whole query: a partial corpus scan is never ranked.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Crypto(#[from] paillier::Error),

    #[error("vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    #[error("duplicate corpus identifier {0}")]
    DuplicateIdentifier(u64),

    #[error("decrypted intersection {value} of entry {id} is outside [0, {bound}]")]
    InconsistentScore { id: u64, value: Integer, bound: u64 },

    #[error("packed response holds {packets} packets for {entries} entries")]
    MalformedResponse { packets: usize, entries: usize },

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
