use rug::Integer;
use serde::{Deserialize, Serialize};

/// A Paillier ciphertext: an integer of \[0, n^2).
///
/// Carries no key reference; range is validated against the key by every
/// operation that consumes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(pub(crate) Integer);

impl Ciphertext {
    pub fn from_integer(c: Integer) -> Self {
        Self(c)
    }

    pub fn as_integer(&self) -> &Integer {
        &self.0
    }

    pub fn into_integer(self) -> Integer {
        self.0
    }
}

impl From<Integer> for Ciphertext {
    fn from(c: Integer) -> Self {
        Self(c)
    }
}
