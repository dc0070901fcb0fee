use std::hash::Hasher;

use fnv::FnvHasher;

/// 64-bit FNV-1a digest of `bytes`.
///
/// Stable across processes and platforms, unlike the std default hasher.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hasher: FnvHasher = FnvHasher::default();
    hasher.write(bytes);
    hasher.finish()
}
