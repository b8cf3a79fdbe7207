//! Book identifier generation

use rand::Rng;

/// URL-safe alphabet, 64 symbols
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of opaque string identifiers for new books.
///
/// Uniqueness against the stored collection is enforced by the store, which
/// retries a bounded number of times on collision.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random 16-character ids over [`ALPHABET`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub const LENGTH: usize = 16;
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..Self::LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}
