use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Hash prefix printed next to generation statistics.
pub const HASH_PREFIX_LEN: usize = 16;

/// Lowercase hex SHA-256 of a byte buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 of a file, streamed.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

pub fn short_hash(digest: &str) -> &str {
    &digest[..digest.len().min(HASH_PREFIX_LEN)]
}

/// Whether `actual` matches an expected full digest or digest prefix.
/// Case-insensitive; an empty expectation never matches.
pub fn verify_digest(actual: &str, expected: &str) -> bool {
    let expected = expected.trim().to_ascii_lowercase();
    !expected.is_empty() && actual.to_ascii_lowercase().starts_with(&expected)
}
