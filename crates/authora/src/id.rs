//! Random identifiers for sessions.
//!
//! Ids are drawn from the thread-local CSPRNG that `rand` seeds from the
//! operating system. They carry no structure; uniqueness is enforced by
//! the persistence layer, not here.

use rand::Rng;

const BASE32_LOWER: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const ALPHANUMERIC_LOWER: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates an id from `size` random bytes, encoded as lowercase base32
/// without padding.
///
/// 25 bytes (200 bits) gives a 40-character id.
pub fn generate_id_from_entropy_size(size: usize) -> String {
    let mut bytes = vec![0u8; size];
    rand::rng().fill(&mut bytes[..]);
    encode_base32_lower(&bytes)
}

/// Generates a random id of `length` characters from `[a-z0-9]`.
pub fn generate_id(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHANUMERIC_LOWER[rng.random_range(0..ALPHANUMERIC_LOWER.len())] as char)
        .collect()
}

/// RFC 4648 base32, lowercase alphabet, no padding.
fn encode_base32_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_LOWER[((buffer >> bits) & 0x1f) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(BASE32_LOWER[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}
