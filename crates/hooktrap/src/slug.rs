//! Public slug generation.

use rand::Rng;

/// Fixed alphabet: lowercase alphanumerics only, URL-safe.
const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const SLUG_LEN: usize = 8;

/// Attempts against the uniqueness index before giving up. Collisions
/// at 36^8 slugs are vanishingly rare; a loop that exhausts this cap
/// indicates something badly wrong, so the caller fails loudly.
pub const MAX_SLUG_ATTEMPTS: usize = 10;

/// Generate a random 8-character slug.
pub fn generate_slug() -> String {
    let mut rng = rand::thread_rng();
    (0..SLUG_LEN)
        .map(|_| SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_shape() {
        for _ in 0..100 {
            let slug = generate_slug();
            assert_eq!(slug.len(), SLUG_LEN);
            assert!(slug
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_slugs_vary() {
        let a = generate_slug();
        let b = generate_slug();
        let c = generate_slug();
        // Three identical draws from a 36^8 space means a broken RNG
        assert!(!(a == b && b == c));
    }
}
