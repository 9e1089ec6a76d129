//! FNV-1a checksum over encoded bytes.

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET: u64 = 0xcbf29ce484222325;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// FNV-1a 64 over `bytes`.
///
/// The empty input hashes to [`FNV_OFFSET`].
pub fn checksum(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |h, &b| fnv1a_byte(h, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(checksum(&[]), FNV_OFFSET);
    }

    #[test]
    fn known_vectors() {
        // Reference values for FNV-1a 64.
        assert_eq!(checksum(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(checksum(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn single_bit_flip_changes_hash() {
        let a = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut b = a;
        b[5] ^= 0x10;
        assert_ne!(checksum(&a), checksum(&b));
    }
}
