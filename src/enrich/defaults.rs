//! Derived-parameter tables for well-known algorithm families.

/// Normalize an algorithm rendering for table lookup: case and the usual
/// dash/underscore separators are not significant.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_' && *c != ' ')
        .collect::<String>()
        .to_uppercase()
}

/// Default key length in bits for symmetric cipher families.
pub(crate) fn default_key_length(algorithm: &str) -> Option<u64> {
    let bits = match normalize(algorithm).as_str() {
        "AES" => 128,
        "DES" => 56,
        "DESEDE" | "3DES" | "TRIPLEDES" | "TDEA" => 168,
        "BLOWFISH" => 128,
        "TWOFISH" => 128,
        "CAMELLIA" => 128,
        "ARIA" => 128,
        "SM4" => 128,
        "IDEA" => 128,
        "CAST5" => 128,
        "RC2" => 128,
        "RC4" | "ARC4" | "ARCFOUR" => 128,
        "CHACHA20" | "CHACHA" => 256,
        "SALSA20" => 256,
        _ => return None,
    };
    Some(bits)
}

/// Output size in bits for message digest families.
pub(crate) fn digest_output_bits(algorithm: &str) -> Option<u64> {
    let bits = match normalize(algorithm).as_str() {
        "MD2" | "MD4" | "MD5" => 128,
        "SHA" | "SHA1" => 160,
        "SHA224" | "SHA3224" => 224,
        "SHA256" | "SHA3256" => 256,
        "SHA384" | "SHA3384" => 384,
        "SHA512" | "SHA3512" => 512,
        "RIPEMD128" => 128,
        "RIPEMD160" => 160,
        "RIPEMD256" => 256,
        "BLAKE2S" => 256,
        "BLAKE2B" => 512,
        "BLAKE3" => 256,
        "SM3" => 256,
        "WHIRLPOOL" => 512,
        _ => return None,
    };
    Some(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_length_known_families() {
        assert_eq!(default_key_length("AES"), Some(128));
        assert_eq!(default_key_length("des"), Some(56));
        assert_eq!(default_key_length("ChaCha20"), Some(256));
        assert_eq!(default_key_length("Triple-DES"), Some(168));
    }

    #[test]
    fn test_key_length_unknown_family() {
        assert_eq!(default_key_length("Kalyna"), None);
    }

    #[test]
    fn test_digest_bits_separator_insensitive() {
        assert_eq!(digest_output_bits("SHA-256"), Some(256));
        assert_eq!(digest_output_bits("sha_256"), Some(256));
        assert_eq!(digest_output_bits("SHA3-512"), Some(512));
    }

    #[test]
    fn test_digest_bits_unknown() {
        assert_eq!(digest_output_bits("Streebog"), None);
    }
}
