use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::SecurityConfig;

/// One-way, salted secret hashing.
pub trait PasswordEncoder: Send + Sync {
    /// Hashes `raw` into a self-describing string (algorithm, version, cost,
    /// salt and digest).
    fn encode(&self, raw: &str) -> Result<String>;

    /// Re-hashes `raw` with the salt and cost embedded in `encoded` and
    /// compares the digests. Malformed hashes never match.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id encoder whose cost comes from `[security]`.
#[derive(Debug, Clone)]
pub struct Argon2PasswordEncoder {
    params: Params,
}

impl Argon2PasswordEncoder {
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .hasher()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

        Ok(hash.to_string())
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        let parsed = match PasswordHash::new(encoded) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {e}");
                return false;
            }
        };

        // Params are read back from the hash itself, so older costs still verify.
        Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> Argon2PasswordEncoder {
        Argon2PasswordEncoder::new(&SecurityConfig {
            argon2_memory_cost_kib: 256,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_encode_embeds_algorithm_cost_and_salt() {
        let hash = encoder().encode("pwd1234").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=256,t=1,p=1$"));
        assert_eq!(hash.split('$').count(), 6);
        assert!(!hash.contains("pwd1234"));
    }

    #[test]
    fn test_matches_only_original_plaintext() {
        let encoder = encoder();
        let hash = encoder.encode("pwd1234").unwrap();

        assert!(encoder.matches("pwd1234", &hash));
        assert!(!encoder.matches("pwd12345", &hash));
        assert!(!encoder.matches("", &hash));
    }

    #[test]
    fn test_salts_differ_between_encodings() {
        let encoder = encoder();
        let first = encoder.encode("same").unwrap();
        let second = encoder.encode("same").unwrap();
        assert_ne!(first, second);
        assert!(encoder.matches("same", &first));
        assert!(encoder.matches("same", &second));
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let cheap = encoder();
        let hash = cheap.encode("pwd1234").unwrap();

        let stronger = Argon2PasswordEncoder::new(&SecurityConfig {
            argon2_memory_cost_kib: 512,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        })
        .unwrap();
        assert!(stronger.matches("pwd1234", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!encoder().matches("pwd1234", "pwd1234"));
        assert!(!encoder().matches("pwd1234", ""));
    }
}
