//! PBKDF2-HMAC-SHA256 credential hashing.
//!
//! Hashes are stored as `pbkdf2:sha256:<iterations>$<salt-hex>$<hash-hex>` so
//! the iteration count can be raised later without invalidating existing
//! accounts: verification always uses the count recorded in the hash.
//!
//! Key derivation is CPU-bound; async callers run it on the blocking pool.

use std::fmt;
use std::num::NonZeroU32;

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2:sha256:";
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

/// Default work factor for new hashes.
pub const DEFAULT_HASH_ITERATIONS: u32 = 260_000;

/// Errors raised while hashing or decoding a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,
    #[error("stored password hash is malformed: {reason}")]
    Malformed { reason: &'static str },
}

/// Encoded, salted password hash as persisted alongside a user.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash after checking its structure.
    pub fn parse(encoded: impl Into<String>) -> Result<Self, PasswordHashError> {
        let encoded = encoded.into();
        decode(&encoded)?;
        Ok(Self(encoded))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check `password` against this hash in constant time.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordHashError> {
        let decoded = decode(&self.0)?;
        let candidate = derive(password.as_bytes(), &decoded.salt, decoded.iterations);
        Ok(bool::from(candidate.as_slice().ct_eq(decoded.digest.as_slice())))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Produces new [`PasswordHash`] values with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self, PasswordHashError> {
        NonZeroU32::new(iterations)
            .map(|iterations| Self { iterations })
            .ok_or(PasswordHashError::ZeroIterations)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> PasswordHash {
        let mut salt = [0_u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let digest = derive(password.as_bytes(), &salt, self.iterations.get());
        PasswordHash(format!(
            "{SCHEME}{}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        ))
    }
}

struct Decoded {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

fn decode(encoded: &str) -> Result<Decoded, PasswordHashError> {
    let rest = encoded
        .strip_prefix(SCHEME)
        .ok_or(PasswordHashError::Malformed {
            reason: "unsupported scheme",
        })?;
    let mut parts = rest.splitn(3, '$');
    let (Some(iterations), Some(salt), Some(digest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordHashError::Malformed {
            reason: "expected iterations, salt and digest",
        });
    };
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or(PasswordHashError::Malformed {
            reason: "invalid iteration count",
        })?;
    let salt = hex::decode(salt).map_err(|_| PasswordHashError::Malformed {
        reason: "salt is not hex",
    })?;
    let digest = hex::decode(digest).map_err(|_| PasswordHashError::Malformed {
        reason: "digest is not hex",
    })?;
    if digest.len() != DIGEST_LEN {
        return Err(PasswordHashError::Malformed {
            reason: "digest has the wrong length",
        });
    }
    Ok(Decoded {
        iterations,
        salt,
        digest,
    })
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut output = [0_u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output);
    output
}
