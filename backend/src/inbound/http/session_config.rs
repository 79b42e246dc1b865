//! Cookie session settings.
//!
//! Turns the session toggles from the application settings into the signing
//! key and cookie flags handed to `SessionMiddleware`. Release builds insist
//! on a readable key file of at least [`SESSION_KEY_MIN_LEN`] bytes; debug
//! builds, or deployments that opt in, fall back to an ephemeral key that
//! invalidates every session on restart.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

/// Minimum key file length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Bytes of the key digest shown in logs.
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Session toggles as configured by the operator.
#[derive(Debug, Clone, Copy)]
pub struct SessionToggles<'a> {
    pub key_file: &'a Path,
    pub cookie_secure: bool,
    pub allow_ephemeral: bool,
}

/// Session settings ready for `SessionMiddleware`.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Resolve the signing key and cookie flags.
///
/// Session cookies are always `SameSite=Lax`: the login and ledger forms are
/// same-site top-level POSTs followed by a redirect, which Lax permits.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use saveablood::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// let toggles = SessionToggles {
///     key_file: Path::new("/nonexistent/session_key"),
///     cookie_secure: false,
///     allow_ephemeral: true,
/// };
/// let settings = session_settings(toggles, BuildMode::Debug).expect("ephemeral key");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: SessionToggles<'_>,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if mode == BuildMode::Release && toggles.allow_ephemeral {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if mode == BuildMode::Release && !toggles.cookie_secure {
        warn!("session cookies are not marked Secure in a release build");
    }
    let key = session_key(toggles.key_file, mode, toggles.allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site: SameSite::Lax,
    })
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

/// Short hex digest of the signing key, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
