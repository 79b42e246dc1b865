//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set on the command line, in a config file, or through
//! `SAVEABLOOD_*` environment variables, e.g. `SAVEABLOOD_DATABASE_URL`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use saveablood::domain::DEFAULT_HASH_ITERATIONS;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime configuration for the SaveABlood server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SAVEABLOOD")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one, state lives in memory for the process.
    pub database_url: Option<String>,
    /// File holding the cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// PBKDF2 iterations for new password hashes.
    pub hash_iterations: Option<u32>,
    /// Create the default banks at start-up.
    #[ortho_config(default = true)]
    pub seed_banks: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// The configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn hash_iterations(&self) -> u32 {
        self.hash_iterations.unwrap_or(DEFAULT_HASH_ITERATIONS)
    }
}
