use std::path::PathBuf;

use thiserror::Error;

use crate::git::RefPolicy;

// =============================================================================
// Upstream-related constants
// =============================================================================

/// Timeout for fetching an upstream advertisement in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// Path and query appended to a repository root to fetch its advertisement
pub const REFS_SUFFIX: &str = ".git/info/refs?service=git-upload-pack";

/// Branch shown in source links when no version was resolved
pub const DEFAULT_BRANCH: &str = "master";

/// User agent for upstream requests
pub const USER_AGENT: &str = concat!("go-vanity/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Server configuration
// =============================================================================

/// Default TCP listen address
pub const DEFAULT_ADDR: &str = ":8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("must provide --addr or --socket")]
    MissingListener,

    #[error("must provide --repo-root")]
    MissingRepoRoot,

    #[error("must provide --vanity-root")]
    MissingVanityRoot,

    #[error("could not parse {flag}: {reason}")]
    InvalidRoot { flag: &'static str, reason: String },
}

/// Where the server accepts connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listen {
    Tcp(String),
    Unix(PathBuf),
}

/// Immutable server configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: Listen,
    /// Git repository root URL (e.g., "https://github.com/upper")
    pub repo_root: String,
    /// Vanity root URL (e.g., "https://upper.io")
    pub vanity_root: String,
    pub policy: RefPolicy,
}

impl Config {
    /// Validates raw flag values. A socket path takes precedence over the address.
    pub fn new(
        addr: Option<String>,
        socket: Option<PathBuf>,
        repo_root: Option<String>,
        vanity_root: Option<String>,
        strict_tags: bool,
    ) -> Result<Self, ConfigError> {
        let listen = match (socket, addr.filter(|addr| !addr.is_empty())) {
            (Some(path), _) if !path.as_os_str().is_empty() => Listen::Unix(path),
            (_, Some(addr)) => Listen::Tcp(tcp_bind_address(&addr)),
            _ => return Err(ConfigError::MissingListener),
        };

        let repo_root = repo_root
            .filter(|root| !root.is_empty())
            .ok_or(ConfigError::MissingRepoRoot)?;
        let vanity_root = vanity_root
            .filter(|root| !root.is_empty())
            .ok_or(ConfigError::MissingVanityRoot)?;

        let policy = if strict_tags {
            RefPolicy::Strict
        } else {
            RefPolicy::Superset
        };

        Ok(Self {
            listen,
            repo_root,
            vanity_root,
            policy,
        })
    }
}

/// Expands the host-less `:port` form into an address tokio can bind.
fn tcp_bind_address(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}
