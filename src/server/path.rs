//! Inbound request path parsing
//!
//! Format: `/<package>[.v<major>[.<minor>[.<patch>]][-unstable]][<subpath>]`
//! - `/db` -> package `db`, no version
//! - `/db.v3/info/refs` -> package `db`, version `v3`, subpath `/info/refs`

use regex::Regex;
use thiserror::Error;

use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("missing package name")]
    MissingPackage,

    #[error("malformed request path: {0}")]
    Malformed(String),
}

/// A request path split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub name: String,
    pub version: Option<Version>,
    /// Remainder of the path, empty or starting with `/`
    pub subpath: String,
}

/// Parser for vanity request paths
#[derive(Debug, Clone)]
pub struct PathMatcher {
    /// Match: /name[.vTOKEN][/subpath]
    package_re: Regex,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self {
            package_re: Regex::new(r"^/([-a-zA-Z0-9]+)(?:\.(v[^/]*))?(/.*)?$").unwrap(),
        }
    }

    pub fn parse(&self, path: &str) -> Result<PackageRequest, PathError> {
        if path.is_empty() || path == "/" {
            return Err(PathError::MissingPackage);
        }

        let caps = self
            .package_re
            .captures(path)
            .ok_or_else(|| PathError::Malformed(path.to_string()))?;

        let name = caps[1].to_string();
        let version = match caps.get(2) {
            Some(token) => Some(
                Version::parse(token.as_str())
                    .ok_or_else(|| PathError::Malformed(path.to_string()))?,
            ),
            None => None,
        };
        let subpath = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Ok(PackageRequest {
            name,
            version,
            subpath,
        })
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}
