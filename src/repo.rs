//! Mapping between vanity import paths and upstream repositories
//!
//! A vanity root such as `https://upper.io` and a repository root such as
//! `https://github.com/upper` turn the import path `upper.io/db.v3` into the
//! upstream repository `github.com/upper/db`.

use std::collections::BTreeSet;

use url::Url;

use crate::config::{ConfigError, DEFAULT_BRANCH};
use crate::git::Rewrite;
use crate::version::Version;

/// A repository root and vanity root pair, parsed once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot {
    repo_url: Url,
    vanity_url: Url,
    repo_host_path: String,
    vanity_host_path: String,
}

impl RepoRoot {
    pub fn new(repo_root: &str, vanity_root: &str) -> Result<Self, ConfigError> {
        let repo_url = parse_root("--repo-root", repo_root)?;
        let vanity_url = parse_root("--vanity-root", vanity_root)?;
        Ok(Self {
            repo_host_path: host_path(&repo_url),
            vanity_host_path: host_path(&vanity_url),
            repo_url,
            vanity_url,
        })
    }

    /// Starts resolving a package, optionally constrained to a version
    pub fn repository(&self, name: &str, requested: Option<Version>) -> Repository<'_> {
        Repository {
            root: self,
            name: name.to_string(),
            requested,
            full_version: Version::INVALID,
            all_versions: BTreeSet::new(),
        }
    }
}

/// Parses a root URL, assuming `https` when no scheme is given.
fn parse_root(flag: &'static str, input: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRoot { flag, reason };

    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;

    if url.host_str().is_none() {
        return Err(invalid(format!("missing host in {:?}", input)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(format!("unexpected query or fragment in {:?}", input)));
    }
    Ok(url)
}

fn host_path(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    format!("{}{}", authority, url.path().trim_end_matches('/'))
}

/// A package being resolved for one request
#[derive(Debug, Clone)]
pub struct Repository<'a> {
    root: &'a RepoRoot,
    name: String,
    /// Version token from the import path, if any
    requested: Option<Version>,
    /// Best version matching the request, or invalid when none was selected
    full_version: Version,
    /// Every version available upstream, from branch and tag names
    all_versions: BTreeSet<Version>,
}

impl Repository<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version constraint to resolve: the requested token or `v0`
    pub fn requested_version(&self) -> Version {
        self.requested.unwrap_or_else(Version::wildcard)
    }

    pub fn full_version(&self) -> Version {
        self.full_version
    }

    pub fn all_versions(&self) -> &BTreeSet<Version> {
        &self.all_versions
    }

    /// Records the outcome of rewriting the upstream advertisement
    pub fn set_versions(&mut self, rewrite: &Rewrite) {
        self.all_versions = rewrite.versions.clone();
        self.full_version = rewrite.selected.unwrap_or(Version::INVALID);
    }

    /// Upstream repository without scheme (e.g., "github.com/upper/db")
    pub fn repo_root(&self) -> String {
        format!("{}/{}", self.root.repo_host_path, self.name)
    }

    /// Vanity package root without scheme or version (e.g., "upper.io/db")
    pub fn vanity_root(&self) -> String {
        format!("{}/{}", self.root.vanity_host_path, self.name)
    }

    /// Import path as the client wrote it (e.g., "upper.io/db.v3")
    pub fn vanity_path(&self) -> String {
        match &self.requested {
            Some(version) => format!("{}.{}", self.vanity_root(), version),
            None => self.vanity_root(),
        }
    }

    pub fn vanity_url(&self) -> String {
        format!("{}://{}", self.root.vanity_url.scheme(), self.vanity_path())
    }

    pub fn repo_root_url(&self) -> String {
        format!("{}://{}", self.root.repo_url.scheme(), self.repo_root())
    }

    /// Tree name for source links: the resolved version or the default branch
    pub fn git_tree(&self) -> String {
        if self.full_version.is_valid() {
            self.full_version.to_string()
        } else {
            DEFAULT_BRANCH.to_string()
        }
    }

    /// Upload-pack endpoint clients are redirected to
    pub fn upload_pack_url(&self) -> String {
        format!("https://{}/git-upload-pack", self.repo_root())
    }
}
