//! Vanity import path server for Go packages hosted on Git
//!
//! Answers `go get` discovery requests for a vanity domain and serves a
//! rewritten copy of the upstream reference advertisement in which `HEAD`
//! and `master` point at the best reference for the requested version.
//!
//! # Modules
//!
//! - [`version`]: Version tokens with ordering and containment
//! - [`git`]: pkt-line parsing, reference selection and rewriting, upstream fetch
//! - [`repo`]: Mapping from vanity paths to upstream repositories
//! - [`server`]: HTTP routes and handlers
//! - [`config`]: Startup configuration and constants

pub mod config;
pub mod git;
pub mod repo;
pub mod server;
pub mod version;
