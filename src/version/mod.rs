//! Version model for vanity import paths
//!
//! Versions are parsed from two places: the `.vN` suffix of an inbound import
//! path, where they act as constraints, and the names of `refs/heads/v*` and
//! `refs/tags/v*` references in an upstream advertisement, where they identify
//! candidates.
//!
//! # Modules
//!
//! - [`types`]: The [`Version`] value type with ordering and containment
//! - [`error`]: Parse error type

pub mod error;
pub mod types;

pub use error::VersionParseError;
pub use types::Version;
