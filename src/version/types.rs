//! Version tokens as they appear in vanity import paths and Git ref names
//!
//! A token has the shape `v<major>[.<minor>[.<patch>]][-unstable]`. Tokens with
//! fewer fields act as constraints: `v1` covers `v1.2.3`, `v1.2` covers `v1.2.0`,
//! and neither covers `v1.2.3-unstable`.

use std::fmt;
use std::str::FromStr;

use crate::version::error::VersionParseError;

/// Suffix marking a version as unstable
pub const UNSTABLE_SUFFIX: &str = "-unstable";

/// A version identifier with partial specificity.
///
/// Field order matters: the derived ordering compares major, minor, patch and
/// finally the unstable flag, with unset fields sorting lowest. The invalid
/// sentinel has no major and therefore sorts below every valid version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    unstable: bool,
}

impl Version {
    /// Sentinel for "no version" / "not yet computed"
    pub const INVALID: Version = Version {
        major: None,
        minor: None,
        patch: None,
        unstable: false,
    };

    /// Creates a major-only version
    pub const fn new(major: u64) -> Self {
        Self {
            major: Some(major),
            minor: None,
            patch: None,
            unstable: false,
        }
    }

    /// The constraint used when a request carries no version token (`v0`)
    pub const fn wildcard() -> Self {
        Self::new(0)
    }

    /// Creates a fully specified version
    pub const fn full(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            patch: Some(patch),
            unstable: false,
        }
    }

    pub fn with_minor(self, minor: u64) -> Self {
        if self.major.is_none() {
            return self;
        }
        Self {
            minor: Some(minor),
            ..self
        }
    }

    /// Sets the patch field. Has no effect unless minor is set.
    pub fn with_patch(self, patch: u64) -> Self {
        if self.minor.is_none() {
            return self;
        }
        Self {
            patch: Some(patch),
            ..self
        }
    }

    pub fn with_unstable(self, unstable: bool) -> Self {
        if self.major.is_none() {
            return self;
        }
        Self { unstable, ..self }
    }

    pub fn major(&self) -> Option<u64> {
        self.major
    }

    pub fn minor(&self) -> Option<u64> {
        self.minor
    }

    pub fn patch(&self) -> Option<u64> {
        self.patch
    }

    pub fn is_unstable(&self) -> bool {
        self.unstable
    }

    /// False only for [`Version::INVALID`]
    pub fn is_valid(&self) -> bool {
        self.major.is_some()
    }

    /// True for the unconstrained `v0` request
    pub fn is_wildcard(&self) -> bool {
        *self == Self::wildcard()
    }

    /// Parses a version token, returning `None` for any syntactic deviation.
    pub fn parse(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    /// Orders by major, minor and patch only. Unset fields sort lowest.
    pub fn less(&self, other: &Version) -> bool {
        (self.major, self.minor, self.patch) < (other.major, other.minor, other.patch)
    }

    /// Reports whether `self`, used as a constraint, covers `other`.
    ///
    /// Every field set in `self` must equal the same field in `other`, and both
    /// must agree on stability. The invalid sentinel contains nothing.
    pub fn contains(&self, other: &Version) -> bool {
        if !self.is_valid() || !other.is_valid() || self.unstable != other.unstable {
            return false;
        }
        field_matches(self.major, other.major)
            && field_matches(self.minor, other.minor)
            && field_matches(self.patch, other.patch)
    }
}

fn field_matches(constraint: Option<u64>, value: Option<u64>) -> bool {
    match constraint {
        Some(expected) => value == Some(expected),
        None => true,
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(major) = self.major else {
            return f.write_str("invalid");
        };
        write!(f, "v{}", major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
            if let Some(patch) = self.patch {
                write!(f, ".{}", patch)?;
            }
        }
        if self.unstable {
            f.write_str(UNSTABLE_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let Some(rest) = token.strip_prefix('v') else {
            return Err(VersionParseError::MissingPrefix(token.to_string()));
        };

        let (numbers, unstable) = match rest.strip_suffix(UNSTABLE_SUFFIX) {
            Some(numbers) => (numbers, true),
            None => (rest, false),
        };

        let mut fields = [None; 3];
        for (index, segment) in numbers.split('.').enumerate() {
            if index >= fields.len() {
                return Err(VersionParseError::TooManySegments(token.to_string()));
            }
            fields[index] = Some(parse_number(token, segment)?);
        }

        let [major, minor, patch] = fields;
        Ok(Self {
            major,
            minor,
            patch,
            unstable,
        })
    }
}

/// Parses one numeric field: ASCII digits, no leading zero except `0` itself.
fn parse_number(token: &str, segment: &str) -> Result<u64, VersionParseError> {
    let invalid = || VersionParseError::InvalidNumber {
        token: token.to_string(),
        segment: segment.to_string(),
    };

    if segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_digit())
        || (segment.len() > 1 && segment.starts_with('0'))
    {
        return Err(invalid());
    }
    segment.parse().map_err(|_| invalid())
}
