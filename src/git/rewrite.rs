//! Reference selection and advertisement rewriting
//!
//! Selection picks the highest reference whose version is covered by the
//! requested constraint. Rewriting then points `HEAD` and `refs/heads/master` at
//! that reference so a client cloning the default branch gets the pinned commit.

use std::collections::BTreeSet;
use std::ops::Range;

use thiserror::Error;
use tracing::debug;

use crate::git::advertisement::{RefRecord, encode_ref_line, parse_refs};
use crate::git::capabilities::{demote_symrefs, head_capabilities};
use crate::git::pktline::PktLineError;
use crate::version::Version;

pub const HEAD_REF: &str = "HEAD";
pub const MASTER_REF: &str = "refs/heads/master";

const BRANCH_PREFIX: &str = "refs/heads/";
const TAG_PREFIX: &str = "refs/tags/";

/// Which references count as versions, and when an unconstrained request falls
/// back to the upstream default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefPolicy {
    /// Lightweight and annotated tags both count. An unconstrained request
    /// falls back whenever no reference qualifies.
    #[default]
    Superset,
    /// Only annotated (peeled) tags count. An unconstrained request falls back
    /// only when the advertisement has no version reference at all.
    Strict,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("version reference not found")]
    VersionNotFound,

    #[error(transparent)]
    Malformed(#[from] PktLineError),
}

/// A reference whose name parses as a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub oid: &'a str,
    /// Reference name with any peel suffix removed
    pub name: &'a str,
    pub version: Version,
}

/// Result of scanning an advertisement's references
#[derive(Debug, Default)]
pub struct Selection<'a> {
    pub head: Option<RefRecord<'a>>,
    pub master: Option<RefRecord<'a>>,
    pub best: Option<Candidate<'a>>,
    pub versions: BTreeSet<Version>,
}

impl Selection<'_> {
    fn falls_back(&self, policy: RefPolicy) -> bool {
        match policy {
            RefPolicy::Superset => self.best.is_none(),
            RefPolicy::Strict => self.versions.is_empty(),
        }
    }
}

/// Output of a successful rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub data: Vec<u8>,
    /// Every version found among branch and tag names
    pub versions: BTreeSet<Version>,
    /// The version `HEAD` now points at, or `None` when the input was kept as is
    pub selected: Option<Version>,
}

/// Scans parsed references for `HEAD`, `master` and the best version match.
///
/// A candidate replaces the current best unless it is strictly lower, so a
/// peeled tag that follows its lightweight record wins for the same version.
pub fn select<'a>(records: &[RefRecord<'a>], requested: &Version, policy: RefPolicy) -> Selection<'a> {
    let mut selection = Selection::default();

    for record in records {
        match record.name {
            HEAD_REF if selection.head.is_none() => selection.head = Some(record.clone()),
            MASTER_REF if selection.master.is_none() => selection.master = Some(record.clone()),
            _ => {}
        }

        let Some(candidate) = version_candidate(record, policy) else {
            continue;
        };
        selection.versions.insert(candidate.version);

        let qualifies = requested.contains(&candidate.version)
            && selection
                .best
                .as_ref()
                .is_none_or(|best| !candidate.version.less(&best.version));
        if qualifies {
            selection.best = Some(candidate);
        }
    }

    selection
}

fn version_candidate<'a>(record: &RefRecord<'a>, policy: RefPolicy) -> Option<Candidate<'a>> {
    let name = record.target_name();
    let token = if let Some(token) = name.strip_prefix(TAG_PREFIX) {
        if policy == RefPolicy::Strict && !record.is_peeled() {
            return None;
        }
        token
    } else {
        name.strip_prefix(BRANCH_PREFIX)?
    };

    let version = Version::parse(token)?;
    Some(Candidate {
        oid: record.oid,
        name,
        version,
    })
}

/// Rewrites an advertisement so its default branch resolves to the best
/// reference covered by `requested`.
pub fn rewrite(data: &[u8], requested: &Version, policy: RefPolicy) -> Result<Rewrite, RewriteError> {
    let records = parse_refs(data)?;
    let selection = select(&records, requested, policy);

    if requested.is_wildcard() && selection.falls_back(policy) {
        debug!("No version reference for {}, keeping default branch", requested);
        return Ok(Rewrite {
            data: data.to_vec(),
            versions: selection.versions,
            selected: None,
        });
    }

    let (Some(head), Some(best)) = (&selection.head, &selection.best) else {
        return Err(RewriteError::VersionNotFound);
    };
    debug!(
        "Selected {} ({}) at {} for {}",
        best.name, best.version, best.oid, requested
    );

    let preserved = head.capabilities.map(demote_symrefs).unwrap_or_default();
    let head_line = encode_ref_line(
        best.oid,
        HEAD_REF,
        head_capabilities(best.name, &preserved).as_deref(),
    )?;
    let master_line = encode_ref_line(best.oid, MASTER_REF, None)?;

    let master_span = selection.master.as_ref().map(|master| &master.span);
    let mut out = Vec::with_capacity(data.len() + head_line.len() + master_line.len());
    extend_excising(&mut out, data, 0..head.span.start, master_span);
    out.extend_from_slice(&head_line);
    out.extend_from_slice(&master_line);
    extend_excising(&mut out, data, head.span.end..data.len(), master_span);

    Ok(Rewrite {
        data: out,
        selected: Some(best.version),
        versions: selection.versions,
    })
}

/// Copies `range` of `data`, leaving out `excised` when it lies inside it.
fn extend_excising(
    out: &mut Vec<u8>,
    data: &[u8],
    range: Range<usize>,
    excised: Option<&Range<usize>>,
) {
    match excised {
        Some(cut) if range.start <= cut.start && cut.end <= range.end => {
            out.extend_from_slice(&data[range.start..cut.start]);
            out.extend_from_slice(&data[cut.end..range.end]);
        }
        _ => out.extend_from_slice(&data[range]),
    }
}
