//! Advertisement builders

use go_vanity::git::advertisement::encode_ref_line;
use go_vanity::git::pktline;

pub const OID_HEAD: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const OID_V120: &str = "1200000000000000000000000000000000000000";
pub const OID_V130_TAG: &str = "1300000000000000000000000000000000000000";
pub const OID_V130_COMMIT: &str = "13000000000000000000000000000000000000c0";

/// Capabilities GitHub sends on the first reference line
pub const UPSTREAM_CAPS: &str = "multi_ack thin-pack side-band side-band-64k ofs-delta shallow symref=HEAD:refs/heads/master agent=git/github-g2b5a1e2";

/// Builds an upload-pack advertisement the way smart-HTTP servers send it:
/// service banner, flush, reference lines, flush.
pub struct AdvertisementBuilder {
    lines: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl AdvertisementBuilder {
    pub fn new() -> Self {
        Self {
            lines: vec![
                pktline::encode(b"# service=git-upload-pack\n").unwrap(),
                b"0000".to_vec(),
            ],
        }
    }

    /// Adds the `HEAD` line carrying the upstream capabilities
    pub fn head(mut self, oid: &str) -> Self {
        self.lines
            .push(encode_ref_line(oid, "HEAD", Some(UPSTREAM_CAPS)).unwrap());
        self
    }

    /// Adds a plain reference line
    pub fn reference(mut self, oid: &str, name: &str) -> Self {
        self.lines.push(encode_ref_line(oid, name, None).unwrap());
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.lines.push(b"0000".to_vec());
        self.lines.concat()
    }
}

/// A repository whose default branch is `master` with tags v1.2.0
/// (lightweight) and v1.3.0 (annotated, peeled)
pub fn v1_repository() -> Vec<u8> {
    AdvertisementBuilder::new()
        .head(OID_HEAD)
        .reference(OID_HEAD, "refs/heads/master")
        .reference(OID_V120, "refs/tags/v1.2.0")
        .reference(OID_V130_TAG, "refs/tags/v1.3.0")
        .reference(OID_V130_COMMIT, "refs/tags/v1.3.0^{}")
        .build()
}

/// A repository without any version reference
pub fn unversioned_repository() -> Vec<u8> {
    AdvertisementBuilder::new()
        .head(OID_HEAD)
        .reference(OID_HEAD, "refs/heads/master")
        .reference(OID_V120, "refs/heads/feature")
        .build()
}
