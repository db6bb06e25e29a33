//! Reference advertisement records
//!
//! Each reference line of a smart-HTTP advertisement looks like
//! `<40-hex oid> <name>[\0<capabilities>]\n`. The first line usually carries the
//! capability list; peeled annotated tags appear as `<name>^{}` right after the
//! tag itself.

use std::ops::Range;

use gix_hash::ObjectId;

use crate::git::pktline::{self, FrameKind, Frames, PktLineError};

/// Length of a hex-encoded SHA-1 object id
pub const OID_HEX_LEN: usize = 40;

/// Name suffix of a peeled tag record
pub const PEEL_SUFFIX: &str = "^{}";

/// A single reference line, borrowed from the stream it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord<'a> {
    pub oid: &'a str,
    /// Name as advertised, including any peel suffix
    pub name: &'a str,
    /// Everything after the NUL byte, without the trailing newline
    pub capabilities: Option<&'a str>,
    /// Byte span of the whole frame within the stream
    pub span: Range<usize>,
}

impl<'a> RefRecord<'a> {
    /// True when the record holds the commit an annotated tag points to
    pub fn is_peeled(&self) -> bool {
        self.name.ends_with(PEEL_SUFFIX)
    }

    /// Name with the peel suffix removed
    pub fn target_name(&self) -> &'a str {
        self.name.strip_suffix(PEEL_SUFFIX).unwrap_or(self.name)
    }
}

/// Parses every reference line of an advertisement in stream order.
///
/// Control frames, banner lines and lines of any other shape are skipped,
/// including lines whose object id is not hexadecimal.
pub fn parse_refs(data: &[u8]) -> Result<Vec<RefRecord<'_>>, PktLineError> {
    let mut records = Vec::new();
    for frame in Frames::new(data) {
        let frame = frame?;
        if frame.kind != FrameKind::Data || frame.is_comment() {
            continue;
        }
        if let Some(record) = parse_ref_payload(frame.payload, frame.span) {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_ref_payload(payload: &[u8], span: Range<usize>) -> Option<RefRecord<'_>> {
    let line = std::str::from_utf8(payload).ok()?;
    let line = line.strip_suffix('\n').unwrap_or(line);

    if line.find(' ')? != OID_HEX_LEN {
        return None;
    }
    let (oid, rest) = (&line[..OID_HEX_LEN], &line[OID_HEX_LEN + 1..]);
    ObjectId::from_hex(oid.as_bytes()).ok()?;

    let (name, capabilities) = match rest.split_once('\0') {
        Some((name, caps)) => (name, Some(caps)),
        None => (rest, None),
    };

    Some(RefRecord {
        oid,
        name,
        capabilities,
        span,
    })
}

/// Encodes a reference line, capabilities included when given.
pub fn encode_ref_line(
    oid: &str,
    name: &str,
    capabilities: Option<&str>,
) -> Result<Vec<u8>, PktLineError> {
    let mut payload = String::with_capacity(oid.len() + name.len() + 2);
    payload.push_str(oid);
    payload.push(' ');
    payload.push_str(name);
    if let Some(caps) = capabilities {
        payload.push('\0');
        payload.push_str(caps);
    }
    payload.push('\n');
    pktline::encode(payload.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const OID_A: &str = "1111111111111111111111111111111111111111";
    const OID_B: &str = "2222222222222222222222222222222222222222";

    fn stream(lines: &[Vec<u8>]) -> Vec<u8> {
        lines.concat()
    }

    #[test]
    fn encoded_line_parses_back_to_same_fields() {
        let line = encode_ref_line(OID_A, "HEAD", Some("multi_ack symref=HEAD:refs/heads/master"))
            .unwrap();
        let records = parse_refs(&line).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].oid, OID_A);
        assert_eq!(records[0].name, "HEAD");
        assert_eq!(
            records[0].capabilities,
            Some("multi_ack symref=HEAD:refs/heads/master")
        );
        assert_eq!(records[0].span, 0..line.len());
    }

    #[test]
    fn encoded_line_without_capabilities_has_no_nul() {
        let line = encode_ref_line(OID_A, "refs/heads/master", None).unwrap();
        assert_eq!(
            line,
            format!("003f{} refs/heads/master\n", OID_A).into_bytes()
        );
    }

    #[test]
    fn flush_only_stream_has_no_records() {
        assert!(parse_refs(b"0000").unwrap().is_empty());
    }

    #[test]
    fn banner_and_flush_are_skipped_and_spans_point_into_stream() {
        let banner = pktline::encode(b"# service=git-upload-pack\n").unwrap();
        let head = encode_ref_line(OID_A, "HEAD", Some("ofs-delta")).unwrap();
        let tag = encode_ref_line(OID_B, "refs/tags/v1.0.0", None).unwrap();
        let data = stream(&[banner.clone(), b"0000".to_vec(), head.clone(), tag, b"0000".to_vec()]);

        let records = parse_refs(&data).unwrap();

        assert_eq!(records.len(), 2);
        let head_start = banner.len() + 4;
        assert_eq!(records[0].span, head_start..head_start + head.len());
        assert_eq!(&data[records[1].span.clone()][4..8], OID_B[..4].as_bytes());
    }

    #[rstest]
    #[case("abc HEAD\n".to_string())]
    #[case(format!("shallow {}\n", OID_A))]
    #[case(format!("{} HEAD\n", "z".repeat(OID_HEX_LEN)))]
    #[case("g-not-hex-g-not-hex-g-not-hex-g-not-hex! refs/tags/v1.0.0\n".to_string())]
    fn lines_without_oid_at_column_forty_are_skipped(#[case] payload: String) {
        let line = pktline::encode(payload.as_bytes()).unwrap();
        let data = stream(&[line, encode_ref_line(OID_B, "refs/heads/master", None).unwrap()]);

        let records = parse_refs(&data).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].oid, OID_B);
    }

    #[test]
    fn peeled_record_exposes_target_name() {
        let line = encode_ref_line(OID_B, "refs/tags/v1.0.0^{}", None).unwrap();
        let records = parse_refs(&line).unwrap();

        assert!(records[0].is_peeled());
        assert_eq!(records[0].target_name(), "refs/tags/v1.0.0");
    }

    #[test]
    fn malformed_header_propagates() {
        let mut data = encode_ref_line(OID_A, "HEAD", None).unwrap();
        data.extend_from_slice(b"xyz!");
        assert!(matches!(
            parse_refs(&data),
            Err(PktLineError::InvalidLength { .. })
        ));
    }
}
