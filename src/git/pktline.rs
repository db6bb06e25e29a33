//! pkt-line framing
//!
//! Every frame starts with four hexadecimal digits giving the total frame length,
//! header included. `0000` is a flush packet; `0001` and `0002` are the protocol v2
//! delimiter and response-end packets. All three occupy exactly four bytes.
//!
//! Decoding and encoding go through `gix-packetline`; this module only tracks
//! where each frame sits in the stream so lines can be spliced later.

use std::ops::Range;

use gix_packetline_blocking::decode::{self, Stream};
use gix_packetline_blocking::PacketLineRef;
use thiserror::Error;

/// Largest payload a frame may carry; mirrors gix-packetline's private limit
const MAX_DATA_LEN: usize = 65516;

/// Length of the hexadecimal length header
pub const HEADER_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PktLineError {
    #[error("Cannot parse refs line at byte {offset}: {reason}")]
    InvalidLength { offset: usize, reason: String },

    #[error("Incomplete refs data: frame at byte {offset} ends at {end}, stream has {len} bytes")]
    Truncated { offset: usize, end: usize, len: usize },

    #[error("Frame too long to encode: {0} bytes")]
    TooLong(usize),

    #[error("Cannot encode refs line: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Flush,
    Delimiter,
    ResponseEnd,
    Data,
}

/// One frame located within a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub kind: FrameKind,
    /// Payload bytes, header excluded. Empty for control frames.
    pub payload: &'a [u8],
    /// Byte span of the whole frame within the stream
    pub span: Range<usize>,
}

impl Frame<'_> {
    /// Banner lines such as `# service=git-upload-pack`
    pub fn is_comment(&self) -> bool {
        self.kind == FrameKind::Data && self.payload.first() == Some(&b'#')
    }
}

/// Forward-only cursor over the frames of a stream.
///
/// Yields an error at most once; iteration stops after the first framing error.
pub struct Frames<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    fn next_frame(&mut self) -> Result<Frame<'a>, PktLineError> {
        let data: &'a [u8] = self.data;
        let start = self.pos;
        let rest = &data[start..];

        match decode::streaming(rest) {
            Ok(Stream::Complete {
                line,
                bytes_consumed,
            }) => {
                let (kind, payload): (FrameKind, &'a [u8]) = match line {
                    PacketLineRef::Data(payload) => (FrameKind::Data, payload),
                    PacketLineRef::Flush => (FrameKind::Flush, &[]),
                    PacketLineRef::Delimiter => (FrameKind::Delimiter, &[]),
                    PacketLineRef::ResponseEnd => (FrameKind::ResponseEnd, &[]),
                };
                let end = start + bytes_consumed;
                self.pos = end;
                Ok(Frame {
                    kind,
                    payload,
                    span: start..end,
                })
            }
            Ok(Stream::Incomplete { bytes_needed }) => Err(PktLineError::Truncated {
                offset: start,
                end: data.len() + bytes_needed,
                len: data.len(),
            }),
            Err(err) => Err(PktLineError::InvalidLength {
                offset: start,
                reason: err.to_string(),
            }),
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<Frame<'a>, PktLineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let frame = self.next_frame();
        if frame.is_err() {
            self.failed = true;
        }
        Some(frame)
    }
}

/// Frames a payload, prefixing it with its lower-case hex length.
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, PktLineError> {
    if payload.len() > MAX_DATA_LEN {
        return Err(PktLineError::TooLong(HEADER_LEN + payload.len()));
    }
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    gix_packetline_blocking::encode::data_to_write(payload, &mut out)
        .map_err(|e| PktLineError::Encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn flush_only_stream_yields_single_control_frame() {
        let frames: Vec<_> = Frames::new(b"0000").collect::<Result<_, _>>().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].kind, FrameKind::Flush);
        assert_eq!(frames[0].span, 0..4);
        assert!(frames[0].payload.is_empty());
    }

    #[test]
    fn frames_report_spans_and_payloads() {
        let data = b"001e# service=git-upload-pack\n00000009hello";
        let frames: Vec<_> = Frames::new(data).collect::<Result<_, _>>().unwrap();

        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_comment());
        assert_eq!(frames[0].span, 0..30);
        assert_eq!(frames[1].kind, FrameKind::Flush);
        assert_eq!(frames[1].span, 30..34);
        assert_eq!(frames[2].payload, b"hello");
        assert_eq!(frames[2].span, 34..43);
    }

    #[test]
    fn protocol_v2_control_frames_take_four_bytes() {
        let kinds: Vec<_> = Frames::new(b"000100020000")
            .map(|frame| frame.unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![FrameKind::Delimiter, FrameKind::ResponseEnd, FrameKind::Flush]
        );
    }

    #[rstest]
    #[case(b"zzzzpayload".as_slice())]
    #[case(b"+00a12345".as_slice())]
    #[case(b"0003".as_slice())]
    #[case(b"0004".as_slice())]
    fn invalid_length_header_is_an_error(#[case] data: &[u8]) {
        let result = Frames::new(data).next().unwrap();
        assert!(matches!(result, Err(PktLineError::InvalidLength { .. })));
    }

    #[rstest]
    #[case(b"000ahi".as_slice())]
    #[case(b"00".as_slice())]
    #[case(b"0000001".as_slice())]
    fn frame_past_end_of_stream_is_truncated(#[case] data: &[u8]) {
        let result = Frames::new(data).find(|frame| frame.is_err()).unwrap();
        assert!(matches!(result, Err(PktLineError::Truncated { .. })));
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut frames = Frames::new(b"zzzz0000");
        assert!(frames.next().unwrap().is_err());
        assert!(frames.next().is_none());
    }

    #[test]
    fn encode_prefixes_total_length_in_lower_case_hex() {
        let payload = vec![b'x'; 26];
        let encoded = encode(&payload).unwrap();
        assert_eq!(&encoded[..4], b"001e");
        assert_eq!(&encoded[4..], payload.as_slice());
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let payload = vec![0u8; MAX_DATA_LEN + 1];
        assert_eq!(
            encode(&payload),
            Err(PktLineError::TooLong(MAX_DATA_LEN + 1 + HEADER_LEN))
        );
    }

    #[test]
    fn truncated_frame_reports_missing_bytes() {
        let result = Frames::new(b"000ahi").next().unwrap();
        assert_eq!(
            result,
            Err(PktLineError::Truncated {
                offset: 0,
                end: 10,
                len: 6
            })
        );
    }

    #[test]
    fn encoded_frame_decodes_to_same_payload() {
        let encoded = encode(b"hello\n").unwrap();
        let frame = Frames::new(&encoded).next().unwrap().unwrap();

        assert_eq!(frame.kind, FrameKind::Data);
        assert_eq!(frame.payload, b"hello\n");
        assert_eq!(frame.span, 0..encoded.len());
    }
}
