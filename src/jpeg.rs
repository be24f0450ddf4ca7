use bytes::{BufMut, Bytes};
use nom::{
    bytes::complete::{tag, take, take_till},
    number::complete::{be_u16, u8 as marker_code},
    sequence::tuple,
};

#[cfg(feature = "json_dump")]
use serde::Serialize;

use crate::error::{malformed_container, Error};

/// Every marker is introduced by this byte.
pub(crate) const MARKER_PREFIX: u8 = 0xFF;

/// Largest payload a length-prefixed segment can carry: the 16-bit length
/// field also counts its own two bytes.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize - 2;

/// A marker code is a byte following 0xFF that indicates the kind of marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerCode {
    /// Temporary private use, standalone
    Tem = 0x01,

    // Start of Frame, non-differential, Huffman coding
    Sof0 = 0xC0,
    Sof1 = 0xC1,
    Sof2 = 0xC2,
    Sof3 = 0xC3,

    // Restart markers, standalone
    Rst0 = 0xD0,
    Rst7 = 0xD7,

    /// Start of Image
    Soi = 0xD8,

    /// End of Image
    Eoi = 0xD9,

    /// Start of Scan
    Sos = 0xDA,

    // Application specific segments
    App0 = 0xE0,
    App1 = 0xE1,
    App15 = 0xEF,

    /// Comment
    Com = 0xFE,
}

impl MarkerCode {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Markers that are never followed by a payload: TEM, RST0..RST7, SOI and
    /// EOI.
    pub fn is_standalone(code: u8) -> bool {
        code == Self::Tem.code() || (Self::Rst0.code()..=Self::Eoi.code()).contains(&code)
    }

    pub fn is_sof(code: u8) -> bool {
        (Self::Sof0.code()..=Self::Sof3.code()).contains(&code)
    }

    pub fn is_app(code: u8) -> bool {
        (Self::App0.code()..=Self::App15.code()).contains(&code)
    }

    fn is_restart(code: u8) -> bool {
        (Self::Rst0.code()..=Self::Rst7.code()).contains(&code)
    }
}

/// One marker-delimited chunk of a JPEG stream.
///
/// The payload never includes the two length bytes that follow the marker in
/// the file. For SOS segments it holds everything between the marker and the
/// next real marker, i.e. the scan header plus the entropy-coded data.
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    marker: u8,
    payload: Bytes,
}

impl Segment {
    /// Creates a segment, failing if `payload` is too large to be framed
    /// with a 16-bit length field (SOS payloads aren't length-prefixed, so
    /// they have no limit).
    pub fn new(marker: u8, payload: impl Into<Bytes>) -> crate::Result<Segment> {
        let payload = payload.into();
        if marker != MarkerCode::Sos.code() && payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::MalformedContainer(format!(
                "payload of segment 0x{marker:02x} is {} bytes, at most {MAX_PAYLOAD_LEN} fit",
                payload.len()
            )));
        }
        Ok(Segment { marker, payload })
    }

    pub fn marker(&self) -> u8 {
        self.marker
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_sos(&self) -> bool {
        self.marker == MarkerCode::Sos.code()
    }

    /// Size of this segment once framed back into a JPEG stream.
    pub(crate) fn encoded_len(&self) -> usize {
        if self.is_sos() {
            2 + self.payload.len()
        } else {
            4 + self.payload.len()
        }
    }

    /// Marker prefix, marker code and (except for SOS) the big-endian length
    /// field. Returns the header buffer and how many bytes of it are used.
    pub(crate) fn header(&self) -> ([u8; 4], usize) {
        if self.is_sos() {
            ([MARKER_PREFIX, self.marker, 0, 0], 2)
        } else {
            // `Segment::new` guarantees the length fits
            let [hi, lo] = ((self.payload.len() + 2) as u16).to_be_bytes();
            ([MARKER_PREFIX, self.marker, hi, lo], 4)
        }
    }

    pub(crate) fn put<B: BufMut>(&self, buf: &mut B) {
        let (header, n) = self.header();
        buf.put_slice(&header[..n]);
        buf.put_slice(&self.payload);
    }
}

/// Breaks a JPEG byte stream into its ordered list of segments.
///
/// SOI/EOI, restart and other standalone markers carry no payload and are
/// not returned. Bytes outside of any segment are skipped.
#[tracing::instrument(skip_all)]
pub fn parse_segments(input: &[u8]) -> crate::Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut remain = input;

    loop {
        let (rem, skipped) = take_till(|b| b == MARKER_PREFIX)(remain)
            .map_err(|e| malformed_container(e, "marker prefix"))?;
        if !skipped.is_empty() {
            tracing::warn!(
                skipped = skipped.len(),
                offset = input.len() - remain.len(),
                "skipped bytes outside of any segment"
            );
        }
        if rem.is_empty() {
            break;
        }

        let (rem, (_, code)) = tuple((tag([MARKER_PREFIX]), marker_code))(rem)
            .map_err(|e| malformed_container(e, "marker code"))?;

        if MarkerCode::is_standalone(code) {
            remain = rem;
            continue;
        }

        let (rem, payload) = if code == MarkerCode::Sos.code() {
            let end = find_scan_end(rem).ok_or_else(|| {
                Error::MalformedContainer(format!(
                    "scan data starting at offset {} isn't terminated by a marker",
                    input.len() - rem.len()
                ))
            })?;
            // Resume right at the terminating marker prefix
            let (payload, rem) = rem.split_at(end);
            (rem, payload)
        } else {
            let (rem, size) = be_u16(rem)
                .map_err(|e| malformed_container(e, &format!("length of segment 0x{code:02x}")))?;
            // size contains the two bytes of `size` itself
            if size < 2 {
                return Err(Error::MalformedContainer(format!(
                    "invalid length {size} of segment 0x{code:02x}"
                )));
            }
            take(size - 2)(rem).map_err(|e| {
                malformed_container(e, &format!("payload of segment 0x{code:02x}"))
            })?
        };

        tracing::debug!(
            marker = format!("0x{code:02x}"),
            len = payload.len(),
            "Got segment."
        );
        segments.push(Segment {
            marker: code,
            payload: Bytes::copy_from_slice(payload),
        });

        // Sanity check
        debug_assert!(rem.len() < remain.len());
        remain = rem;
    }

    Ok(segments)
}

/// Position of the first marker that ends the entropy-coded data of a scan:
/// 0xFF followed by anything except a stuffed zero or a restart code.
fn find_scan_end(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| {
        w[0] == MARKER_PREFIX && w[1] != 0x00 && !MarkerCode::is_restart(w[1])
    })
}
