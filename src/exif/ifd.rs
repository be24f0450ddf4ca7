use std::collections::HashSet;

use nom::{
    bytes::complete::take,
    number::complete::{le_u16, le_u32},
    sequence::tuple,
};

use crate::{
    error::{malformed_directory, Error},
    values::{TagType, TagValue, URational},
};

use super::TagEntry;

pub(crate) const IFD_ENTRY_SIZE: usize = 12;

/// Byte order signature of the only supported byte order (little-endian).
pub(crate) const LITTLE_ENDIAN_SIGNATURE: [u8; 2] = *b"II";
const TIFF_MAGIC: u16 = 0x2a;

/// Values up to this size are stored in the entry itself rather than at an
/// offset.
const INLINE_VALUE_SIZE: u32 = 4;

/// TIFF Header
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TiffHeader {
    pub ifd0_offset: u32,
}

impl TiffHeader {
    /// Only little-endian ("II") data is supported; "MM" is rejected as an
    /// invalid signature.
    pub fn parse(input: &[u8]) -> crate::Result<TiffHeader> {
        let signature: [u8; 2] = input
            .get(..2)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| Error::MalformedDirectory("data is too short for a TIFF header".into()))?;
        if signature != LITTLE_ENDIAN_SIGNATURE {
            return Err(Error::InvalidSignature(signature));
        }

        let (remain, magic) =
            le_u16(&input[2..]).map_err(|e| malformed_directory(e, "TIFF magic"))?; // Safe-slice
        if magic != TIFF_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let (_, ifd0_offset) =
            le_u32(remain).map_err(|e| malformed_directory(e, "first IFD offset"))?;

        Ok(TiffHeader { ifd0_offset })
    }
}

/// Decodes every entry of a raw (little-endian) Exif/TIFF block.
///
/// Directories are visited along the chain of "next IFD" pointers, starting
/// from the offset in the header, until a zero offset is reached. Entries
/// are returned in the order they are stored.
///
/// ASCII values of at most 4 bytes (NUL included) are read from the entry's
/// own value field rather than from an offset, as TIFF stores them there.
/// Text that isn't valid UTF-8 is decoded lossily.
///
/// # Structure of IFD Entry
///
/// ```txt
/// | 2   | 2    | 4     | 4                      |
/// | tag | type | count | data (value or offset) |
/// ```
#[tracing::instrument(skip_all)]
pub fn decode_tiff(data: &[u8]) -> crate::Result<Vec<TagEntry>> {
    let header = TiffHeader::parse(data)?;
    tracing::debug!(?header, len = data.len(), "Got TIFF header");

    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut offset = header.ifd0_offset;

    for ifd_idx in 0.. {
        if offset == 0 {
            break;
        }
        if !visited.insert(offset) {
            tracing::error!(ifd = ifd_idx, offset, "IFD chain loops back");
            return Err(Error::MalformedDirectory(format!(
                "IFD chain loops back to offset 0x{offset:08x}"
            )));
        }

        let ifd_data = data.get(offset as usize..).ok_or_else(|| {
            Error::MalformedDirectory(format!(
                "ifd{ifd_idx} offset 0x{offset:08x} is out of range"
            ))
        })?;
        let (remain, entry_num) =
            le_u16(ifd_data).map_err(|e| malformed_directory(e, "IFD entry count"))?;
        tracing::debug!(
            ifd = ifd_idx,
            offset = format!("0x{offset:08x}"),
            entry_num,
            "new ifd"
        );

        let (remain, raw_entries) = take(entry_num as usize * IFD_ENTRY_SIZE)(remain)
            .map_err(|e| malformed_directory(e, &format!("ifd{ifd_idx} entries")))?;
        for raw in raw_entries.chunks_exact(IFD_ENTRY_SIZE) {
            entries.push(decode_entry(data, raw)?);
        }

        let (_, next) =
            le_u32(remain).map_err(|e| malformed_directory(e, "next IFD offset"))?;
        offset = next;
    }

    Ok(entries)
}

fn decode_entry(data: &[u8], raw: &[u8]) -> crate::Result<TagEntry> {
    let (_, (tag, type_code, count, value_or_offset)) =
        tuple((le_u16, le_u16, le_u32, le_u32))(raw)
            .map_err(|e| malformed_directory(e, "IFD entry"))?;
    let tag_type = TagType::try_from(type_code)?;

    let value = match tag_type {
        TagType::Byte | TagType::Short | TagType::Long => TagValue::Integer(value_or_offset),
        TagType::Ascii => {
            // the count includes the trailing NUL
            let len = count.saturating_sub(1);
            let bytes = if count <= INLINE_VALUE_SIZE {
                &raw[8..8 + len as usize] // Safe-slice
            } else {
                slice_at(data, value_or_offset, len)?
            };
            TagValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
        TagType::Rational => {
            let bytes = slice_at(data, value_or_offset, 8)?;
            let (_, (numerator, denominator)) = tuple((le_u32, le_u32))(bytes)
                .map_err(|e| malformed_directory(e, "rational value"))?;
            if denominator == 0 {
                tracing::warn!(tag, numerator, "rational value with zero denominator");
            }
            TagValue::Rational(URational(numerator, denominator))
        }
    };

    Ok(TagEntry::new(tag, tag_type, value))
}

fn slice_at(data: &[u8], offset: u32, len: u32) -> crate::Result<&[u8]> {
    let start = offset as usize;
    start
        .checked_add(len as usize)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| {
            Error::MalformedDirectory(format!(
                "value at 0x{offset:08x} with {len} bytes exceeds the {} bytes of data",
                data.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;
    use test_case::test_case;

    #[test]
    fn header() {
        let buf = [0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            TiffHeader::parse(&buf).unwrap(),
            TiffHeader { ifd0_offset: 8 }
        );
    }

    #[test_case(b"MM\x00\x2a\x00\x00\x00\x08", "sig"; "big endian")]
    #[test_case(b"XY\x2a\x00\x08\x00\x00\x00", "sig"; "garbage signature")]
    #[test_case(b"II\x2b\x00\x08\x00\x00\x00", "magic"; "wrong magic")]
    #[test_case(b"I", "short"; "too short")]
    #[test_case(b"II\x2a\x00\x08", "short"; "truncated offset")]
    fn bad_header(buf: &[u8], kind: &str) {
        let err = TiffHeader::parse(buf).unwrap_err();
        match kind {
            "sig" => assert!(matches!(err, Error::InvalidSignature(_)), "{err:?}"),
            "magic" => assert!(matches!(err, Error::InvalidMagic(0x2b)), "{err:?}"),
            _ => assert!(matches!(err, Error::MalformedDirectory(_)), "{err:?}"),
        }
    }

    #[test]
    fn single_ascii_entry() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(271, 2, 5, 26)], 0));
        assert_eq!(buf.len(), 26);
        buf.extend(b"ACME\0");

        let entries = decode_tiff(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), 271);
        assert_eq!(entries[0].name(), Some("Make"));
        assert_eq!(entries[0].tag_type(), TagType::Ascii);
        assert_eq!(entries[0].value().as_str(), Some("ACME"));
    }

    #[test]
    fn follows_ifd_chain() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let entries = decode_tiff(&sample_tiff()).unwrap();
        let ids: Vec<u16> = entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, [271, 274, 282, 283, 272, 513, 0x9999]);

        assert_eq!(entries[1].value(), &TagValue::Integer(1));
        assert_eq!(entries[2].value().as_urational(), Some(URational(72, 1)));
        assert_eq!(entries[3].value().as_integer(), Some(0));
        // inline ascii
        assert_eq!(entries[4].value().as_str(), Some("X1"));
        assert_eq!(entries[5].value(), &TagValue::Integer(1234));
        assert_eq!(entries[6].name(), None);
    }

    #[test_case(2, 0, b"", TagValue::Text(String::new()); "empty ascii")]
    #[test_case(2, 6, b"\xff\xfeabc\0", TagValue::Text("\u{fffd}\u{fffd}abc".into()); "invalid utf8")]
    #[test_case(5, 1, b"\x01\0\0\0\0\0\0\0", TagValue::Rational(URational(1, 0)); "zero denominator")]
    fn edge_values(tag_type: u16, count: u32, data: &[u8], expect: TagValue) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let offset = if data.is_empty() { 0 } else { 26 };
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(305, tag_type, count, offset)], 0));
        assert_eq!(buf.len(), 26);
        buf.extend(data);

        let entries = decode_tiff(&buf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value(), &expect);
        if let Some(r) = expect.as_urational() {
            assert_eq!(r.truncated(), None);
            assert_eq!(entries[0].value().as_integer(), None);
        }
    }

    #[test]
    fn rational_with_zero_denominator() {
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(282, 5, 1, 26)], 0));
        buf.extend(rational(1, 0));

        let entries = decode_tiff(&buf).unwrap();
        assert_eq!(entries[0].name(), Some("XResolution"));
        assert_eq!(entries[0].value().as_urational(), Some(URational(1, 0)));
        assert_eq!(entries[0].value().as_integer(), None);
    }

    #[test]
    fn empty_directory() {
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[], 0));
        assert!(decode_tiff(&buf).unwrap().is_empty());

        // no directory at all
        assert!(decode_tiff(&tiff_header(0)).unwrap().is_empty());
    }

    #[test]
    fn unsupported_type() {
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(271, 7, 4, 0)], 0));
        assert!(matches!(
            decode_tiff(&buf).unwrap_err(),
            Error::UnsupportedTagType(7)
        ));
    }

    #[test]
    fn ifd_loop() {
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(274, 3, 1, 1)], 8));
        assert!(matches!(
            decode_tiff(&buf).unwrap_err(),
            Error::MalformedDirectory(_)
        ));
    }

    #[test_case(|b: &mut Vec<u8>| b.truncate(20); "truncated entries")]
    #[test_case(|b: &mut Vec<u8>| b.truncate(24); "missing next offset")]
    #[test_case(|b: &mut Vec<u8>| b[4] = 0xf0; "ifd offset out of range")]
    #[test_case(|b: &mut Vec<u8>| b[18] = 0xf0; "value offset out of range")]
    fn malformed(corrupt: fn(&mut Vec<u8>)) {
        let mut buf = tiff_header(8);
        buf.extend(ifd(&[entry(282, 5, 1, 26)], 0));
        buf.extend(rational(72, 1));
        decode_tiff(&buf).unwrap();

        corrupt(&mut buf);
        assert!(matches!(
            decode_tiff(&buf).unwrap_err(),
            Error::MalformedDirectory(_)
        ));
    }
}
