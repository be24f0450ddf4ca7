use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use nom::{
    number::complete::{be_u16, u8 as precision},
    sequence::tuple,
};

use crate::{
    error::{malformed_container, Error},
    exif::EXIF_IDENT,
    jpeg::{parse_segments, MarkerCode, Segment, MARKER_PREFIX},
};

/// SOI followed by the prefix of the first marker.
const JPEG_SIGNATURE: [u8; 3] = [MARKER_PREFIX, MarkerCode::Soi.code(), MARKER_PREFIX];
const SOI: [u8; 2] = [MARKER_PREFIX, MarkerCode::Soi.code()];
const EOI: [u8; 2] = [MARKER_PREFIX, MarkerCode::Eoi.code()];
const JFIF_IDENT: &[u8] = b"JFIF\0";

/// The segment structure of a JPEG/JFIF file. Pixel data is never decoded.
///
/// A container is built from raw bytes, a file, a reader, a list of
/// segments or another container, and can losslessly rebuild the byte
/// stream it was scanned from.
///
/// ```rust
/// use nom_jfif::*;
///
/// fn main() -> Result<()> {
///     let jfif = JfifContainer::from_segments(vec![
///         Segment::new(0xFE, &b"made by hand"[..])?,
///         Segment::new(0xC0, &[0x08u8, 0x00, 0x10, 0x00, 0x20][..])?,
///     ]);
///     assert_eq!(jfif.dimensions()?, (32, 16));
///
///     let bytes = jfif.bytes();
///     assert_eq!(bytes.len(), jfif.byte_size());
///     assert_eq!(JfifContainer::from_bytes(&bytes)?, jfif);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JfifContainer {
    segments: Vec<Segment>,
}

impl JfifContainer {
    /// Scans the bytes of a JPEG image, which must start with `ff d8 ff`.
    pub fn from_bytes(input: &[u8]) -> crate::Result<JfifContainer> {
        if !input.starts_with(&JPEG_SIGNATURE) {
            return Err(Error::NotAJpegFile);
        }
        let segments = parse_segments(input)?;
        tracing::debug!(segments = segments.len(), len = input.len(), "Got JPEG");
        Ok(JfifContainer { segments })
    }

    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<JfifContainer> {
        let path = path.as_ref();
        tracing::debug!(?path, "loading JPEG");
        let buf = std::fs::read(path)?;
        JfifContainer::from_bytes(&buf)
    }

    /// Reads `reader` to its end, then scans the bytes.
    pub fn from_reader<R: Read>(mut reader: R) -> crate::Result<JfifContainer> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        JfifContainer::from_bytes(&buf)
    }

    /// Adopts an already separated list of segments as is.
    pub fn from_segments(segments: Vec<Segment>) -> JfifContainer {
        JfifContainer { segments }
    }

    /// Copies the segment list of another container.
    pub fn from_container(other: &JfifContainer) -> JfifContainer {
        other.clone()
    }

    /// A copy of the ordered segment list; SOI and EOI are omitted.
    pub fn segments(&self) -> Vec<Segment> {
        self.segments.clone()
    }

    /// Iterates over the segments without copying them.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Replaces the whole segment list.
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Rebuilds the JPEG byte stream: SOI, every segment framed with its
    /// marker (and length field, except for SOS), EOI.
    ///
    /// A container without segments rebuilds to nothing.
    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_size());
        if self.segments.is_empty() {
            return buf;
        }

        buf.extend_from_slice(&SOI);
        for segment in &self.segments {
            segment.put(&mut buf);
        }
        buf.extend_from_slice(&EOI);
        buf
    }

    /// Size of the stream [`Self::bytes`] and [`Self::write_to`] produce.
    pub fn byte_size(&self) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        SOI.len() + EOI.len() + self.segments.iter().map(Segment::encoded_len).sum::<usize>()
    }

    /// MD5 hex digest over marker and payload of every segment except
    /// comments and application segments.
    ///
    /// Two images that only differ in their metadata have the same
    /// fingerprint.
    pub fn content_fingerprint(&self) -> String {
        let mut ctx = md5::Context::new();
        for segment in self.segments.iter().filter(|s| !is_metadata(s.marker())) {
            ctx.consume([segment.marker()]);
            ctx.consume(segment.payload());
        }
        format!("{:x}", ctx.compute())
    }

    /// `(width, height)` read from the first SOF0..SOF3 segment.
    pub fn dimensions(&self) -> crate::Result<(u16, u16)> {
        let sof = self
            .segments
            .iter()
            .find(|s| MarkerCode::is_sof(s.marker()))
            .ok_or(Error::DimensionsUnavailable)?;

        let (_, (_, height, width)) = tuple((precision, be_u16, be_u16))(sof.payload())
            .map_err(|e| malformed_container(e, "SOF segment is too short"))?;
        Ok((width, height))
    }

    /// Streams [`Self::bytes`] into `writer`. The writer is borrowed, it is
    /// neither flushed nor closed.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> crate::Result<()> {
        if self.segments.is_empty() {
            return Ok(());
        }

        writer.write_all(&SOI)?;
        for segment in &self.segments {
            let (header, n) = segment.header();
            writer.write_all(&header[..n])?;
            writer.write_all(segment.payload())?;
        }
        writer.write_all(&EOI)?;
        Ok(())
    }

    /// Creates (or truncates) the file at `path` and writes the image to it.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// A copy of this image without comments and application segments,
    /// except for the APP0 JFIF header.
    pub fn strip_metadata(&self) -> JfifContainer {
        let segments = self
            .segments
            .iter()
            .filter(|s| {
                let jfif_header = s.marker() == MarkerCode::App0.code()
                    && s.payload().starts_with(JFIF_IDENT);
                jfif_header || !is_metadata(s.marker())
            })
            .cloned()
            .collect();
        JfifContainer { segments }
    }

    /// Exif TIFF data of the first APP1 segment that carries the `Exif\0\0`
    /// identifier, without that identifier.
    pub fn exif_data(&self) -> Option<&[u8]> {
        self.segments
            .iter()
            .filter(|s| s.marker() == MarkerCode::App1.code())
            .find_map(|s| {
                s.payload()
                    .strip_prefix(EXIF_IDENT)
                    .filter(|data| !data.is_empty())
            })
    }
}

impl From<Vec<Segment>> for JfifContainer {
    fn from(segments: Vec<Segment>) -> Self {
        JfifContainer::from_segments(segments)
    }
}

impl TryFrom<&[u8]> for JfifContainer {
    type Error = Error;
    fn try_from(input: &[u8]) -> Result<Self, Self::Error> {
        JfifContainer::from_bytes(input)
    }
}

impl<'a> IntoIterator for &'a JfifContainer {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Comment and APPn segments.
fn is_metadata(marker: u8) -> bool {
    marker == MarkerCode::Com.code() || MarkerCode::is_app(marker)
}
