//! nom-jfif is a JPEG/JFIF container library written in pure Rust with
//! [nom](https://github.com/rust-bakery/nom). It splits a JPEG file into its
//! marker segments, rebuilds it losslessly, and decodes the Exif tags stored
//! in its APP1 segment.
//!
//! Pixel data is never decoded.
//!
//! ## Key Features
//!
//! - Lossless round trip: parsing a file and writing its segments back gives
//!   the same bytes, except for standalone markers and bytes outside of any
//!   segment, which are dropped.
//!
//! - Content fingerprint: an MD5 digest over the segments that make up the
//!   picture itself. Two images which only differ in their metadata (Exif,
//!   ICC profile, comments...) have the same fingerprint.
//!
//! - Exif decoding: [`Exif`] is a dictionary of tag entries that can be
//!   addressed by tag id or tag name. Directories are visited along the
//!   whole IFD chain.
//!
//! - Robustness and stability: the parsers are fuzz tested with
//!   [afl.rs](https://github.com/rust-fuzz/afl.rs), see `afl-fuzz/`.
//!
//! ## Usage
//!
//! ```rust
//! use nom_jfif::*;
//!
//! fn main() -> Result<()> {
//!     let jfif = JfifContainer::from_segments(vec![
//!         Segment::new(0xE0, &b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00"[..])?,
//!         Segment::new(0xFE, &b"a comment"[..])?,
//!         Segment::new(0xC0, &[0x08u8, 0x00, 0x40, 0x00, 0x80][..])?,
//!     ]);
//!     assert_eq!(jfif.dimensions()?, (128, 64));
//!
//!     // comments and application segments are metadata
//!     let stripped = jfif.strip_metadata();
//!     assert_eq!(stripped.segments().len(), 2);
//!     assert_eq!(stripped.content_fingerprint(), jfif.content_fingerprint());
//!
//!     // no APP1 Exif segment, no tags
//!     let exif = Exif::decode(jfif.exif_data())?;
//!     assert!(exif.is_empty());
//!
//!     let reparsed = JfifContainer::from_bytes(&jfif.bytes())?;
//!     assert_eq!(reparsed, jfif);
//!     Ok(())
//! }
//! ```
//!
//! ## Exif
//!
//! Only little-endian ("II") TIFF data is supported, and only the BYTE,
//! ASCII, SHORT, LONG and RATIONAL tag types.
//!
//! ```rust
//! use nom_jfif::*;
//!
//! fn main() -> Result<()> {
//!     let mut exif = Exif::new();
//!     exif.insert("Orientation", TagEntry::new(274, TagType::Short, 6u32))?;
//!     exif.insert(
//!         "XResolution",
//!         TagEntry::new(282, TagType::Rational, URational(300, 1)),
//!     )?;
//!     assert!(exif.is_dirty());
//!
//!     assert_eq!(exif.get(274u16).unwrap().value().as_u32(), Some(6));
//!     assert_eq!(exif.get("XResolution").unwrap().value().as_integer(), Some(300));
//!     assert_eq!(tag_name(0x010f), Some("Make"));
//!     assert_eq!(tag_id("Model"), Some(0x0110));
//!
//!     // a value has to fit the declared type
//!     assert!(exif
//!         .insert("Make", TagEntry::new(271, TagType::Ascii, 1u32))
//!         .is_err());
//!     Ok(())
//! }
//! ```

pub use exif::{decode_tiff, tag_id, tag_name, Exif, TagEntry, TagKey};
pub use jfif::JfifContainer;
pub use jpeg::{parse_segments, MarkerCode, Segment, MAX_PAYLOAD_LEN};
pub use values::{TagType, TagValue, URational};

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

mod error;
mod exif;
mod jfif;
mod jpeg;
mod values;

#[cfg(test)]
mod testkit;
