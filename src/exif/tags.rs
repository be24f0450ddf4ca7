//! Tag names and key normalization, see
//! https://exiftool.org/TagNames/EXIF.html
//!
//! Names are for humans only; every tag is decoded whether or not it has a
//! name here. Tag 514 keeps the historical spelling
//! `JPEGInterchangeFormatLngth`.

use std::{collections::HashMap, fmt::Display, sync::LazyLock};

#[cfg(feature = "json_dump")]
use serde::Serialize;

const TAG_NAMES: &[(u16, &str)] = &[
    (0x00fe, "NewSubfileType"),
    (0x00ff, "SubfileType"),
    (0x0100, "ImageWidth"),
    (0x0101, "ImageLength"),
    (0x0102, "BitsPerSample"),
    (0x0103, "Compression"),
    (0x0106, "PhotometricInterpretation"),
    (0x0107, "Threshholding"),
    (0x0108, "CellWidth"),
    (0x0109, "CellLength"),
    (0x010a, "FillOrder"),
    (0x010d, "DocumentName"),
    (0x010e, "ImageDescription"),
    (0x010f, "Make"),
    (0x0110, "Model"),
    (0x0111, "StripOffsets"),
    (0x0112, "Orientation"),
    (0x0115, "SamplesPerPixel"),
    (0x0116, "RowsPerStrip"),
    (0x0117, "StripByteCounts"),
    (0x0118, "MinSampleValue"),
    (0x0119, "MaxSampleValue"),
    (0x011a, "XResolution"),
    (0x011b, "YResolution"),
    (0x011c, "PlanarConfiguration"),
    (0x011d, "PageName"),
    (0x011e, "XPosition"),
    (0x011f, "YPosition"),
    (0x0120, "FreeOffsets"),
    (0x0121, "FreeByteCounts"),
    (0x0122, "GrayResponseUnit"),
    (0x0123, "GrayResponseCurve"),
    (0x0124, "T4Options"),
    (0x0125, "T6Options"),
    (0x0128, "ResolutionUnit"),
    (0x0129, "PageNumber"),
    (0x012d, "TransferFunction"),
    (0x0131, "Software"),
    (0x0132, "DateTime"),
    (0x013b, "Artist"),
    (0x013c, "HostComputer"),
    (0x013d, "Predictor"),
    (0x013e, "WhitePoint"),
    (0x013f, "PrimaryChromaticities"),
    (0x0140, "ColorMap"),
    (0x0141, "HalftoneHints"),
    (0x0142, "TileWidth"),
    (0x0143, "TileLength"),
    (0x0144, "TileOffsets"),
    (0x0145, "TileByteCounts"),
    (0x014c, "InkSet"),
    (0x014d, "InkNames"),
    (0x014e, "NumberOfInks"),
    (0x0150, "DotRange"),
    (0x0151, "TargetPrinter"),
    (0x0152, "ExtraSamples"),
    (0x0153, "SampleFormat"),
    (0x0154, "SMinSampleValue"),
    (0x0155, "SMaxSampleValue"),
    (0x0156, "TransferRange"),
    (0x0200, "JPEGProc"),
    (0x0201, "JPEGInterchangeFormat"),
    (0x0202, "JPEGInterchangeFormatLngth"),
    (0x0203, "JPEGRestartInterval"),
    (0x0205, "JPEGLosslessPredictors"),
    (0x0206, "JPEGPointTransforms"),
    (0x0207, "JPEGQTables"),
    (0x0208, "JPEGDCTables"),
    (0x0209, "JPEGACTables"),
    (0x0211, "YCbCrCoefficients"),
    (0x0212, "YCbCrSubSampling"),
    (0x0213, "YCbCrPositioning"),
    (0x0214, "ReferenceBlackWhite"),
    (0x8298, "Copyright"),
    // Exif private tags most commonly found in ifd0
    (0x829a, "ExposureTime"),
    (0x829d, "FNumber"),
    (0x8769, "ExifOffset"),
    (0x8822, "ExposureProgram"),
    (0x8825, "GPSInfo"),
    (0x8827, "ISOSpeedRatings"),
    (0x9000, "ExifVersion"),
    (0x9003, "DateTimeOriginal"),
    (0x9004, "CreateDate"),
    (0x9201, "ShutterSpeedValue"),
    (0x9202, "ApertureValue"),
    (0x9207, "MeteringMode"),
    (0x9209, "Flash"),
    (0x920a, "FocalLength"),
    (0xa001, "ColorSpace"),
    (0xa002, "ExifImageWidth"),
    (0xa003, "ExifImageHeight"),
];

static NAMES_BY_ID: LazyLock<HashMap<u16, &'static str>> =
    LazyLock::new(|| TAG_NAMES.iter().copied().collect());

static IDS_BY_NAME: LazyLock<HashMap<&'static str, u16>> =
    LazyLock::new(|| TAG_NAMES.iter().map(|(id, name)| (*name, *id)).collect());

/// Human readable name of a tag id, if it is a known one.
pub fn tag_name(id: u16) -> Option<&'static str> {
    NAMES_BY_ID.get(&id).copied()
}

/// Tag id for a known tag name.
pub fn tag_id(name: &str) -> Option<u16> {
    IDS_BY_NAME.get(name).copied()
}

/// Key of an [`Exif`](crate::Exif) table.
///
/// A known tag name always normalizes to its numeric id, so `"Make"` and
/// `271` address the same entry. An unrecognized name stays a name and acts
/// as its own key, which allows storing custom tags.
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagKey {
    Id(u16),
    Name(String),
}

impl TagKey {
    /// Translates a name into a key, preferring the numeric id when the name
    /// is known.
    pub fn normalize(name: &str) -> TagKey {
        match tag_id(name) {
            Some(id) => TagKey::Id(id),
            None => TagKey::Name(name.to_owned()),
        }
    }
}

impl From<u16> for TagKey {
    fn from(v: u16) -> Self {
        TagKey::Id(v)
    }
}

impl From<&str> for TagKey {
    fn from(v: &str) -> Self {
        TagKey::normalize(v)
    }
}

impl From<String> for TagKey {
    fn from(v: String) -> Self {
        match tag_id(&v) {
            Some(id) => TagKey::Id(id),
            None => TagKey::Name(v),
        }
    }
}

impl From<&TagKey> for TagKey {
    fn from(v: &TagKey) -> Self {
        v.to_owned()
    }
}

impl Display for TagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagKey::Id(id) => match tag_name(*id) {
                Some(name) => name.fmt(f),
                None => id.fmt(f),
            },
            TagKey::Name(name) => name.fmt(f),
        }
    }
}
