//! Synthetic JPEG and TIFF fixtures.

use std::path::PathBuf;

pub const JFIF_APP0: &[u8] = b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00";
pub const DQT_PAYLOAD: &[u8] = &[0x00, 0x10, 0x0b, 0x0c, 0x0e];
/// precision 1, height 100, width 200
pub const SOF0_PAYLOAD: &[u8] = &[0x01, 0x00, 0x64, 0x00, 0xC8];
pub const SOS_HEADER: &[u8] = &[0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3f, 0x00];
/// Entropy-coded data with a stuffed 0xFF and a restart marker.
pub const SCAN_DATA: &[u8] = &[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56, 0x78];

pub fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0xFF, marker];
    buf.extend(((payload.len() + 2) as u16).to_be_bytes());
    buf.extend(payload);
    buf
}

fn scan() -> Vec<u8> {
    let mut buf = vec![0xFF, 0xDA];
    buf.extend(SOS_HEADER);
    buf.extend(SCAN_DATA);
    buf
}

/// SOI, APP0, COM "hello", DQT, SOF0, SOS + scan data, EOI.
pub fn sample_jpeg() -> Vec<u8> {
    let mut buf = vec![0xFF, 0xD8];
    buf.extend(segment(0xE0, JFIF_APP0));
    buf.extend(segment(0xFE, b"hello"));
    buf.extend(segment(0xDB, DQT_PAYLOAD));
    buf.extend(segment(0xC0, SOF0_PAYLOAD));
    buf.extend(scan());
    buf.extend([0xFF, 0xD9]);
    buf
}

/// SOI, APP0, APP1 (Exif), APP2, SOF0, SOS + scan data, EOI.
pub fn sample_jpeg_with_exif() -> Vec<u8> {
    let mut exif = b"Exif\0\0".to_vec();
    exif.extend(sample_tiff());

    let mut buf = vec![0xFF, 0xD8];
    buf.extend(segment(0xE0, JFIF_APP0));
    buf.extend(segment(0xE1, &exif));
    buf.extend(segment(0xE2, b"ICC_PROFILE\0"));
    buf.extend(segment(0xC0, SOF0_PAYLOAD));
    buf.extend(scan());
    buf.extend([0xFF, 0xD9]);
    buf
}

pub fn tiff_header(ifd0_offset: u32) -> Vec<u8> {
    let mut buf = b"II".to_vec();
    buf.extend(42u16.to_le_bytes());
    buf.extend(ifd0_offset.to_le_bytes());
    buf
}

pub fn entry(tag: u16, tag_type: u16, count: u32, value_or_offset: u32) -> [u8; 12] {
    let mut buf = [0u8; 12];
    buf[..2].copy_from_slice(&tag.to_le_bytes());
    buf[2..4].copy_from_slice(&tag_type.to_le_bytes());
    buf[4..8].copy_from_slice(&count.to_le_bytes());
    buf[8..].copy_from_slice(&value_or_offset.to_le_bytes());
    buf
}

pub fn ifd(entries: &[[u8; 12]], next_ifd: u32) -> Vec<u8> {
    let mut buf = (entries.len() as u16).to_le_bytes().to_vec();
    for e in entries {
        buf.extend(e);
    }
    buf.extend(next_ifd.to_le_bytes());
    buf
}

pub fn rational(numerator: u32, denominator: u32) -> Vec<u8> {
    let mut buf = numerator.to_le_bytes().to_vec();
    buf.extend(denominator.to_le_bytes());
    buf
}

/// Two chained directories.
///
/// ifd0: Make "ACME", Orientation 1, XResolution 72/1, YResolution 1/2
/// ifd1: Model "X1" (inline), JPEGInterchangeFormat 1234, unknown 0x9999 = 7
pub fn sample_tiff() -> Vec<u8> {
    const IFD0: u32 = 8;
    const MAKE: u32 = IFD0 + 2 + 4 * 12 + 4;
    const X_RES: u32 = MAKE + 5;
    const Y_RES: u32 = X_RES + 8;
    const IFD1: u32 = Y_RES + 8;

    let mut buf = tiff_header(IFD0);
    buf.extend(ifd(
        &[
            entry(271, 2, 5, MAKE),
            entry(274, 3, 1, 1),
            entry(282, 5, 1, X_RES),
            entry(283, 5, 1, Y_RES),
        ],
        IFD1,
    ));
    assert_eq!(buf.len(), MAKE as usize);
    buf.extend(b"ACME\0");
    buf.extend(rational(72, 1));
    buf.extend(rational(1, 2));
    assert_eq!(buf.len(), IFD1 as usize);
    buf.extend(ifd(
        &[
            entry(272, 2, 3, u32::from_le_bytes(*b"X1\0\0")),
            entry(513, 4, 1, 1234),
            entry(0x9999, 3, 1, 7),
        ],
        0,
    ));
    buf
}

/// A unique path in the system temp dir.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nom-jfif-{}-{name}", std::process::id()))
}
