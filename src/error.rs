use std::io;
use thiserror::Error;

use crate::{exif::TagKey, values::TagType};

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a JPEG file; expected bytes starting with ff d8 ff")]
    NotAJpegFile,

    #[error("malformed JPEG container; {0}")]
    MalformedContainer(String),

    #[error("invalid TIFF byte order signature: {0:02x?}")]
    InvalidSignature([u8; 2]),

    #[error("invalid TIFF magic number: {0}")]
    InvalidMagic(u16),

    #[error("unsupported tag type: {0}")]
    UnsupportedTagType(u16),

    #[error("malformed image file directory; {0}")]
    MalformedDirectory(String),

    #[error("tag not found: {0}")]
    KeyNotFound(TagKey),

    #[error("tag value doesn't match its type; expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: TagType, found: TagType },

    #[error("image dimensions unavailable; no SOF segment")]
    DimensionsUnavailable,

    #[error("io error; {0}")]
    Io(#[from] io::Error),
}

/// Converts a nom error into a human readable message.
pub(crate) fn parse_error_message(e: nom::Err<nom::error::Error<&[u8]>>, message: &str) -> String {
    match e {
        nom::Err::Incomplete(_) => format!("{e}; {message}"),
        nom::Err::Error(e) => format!("{}; {message}", e.code.description()),
        nom::Err::Failure(e) => format!("{}; {message}", e.code.description()),
    }
}

pub(crate) fn malformed_container(
    e: nom::Err<nom::error::Error<&[u8]>>,
    message: &str,
) -> Error {
    Error::MalformedContainer(parse_error_message(e, message))
}

pub(crate) fn malformed_directory(
    e: nom::Err<nom::error::Error<&[u8]>>,
    message: &str,
) -> Error {
    Error::MalformedDirectory(parse_error_message(e, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nom_error_message() {
        let input: &[u8] = &[0x01];
        let e = nom::number::complete::be_u16::<_, nom::error::Error<_>>(input).unwrap_err();
        let err = malformed_container(e, "segment length");
        assert!(matches!(err, Error::MalformedContainer(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("malformed JPEG container; "), "{msg}");
        assert!(msg.ends_with("; segment length"), "{msg}");
    }
}
