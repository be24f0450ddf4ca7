use std::fmt::Display;

#[cfg(feature = "json_dump")]
use serde::Serialize;

/// # Supported IFD entry types
///
/// ```txt
/// | Value           |             1 |             2 |              3 |             4 |                 5 |
/// |-----------------+---------------+---------------+----------------+---------------+-------------------|
/// | Format          | unsigned byte | ascii strings | unsigned short | unsigned long | unsigned rational |
/// | Bytes/component |             1 |             1 |              2 |             4 |                 8 |
/// ```
///
/// See: [Exif](https://www.media.mit.edu/pia/Research/deepview/exif.html).
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
}

impl TagType {
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Type that a value of the given variant is stored as by default.
    /// Integers map to `Long`, since they're decoded from a 4-byte field.
    pub fn of(value: &TagValue) -> TagType {
        match value {
            TagValue::Integer(_) => TagType::Long,
            TagValue::Text(_) => TagType::Ascii,
            TagValue::Rational(_) => TagType::Rational,
        }
    }

    /// Whether `value` is a valid representation for this type.
    pub fn accepts(self, value: &TagValue) -> bool {
        matches!(
            (self, value),
            (
                TagType::Byte | TagType::Short | TagType::Long,
                TagValue::Integer(_)
            ) | (TagType::Ascii, TagValue::Text(_))
                | (TagType::Rational, TagValue::Rational(_))
        )
    }
}

impl TryFrom<u16> for TagType {
    type Error = crate::Error;
    fn try_from(v: u16) -> Result<Self, Self::Error> {
        let t = match v {
            1 => TagType::Byte,
            2 => TagType::Ascii,
            3 => TagType::Short,
            4 => TagType::Long,
            5 => TagType::Rational,
            o => return Err(crate::Error::UnsupportedTagType(o)),
        };
        Ok(t)
    }
}

/// Represent a decoded entry value. The variant follows the entry's
/// [`TagType`].
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagValue {
    /// `Byte`, `Short` and `Long` entries: the inline 4-byte field.
    Integer(u32),
    Text(String),
    Rational(URational),
}

impl TagValue {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_urational(&self) -> Option<URational> {
        if let TagValue::Rational(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Integer view of the value. Rationals are reduced with truncating
    /// integer division, e.g. `1/2` gives `0`.
    pub fn as_integer(&self) -> Option<u32> {
        match self {
            TagValue::Integer(v) => Some(*v),
            TagValue::Rational(r) => r.truncated(),
            TagValue::Text(_) => None,
        }
    }
}

impl Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValue::Integer(v) => Display::fmt(v, f),
            TagValue::Text(v) => f.write_str(v),
            TagValue::Rational(v) => Display::fmt(v, f),
        }
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        TagValue::Integer(value)
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<URational> for TagValue {
    fn from(value: URational) -> Self {
        TagValue::Rational(value)
    }
}

impl From<(u32, u32)> for TagValue {
    fn from(value: (u32, u32)) -> Self {
        TagValue::Rational(value.into())
    }
}

/// Unsigned rational, `(numerator, denominator)`.
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct URational(pub u32, pub u32);

impl URational {
    pub fn numerator(&self) -> u32 {
        self.0
    }

    pub fn denominator(&self) -> u32 {
        self.1
    }

    /// `numerator / denominator` with truncating integer division; `None`
    /// if the denominator is zero.
    pub fn truncated(&self) -> Option<u32> {
        self.0.checked_div(self.1)
    }

    pub fn as_float(&self) -> f64 {
        self.0 as f64 / self.1 as f64
    }
}

impl Display for URational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({:.04})", self.0, self.1, self.as_float())
    }
}

impl From<(u32, u32)> for URational {
    fn from(value: (u32, u32)) -> Self {
        Self(value.0, value.1)
    }
}

impl From<URational> for (u32, u32) {
    fn from(value: URational) -> Self {
        (value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, Some(TagType::Byte))]
    #[test_case(2, Some(TagType::Ascii))]
    #[test_case(5, Some(TagType::Rational))]
    #[test_case(0, None)]
    #[test_case(7, None)]
    fn tag_type(code: u16, expect: Option<TagType>) {
        let res: crate::Result<TagType> = code.try_into();
        match expect {
            Some(t) => assert_eq!(res.unwrap(), t),
            None => assert!(matches!(
                res.unwrap_err(),
                crate::Error::UnsupportedTagType(c) if c == code
            )),
        }
    }

    #[test_case((1, 2), Some(0))]
    #[test_case((7, 2), Some(3))]
    #[test_case((72, 1), Some(72))]
    #[test_case((1, 0), None)]
    fn truncated(r: (u32, u32), expect: Option<u32>) {
        let v: TagValue = r.into();
        assert_eq!(v.as_integer(), expect);
    }

    #[test]
    fn accepts() {
        assert!(TagType::Short.accepts(&5u32.into()));
        assert!(TagType::Ascii.accepts(&"x".into()));
        assert!(!TagType::Ascii.accepts(&5u32.into()));
        assert!(!TagType::Long.accepts(&(1u32, 2u32).into()));
        assert_eq!(TagType::of(&"x".into()), TagType::Ascii);
    }

    #[test]
    fn display() {
        assert_eq!(TagValue::from((1u32, 2u32)).to_string(), "1/2 (0.5000)");
        assert_eq!(TagValue::from("ACME").to_string(), "ACME");
        assert_eq!(TagValue::from(42u32).to_string(), "42");
    }
}
