use std::fmt::{Debug, Display};

#[cfg(feature = "json_dump")]
use serde::Serialize;

use crate::values::{TagType, TagValue};

use super::tags::tag_name;

/// An Image File Directory entry.
///
/// The name is looked up once, when the entry is created.
#[cfg_attr(feature = "json_dump", derive(Serialize))]
#[derive(Clone, PartialEq, Eq)]
pub struct TagEntry {
    id: u16,
    tag_type: TagType,
    value: TagValue,
    name: Option<&'static str>,
}

impl TagEntry {
    /// Creates an entry with an explicit type.
    ///
    /// The pair isn't checked here; [`Exif::insert`](crate::Exif::insert)
    /// refuses entries whose value doesn't fit their type.
    pub fn new(id: u16, tag_type: TagType, value: impl Into<TagValue>) -> TagEntry {
        TagEntry {
            id,
            tag_type,
            value: value.into(),
            name: tag_name(id),
        }
    }

    /// Creates an entry whose type is derived from the value variant.
    pub fn with_value(id: u16, value: impl Into<TagValue>) -> TagEntry {
        let value = value.into();
        TagEntry::new(id, TagType::of(&value), value)
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    pub fn into_value(self) -> TagValue {
        self.value
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The tag name if it's known, the decimal id otherwise.
    pub fn display_name(&self) -> String {
        match self.name {
            Some(name) => name.to_owned(),
            None => self.id.to_string(),
        }
    }

    pub(crate) fn check_type(&self) -> crate::Result<()> {
        if self.tag_type.accepts(&self.value) {
            Ok(())
        } else {
            Err(crate::Error::TypeMismatch {
                expected: self.tag_type,
                found: TagType::of(&self.value),
            })
        }
    }
}

impl Debug for TagEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagEntry")
            .field("id", &format!("0x{:04x}", self.id))
            .field("name", &self.name)
            .field("tag_type", &self.tag_type)
            .field("value", &self.value)
            .finish()
    }
}

impl Display for TagEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.display_name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_resolved_at_creation() {
        let e = TagEntry::new(271, TagType::Ascii, "ACME");
        assert_eq!(e.name(), Some("Make"));
        assert_eq!(e.display_name(), "Make");
        assert_eq!(e.to_string(), "Make: ACME");

        let e = TagEntry::new(0x9999, TagType::Short, 3u32);
        assert_eq!(e.name(), None);
        assert_eq!(e.display_name(), "39321");
    }

    #[test]
    fn check_type() {
        TagEntry::new(274, TagType::Short, 1u32).check_type().unwrap();
        TagEntry::with_value(282, (72u32, 1u32)).check_type().unwrap();

        let err = TagEntry::new(271, TagType::Ascii, 5u32)
            .check_type()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::TypeMismatch {
                expected: TagType::Ascii,
                found: TagType::Long
            }
        ));
    }

    #[cfg(feature = "json_dump")]
    #[test]
    fn json_dump() {
        let e = TagEntry::new(274, TagType::Short, 6u32);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["id"], 274);
        assert_eq!(json["name"], "Orientation");
        assert_eq!(json["tag_type"], "Short");
        assert_eq!(json["value"]["Integer"], 6);
    }
}
