use std::collections::{hash_map, HashMap};

pub use entry::TagEntry;
pub use ifd::decode_tiff;
pub use tags::{tag_id, tag_name, TagKey};

mod entry;
mod ifd;
mod tags;

/// Exif identifier code "Exif\0\0" that precedes the TIFF data in an APP1
/// segment.
pub(crate) const EXIF_IDENT: &[u8] = b"Exif\0\0";

/// A dictionary-like table holding all decoded tags of an image.
///
/// Entries can be addressed either by numeric tag id or by tag name, see
/// [`TagKey`]. Any mutation marks the table as dirty.
///
/// ```rust
/// use nom_jfif::*;
///
/// fn main() -> Result<()> {
///     let mut exif = Exif::decode(None)?;
///     assert!(exif.is_empty());
///
///     exif.insert("Make", TagEntry::new(271, TagType::Ascii, "ACME"))?;
///     assert!(exif.is_dirty());
///     assert_eq!(exif.get(271u16).unwrap().value().as_str(), Some("ACME"));
///     assert_eq!(exif.get("Make"), exif.get(271u16));
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exif {
    entries: HashMap<TagKey, TagEntry>,
    dirty: bool,
}

impl Exif {
    /// An empty, clean table.
    pub fn new() -> Exif {
        Exif::default()
    }

    /// Builds a table from a raw Exif/TIFF block (the APP1 payload after the
    /// `Exif\0\0` identifier).
    ///
    /// Missing or empty data is not an error, it gives an empty table. When
    /// several directories carry the same tag, the last one wins.
    pub fn decode(data: Option<&[u8]>) -> crate::Result<Exif> {
        let mut exif = Exif::new();
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            tracing::debug!("no exif data");
            return Ok(exif);
        };

        for entry in decode_tiff(data)? {
            exif.entries.insert(TagKey::Id(entry.id()), entry);
        }
        Ok(exif)
    }

    pub fn contains_key(&self, key: impl Into<TagKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn get(&self, key: impl Into<TagKey>) -> Option<&TagEntry> {
        self.entries.get(&key.into())
    }

    /// Inserts or replaces the entry stored under `key`, returning the
    /// previous one.
    ///
    /// Fails with [`Error::TypeMismatch`](crate::Error::TypeMismatch) if the
    /// entry's value doesn't fit its declared type; the table is left
    /// untouched in that case.
    pub fn insert(
        &mut self,
        key: impl Into<TagKey>,
        entry: TagEntry,
    ) -> crate::Result<Option<TagEntry>> {
        entry.check_type()?;
        let old = self.entries.insert(key.into(), entry);
        self.dirty = true;
        Ok(old)
    }

    pub fn remove(&mut self, key: impl Into<TagKey>) -> crate::Result<TagEntry> {
        let key = key.into();
        match self.entries.remove(&key) {
            Some(entry) => {
                self.dirty = true;
                Ok(entry)
            }
            None => Err(crate::Error::KeyNotFound(key)),
        }
    }

    pub fn keys(&self) -> hash_map::Keys<'_, TagKey, TagEntry> {
        self.entries.keys()
    }

    pub fn values(&self) -> hash_map::Values<'_, TagKey, TagEntry> {
        self.entries.values()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, TagKey, TagEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the table has been modified since it was built.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl<'a> IntoIterator for &'a Exif {
    type Item = (&'a TagKey, &'a TagEntry);
    type IntoIter = hash_map::Iter<'a, TagKey, TagEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
