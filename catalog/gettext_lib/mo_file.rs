//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! GNU .mo file format reader and writer
//!
//! The .mo (Machine Object) file format is the binary format used by GNU gettext
//! for storing translated message catalogs. Layout, in 32-bit words:
//!
//! - magic, revision, number of strings
//! - offset of the original string table
//! - offset of the translation string table
//! - hash table size and offset
//!
//! Each table holds (length, offset) descriptors. Original strings are
//! `context \x04 singular \0 plural`, translations are the plural forms
//! joined by NUL.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::gettext_lib::catalog::Catalog;
use crate::gettext_lib::entry::{Original, Translation, TranslationEntry};
use crate::gettext_lib::error::{Error, Result};
use crate::gettext_lib::headers::Headers;

/// Magic number of .mo files, in the byte order of the file
pub const MO_MAGIC: u32 = 0x950412de;

/// Separates context from the original in a key
const CONTEXT_SEPARATOR: char = '\u{4}';

/// Separates plural forms in keys and values
const PLURAL_SEPARATOR: char = '\0';

/// Byte order of a .mo file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Detect the byte order from the magic number at the start of `data`
    fn detect(data: &[u8]) -> Result<Endian> {
        if LittleEndian::read_u32(&data[0..4]) == MO_MAGIC {
            Ok(Endian::Little)
        } else if BigEndian::read_u32(&data[0..4]) == MO_MAGIC {
            Ok(Endian::Big)
        } else {
            Err(Error::format(format!(
                "invalid magic number: 0x{:08x}",
                LittleEndian::read_u32(&data[0..4])
            )))
        }
    }

    fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }
}

/// Header of a .mo file
#[derive(Debug, Clone, Default)]
pub struct MoHeader {
    pub magic: u32,
    /// File format revision; the major part is the upper 16 bits
    pub revision: u32,
    /// Number of strings
    pub nstrings: u32,
    /// Offset of table with original strings
    pub orig_tab_offset: u32,
    /// Offset of table with translation strings
    pub trans_tab_offset: u32,
    /// Size of hashing table
    pub hash_tab_size: u32,
    /// Offset of hashing table
    pub hash_tab_offset: u32,
}

impl MoHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 28;

    fn words(&self) -> [u32; 7] {
        [
            self.magic,
            self.revision,
            self.nstrings,
            self.orig_tab_offset,
            self.trans_tab_offset,
            self.hash_tab_size,
            self.hash_tab_offset,
        ]
    }
}

/// A string descriptor (length + offset pair) in the .mo file
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDescriptor {
    /// Length of the string (excluding null terminator)
    pub length: u32,
    /// Offset of the string from the start of the file
    pub offset: u32,
}

impl StringDescriptor {
    /// Size of a string descriptor in bytes
    pub const SIZE: usize = 8;
}

/// Decoder over the bytes of one .mo file
struct MoReader<'a> {
    data: &'a [u8],
    endian: Endian,
}

impl<'a> MoReader<'a> {
    fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < MoHeader::SIZE {
            return Err(Error::format("file is not .mo compatible"));
        }
        let endian = Endian::detect(data)?;
        Ok(MoReader { data, endian })
    }

    fn header(&self) -> Result<MoHeader> {
        let header = MoHeader {
            magic: MO_MAGIC,
            revision: self.read_u32(4)?,
            nstrings: self.read_u32(8)?,
            orig_tab_offset: self.read_u32(12)?,
            trans_tab_offset: self.read_u32(16)?,
            hash_tab_size: self.read_u32(20)?,
            hash_tab_offset: self.read_u32(24)?,
        };

        if header.revision >> 16 > 1 {
            return Err(Error::format(format!(
                "unsupported revision: {}",
                header.revision >> 16
            )));
        }
        Ok(header)
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        let bytes = offset
            .checked_add(4)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| Error::format(format!("offset {} out of bounds", offset)))?;
        Ok(self.endian.read_u32(bytes))
    }

    /// Read the descriptor at `index` of the table at `table`
    fn descriptor(&self, table: u32, index: usize) -> Result<StringDescriptor> {
        let offset = index
            .checked_mul(StringDescriptor::SIZE)
            .and_then(|o| o.checked_add(table as usize))
            .ok_or_else(|| Error::format("string descriptor out of bounds"))?;

        Ok(StringDescriptor {
            length: self.read_u32(offset)?,
            offset: self.read_u32(offset + 4)?,
        })
    }

    fn string(&self, desc: &StringDescriptor) -> Result<&'a str> {
        let start = desc.offset as usize;
        let bytes = start
            .checked_add(desc.length as usize)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| Error::format("string data out of bounds"))?;

        std::str::from_utf8(bytes)
            .map_err(|e| Error::format(format!("invalid UTF-8 at offset {}: {}", start, e)))
    }
}

/// Split a key into context, singular and plural
fn split_key(key: &str) -> (&str, &str, Option<&str>) {
    let (head, plural) = match key.split_once(PLURAL_SEPARATOR) {
        Some((head, plural)) => (head, Some(plural)),
        None => (key, None),
    };
    match head.split_once(CONTEXT_SEPARATOR) {
        Some((context, singular)) => (context, singular, plural),
        None => ("", head, plural),
    }
}

fn join_key(entry: &TranslationEntry) -> String {
    let mut key = String::new();
    if let Some(context) = entry.context() {
        key.push_str(context);
        key.push(CONTEXT_SEPARATOR);
    }
    key.push_str(entry.singular());
    if let Some(plural) = entry.plural() {
        key.push(PLURAL_SEPARATOR);
        key.push_str(plural);
    }
    key
}

/// Join the plural forms by position, untranslated indices left empty
fn join_value(entry: &TranslationEntry) -> String {
    let translations = entry.translations();
    let Some(&last) = translations.keys().next_back() else {
        return String::new();
    };
    let forms: Vec<&str> = (0..=last)
        .map(|index| translations.get(&index).map_or("", String::as_str))
        .collect();
    forms.join("\0")
}

/// Decode .mo bytes into `catalog`
///
/// Entries decoded before a failure stay in the catalog.
pub fn read(catalog: &mut Catalog, data: &[u8], source: Option<&str>) -> Result<()> {
    let reader = MoReader::new(data)?;
    let header = reader.header()?;
    log::trace!(
        "mo: {:?} endian, revision {}, {} strings",
        reader.endian,
        header.revision,
        header.nstrings
    );

    for index in 0..header.nstrings as usize {
        let key = reader.string(&reader.descriptor(header.orig_tab_offset, index)?)?;
        let value = reader.string(&reader.descriptor(header.trans_tab_offset, index)?)?;

        if key.is_empty() {
            catalog.set_headers(Headers::parse_metadata(value).iter(), source)?;
            continue;
        }

        let (context, singular, plural) = split_key(key);
        let original = match plural {
            Some(plural) => Original::with_plural(singular, plural),
            None => Original::new(singular),
        };

        let translation = if value.is_empty() {
            None
        } else if original.is_plural() || value.contains(PLURAL_SEPARATOR) {
            Some(Translation::Plural(
                value.split(PLURAL_SEPARATOR).map(String::from).collect(),
            ))
        } else {
            Some(Translation::Singular(value.to_string()))
        };

        catalog.add_original(original, context, source, translation)?;
    }

    Ok(())
}

/// Encode the catalog, or one of its sources, as .mo bytes
///
/// The header entry comes first, then the entries in catalog order.
/// No hash table is written.
pub fn write_to_bytes(
    catalog: &Catalog,
    source: Option<&str>,
    endian: Endian,
) -> Result<Vec<u8>> {
    let mut messages = vec![(String::new(), catalog.get_headers(source)?.to_metadata())];
    for entry in catalog.get_translations(source)? {
        messages.push((join_key(entry), join_value(entry)));
    }

    match endian {
        Endian::Little => encode::<LittleEndian>(&messages),
        Endian::Big => encode::<BigEndian>(&messages),
    }
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::format("catalog too large for .mo format"))
}

fn encode<B: ByteOrder>(messages: &[(String, String)]) -> Result<Vec<u8>> {
    let items = messages.len();
    let orig_tab_offset = MoHeader::SIZE;
    let trans_tab_offset = orig_tab_offset + items * StringDescriptor::SIZE;
    let strings_offset = trans_tab_offset + items * StringDescriptor::SIZE;

    let mut orig_descriptors = Vec::with_capacity(items);
    let mut trans_descriptors = Vec::with_capacity(items);
    let mut string_data = Vec::new();

    for (msgid, _) in messages {
        orig_descriptors.push(StringDescriptor {
            length: to_u32(msgid.len())?,
            offset: to_u32(strings_offset + string_data.len())?,
        });
        string_data.extend_from_slice(msgid.as_bytes());
        string_data.push(0);
    }
    for (_, msgstr) in messages {
        trans_descriptors.push(StringDescriptor {
            length: to_u32(msgstr.len())?,
            offset: to_u32(strings_offset + string_data.len())?,
        });
        string_data.extend_from_slice(msgstr.as_bytes());
        string_data.push(0);
    }

    let header = MoHeader {
        magic: MO_MAGIC,
        revision: 0,
        nstrings: to_u32(items)?,
        orig_tab_offset: to_u32(orig_tab_offset)?,
        trans_tab_offset: to_u32(trans_tab_offset)?,
        hash_tab_size: 0,
        hash_tab_offset: to_u32(strings_offset)?,
    };

    let mut data = Vec::with_capacity(strings_offset + string_data.len());
    let mut word = [0u8; 4];
    let mut put = |data: &mut Vec<u8>, value: u32| {
        B::write_u32(&mut word, value);
        data.extend_from_slice(&word);
    };

    for value in header.words() {
        put(&mut data, value);
    }
    for desc in orig_descriptors.iter().chain(trans_descriptors.iter()) {
        put(&mut data, desc.length);
        put(&mut data, desc.offset);
    }
    data.extend_from_slice(&string_data);

    Ok(data)
}
