use std::collections::HashMap;
use std::fmt;
use std::str::from_utf8;

use byteorder::{BigEndian, WriteBytesExt};

use super::{Error, PacketReader, PacketWriter};

const POINTER_MASK: u16 = 0b1100_0000_0000_0000;
const MAX_POINTER_OFFSET: usize = 0b0011_1111_1111_1111;
const MAX_LABEL_LEN: usize = 63;

/// A fully-qualified domain name, always stored with its trailing dot
///
/// Comparison is an exact string match, `Google.com.` and `google.com.`
/// are different names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Creates a name, appending the trailing dot if it is missing
    pub fn new<T: Into<String>>(name: T) -> Name {
        let mut name = name.into();
        if !name.ends_with('.') {
            name.push('.');
        }
        Name(name)
    }

    pub fn root() -> Name {
        Name(".".to_owned())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot separated labels, without the empty root label
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|label| !label.is_empty())
    }

    /// Encodes the name as it would appear at `offset` within a message
    ///
    /// The longest suffix already present in `table` is replaced by a
    /// pointer. Every suffix emitted as labels is recorded in `table` at
    /// the offset where it starts.
    pub fn encode(&self, offset: usize, table: &mut CompressionTable) -> Result<Vec<u8>, Error> {
        if self.is_root() {
            return Ok(vec![0]);
        }

        let mut bytes = Vec::new();
        let mut start = 0;

        for label in self.0.split_terminator('.') {
            let suffix = &self.0[start..];
            if let Some(target) = table.offset_of(suffix) {
                bytes
                    .write_u16::<BigEndian>(POINTER_MASK | target as u16)
                    .map_err(|_| Error::TooManyBytes)?;
                return Ok(bytes);
            }

            if label.is_empty() {
                return Err(Error::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(Error::LabelTooLong(label.len()));
            }

            table.insert(offset + bytes.len(), suffix);
            bytes.push(label.len() as u8);
            bytes.extend_from_slice(label.as_bytes());
            start += label.len() + 1;
        }

        bytes.push(0);
        Ok(bytes)
    }

    pub fn write_to(
        &self,
        writer: &mut PacketWriter,
        table: &mut CompressionTable,
    ) -> Result<(), Error> {
        let bytes = self.encode(writer.position(), table)?;
        writer.write_bytes(&bytes)
    }

    /// Decodes a name starting at the reader's position
    ///
    /// Returns the name and the number of bytes it occupies at that
    /// position; bytes visited after following a pointer are not counted.
    /// The reader is left right after the name.
    pub fn decode(
        reader: &mut PacketReader,
        table: &mut CompressionTable,
    ) -> Result<(Name, usize), Error> {
        let start = reader.position();
        let mut name = String::new();
        // (offset of the length byte, index into `name`) of every label read
        let mut starts = Vec::new();
        let mut jumps = Vec::new();
        let mut end = None;

        loop {
            let byte = reader.read_u8()?;
            if byte == 0 {
                break;
            }

            match byte & 0b1100_0000 {
                0b1100_0000 => {
                    let low = reader.read_u8()?;
                    let target = ((byte & 0b0011_1111) as usize) << 8 | low as usize;
                    if end.is_none() {
                        end = Some(reader.position());
                    }

                    if let Some(suffix) = table.get(target) {
                        name.push_str(suffix);
                        break;
                    }
                    if jumps.contains(&target) {
                        return Err(Error::PointerLoop(target));
                    }
                    jumps.push(target);
                    reader.seek(target)?;
                }
                0 => {
                    let label_start = reader.position() - 1;
                    let label = reader.read_bytes(byte as usize)?;
                    let label = from_utf8(label)
                        .ok()
                        .filter(|label| label.is_ascii())
                        .ok_or(Error::LabelIsNotAscii)?;
                    starts.push((label_start, name.len()));
                    name.push_str(label);
                    name.push('.');
                }
                _ => return Err(Error::UnknownLabelFormat(byte)),
            }
        }

        let end = match end {
            Some(end) => {
                reader.seek(end)?;
                end
            }
            None => reader.position(),
        };

        for (offset, index) in starts {
            table.insert(offset, &name[index..]);
        }

        let name = if name.is_empty() {
            Name::root()
        } else {
            Name(name)
        };
        Ok((name, end - start))
    }

    pub fn read_from(
        reader: &mut PacketReader,
        table: &mut CompressionTable,
    ) -> Result<Name, Error> {
        Name::decode(reader, table).map(|(name, _)| name)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Name {
        Name::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Name {
        Name::new(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

/// Offsets of name suffixes already present in one message
///
/// Lives only for a single encode or decode of a message. The first offset
/// recorded for a suffix wins.
#[derive(Debug, Default, Clone)]
pub struct CompressionTable {
    by_offset: HashMap<usize, String>,
    by_suffix: HashMap<String, usize>,
}

impl CompressionTable {
    pub fn new() -> CompressionTable {
        CompressionTable::default()
    }

    pub fn insert(&mut self, offset: usize, suffix: &str) {
        if offset > MAX_POINTER_OFFSET
            || self.by_offset.contains_key(&offset)
            || self.by_suffix.contains_key(suffix)
        {
            return;
        }
        self.by_offset.insert(offset, suffix.to_owned());
        self.by_suffix.insert(suffix.to_owned(), offset);
    }

    pub fn get(&self, offset: usize) -> Option<&str> {
        self.by_offset.get(&offset).map(String::as_str)
    }

    pub fn offset_of(&self, suffix: &str) -> Option<usize> {
        self.by_suffix.get(suffix).copied()
    }

    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(entries: &[(usize, &str)]) -> CompressionTable {
        let mut table = CompressionTable::new();
        for &(offset, suffix) in entries {
            table.insert(offset, suffix);
        }
        table
    }

    #[test]
    fn normalizes_trailing_dot() {
        assert_eq!(Name::new("google.com"), Name::new("google.com."));
        assert_eq!(Name::new("").as_str(), ".");
        assert!(Name::root().is_root());
        assert_eq!(
            Name::from("mx.google.com").labels().collect::<Vec<_>>(),
            ["mx", "google", "com"]
        );
    }

    #[test]
    fn encode_without_table() {
        let mut table = CompressionTable::new();
        let bytes = Name::new("google.com.").encode(12, &mut table).unwrap();
        assert_eq!(bytes, b"\x06google\x03com\x00");
        assert_eq!(table.offset_of("google.com."), Some(12));
        assert_eq!(table.offset_of("com."), Some(19));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn encode_shares_suffixes() {
        let mut table = CompressionTable::new();
        Name::new("google.com.").encode(12, &mut table).unwrap();

        let bytes = Name::new("mx.google.com.").encode(28, &mut table).unwrap();
        assert_eq!(bytes, b"\x02mx\xc0\x0c");
        assert_eq!(table.offset_of("mx.google.com."), Some(28));

        let bytes = Name::new("com.").encode(37, &mut table).unwrap();
        assert_eq!(bytes, b"\xc0\x13");
    }

    #[test]
    fn encode_against_given_table() {
        let mut table = table_with(&[(12, "google.com.")]);
        let bytes = Name::new("google.com.").encode(0, &mut table).unwrap();
        assert_eq!(bytes, b"\xc0\x0c");
    }

    #[test]
    fn encode_root() {
        let mut table = CompressionTable::new();
        assert_eq!(Name::root().encode(12, &mut table).unwrap(), b"\x00");
        assert!(table.is_empty());
    }

    #[test]
    fn encode_rejects_bad_labels() {
        let mut table = CompressionTable::new();
        let long = format!("{}.com.", "a".repeat(64));
        assert_eq!(
            Name::new(long).encode(12, &mut table),
            Err(Error::LabelTooLong(64))
        );
        assert_eq!(
            Name::new("a..com.").encode(12, &mut table),
            Err(Error::EmptyLabel)
        );
    }

    #[test]
    fn decode_labels() {
        let mut table = CompressionTable::new();
        let mut reader = PacketReader::new(b"\x06google\x03com\x00\x00\x01");
        let (name, consumed) = Name::decode(&mut reader, &mut table).unwrap();
        assert_eq!(name, Name::new("google.com."));
        assert_eq!(consumed, 12);
        assert_eq!(reader.position(), 12);
        assert_eq!(table.get(0), Some("google.com."));
        assert_eq!(table.get(7), Some("com."));
    }

    #[test]
    fn decode_pointer_from_table() {
        let mut table = table_with(&[(12, "google.com.")]);
        let mut reader = PacketReader::new(b"\xc0\x0c");
        let (name, consumed) = Name::decode(&mut reader, &mut table).unwrap();
        assert_eq!(name, Name::new("google.com."));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn decode_follows_pointer_chain() {
        // 0: "com."  5: "google" -> 0   14: "mx" -> 5
        let buf = b"\x03com\x00\x06google\xc0\x00\x02mx\xc0\x05";
        let mut reader = PacketReader::new(buf);
        reader.seek(14).unwrap();
        let mut table = CompressionTable::new();
        let (name, consumed) = Name::decode(&mut reader, &mut table).unwrap();
        assert_eq!(name, Name::new("mx.google.com."));
        assert_eq!(consumed, 5);
        assert_eq!(reader.position(), 19);
        assert_eq!(table.get(14), Some("mx.google.com."));
        assert_eq!(table.get(5), Some("google.com."));
        assert_eq!(table.get(0), Some("com."));
    }

    #[test]
    fn decode_rejects_pointer_loop() {
        let buf = b"\x01a\xc0\x04\xc0\x00";
        let mut reader = PacketReader::new(buf);
        let result = Name::decode(&mut reader, &mut CompressionTable::new());
        assert_eq!(result, Err(Error::PointerLoop(4)));

        let mut reader = PacketReader::new(b"\xc0\x00");
        let result = Name::decode(&mut reader, &mut CompressionTable::new());
        assert_eq!(result, Err(Error::PointerLoop(0)));
    }

    #[test]
    fn decode_rejects_malformed() {
        let mut table = CompressionTable::new();
        let mut reader = PacketReader::new(b"\x06goo");
        assert_eq!(
            Name::decode(&mut reader, &mut table),
            Err(Error::NotEnoughBytes)
        );

        let mut reader = PacketReader::new(b"\x41abc\x00");
        assert_eq!(
            Name::decode(&mut reader, &mut table),
            Err(Error::UnknownLabelFormat(0x41))
        );

        let mut reader = PacketReader::new(b"\x02\xff\xfe\x00");
        assert_eq!(
            Name::decode(&mut reader, &mut table),
            Err(Error::LabelIsNotAscii)
        );

        let mut reader = PacketReader::new(b"\xc0\x40");
        assert_eq!(
            Name::decode(&mut reader, &mut table),
            Err(Error::NotEnoughBytes)
        );
    }

    #[test]
    fn decode_root() {
        let mut reader = PacketReader::new(b"\x00");
        let (name, consumed) = Name::decode(&mut reader, &mut CompressionTable::new()).unwrap();
        assert!(name.is_root());
        assert_eq!(consumed, 1);
    }
}
