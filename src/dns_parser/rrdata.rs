use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::{CompressionTable, Error, Name, PacketReader, PacketWriter, Type};

/// The enumeration that represents known types of DNS resource records data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(Name),
    CNAME(Name),
    MX {
        preference: u16,
        exchange: Name,
    },
    // Anything that isn't interpreted, carried verbatim
    Unknown {
        typ: Type,
        data: Vec<u8>,
    },
}

impl RRData {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::A(..) => Type::A,
            RRData::AAAA(..) => Type::AAAA,
            RRData::NS(..) => Type::NS,
            RRData::CNAME(..) => Type::CNAME,
            RRData::MX { .. } => Type::MX,
            RRData::Unknown { typ, .. } => typ,
        }
    }

    pub fn write_to(
        &self,
        writer: &mut PacketWriter,
        table: &mut CompressionTable,
    ) -> Result<(), Error> {
        match *self {
            RRData::A(ip) => writer.write_bytes(&ip.octets()),
            RRData::AAAA(ip) => writer.write_bytes(&ip.octets()),
            RRData::NS(ref name) | RRData::CNAME(ref name) => name.write_to(writer, table),
            RRData::MX {
                preference,
                ref exchange,
            } => {
                writer.write_u16(preference)?;
                exchange.write_to(writer, table)
            }
            RRData::Unknown { ref data, .. } => writer.write_bytes(data),
        }
    }

    /// Parses `len` bytes of payload at the reader's position
    ///
    /// The payload must be consumed exactly, a mismatch between the length
    /// prefix and the data is an error.
    pub fn parse(
        typ: Type,
        len: usize,
        reader: &mut PacketReader,
        table: &mut CompressionTable,
    ) -> Result<RRData, Error> {
        let start = reader.position();
        let data = match typ {
            Type::A => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(Self::fixed(typ, len, reader)?);
                RRData::A(Ipv4Addr::from(octets))
            }
            Type::AAAA => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(Self::fixed(typ, len, reader)?);
                RRData::AAAA(Ipv6Addr::from(octets))
            }
            Type::NS => RRData::NS(Name::read_from(reader, table)?),
            Type::CNAME => RRData::CNAME(Name::read_from(reader, table)?),
            Type::MX => RRData::MX {
                preference: reader.read_u16()?,
                exchange: Name::read_from(reader, table)?,
            },
            typ => RRData::Unknown {
                typ: typ,
                data: reader.read_bytes(len)?.to_vec(),
            },
        };

        let actual = reader.position() - start;
        if actual != len {
            return Err(Error::WrongRdataLength {
                typ: typ,
                expected: len,
                actual: actual,
            });
        }
        Ok(data)
    }

    fn fixed<'a>(typ: Type, len: usize, reader: &mut PacketReader<'a>) -> Result<&'a [u8], Error> {
        let expected = if typ == Type::A { 4 } else { 16 };
        if len != expected {
            return Err(Error::WrongRdataLength {
                typ: typ,
                expected: expected,
                actual: len,
            });
        }
        reader.read_bytes(len)
    }
}

impl fmt::Display for RRData {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RRData::A(ip) => write!(fmt, "{}", ip),
            RRData::AAAA(ip) => write!(fmt, "{}", ip),
            RRData::NS(ref name) | RRData::CNAME(ref name) => write!(fmt, "{}", name),
            RRData::MX {
                preference,
                ref exchange,
            } => write!(fmt, "{} {}", preference, exchange),
            RRData::Unknown { ref data, .. } => write!(fmt, "<{} bytes>", data.len()),
        }
    }
}
