use byteorder::{BigEndian, ByteOrder};

use super::{Error, Opcode, PacketReader, PacketWriter, ResponseCode};

pub const HEADER_SIZE: usize = 12;

mod flag {
    pub const QUERY: u16 = 0b1000_0000_0000_0000;
    pub const OPCODE_MASK: u16 = 0b0111_1000_0000_0000;
    pub const AUTHORITATIVE: u16 = 0b0000_0100_0000_0000;
    pub const TRUNCATED: u16 = 0b0000_0010_0000_0000;
    pub const RECURSION_DESIRED: u16 = 0b0000_0001_0000_0000;
    pub const RECURSION_AVAILABLE: u16 = 0b0000_0000_1000_0000;
    pub const AUTHENTICATED_DATA: u16 = 0b0000_0000_0010_0000;
    pub const CHECKING_DISABLED: u16 = 0b0000_0000_0001_0000;
    pub const RESPONSE_CODE_MASK: u16 = 0b0000_0000_0000_1111;
}

/// Represents parsed header of the packet
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    pub id: u16,
    pub query: bool,
    pub opcode: Opcode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub authenticated_data: bool,
    pub checking_disabled: bool,
    pub response_code: ResponseCode,
    pub questions: u16,
    pub answers: u16,
    pub nameservers: u16,
    pub additional: u16,
}

impl Header {
    pub fn new_query(id: u16, recursion: bool) -> Header {
        Header {
            id: id,
            query: true,
            opcode: Opcode::StandardQuery,
            authoritative: false,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            authenticated_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        }
    }

    pub fn parse(reader: &mut PacketReader) -> Result<Header, Error> {
        let bytes = reader.read_bytes(HEADER_SIZE)?;
        let flags = BigEndian::read_u16(&bytes[2..4]);
        Ok(Header {
            id: BigEndian::read_u16(&bytes[..2]),
            query: flags & flag::QUERY == 0,
            opcode: (((flags & flag::OPCODE_MASK) >> flag::OPCODE_MASK.trailing_zeros()) as u8)
                .into(),
            authoritative: flags & flag::AUTHORITATIVE != 0,
            truncated: flags & flag::TRUNCATED != 0,
            recursion_desired: flags & flag::RECURSION_DESIRED != 0,
            recursion_available: flags & flag::RECURSION_AVAILABLE != 0,
            authenticated_data: flags & flag::AUTHENTICATED_DATA != 0,
            checking_disabled: flags & flag::CHECKING_DISABLED != 0,
            response_code: ((flags & flag::RESPONSE_CODE_MASK) as u8).into(),
            questions: BigEndian::read_u16(&bytes[4..6]),
            answers: BigEndian::read_u16(&bytes[6..8]),
            nameservers: BigEndian::read_u16(&bytes[8..10]),
            additional: BigEndian::read_u16(&bytes[10..12]),
        })
    }

    /// The 16-bit word holding every flag, opcode and response code
    pub fn flags(&self) -> u16 {
        let mut flags = 0u16;
        if !self.query {
            flags |= flag::QUERY;
        }
        flags |= (u8::from(self.opcode) as u16) << flag::OPCODE_MASK.trailing_zeros()
            & flag::OPCODE_MASK;
        if self.authoritative {
            flags |= flag::AUTHORITATIVE;
        }
        if self.truncated {
            flags |= flag::TRUNCATED;
        }
        if self.recursion_desired {
            flags |= flag::RECURSION_DESIRED;
        }
        if self.recursion_available {
            flags |= flag::RECURSION_AVAILABLE;
        }
        if self.authenticated_data {
            flags |= flag::AUTHENTICATED_DATA;
        }
        if self.checking_disabled {
            flags |= flag::CHECKING_DISABLED;
        }
        flags |= u8::from(self.response_code) as u16 & flag::RESPONSE_CODE_MASK;
        flags
    }

    pub fn write_to(&self, writer: &mut PacketWriter) -> Result<(), Error> {
        let mut bytes = [0u8; HEADER_SIZE];
        BigEndian::write_u16(&mut bytes[..2], self.id);
        BigEndian::write_u16(&mut bytes[2..4], self.flags());
        BigEndian::write_u16(&mut bytes[4..6], self.questions);
        BigEndian::write_u16(&mut bytes[6..8], self.answers);
        BigEndian::write_u16(&mut bytes[8..10], self.nameservers);
        BigEndian::write_u16(&mut bytes[10..12], self.additional);
        writer.write_bytes(&bytes)
    }
}
