//! DNS message wire format: header, questions, resource records and the
//! domain name compression scheme of RFC 1035 section 4.1.4.

mod builder;
mod enums;
mod error;
mod header;
mod name;
mod reader;
mod rrdata;
mod structs;
mod writer;

pub use self::builder::{Additional, Answers, Builder, MoveTo, Nameservers, Questions};
pub use self::enums::{Class, Opcode, QueryClass, QueryType, ResponseCode, Type};
pub use self::error::Error;
pub use self::header::{Header, HEADER_SIZE};
pub use self::name::{CompressionTable, Name};
pub use self::reader::PacketReader;
pub use self::rrdata::RRData;
pub use self::structs::{Packet, Question, ResourceRecord};
pub use self::writer::PacketWriter;

/// Largest message carried over plain UDP
pub const MAX_PACKET_SIZE: usize = 512;
