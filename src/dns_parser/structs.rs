use std::fmt;

use super::{
    Class, CompressionTable, Error, Header, Name, PacketReader, PacketWriter, QueryClass,
    QueryType, RRData, HEADER_SIZE, MAX_PACKET_SIZE,
};

/// Parsed DNS packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub nameservers: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

/// A parsed chunk of data in the Query section of the packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub qname: Name,
    pub qtype: QueryType,
    pub qclass: QueryClass,
}

/// A single DNS record
///
/// The record type is carried by `data`, types other than A, AAAA, NS,
/// CNAME and MX keep their payload as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub cls: Class,
    pub ttl: u32,
    pub data: RRData,
}

impl Question {
    pub fn parse(reader: &mut PacketReader, table: &mut CompressionTable) -> Result<Question, Error> {
        let qname = Name::read_from(reader, table)?;
        let qtype = reader.read_u16()?.into();
        let qclass = reader.read_u16()?.into();
        Ok(Question {
            qname: qname,
            qtype: qtype,
            qclass: qclass,
        })
    }

    pub fn write_to(
        &self,
        writer: &mut PacketWriter,
        table: &mut CompressionTable,
    ) -> Result<(), Error> {
        self.qname.write_to(writer, table)?;
        writer.write_u16(self.qtype.into())?;
        writer.write_u16(self.qclass.into())
    }
}

impl ResourceRecord {
    pub fn parse(
        reader: &mut PacketReader,
        table: &mut CompressionTable,
    ) -> Result<ResourceRecord, Error> {
        let name = Name::read_from(reader, table)?;
        let typ = reader.read_u16()?.into();
        let cls = reader.read_u16()?.into();
        let ttl = reader.read_u32()?;
        let len = reader.read_u16()? as usize;
        let data = RRData::parse(typ, len, reader, table)?;
        Ok(ResourceRecord {
            name: name,
            cls: cls,
            ttl: ttl,
            data: data,
        })
    }

    pub fn write_to(
        &self,
        writer: &mut PacketWriter,
        table: &mut CompressionTable,
    ) -> Result<(), Error> {
        self.name.write_to(writer, table)?;
        writer.write_u16(self.data.typ().into())?;
        writer.write_u16(self.cls.into())?;
        writer.write_u32(self.ttl)?;

        let size_offset = writer.position();
        writer.write_u16(0)?;

        let data_offset = writer.position();
        self.data.write_to(writer, table)?;
        let data_size = writer.position() - data_offset;

        writer.patch_u16(size_offset, data_size as u16)
    }
}

impl Packet {
    /// Parse a full DNS Packet and return a structure that has all the
    /// data in owned form
    pub fn parse(data: &[u8]) -> Result<Packet, Error> {
        if data.len() < HEADER_SIZE || data.len() > MAX_PACKET_SIZE {
            return Err(Error::InvalidPacketSize(data.len()));
        }

        let mut reader = PacketReader::new(data);
        let mut table = CompressionTable::new();
        let header = Header::parse(&mut reader)?;

        let mut questions = Vec::with_capacity(header.questions as usize);
        for _ in 0..header.questions {
            questions.push(Question::parse(&mut reader, &mut table)?);
        }
        let answers = Self::parse_records(header.answers, &mut reader, &mut table)?;
        let nameservers = Self::parse_records(header.nameservers, &mut reader, &mut table)?;
        let additional = Self::parse_records(header.additional, &mut reader, &mut table)?;

        Ok(Packet {
            header: header,
            questions: questions,
            answers: answers,
            nameservers: nameservers,
            additional: additional,
        })
    }

    fn parse_records(
        count: u16,
        reader: &mut PacketReader,
        table: &mut CompressionTable,
    ) -> Result<Vec<ResourceRecord>, Error> {
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(ResourceRecord::parse(reader, table)?);
        }
        Ok(records)
    }

    /// Serializes the packet, one compression table shared by all sections
    ///
    /// The section counters written are the actual section lengths.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = PacketWriter::new();
        let mut table = CompressionTable::new();

        let header = Header {
            questions: self.questions.len() as u16,
            answers: self.answers.len() as u16,
            nameservers: self.nameservers.len() as u16,
            additional: self.additional.len() as u16,
            ..self.header
        };
        header.write_to(&mut writer)?;

        for question in &self.questions {
            question.write_to(&mut writer, &mut table)?;
        }
        let records = self
            .answers
            .iter()
            .chain(&self.nameservers)
            .chain(&self.additional);
        for record in records {
            record.write_to(&mut writer, &mut table)?;
        }

        Ok(writer.into_bytes())
    }
}

impl fmt::Display for Question {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} {:?} {:?}", self.qname, self.qtype, self.qclass)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{} {} {:?} {:?} {}",
            self.name,
            self.ttl,
            self.cls,
            self.data.typ(),
            self.data
        )
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let h = &self.header;
        write!(
            fmt,
            "id {} {} {:?} rd={} ra={} sections [{}, {}, {}, {}]",
            h.id,
            if h.query { "query" } else { "response" },
            h.response_code,
            h.recursion_desired,
            h.recursion_available,
            h.questions,
            h.answers,
            h.nameservers,
            h.additional
        )?;
        for question in &self.questions {
            write!(fmt, "\n  ? {}", question)?;
        }
        let sections = [
            ("an", &self.answers),
            ("ns", &self.nameservers),
            ("ar", &self.additional),
        ];
        for (tag, records) in sections.iter() {
            for record in records.iter() {
                write!(fmt, "\n  {} {}", tag, record)?;
            }
        }
        Ok(())
    }
}
