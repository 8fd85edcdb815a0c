use std::marker::PhantomData;

use super::{Header, Name, Packet, QueryClass, QueryType, Question, ResourceRecord, ResponseCode};

pub enum Questions {}
pub enum Answers {}
pub enum Nameservers {}
pub enum Additional {}

pub trait MoveTo<T> {}
impl<T> MoveTo<T> for T {}

impl MoveTo<Answers> for Questions {}

impl MoveTo<Nameservers> for Questions {}
impl MoveTo<Nameservers> for Answers {}

impl MoveTo<Additional> for Questions {}
impl MoveTo<Additional> for Answers {}
impl MoveTo<Additional> for Nameservers {}

/// Allows to build a DNS packet
///
/// Sections can only be filled in wire order, and the header counters
/// always match the number of entries added.
pub struct Builder<S> {
    packet: Packet,
    _state: PhantomData<S>,
}

impl Builder<Questions> {
    /// Creates a new query
    ///
    /// Initially all sections are empty. You're expected to fill
    /// the questions section with `add_question`
    pub fn new_query(id: u16, recursion: bool) -> Builder<Questions> {
        Builder::with_header(Header::new_query(id, recursion))
    }

    /// Creates a response to a query carrying `id`
    ///
    /// Recursion is always advertised as available.
    pub fn new_response(id: u16, recursion: bool, authoritative: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            query: false,
            authoritative: authoritative,
            recursion_available: true,
            ..Header::new_query(id, recursion)
        })
    }

    fn with_header(header: Header) -> Builder<Questions> {
        Builder {
            packet: Packet {
                header: header,
                questions: Vec::new(),
                answers: Vec::new(),
                nameservers: Vec::new(),
                additional: Vec::new(),
            },
            _state: PhantomData,
        }
    }
}

impl<T> Builder<T> {
    /// Returns the final packet
    pub fn build(self) -> Packet {
        self.packet
    }

    pub fn move_to<U>(self) -> Builder<U>
    where
        T: MoveTo<U>,
    {
        Builder {
            packet: self.packet,
            _state: PhantomData,
        }
    }

    pub fn set_response_code(&mut self, code: ResponseCode) {
        self.packet.header.response_code = code;
    }
}

impl<T: MoveTo<Questions>> Builder<T> {
    /// Adds a question to the packet
    pub fn add_question(
        self,
        qname: &Name,
        qtype: QueryType,
        qclass: QueryClass,
    ) -> Builder<Questions> {
        let mut builder = self.move_to::<Questions>();

        builder.packet.questions.push(Question {
            qname: qname.clone(),
            qtype: qtype,
            qclass: qclass,
        });
        builder.packet.header.questions += 1;
        builder
    }
}

impl<T: MoveTo<Answers>> Builder<T> {
    pub fn add_answer(self, record: ResourceRecord) -> Builder<Answers> {
        let mut builder = self.move_to::<Answers>();

        builder.packet.answers.push(record);
        builder.packet.header.answers += 1;
        builder
    }
}

impl<T: MoveTo<Nameservers>> Builder<T> {
    pub fn add_nameserver(self, record: ResourceRecord) -> Builder<Nameservers> {
        let mut builder = self.move_to::<Nameservers>();

        builder.packet.nameservers.push(record);
        builder.packet.header.nameservers += 1;
        builder
    }
}

impl<T: MoveTo<Additional>> Builder<T> {
    pub fn add_additional(self, record: ResourceRecord) -> Builder<Additional> {
        let mut builder = self.move_to::<Additional>();

        builder.packet.additional.push(record);
        builder.packet.header.additional += 1;
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use super::Name;
    use super::QueryClass as QC;
    use super::QueryType as QT;
    use crate::dns_parser::{Class, RRData, ResourceRecord};
    use std::net::Ipv4Addr;

    #[test]
    fn build_query() {
        let mut bld = Builder::new_query(1573, true);
        let name = Name::new("example.com");
        bld = bld.add_question(&name, QT::A, QC::IN);
        let result = b"\x06%\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01";
        assert_eq!(&bld.build().to_bytes().unwrap()[..], &result[..]);
    }

    #[test]
    fn build_mx_query() {
        let mut bld = Builder::new_query(23513, true);
        let name = Name::new("gmail.com");
        bld = bld.add_question(&name, QT::MX, QC::IN);
        let result = b"[\xd9\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
            \x05gmail\x03com\x00\x00\x0f\x00\x01";
        assert_eq!(&bld.build().to_bytes().unwrap()[..], &result[..]);
    }

    #[test]
    fn build_response_skipping_answers() {
        let name = Name::new("example.com.");
        let glue = ResourceRecord {
            name: Name::new("ns.example.com."),
            cls: Class::IN,
            ttl: 60,
            data: RRData::A(Ipv4Addr::new(192, 0, 2, 1)),
        };
        let delegation = ResourceRecord {
            name: name.clone(),
            cls: Class::IN,
            ttl: 60,
            data: RRData::NS(Name::new("ns.example.com.")),
        };

        let packet = Builder::new_response(7, true, false)
            .add_question(&name, QT::A, QC::IN)
            .add_nameserver(delegation)
            .add_additional(glue)
            .build();

        assert!(!packet.header.query);
        assert!(packet.header.recursion_desired);
        assert!(packet.header.recursion_available);
        assert_eq!(packet.header.questions, 1);
        assert_eq!(packet.header.answers, 0);
        assert_eq!(packet.header.nameservers, 1);
        assert_eq!(packet.header.additional, 1);
        assert_eq!(packet.additional.len(), 1);
    }
}
