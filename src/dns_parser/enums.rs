/// The OPCODE value according to RFC 1035
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Opcode {
    StandardQuery,
    InverseQuery,
    ServerStatusRequest,
    Reserved(u8),
}

/// The RCODE value according to RFC 1035
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Reserved(u8),
}

/// The TYPE value according to RFC 1035
///
/// All "EXPERIMENTAL" and "OBSOLETE" types are still carried, everything
/// this crate does not know about ends up in `Unknown`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Type {
    /// a host address
    A,
    /// an authoritative name server
    NS,
    /// a mail destination (Obsolete - use MX)
    MD,
    /// a mail forwarder (Obsolete - use MX)
    MF,
    /// the canonical name for an alias
    CNAME,
    /// marks the start of a zone of authority
    SOA,
    /// a mailbox domain name (EXPERIMENTAL)
    MB,
    /// a mail group member (EXPERIMENTAL)
    MG,
    /// a mail rename domain name (EXPERIMENTAL)
    MR,
    /// a null RR (EXPERIMENTAL)
    NULL,
    /// a well known service description
    WKS,
    /// a domain name pointer
    PTR,
    /// host information
    HINFO,
    /// mailbox or mail list information
    MINFO,
    /// mail exchange
    MX,
    /// text strings
    TXT,
    /// IPv6 host address (RFC 3596)
    AAAA,
    Unknown(u16),
}

/// The QTYPE value according to RFC 1035
///
/// This is a superset of `Type` for use in queries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum QueryType {
    Type(Type),
    /// A request for a transfer of an entire zone
    AXFR,
    /// A request for mailbox-related records (MB, MG or MR)
    MAILB,
    /// A request for mail agent RRs (Obsolete - see MX)
    MAILA,
    /// A request for all records
    All,
}

/// The CLASS value according to RFC 1035
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Class {
    /// the Internet
    IN,
    /// the CSNET class (Obsolete)
    CS,
    /// the CHAOS class
    CH,
    /// Hesiod [Dyer 87]
    HS,
    Unknown(u16),
}

/// The QCLASS value according to RFC 1035
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum QueryClass {
    Class(Class),
    /// Any class
    Any,
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Opcode {
        match code {
            0 => Opcode::StandardQuery,
            1 => Opcode::InverseQuery,
            2 => Opcode::ServerStatusRequest,
            x => Opcode::Reserved(x),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::StandardQuery => 0,
            Opcode::InverseQuery => 1,
            Opcode::ServerStatusRequest => 2,
            Opcode::Reserved(x) => x,
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> ResponseCode {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            x => ResponseCode::Reserved(x),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> u8 {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(x) => x,
        }
    }
}

impl From<u16> for Type {
    fn from(code: u16) -> Type {
        use self::Type::*;
        match code {
            1 => A,
            2 => NS,
            3 => MD,
            4 => MF,
            5 => CNAME,
            6 => SOA,
            7 => MB,
            8 => MG,
            9 => MR,
            10 => NULL,
            11 => WKS,
            12 => PTR,
            13 => HINFO,
            14 => MINFO,
            15 => MX,
            16 => TXT,
            28 => AAAA,
            x => Unknown(x),
        }
    }
}

impl From<Type> for u16 {
    fn from(typ: Type) -> u16 {
        use self::Type::*;
        match typ {
            A => 1,
            NS => 2,
            MD => 3,
            MF => 4,
            CNAME => 5,
            SOA => 6,
            MB => 7,
            MG => 8,
            MR => 9,
            NULL => 10,
            WKS => 11,
            PTR => 12,
            HINFO => 13,
            MINFO => 14,
            MX => 15,
            TXT => 16,
            AAAA => 28,
            Unknown(x) => x,
        }
    }
}

impl QueryType {
    pub const A: QueryType = QueryType::Type(Type::A);
    pub const NS: QueryType = QueryType::Type(Type::NS);
    pub const CNAME: QueryType = QueryType::Type(Type::CNAME);
    pub const MX: QueryType = QueryType::Type(Type::MX);
    pub const AAAA: QueryType = QueryType::Type(Type::AAAA);

    /// The record type answering this query, if it names exactly one
    pub fn record_type(self) -> Option<Type> {
        match self {
            QueryType::Type(typ) => Some(typ),
            _ => None,
        }
    }
}

impl From<u16> for QueryType {
    fn from(code: u16) -> QueryType {
        match code {
            252 => QueryType::AXFR,
            253 => QueryType::MAILB,
            254 => QueryType::MAILA,
            255 => QueryType::All,
            x => QueryType::Type(Type::from(x)),
        }
    }
}

impl From<QueryType> for u16 {
    fn from(qtype: QueryType) -> u16 {
        match qtype {
            QueryType::Type(typ) => typ.into(),
            QueryType::AXFR => 252,
            QueryType::MAILB => 253,
            QueryType::MAILA => 254,
            QueryType::All => 255,
        }
    }
}

impl From<u16> for Class {
    fn from(code: u16) -> Class {
        match code {
            1 => Class::IN,
            2 => Class::CS,
            3 => Class::CH,
            4 => Class::HS,
            x => Class::Unknown(x),
        }
    }
}

impl From<Class> for u16 {
    fn from(class: Class) -> u16 {
        match class {
            Class::IN => 1,
            Class::CS => 2,
            Class::CH => 3,
            Class::HS => 4,
            Class::Unknown(x) => x,
        }
    }
}

impl QueryClass {
    pub const IN: QueryClass = QueryClass::Class(Class::IN);
}

impl From<u16> for QueryClass {
    fn from(code: u16) -> QueryClass {
        match code {
            255 => QueryClass::Any,
            x => QueryClass::Class(Class::from(x)),
        }
    }
}

impl From<QueryClass> for u16 {
    fn from(qclass: QueryClass) -> u16 {
        match qclass {
            QueryClass::Class(class) => class.into(),
            QueryClass::Any => 255,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_types_are_not_record_types() {
        assert_eq!(QueryType::from(255), QueryType::All);
        assert_eq!(QueryType::from(252), QueryType::AXFR);
        assert_eq!(QueryType::All.record_type(), None);
        assert_eq!(QueryType::from(15), QueryType::MX);
        assert_eq!(QueryType::MX.record_type(), Some(Type::MX));
    }

    #[test]
    fn unlisted_codes_survive() {
        assert_eq!(Type::from(99), Type::Unknown(99));
        assert_eq!(u16::from(Type::from(99)), 99);
        assert_eq!(u16::from(QueryClass::from(254)), 254);
        assert_eq!(QueryClass::from(255), QueryClass::Any);
        assert_eq!(u8::from(ResponseCode::from(9)), 9);
        assert_eq!(Opcode::from(2), Opcode::ServerStatusRequest);
    }
}
