use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use log::{debug, trace};
use rand::{thread_rng, Rng};
use tokio::net::UdpSocket;

use crate::config::{Config, DEFAULT_MAX_REFERRALS};
use crate::dns_parser::{
    Builder, Name, Packet, QueryClass, QueryType, RRData, ResourceRecord, ResponseCode, Type,
};
use crate::error::Error;

pub const DNS_PORT: u16 = 53;

/// Datagrams are received into a buffer this large so oversized packets
/// are rejected by the parser instead of being cut silently.
pub(crate) const RECV_BUFFER_SIZE: usize = 65536;

/// Sends one query to one nameserver and returns its response
pub trait Transport: Send + Sync {
    fn exchange<'a>(
        &'a self,
        query: &'a Packet,
        server: SocketAddr,
    ) -> BoxFuture<'a, Result<Packet, Error>>;
}

/// Plain DNS over UDP, one freshly bound socket per exchange
#[derive(Debug, Clone, Default)]
pub struct UdpTransport {
    timeout: Option<Duration>,
}

impl UdpTransport {
    pub fn new(timeout: Option<Duration>) -> UdpTransport {
        UdpTransport { timeout: timeout }
    }

    async fn send_query(&self, query: &Packet, server: SocketAddr) -> Result<Packet, Error> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.connect(server).await?;

        let bytes = query.to_bytes()?;
        let sent = socket.send(&bytes).await?;
        if sent != bytes.len() {
            return Err(Error::PartialWrite {
                sent: sent,
                len: bytes.len(),
            });
        }

        let response = receive_response(&socket, query.header.id);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, response)
                .await
                .map_err(|_| Error::UpstreamTimeout(server))?,
            None => response.await,
        }
    }
}

/// Waits for the response carrying `id`, ignoring datagrams with any other id
async fn receive_response(socket: &UdpSocket, id: u16) -> Result<Packet, Error> {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    loop {
        let received = socket.recv(&mut buf).await?;
        let response = Packet::parse(&buf[..received])?;
        if response.header.id == id {
            return Ok(response);
        }
        trace!(
            "ignoring response with id {} while waiting for {}",
            response.header.id,
            id
        );
    }
}

impl Transport for UdpTransport {
    fn exchange<'a>(
        &'a self,
        query: &'a Packet,
        server: SocketAddr,
    ) -> BoxFuture<'a, Result<Packet, Error>> {
        self.send_query(query, server).boxed()
    }
}

/// Iterative resolver walking the delegation tree down from a root server
pub struct Resolver<T> {
    transport: T,
    root_servers: Vec<Ipv4Addr>,
    max_depth: usize,
    max_referrals: usize,
}

impl Resolver<UdpTransport> {
    pub fn from_config(config: &Config) -> Resolver<UdpTransport> {
        Resolver::new(
            UdpTransport::new(config.upstream_timeout),
            config.root_servers.clone(),
            config.max_depth,
        )
        .with_max_referrals(config.max_referrals)
    }
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T, root_servers: Vec<Ipv4Addr>, max_depth: usize) -> Resolver<T> {
        Resolver {
            transport: transport,
            root_servers: root_servers,
            max_depth: max_depth,
            max_referrals: DEFAULT_MAX_REFERRALS,
        }
    }

    /// Limits how many referrals a single lookup follows before giving up
    pub fn with_max_referrals(mut self, max_referrals: usize) -> Resolver<T> {
        self.max_referrals = max_referrals;
        self
    }

    /// Resolves the first question of `query`
    ///
    /// Negative answers such as NXDOMAIN are returned as responses, not
    /// errors. A CNAME answer is followed and the target's answers are
    /// appended after the CNAME record, unless the response already
    /// answers for the target.
    pub fn lookup<'a>(&'a self, query: &'a Packet) -> BoxFuture<'a, Result<Packet, Error>> {
        self.lookup_nested(query, 0)
    }

    fn lookup_nested<'a>(
        &'a self,
        query: &'a Packet,
        depth: usize,
    ) -> BoxFuture<'a, Result<Packet, Error>> {
        async move {
            if depth > self.max_depth {
                return Err(Error::DepthExceeded(self.max_depth));
            }
            let question = query.questions.first().ok_or(Error::NoQuestion)?;
            let domain = &question.qname;
            let mut server = self.pick_root()?;
            let mut referrals = 0;

            loop {
                trace!("asking {} for {} (depth {})", server, domain, depth);
                let mut response = self.transport.exchange(query, server).await?;

                if response.header.response_code != ResponseCode::NoError {
                    debug!(
                        "{} answered {:?} for {}",
                        server, response.header.response_code, domain
                    );
                    return Ok(response);
                }

                if answers_question(&response.answers, domain, question.qtype) {
                    return Ok(response);
                }

                if let Some(canonical) = find_cname(&response.answers, domain).cloned() {
                    debug!("{} is an alias of {}", domain, canonical);
                    if answers_question(&response.answers, &canonical, question.qtype) {
                        return Ok(response);
                    }
                    let chased = self
                        .lookup_nested(&construct_query(&canonical), depth + 1)
                        .await?;
                    response.answers.extend(chased.answers);
                    response.header.answers = response.answers.len() as u16;
                    return Ok(response);
                }

                let host = match find_nameserver(&response.nameservers) {
                    Some(host) => host.clone(),
                    None => return Err(Error::UnableToResolve(domain.clone())),
                };
                referrals += 1;
                if referrals > self.max_referrals {
                    debug!("{} referred more than {} times", domain, self.max_referrals);
                    return Err(Error::ReferralLimit(self.max_referrals));
                }

                if let Some(ip) = find_address(&response.additional, &host) {
                    trace!("following glue {} for {}", ip, host);
                    server = SocketAddr::new(ip.into(), DNS_PORT);
                    continue;
                }

                debug!("no glue for {}, resolving it first", host);
                let ns_response = self
                    .lookup_nested(&construct_query(&host), depth + 1)
                    .await?;
                match find_address(&ns_response.answers, &host) {
                    Some(ip) => server = SocketAddr::new(ip.into(), DNS_PORT),
                    None => return Err(Error::UnableToResolve(host)),
                }
            }
        }
        .boxed()
    }

    fn pick_root(&self) -> Result<SocketAddr, Error> {
        if self.root_servers.is_empty() {
            return Err(Error::UnableToResolve(Name::root()));
        }
        let index = thread_rng().gen_range(0..self.root_servers.len());
        Ok(SocketAddr::new(self.root_servers[index].into(), DNS_PORT))
    }
}

/// A fresh A/IN query for `domain` with a random transaction id
pub fn construct_query(domain: &Name) -> Packet {
    Builder::new_query(rand::random(), false)
        .add_question(domain, QueryType::A, QueryClass::IN)
        .build()
}

fn answers_question(records: &[ResourceRecord], domain: &Name, qtype: QueryType) -> bool {
    let wanted = qtype.record_type().unwrap_or(Type::A);
    records
        .iter()
        .any(|record| record.data.typ() == wanted && record.name == *domain)
}

fn find_cname<'a>(records: &'a [ResourceRecord], domain: &Name) -> Option<&'a Name> {
    records.iter().find_map(|record| match record.data {
        RRData::CNAME(ref canonical) if record.name == *domain => Some(canonical),
        _ => None,
    })
}

fn find_nameserver(records: &[ResourceRecord]) -> Option<&Name> {
    records.iter().find_map(|record| match record.data {
        RRData::NS(ref host) => Some(host),
        _ => None,
    })
}

fn find_address(records: &[ResourceRecord], host: &Name) -> Option<Ipv4Addr> {
    records.iter().find_map(|record| match record.data {
        RRData::A(ip) if record.name == *host => Some(ip),
        _ => None,
    })
}
