use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use crate::cache::{Cache, Records};
use crate::config::Config;
use crate::dns_parser::{
    Additional, Answers, Builder, Nameservers, Packet, Questions, ResponseCode,
};
use crate::error::Error;
use crate::resolver::{Resolver, Transport, UdpTransport, RECV_BUFFER_SIZE};

/// Caching recursive nameserver answering queries over UDP
pub struct Server<T> {
    shared: Arc<Shared<T>>,
    sweep_interval: Duration,
}

struct Shared<T> {
    socket: UdpSocket,
    cache: Arc<Cache>,
    resolver: Resolver<T>,
}

impl Server<UdpTransport> {
    // Will panic if called from outside the context of a runtime
    pub fn bind(config: &Config) -> io::Result<Server<UdpTransport>> {
        Server::bind_with(config, Resolver::from_config(config))
    }
}

impl<T: Transport + 'static> Server<T> {
    // Will panic if called from outside the context of a runtime
    pub fn bind_with(config: &Config, resolver: Resolver<T>) -> io::Result<Server<T>> {
        let socket = UdpSocket::from_std(bind(config.listen)?)?;
        Ok(Server {
            shared: Arc::new(Shared {
                socket: socket,
                cache: Arc::new(Cache::new()),
                resolver: resolver,
            }),
            sweep_interval: config.sweep_interval,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.shared.socket.local_addr()
    }

    pub fn cache(&self) -> &Arc<Cache> {
        &self.shared.cache
    }

    /// Serves queries until `shutdown` is cancelled
    ///
    /// Every datagram is handled on its own task; a query that cannot be
    /// parsed or resolved is dropped without a reply.
    pub async fn run(self, shutdown: CancellationToken) -> io::Result<()> {
        let sweeper = self
            .shared
            .cache
            .spawn_sweeper(self.sweep_interval, shutdown.child_token());
        info!("listening on {}", self.local_addr()?);

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = self.shared.socket.recv_from(&mut buf) => received,
            };
            let (len, addr) = match received {
                Ok(received) => received,
                Err(err) => {
                    error!("failed to receive packet: {}", err);
                    continue;
                }
            };

            trace!("received packet from {:?}", addr);
            let shared = Arc::clone(&self.shared);
            let datagram = buf[..len].to_vec();
            tokio::spawn(async move { shared.handle_datagram(&datagram, addr).await });
        }

        info!("shutting down");
        if let Err(err) = sweeper.await {
            warn!("cache sweep ended abnormally: {}", err);
        }
        Ok(())
    }
}

impl<T: Transport> Shared<T> {
    async fn handle_datagram(&self, datagram: &[u8], addr: SocketAddr) {
        let response = match self.answer(datagram, addr.ip()).await {
            Ok(Some(response)) => response,
            Ok(None) => return,
            Err(err) => {
                warn!("dropping query from {:?}: {}", addr, err);
                return;
            }
        };
        debug!("answering {:?}:\n{}", addr, response);

        let bytes = match response.to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("couldn't encode response for {:?}: {}", addr, err);
                return;
            }
        };

        match self.socket.send_to(&bytes, addr).await {
            Ok(sent) if sent == bytes.len() => (),
            Ok(_) => warn!("failed to send entire packet"),
            Err(err) => warn!("error sending packet {:?}", err),
        }
    }

    /// Produces the reply to one datagram, `None` if it deserves none
    async fn answer(&self, datagram: &[u8], requester: IpAddr) -> Result<Option<Packet>, Error> {
        let query = Packet::parse(datagram)?;
        if !query.header.query {
            trace!("received packet from {:?} with no query", requester);
            return Ok(None);
        }
        debug!("query from {:?}:\n{}", requester, query);

        let question = query.questions.first().ok_or(Error::NoQuestion)?;
        if let Some(records) = self.cache.get(&question.qname, requester) {
            trace!("cache hit for {} from {:?}", question.qname, requester);
            return Ok(Some(cached_response(&query, records)));
        }

        let mut response = self.resolver.lookup(&query).await?;
        if response.header.response_code == ResponseCode::NoError {
            self.cache.set(
                question.qname.clone(),
                requester,
                Records::from_packet(&response),
            );
        }

        response.header.id = query.header.id;
        response.header.recursion_available = true;
        Ok(Some(response))
    }
}

fn cached_response(query: &Packet, records: Records) -> Packet {
    let mut builder: Builder<Questions> =
        Builder::new_response(query.header.id, query.header.recursion_desired, false);
    for question in &query.questions {
        builder = builder.add_question(&question.qname, question.qtype, question.qclass);
    }

    let mut builder: Builder<Answers> = builder.move_to();
    for record in records.answers {
        builder = builder.add_answer(record);
    }
    let mut builder: Builder<Nameservers> = builder.move_to();
    for record in records.nameservers {
        builder = builder.add_nameserver(record);
    }
    let mut builder: Builder<Additional> = builder.move_to();
    for record in records.additional {
        builder = builder.add_additional(record);
    }
    builder.build()
}

fn bind(addr: SocketAddr) -> io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    Ok(socket.into())
}
