use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use recursor::dns_parser::{
    Builder, Class, Name, Packet, QueryClass, QueryType, RRData, ResourceRecord, ResponseCode,
};
use recursor::{Cache, Config, Error, Resolver, Server, Transport};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

const ROOT: Ipv4Addr = Ipv4Addr::new(198, 41, 0, 4);
const ADDRESS: Ipv4Addr = Ipv4Addr::new(93, 184, 215, 14);

/// Authoritative for everything: answers each A query with ADDRESS,
/// except names under `missing.` which do not exist
#[derive(Clone, Default)]
struct Authoritative {
    exchanges: Arc<AtomicUsize>,
}

impl Transport for Authoritative {
    fn exchange<'a>(
        &'a self,
        query: &'a Packet,
        server: SocketAddr,
    ) -> BoxFuture<'a, Result<Packet, Error>> {
        assert_eq!(server, SocketAddr::new(ROOT.into(), 53));
        self.exchanges.fetch_add(1, Ordering::SeqCst);

        let question = &query.questions[0];
        let mut builder = Builder::new_response(query.header.id, false, true).add_question(
            &question.qname,
            question.qtype,
            question.qclass,
        );
        let response = if question.qname.as_str().ends_with("missing.") {
            builder.set_response_code(ResponseCode::NameError);
            builder.build()
        } else {
            builder
                .add_answer(ResourceRecord {
                    name: question.qname.clone(),
                    cls: Class::IN,
                    ttl: 300,
                    data: RRData::A(ADDRESS),
                })
                .build()
        };
        async move { Ok(response) }.boxed()
    }
}

async fn start() -> (SocketAddr, Authoritative, Arc<Cache>, CancellationToken) {
    let config = Config {
        listen: "127.0.0.1:0".parse().unwrap(),
        root_servers: vec![ROOT],
        ..Config::default()
    };
    let transport = Authoritative::default();
    let resolver = Resolver::new(transport.clone(), config.root_servers.clone(), 4);
    let server = Server::bind_with(&config, resolver).unwrap();
    let addr = server.local_addr().unwrap();
    let cache = Arc::clone(server.cache());

    let shutdown = CancellationToken::new();
    tokio::spawn(server.run(shutdown.clone()));
    (addr, transport, cache, shutdown)
}

async fn ask(client: &UdpSocket, server: SocketAddr, id: u16, name: &str) -> Packet {
    let query = Builder::new_query(id, true)
        .add_question(&Name::new(name), QueryType::A, QueryClass::IN)
        .build();
    client
        .send_to(&query.to_bytes().unwrap(), server)
        .await
        .unwrap();

    let mut buf = [0u8; 512];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
        .await
        .expect("no reply")
        .unwrap();
    Packet::parse(&buf[..len]).unwrap()
}

#[tokio::test]
async fn resolves_then_serves_from_cache() {
    let (server, transport, cache, shutdown) = start().await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let first = ask(&client, server, 0x1111, "www.example.com.").await;
    assert_eq!(first.header.id, 0x1111);
    assert!(!first.header.query);
    assert!(first.header.recursion_available);
    assert_eq!(first.answers.len(), 1);
    assert_eq!(first.answers[0].data, RRData::A(ADDRESS));
    assert_eq!(transport.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);

    let second = ask(&client, server, 0x2222, "www.example.com.").await;
    assert_eq!(second.header.id, 0x2222);
    assert_eq!(second.answers, first.answers);
    assert_eq!(second.questions, first.questions);
    assert_eq!(transport.exchanges.load(Ordering::SeqCst), 1);

    shutdown.cancel();
}

#[tokio::test]
async fn negative_answers_are_relayed_not_cached() {
    let (server, transport, cache, shutdown) = start().await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    for id in 1..=2 {
        let response = ask(&client, server, id, "nothing.missing.").await;
        assert_eq!(response.header.id, id);
        assert_eq!(response.header.response_code, ResponseCode::NameError);
    }
    assert_eq!(transport.exchanges.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());

    shutdown.cancel();
}

#[tokio::test]
async fn survives_malformed_datagrams() {
    let (server, _transport, _cache, shutdown) = start().await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    client.send_to(b"\x00\x01\x02", server).await.unwrap();
    client
        .send_to(b"\x12\x34\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\x07exam", server)
        .await
        .unwrap();

    let response = ask(&client, server, 0x3333, "www.example.com.").await;
    assert_eq!(response.header.id, 0x3333);
    assert_eq!(response.answers.len(), 1);

    shutdown.cancel();
}
