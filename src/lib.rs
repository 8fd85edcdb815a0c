//! Recursive DNS resolver and caching nameserver.
//!
//! Queries received over UDP are answered from a per-client cache or by
//! walking the delegation tree from a root server down to an authoritative
//! answer.

pub mod cache;
pub mod config;
pub mod dns_parser;
mod error;
pub mod resolver;
pub mod roots;
mod server;

pub use crate::cache::{Cache, Records};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::resolver::{Resolver, Transport, UdpTransport};
pub use crate::server::Server;
