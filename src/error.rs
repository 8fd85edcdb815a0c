use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::dns_parser::{self, Name};

/// Failure to answer a single query
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed packet: {0}")]
    Parse(#[from] dns_parser::Error),
    #[error("unable to resolve {0}")]
    UnableToResolve(Name),
    #[error("resolution depth of {0} nested lookups exceeded")]
    DepthExceeded(usize),
    #[error("more than {0} referrals followed")]
    ReferralLimit(usize),
    #[error("no response from {0}")]
    UpstreamTimeout(SocketAddr),
    #[error("unread bytes (server read {sent} out of {len})")]
    PartialWrite { sent: usize, len: usize },
    #[error("query has no question")]
    NoQuestion,
}
