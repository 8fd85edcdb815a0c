use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, trace};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::dns_parser::{Name, Packet, ResourceRecord};

/// The record sections of a response, as stored in the cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub answers: Vec<ResourceRecord>,
    pub nameservers: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Records {
    pub fn from_packet(packet: &Packet) -> Records {
        Records {
            answers: packet.answers.clone(),
            nameservers: packet.nameservers.clone(),
            additional: packet.additional.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(&self.nameservers)
            .chain(&self.additional)
    }

    /// Smallest TTL of any record in any section, 0 when there are none
    pub fn min_ttl(&self) -> u32 {
        self.iter().map(|record| record.ttl).min().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    domain: Name,
    requester: IpAddr,
}

#[derive(Debug)]
struct Entry {
    records: Records,
    expires_at: Instant,
}

/// Resolved record sets keyed by queried name and the address that asked
///
/// Entries are not checked for expiry on lookup; they stay visible until
/// the sweep removes them, at most one sweep interval after they expire.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl Cache {
    pub fn new() -> Cache {
        Cache::default()
    }

    pub fn get(&self, domain: &Name, requester: IpAddr) -> Option<Records> {
        let key = CacheKey {
            domain: domain.clone(),
            requester: requester,
        };
        self.read().get(&key).map(|entry| entry.records.clone())
    }

    pub fn set(&self, domain: Name, requester: IpAddr, records: Records) {
        let ttl = Duration::from_secs(records.min_ttl() as u64);
        let expires_at = Instant::now() + ttl;
        trace!(
            "caching {} for {} with ttl {}s",
            domain,
            requester,
            ttl.as_secs()
        );

        let key = CacheKey {
            domain: domain,
            requester: requester,
        };
        self.write().insert(
            key,
            Entry {
                records: records,
                expires_at: expires_at,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes every entry whose expiry lies before now
    ///
    /// Expired keys are collected under the read lock, then each one is
    /// removed under its own short write lock.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let expired = self
            .read()
            .iter()
            .filter(|(_, entry)| entry.expires_at < now)
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();

        let mut removed = 0;
        for key in expired {
            let mut entries = self.write();
            // might have been replaced since the scan
            if entries.get(&key).map_or(false, |entry| entry.expires_at < now) {
                entries.remove(&key);
                removed += 1;
            }
        }
        removed
    }

    /// Runs `evict_expired` every `interval` until `shutdown` is cancelled
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("cache sweep shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = cache.evict_expired();
                        if removed > 0 {
                            debug!("evicted {} expired cache entries", removed);
                        }
                    }
                }
            }
        })
    }

    fn read(&self) -> RwLockReadGuard<HashMap<CacheKey, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<HashMap<CacheKey, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
