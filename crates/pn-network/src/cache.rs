//! Result reuse for structurally identical propulsors.
//!
//! A cache lives for exactly one control point of one evaluation pass. The
//! canonical member of each identical group publishes its result; peers read
//! it back and only recompute their moment.

use crate::error::{NetworkError, NetworkResult};
use pn_assembly::PerformanceCore;
use pn_core::DistributorId;
use pn_flow::Freestream;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub distributor: DistributorId,
    pub fingerprint: String,
    pub control_point: usize,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Tag of the canonical assembly that produced the result.
    pub canonical: String,
    pub freestream: Freestream,
    pub core: Arc<PerformanceCore>,
}

/// Who is asking for a cached result.
#[derive(Debug, Clone, Copy)]
pub struct CacheReader<'a> {
    pub tag: &'a str,
    pub identical: bool,
    pub freestream: &'a Freestream,
}

#[derive(Debug)]
pub struct ResultCache {
    control_point: usize,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResultCache {
    pub fn new(control_point: usize) -> Self {
        Self {
            control_point,
            entries: HashMap::new(),
        }
    }

    pub fn control_point(&self) -> usize {
        self.control_point
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish a canonical result. Each key is written once.
    pub fn publish(&mut self, key: CacheKey, entry: CacheEntry) -> NetworkResult<()> {
        if key.control_point != self.control_point {
            return Err(NetworkError::CacheConsistency {
                assembly: entry.canonical,
                reason: "published for a different control point",
            });
        }
        if self.entries.contains_key(&key) {
            return Err(NetworkError::CacheConsistency {
                assembly: entry.canonical,
                reason: "canonical result already published",
            });
        }
        trace!(
            canonical = %entry.canonical,
            control_point = key.control_point,
            "result published"
        );
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Read a canonical result on behalf of a peer.
    pub fn read(
        &self,
        key: &CacheKey,
        reader: CacheReader<'_>,
    ) -> NetworkResult<Arc<PerformanceCore>> {
        let fail = |reason| NetworkError::CacheConsistency {
            assembly: reader.tag.to_string(),
            reason,
        };
        if !reader.identical {
            return Err(fail("reader is not flagged identical"));
        }
        if key.control_point != self.control_point {
            return Err(fail("read for a different control point"));
        }
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| fail("no canonical result published"))?;
        if !entry.freestream.same_conditions(reader.freestream) {
            return Err(fail("freestream differs from the canonical evaluation"));
        }
        trace!(reader = %reader.tag, canonical = %entry.canonical, "cache hit");
        Ok(Arc::clone(&entry.core))
    }
}
