// crates/gar-core/src/chain.rs

//! The Chain Extractor: hierarchy links → deduplicated leaf-to-root chains.
//!
//! Each building-level link carries a precomputed root-first ancestor path.
//! We keep only links that are active, not yet expired and whose object
//! resolves in the catalog, reverse the stored path into processing order
//! (building first) and deduplicate identical id sequences — many links
//! yield byte-identical chains and each must be processed once.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::{Catalog, HOUSE_LEVEL};
use crate::raw::HierarchyRaw;
use crate::roles::LevelPattern;
use crate::traits::StrBackend;

/// One building's ancestor chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    /// Raw id sequence, leaf to root, exactly as stored in the link path
    /// (placeholder zeros included — they are part of chain identity).
    pub ids: Vec<u64>,
    /// level → occupying object id, restricted to ids that resolve in the
    /// catalog. Built by zipping only resolving ids, so the map is always
    /// self-consistent; a dropped ancestor shows up as an absent level.
    pub by_level: BTreeMap<u8, u64>,
}

impl Chain {
    fn new<B: StrBackend>(ids: Vec<u64>, catalog: &Catalog<B>) -> Self {
        let mut by_level = BTreeMap::new();
        for &id in &ids {
            if id == 0 {
                continue;
            }
            if let Some(obj) = catalog.get(id) {
                // At most one object per level; on registry violations the
                // rootward occupant wins.
                by_level.insert(obj.level, id);
            }
        }
        Chain { ids, by_level }
    }

    /// The id occupying `level` in this chain, if any.
    pub fn occupant(&self, level: u8) -> Option<u64> {
        self.by_level.get(&level).copied()
    }

    /// The building (level 10) id, if it resolved.
    pub fn building(&self) -> Option<u64> {
        self.occupant(HOUSE_LEVEL)
    }

    /// Levels 1–9 populated in this chain.
    pub fn pattern(&self) -> LevelPattern {
        LevelPattern::from_levels(self.by_level.keys().copied())
    }
}

/// Extract the distinct building chains from a region's hierarchy links.
///
/// Links survive when `is_active` and `end_date > today`, and when their
/// object id resolves to a catalog object; only building-level links spawn
/// chains. The result is ordered by id sequence, so downstream output is
/// deterministic regardless of link order in the export.
pub fn extract_chains<B: StrBackend>(
    links: &[HierarchyRaw],
    catalog: &Catalog<B>,
    today: NaiveDate,
) -> Vec<Chain> {
    let mut seqs: BTreeSet<Vec<u64>> = BTreeSet::new();
    let mut valid_links = 0usize;

    for link in links {
        if !link.is_active || link.end_date <= today {
            continue;
        }
        let Some(obj) = catalog.get(link.object_id) else {
            continue;
        };
        valid_links += 1;
        if obj.level != HOUSE_LEVEL {
            continue;
        }
        let mut ids: Vec<u64> = link
            .path
            .split('.')
            .filter_map(|part| part.parse().ok())
            .collect();
        ids.reverse();
        seqs.insert(ids);
    }

    debug!(
        links = links.len(),
        valid_links,
        chains = seqs.len(),
        "chains extracted"
    );

    seqs.into_iter().map(|ids| Chain::new(ids, catalog)).collect()
}
