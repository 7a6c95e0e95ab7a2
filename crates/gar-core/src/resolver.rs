// crates/gar-core/src/resolver.rs

//! The resolver pipeline: catalog + hierarchy links → structured addresses.
//!
//! Build order is catalog → chains → role classification → assembly. The
//! catalog and the role cache are written once and then only read, so the
//! per-chain assembly fans out across worker threads without locking.
//! Chains are processed in their deterministic extraction order and
//! `par_iter` preserves collection order, which makes output bit-identical
//! across runs and worker counts.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use crate::address::{assemble, StructuredAddress};
use crate::catalog::Catalog;
use crate::chain::extract_chains;
use crate::raw::HierarchyRaw;
use crate::roles::RoleCache;
use crate::traits::StrBackend;

/// Resolve every building of a region into a [`StructuredAddress`].
///
/// `today` decides hierarchy-link validity (`end_date > today`); pass a
/// fixed date to make runs reproducible.
pub fn resolve_addresses<B: StrBackend>(
    catalog: &Catalog<B>,
    links: &[HierarchyRaw],
    today: NaiveDate,
) -> Vec<StructuredAddress> {
    let chains = extract_chains(links, catalog, today);

    let mut cache = RoleCache::new();
    for chain in &chains {
        cache.warm(chain.pattern());
    }
    info!(
        chains = chains.len(),
        patterns = cache.len(),
        "level patterns classified"
    );

    let addresses: Vec<StructuredAddress> = chains
        .par_iter()
        .filter_map(|chain| {
            let roles = cache.get(chain.pattern())?;
            assemble(chain, roles, catalog)
        })
        .collect();

    info!(addresses = addresses.len(), "addresses assembled");
    addresses
}
