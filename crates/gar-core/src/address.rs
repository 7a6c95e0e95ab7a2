// crates/gar-core/src/address.rs

//! The Address Assembler: one structured, human-readable record per chain.
//!
//! Field formatting follows the registry's long-standing conventions:
//! region/town/street/house render with a lowercased type (type "Улица" +
//! name "Вязовая" → `улица Вязовая`), while leftover and municipal units
//! keep the type's original case. The asymmetry is preserved as-is.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RegistryObject};
use crate::chain::Chain;
use crate::roles::RoleAssignment;
use crate::text::fold_key;
use crate::traits::StrBackend;

/// The final output record for one building.
///
/// All fields except `id` are textual; a role that did not resolve renders
/// as the empty string (region is the only field expected to always
/// resolve — town and street are optional by design).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub id: u64,
    pub region: String,
    pub town: String,
    pub street: String,
    pub house: String,
    pub extra_house: String,
    pub leftover: String,
    pub municipal: String,
}

impl StructuredAddress {
    /// Accent- and case-insensitive substring match over all textual
    /// fields, via [`fold_key`].
    pub fn any_field_contains(&self, query: &str) -> bool {
        let q = fold_key(query);
        if q.is_empty() {
            return false;
        }
        [
            &self.region,
            &self.town,
            &self.street,
            &self.house,
            &self.extra_house,
            &self.leftover,
            &self.municipal,
        ]
        .into_iter()
        .any(|f| fold_key(f).contains(&q))
    }
}

/// Assemble the structured address for one chain.
///
/// Returns `None` when the chain has no resolvable building — such a chain
/// has no document identity and nothing to report.
pub fn assemble<B: StrBackend>(
    chain: &Chain,
    roles: &RoleAssignment,
    catalog: &Catalog<B>,
) -> Option<StructuredAddress> {
    let building_id = chain.building()?;
    let building = catalog.get(building_id)?;

    let region = resolve(chain, Some(roles.region), catalog)
        .map(render_lower)
        .unwrap_or_default();
    let town = resolve(chain, roles.town, catalog)
        .map(render_lower)
        .unwrap_or_default();
    let street = resolve(chain, roles.street, catalog)
        .map(render_lower)
        .unwrap_or_default();

    // Building display names were precomposed at catalog build time.
    let house = B::str_to_string(&building.name);
    let extra_house = [&building.extra_name1, &building.extra_name2]
        .into_iter()
        .flatten()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    let leftover = render_units(chain, &roles.leftover, catalog);
    let municipal = render_units(chain, &roles.municipal, catalog);

    Some(StructuredAddress {
        id: building_id,
        region,
        town,
        street,
        house,
        extra_house,
        leftover,
        municipal,
    })
}

fn resolve<'a, B: StrBackend>(
    chain: &Chain,
    level: Option<u8>,
    catalog: &'a Catalog<B>,
) -> Option<&'a RegistryObject<B>> {
    catalog.get(chain.occupant(level?)?)
}

/// `lowercase(type) + " " + name` — the compact display form used for
/// region, town and street.
fn render_lower<B: StrBackend>(obj: &RegistryObject<B>) -> String {
    format!(
        "{} {}",
        obj.type_long.as_ref().to_lowercase(),
        obj.name.as_ref()
    )
}

/// `type + " " + name` with the type's original case, used for leftover and
/// municipal units.
fn render_raw<B: StrBackend>(obj: &RegistryObject<B>) -> String {
    format!("{} {}", obj.type_long.as_ref(), obj.name.as_ref())
}

/// Resolve and render every occupied level of a role set, ascending,
/// space-joined. Unresolvable occupants are silently skipped.
fn render_units<B: StrBackend>(chain: &Chain, levels: &[u8], catalog: &Catalog<B>) -> String {
    levels
        .iter()
        .filter_map(|&l| resolve(chain, Some(l), catalog))
        .map(render_raw)
        .collect::<Vec<_>>()
        .join(" ")
}
