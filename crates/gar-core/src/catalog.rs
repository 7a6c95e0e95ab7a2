// crates/gar-core/src/catalog.rs

//! The Object Catalog: every address-bearing object of one region, indexed
//! by object id.
//!
//! Built once per region from the joined reference tables, immutable
//! afterwards, discarded at the end of the run. Administrative units keep
//! their raw registry name; buildings get a precomposed display name
//! (`lowercase(type) + " " + number`) plus up to two secondary display
//! names for auxiliary structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::raw::RegionTables;
use crate::traits::StrBackend;

/// Level reserved for buildings (leaf nodes). Levels 1–9 are administrative
/// units of increasing specificity.
pub const HOUSE_LEVEL: u8 = 10;

/// Synthetic level name assigned to buildings; the level dictionary only
/// covers administrative levels.
pub(crate) const HOUSE_LEVEL_NAME: &str = "Здание/Сооружение";

/// One administrative unit or building, post-join.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryObject<B: StrBackend> {
    pub id: u64,
    pub guid: B::Str,
    /// 1–9 administrative, 10 building.
    pub level: u8,
    /// Raw registry name for administrative units; precomposed display name
    /// for buildings.
    pub name: B::Str,
    pub type_short: B::Str,
    pub type_long: B::Str,
    pub level_name: B::Str,
    /// Display names of the secondary structures, present iff the secondary
    /// number is present in the registry.
    pub extra_name1: Option<B::Str>,
    pub extra_name2: Option<B::Str>,
}

impl<B: StrBackend> RegistryObject<B> {
    pub fn is_building(&self) -> bool {
        self.level == HOUSE_LEVEL
    }
}

/// Simple aggregate statistics for a built catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CatalogStats {
    pub objects: usize,
    pub admin_units: usize,
    pub buildings: usize,
}

/// Immutable, region-scoped id → object index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog<B: StrBackend> {
    map: HashMap<u64, RegistryObject<B>>,
}

impl<B: StrBackend> Catalog<B> {
    /// Build the catalog from a region's raw tables.
    ///
    /// Join semantics follow the registry export:
    /// - address objects ⋈ type dictionary on `(level, type_short)`,
    ///   ⋈ level dictionary on `level` — both inner, so objects without a
    ///   resolvable type or level are dropped;
    /// - houses ⋈ house-type dictionary on the type id (inner), left-⋈ the
    ///   add-house-type dictionary per secondary descriptor;
    /// - only active + current objects survive; a houses table without the
    ///   currency attribute is filtered on activity alone (registry-format
    ///   difference, not a defect).
    pub fn build(tables: &RegionTables) -> Self {
        // (level, short name) -> long name; first record wins on duplicates.
        let mut type_map: HashMap<(u8, &str), &str> = HashMap::new();
        for t in &tables.addr_types {
            type_map
                .entry((t.level, t.short_name.as_str()))
                .or_insert(t.long_name.as_str());
        }

        let mut level_map: HashMap<u8, &str> = HashMap::new();
        for l in &tables.levels {
            level_map.entry(l.level).or_insert(l.name.as_str());
        }

        let mut house_type_map: HashMap<u32, (&str, &str)> = HashMap::new();
        for t in &tables.house_types {
            house_type_map
                .entry(t.id)
                .or_insert((t.short_name.as_str(), t.long_name.as_str()));
        }
        let mut add_type_map: HashMap<u32, &str> = HashMap::new();
        for t in &tables.add_house_types {
            add_type_map.entry(t.id).or_insert(t.long_name.as_str());
        }

        let mut map: HashMap<u64, RegistryObject<B>> = HashMap::new();
        let mut admin_units = 0usize;

        for o in &tables.addr_objects {
            if !(o.is_active && o.is_actual) {
                continue;
            }
            let Some(type_long) = type_map.get(&(o.level, o.type_short.as_str())) else {
                continue;
            };
            let Some(level_name) = level_map.get(&o.level) else {
                continue;
            };
            map.insert(
                o.id,
                RegistryObject {
                    id: o.id,
                    guid: B::str_from(&o.guid),
                    level: o.level,
                    name: B::str_from(&o.name),
                    type_short: B::str_from(&o.type_short),
                    type_long: B::str_from(type_long),
                    level_name: B::str_from(level_name),
                    extra_name1: None,
                    extra_name2: None,
                },
            );
            admin_units += 1;
        }

        let mut buildings = 0usize;
        for h in &tables.houses {
            if !h.is_active || !h.is_actual.unwrap_or(true) {
                continue;
            }
            let Some((type_short, type_long)) =
                h.house_type.and_then(|t| house_type_map.get(&t).copied())
            else {
                continue;
            };
            let Some(num) = h.house_num.as_deref() else {
                debug!(id = h.id, "house record without a number, skipped");
                continue;
            };

            let extra_name1 = h
                .add_num1
                .as_deref()
                .map(|n| display_name(h.add_type1.and_then(|t| add_type_map.get(&t).copied()), n));
            let extra_name2 = h
                .add_num2
                .as_deref()
                .map(|n| display_name(h.add_type2.and_then(|t| add_type_map.get(&t).copied()), n));

            map.insert(
                h.id,
                RegistryObject {
                    id: h.id,
                    guid: B::str_from(&h.guid),
                    level: HOUSE_LEVEL,
                    name: B::str_from(&display_name(Some(type_long), num)),
                    type_short: B::str_from(type_short),
                    type_long: B::str_from(type_long),
                    level_name: B::str_from(HOUSE_LEVEL_NAME),
                    extra_name1: extra_name1.as_deref().map(B::str_from),
                    extra_name2: extra_name2.as_deref().map(B::str_from),
                },
            );
            buildings += 1;
        }

        info!(admin_units, buildings, "catalog built");
        Catalog { map }
    }

    pub fn get(&self, id: u64) -> Option<&RegistryObject<B>> {
        self.map.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.map.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let buildings = self.map.values().filter(|o| o.is_building()).count();
        CatalogStats {
            objects: self.map.len(),
            admin_units: self.map.len() - buildings,
            buildings,
        }
    }
}

/// `lowercase(type) + " " + number`, or just the number when the type is
/// absent (secondary structures may lack one).
fn display_name(type_long: Option<&str>, num: &str) -> String {
    match type_long {
        Some(t) => format!("{} {}", t.to_lowercase(), num),
        None => num.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Hand-built catalogs for the chain/assembly/resolver unit tests.
    use super::*;
    use crate::traits::DefaultBackend;

    pub(crate) fn unit(id: u64, level: u8, type_long: &str, name: &str) -> RegistryObject<DefaultBackend> {
        RegistryObject {
            id,
            guid: format!("g-{id}"),
            level,
            name: name.to_string(),
            type_short: type_long.to_lowercase(),
            type_long: type_long.to_string(),
            level_name: format!("level {level}"),
            extra_name1: None,
            extra_name2: None,
        }
    }

    pub(crate) fn building(id: u64, display: &str) -> RegistryObject<DefaultBackend> {
        RegistryObject {
            id,
            guid: format!("g-{id}"),
            level: HOUSE_LEVEL,
            name: display.to_string(),
            type_short: "зд.".to_string(),
            type_long: "Здание".to_string(),
            level_name: HOUSE_LEVEL_NAME.to_string(),
            extra_name1: None,
            extra_name2: None,
        }
    }

    pub(crate) fn catalog(objects: Vec<RegistryObject<DefaultBackend>>) -> Catalog<DefaultBackend> {
        Catalog {
            map: objects.into_iter().map(|o| (o.id, o)).collect(),
        }
    }
}
