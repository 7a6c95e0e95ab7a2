// crates/gar-core/src/loader/mod.rs

//! # Region loader
//!
//! Handles the physical layer: locating a region's export tables on disk,
//! decompression, XML parsing, and the binary catalog cache.
//!
//! Table location is deliberately strict: every reference category must
//! resolve to exactly one file, otherwise the region's run aborts with
//! [`GarError::SourceData`] before any output is produced — mis-joining
//! reference data would corrupt every derived address.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{GarError, Result};
use crate::raw::{
    AddrObjectRaw, AddrTypeRaw, HierarchyRaw, HouseRaw, HouseTypeRaw, LevelRaw, RegionTables,
};
use crate::traits::DefaultBackend;

mod cache;
pub mod xml;

pub use cache::CACHE_SUFFIX;

/// Where GAR region exports are published.
pub const DATA_SOURCE_URL: &str = "https://fias.nalog.ru/Updates";

/// Default data directory layout: shared dictionaries at the top level,
/// region tables under `<data_dir>/<region>/`.
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

// Reference table categories (file name prefixes of the export).
const CAT_ADDR_OBJ: &str = "AS_ADDR_OBJ";
const CAT_ADDR_OBJ_TYPES: &str = "AS_ADDR_OBJ_TYPES";
const CAT_OBJECT_LEVELS: &str = "AS_OBJECT_LEVELS";
const CAT_HOUSES: &str = "AS_HOUSES";
const CAT_HOUSE_TYPES: &str = "AS_HOUSE_TYPES";
const CAT_ADDHOUSE_TYPES: &str = "AS_ADDHOUSE_TYPES";
const CAT_HIERARCHY: &str = "AS_MUN_HIERARCHY";

/// Resolved file locations of the six catalog tables.
pub(crate) struct TablePaths {
    addr_objects: PathBuf,
    addr_types: PathBuf,
    levels: PathBuf,
    houses: PathBuf,
    house_types: PathBuf,
    add_house_types: PathBuf,
}

impl TablePaths {
    fn all(&self) -> [&Path; 6] {
        [
            &self.addr_objects,
            &self.addr_types,
            &self.levels,
            &self.houses,
            &self.house_types,
            &self.add_house_types,
        ]
    }
}

/// Locate the single file of `category` inside `dir`.
///
/// A candidate matches when its name starts with `<category>_` and carries
/// an `.XML` (or `.XML.gz`, with the `compact` feature) extension; names
/// containing any of `exclude` are filtered out first (the export ships
/// `PARAMS`/`DIVISION` side tables under the same prefixes). Zero or more
/// than one candidate is fatal.
pub fn locate_table(
    dir: &Path,
    region: &str,
    category: &'static str,
    exclude: &[&str],
) -> Result<PathBuf> {
    let prefix = format!("{category}_");
    let mut candidates: Vec<PathBuf> = Vec::new();

    let entries = fs::read_dir(dir).map_err(|e| {
        GarError::NotFound(format!("cannot read {}: {}", dir.display(), e))
    })?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(&prefix) || !is_table_file(&name) {
            continue;
        }
        if exclude.iter().any(|x| name.contains(x)) {
            continue;
        }
        candidates.push(entry.path());
    }

    if candidates.len() != 1 {
        return Err(GarError::SourceData {
            region: region.to_string(),
            category,
            found: candidates.len(),
        });
    }
    Ok(candidates.remove(0))
}

fn is_table_file(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    #[cfg(feature = "compact")]
    if upper.ends_with(".XML.GZ") {
        return true;
    }
    upper.ends_with(".XML")
}

/// Opens a table file, buffers it, and transparently decompresses `.gz`.
/// Returns a generic reader so the caller doesn't care about compression.
pub(crate) fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GarError::NotFound(format!("table not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        use flate2::read::GzDecoder;
        if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

pub(crate) fn locate_tables(data_dir: &Path, region: &str) -> Result<TablePaths> {
    let region_dir = data_dir.join(region);
    Ok(TablePaths {
        addr_objects: locate_table(&region_dir, region, CAT_ADDR_OBJ, &["PARAMS", "DIVISION"])?,
        addr_types: locate_table(data_dir, region, CAT_ADDR_OBJ_TYPES, &[])?,
        levels: locate_table(data_dir, region, CAT_OBJECT_LEVELS, &[])?,
        houses: locate_table(&region_dir, region, CAT_HOUSES, &["PARAMS"])?,
        house_types: locate_table(data_dir, region, CAT_HOUSE_TYPES, &[])?,
        add_house_types: locate_table(data_dir, region, CAT_ADDHOUSE_TYPES, &[])?,
    })
}

/// Locate and parse the six catalog tables of one region.
pub fn load_region_tables(data_dir: &Path, region: &str) -> Result<RegionTables> {
    let paths = locate_tables(data_dir, region)?;
    load_tables(&paths)
}

fn load_tables(paths: &TablePaths) -> Result<RegionTables> {
    Ok(RegionTables {
        addr_objects: xml::parse_table::<AddrObjectRaw>(&paths.addr_objects)?,
        addr_types: xml::parse_table::<AddrTypeRaw>(&paths.addr_types)?,
        levels: xml::parse_table::<LevelRaw>(&paths.levels)?,
        houses: xml::parse_table::<HouseRaw>(&paths.houses)?,
        house_types: xml::parse_table::<HouseTypeRaw>(&paths.house_types)?,
        add_house_types: xml::parse_table::<HouseTypeRaw>(&paths.add_house_types)?,
    })
}

/// Locate and parse the region's hierarchy links.
pub fn load_hierarchy(data_dir: &Path, region: &str) -> Result<Vec<HierarchyRaw>> {
    let region_dir = data_dir.join(region);
    let path = locate_table(&region_dir, region, CAT_HIERARCHY, &[])?;
    xml::parse_table::<HierarchyRaw>(&path)
}

/// **Smart load:** reuse the binary catalog cache when it is newer than
/// every source table, otherwise parse + build + cache.
///
/// Cache writes are best-effort; a read-only data directory only costs the
/// speedup.
pub fn load_or_build_catalog(data_dir: &Path, region: &str) -> Result<Catalog<DefaultBackend>> {
    let paths = locate_tables(data_dir, region)?;
    let cache_path = cache::cache_path(data_dir, region);

    if cache::is_cache_fresh(&cache_path, &paths.all()) {
        if let Ok(catalog) = cache::read_cache(&cache_path) {
            debug!(region, "catalog loaded from cache");
            return Ok(catalog);
        }
    }

    let tables = load_tables(&paths)?;
    let catalog = Catalog::build(&tables);
    cache::write_cache(&cache_path, &catalog).ok();
    Ok(catalog)
}
