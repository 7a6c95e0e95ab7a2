// crates/gar-core/src/raw.rs

//! Raw registry records, straight off the XML exports.
//!
//! GAR tables are flat: one root element whose children each carry a single
//! record as attributes. Everything here stays as close to the wire format
//! as typed Rust allows; the domain model is built from these in
//! [`crate::catalog`].

use chrono::NaiveDate;
use roxmltree::Node;

use crate::error::{GarError, Result};

/// One record of the `AS_ADDR_OBJ` table: an administrative unit
/// (region, district, settlement, street, ...).
#[derive(Debug, Clone)]
pub struct AddrObjectRaw {
    pub id: u64,
    pub guid: String,
    pub name: String,
    pub type_short: String,
    pub level: u8,
    pub is_active: bool,
    pub is_actual: bool,
}

/// One record of the `AS_ADDR_OBJ_TYPES` dictionary, joined on
/// `(level, type_short)`.
#[derive(Debug, Clone)]
pub struct AddrTypeRaw {
    pub short_name: String,
    pub long_name: String,
    pub level: u8,
}

/// One record of the `AS_OBJECT_LEVELS` dictionary.
#[derive(Debug, Clone)]
pub struct LevelRaw {
    pub level: u8,
    pub name: String,
}

/// One record of the `AS_HOUSES` table: a building, possibly with up to two
/// secondary structures (e.g. an attached garage sharing the record).
///
/// `is_actual` is `None` when the region's houses table predates the
/// currency attribute; such records are filtered on activity alone.
#[derive(Debug, Clone)]
pub struct HouseRaw {
    pub id: u64,
    pub guid: String,
    pub house_num: Option<String>,
    pub house_type: Option<u32>,
    pub add_num1: Option<String>,
    pub add_type1: Option<u32>,
    pub add_num2: Option<String>,
    pub add_type2: Option<u32>,
    pub is_active: bool,
    pub is_actual: Option<bool>,
}

/// One record of the `AS_HOUSE_TYPES` / `AS_ADDHOUSE_TYPES` dictionaries.
#[derive(Debug, Clone)]
pub struct HouseTypeRaw {
    pub id: u32,
    pub short_name: String,
    pub long_name: String,
}

/// One record of the `AS_MUN_HIERARCHY` table: a parent→child link with the
/// precomputed root-first ancestor path (`.`-separated object ids).
#[derive(Debug, Clone)]
pub struct HierarchyRaw {
    pub object_id: u64,
    pub parent_id: Option<u64>,
    pub path: String,
    pub is_active: bool,
    pub end_date: NaiveDate,
}

/// The six reference tables a region catalog is built from.
#[derive(Debug)]
pub struct RegionTables {
    pub addr_objects: Vec<AddrObjectRaw>,
    pub addr_types: Vec<AddrTypeRaw>,
    pub levels: Vec<LevelRaw>,
    pub houses: Vec<HouseRaw>,
    pub house_types: Vec<HouseTypeRaw>,
    pub add_house_types: Vec<HouseTypeRaw>,
}

/// Conversion from one XML record element (attributes only) into a typed
/// raw record.
pub trait FromXmlRecord: Sized {
    fn from_record(node: Node<'_, '_>) -> Result<Self>;
}

impl FromXmlRecord for AddrObjectRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(AddrObjectRaw {
            id: req_u64(node, "OBJECTID")?,
            guid: req(node, "OBJECTGUID")?.to_string(),
            name: req(node, "NAME")?.to_string(),
            type_short: req(node, "TYPENAME")?.to_string(),
            level: req_u8(node, "LEVEL")?,
            is_active: flag(node, "ISACTIVE"),
            is_actual: flag(node, "ISACTUAL"),
        })
    }
}

impl FromXmlRecord for AddrTypeRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(AddrTypeRaw {
            short_name: req(node, "SHORTNAME")?.to_string(),
            long_name: req(node, "DESC")?.to_string(),
            level: req_u8(node, "LEVEL")?,
        })
    }
}

impl FromXmlRecord for LevelRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(LevelRaw {
            level: req_u8(node, "LEVEL")?,
            name: req(node, "NAME")?.to_string(),
        })
    }
}

impl FromXmlRecord for HouseRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(HouseRaw {
            id: req_u64(node, "OBJECTID")?,
            guid: req(node, "OBJECTGUID")?.to_string(),
            house_num: opt(node, "HOUSENUM").map(str::to_string),
            house_type: opt_u32(node, "HOUSETYPE")?,
            add_num1: opt(node, "ADDNUM1").map(str::to_string),
            add_type1: opt_u32(node, "ADDTYPE1")?,
            add_num2: opt(node, "ADDNUM2").map(str::to_string),
            add_type2: opt_u32(node, "ADDTYPE2")?,
            is_active: flag(node, "ISACTIVE"),
            is_actual: opt_flag(node, "ISACTUAL"),
        })
    }
}

impl FromXmlRecord for HouseTypeRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(HouseTypeRaw {
            id: req_u32(node, "ID")?,
            short_name: req(node, "SHORTNAME")?.to_string(),
            long_name: req(node, "DESC")?.to_string(),
        })
    }
}

impl FromXmlRecord for HierarchyRaw {
    fn from_record(node: Node<'_, '_>) -> Result<Self> {
        Ok(HierarchyRaw {
            object_id: req_u64(node, "OBJECTID")?,
            parent_id: opt_u64(node, "PARENTOBJID")?,
            path: req(node, "PATH")?.to_string(),
            is_active: flag(node, "ISACTIVE"),
            end_date: req_date(node, "ENDDATE")?,
        })
    }
}

// -----------------------------------------------------------------------------
// Attribute helpers
// -----------------------------------------------------------------------------

fn req<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| GarError::MissingAttribute {
            attribute,
            element: node.tag_name().name().to_string(),
        })
}

fn opt<'a>(node: Node<'a, '_>, attribute: &'static str) -> Option<&'a str> {
    node.attribute(attribute)
}

fn req_u64(node: Node<'_, '_>, attribute: &'static str) -> Result<u64> {
    parse_num(req(node, attribute)?, attribute)
}

fn req_u32(node: Node<'_, '_>, attribute: &'static str) -> Result<u32> {
    parse_num(req(node, attribute)?, attribute)
}

fn req_u8(node: Node<'_, '_>, attribute: &'static str) -> Result<u8> {
    parse_num(req(node, attribute)?, attribute)
}

fn opt_u64(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<u64>> {
    opt(node, attribute).map(|v| parse_num(v, attribute)).transpose()
}

fn opt_u32(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<u32>> {
    opt(node, attribute).map(|v| parse_num(v, attribute)).transpose()
}

fn parse_num<T: std::str::FromStr>(value: &str, attribute: &'static str) -> Result<T> {
    value.parse().map_err(|_| GarError::InvalidAttribute {
        attribute,
        value: value.to_string(),
    })
}

/// Registry booleans are the string "1"; anything else (including absence)
/// is false.
fn flag(node: Node<'_, '_>, attribute: &'static str) -> bool {
    node.attribute(attribute) == Some("1")
}

fn opt_flag(node: Node<'_, '_>, attribute: &'static str) -> Option<bool> {
    node.attribute(attribute).map(|v| v == "1")
}

fn req_date(node: Node<'_, '_>, attribute: &'static str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(req(node, attribute)?, "%Y-%m-%d")?)
}
