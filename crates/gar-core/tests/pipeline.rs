//! End-to-end pipeline test: XML fixtures on disk → located tables →
//! catalog (+cache) → chains → structured addresses.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use gar_core::loader::{load_hierarchy, load_or_build_catalog, load_region_tables};
use gar_core::resolver::resolve_addresses;
use gar_core::{Catalog, DefaultBackend, GarError};

const REGION: &str = "77";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

/// Lay out a miniature region export:
/// shared dictionaries at the top, region tables under `77/`.
fn fixture_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data = tmp.path();

    write(
        data,
        "AS_ADDR_OBJ_TYPES_20260807.XML",
        r#"<ADDRESSOBJECTTYPES>
            <OBJECTTYPE SHORTNAME="обл" DESC="Область" LEVEL="1"/>
            <OBJECTTYPE SHORTNAME="г" DESC="Город" LEVEL="4"/>
            <OBJECTTYPE SHORTNAME="ул" DESC="Улица" LEVEL="8"/>
        </ADDRESSOBJECTTYPES>"#,
    );
    write(
        data,
        "AS_OBJECT_LEVELS_20260807.XML",
        r#"<OBJECTLEVELS>
            <OBJECTLEVEL LEVEL="1" NAME="Субъект РФ"/>
            <OBJECTLEVEL LEVEL="4" NAME="Город"/>
            <OBJECTLEVEL LEVEL="8" NAME="Улица"/>
        </OBJECTLEVELS>"#,
    );
    write(
        data,
        "AS_HOUSE_TYPES_20260807.XML",
        r#"<HOUSETYPES>
            <HOUSETYPE ID="2" SHORTNAME="д." DESC="Дом"/>
        </HOUSETYPES>"#,
    );
    write(
        data,
        "AS_ADDHOUSE_TYPES_20260807.XML",
        r#"<ADDHOUSETYPES>
            <HOUSETYPE ID="1" SHORTNAME="г-ж" DESC="Гараж"/>
        </ADDHOUSETYPES>"#,
    );

    let region_dir = data.join(REGION);
    fs::create_dir(&region_dir).expect("region dir");
    write(
        &region_dir,
        "AS_ADDR_OBJ_20260807.XML",
        r#"<ADDRESSOBJECTS>
            <OBJECT OBJECTID="1" OBJECTGUID="g-1" NAME="Северная" TYPENAME="обл" LEVEL="1" ISACTIVE="1" ISACTUAL="1"/>
            <OBJECT OBJECTID="4" OBJECTGUID="g-4" NAME="Среднегорск" TYPENAME="г" LEVEL="4" ISACTIVE="1" ISACTUAL="1"/>
            <OBJECT OBJECTID="8" OBJECTGUID="g-8" NAME="Вязовая" TYPENAME="ул" LEVEL="8" ISACTIVE="1" ISACTUAL="1"/>
            <OBJECT OBJECTID="9" OBJECTGUID="g-9" NAME="Историческая" TYPENAME="ул" LEVEL="8" ISACTIVE="1" ISACTUAL="0"/>
        </ADDRESSOBJECTS>"#,
    );
    write(
        &region_dir,
        "AS_HOUSES_20260807.XML",
        r#"<HOUSES>
            <HOUSE OBJECTID="100" OBJECTGUID="g-100" HOUSENUM="12" HOUSETYPE="2" ADDNUM1="3" ADDTYPE1="1" ISACTIVE="1" ISACTUAL="1"/>
            <HOUSE OBJECTID="101" OBJECTGUID="g-101" HOUSENUM="14" HOUSETYPE="2" ISACTIVE="1"/>
        </HOUSES>"#,
    );
    write(
        &region_dir,
        "AS_MUN_HIERARCHY_20260807.XML",
        r#"<ITEMS>
            <ITEM OBJECTID="100" PARENTOBJID="8" PATH="1.4.8.100" ISACTIVE="1" ENDDATE="2079-06-06"/>
            <ITEM OBJECTID="101" PARENTOBJID="9" PATH="1.4.9.101" ISACTIVE="1" ENDDATE="2079-06-06"/>
            <ITEM OBJECTID="100" PARENTOBJID="8" PATH="1.4.8.100" ISACTIVE="1" ENDDATE="2079-06-06"/>
        </ITEMS>"#,
    );

    tmp
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).expect("date")
}

#[test]
fn resolves_a_region_end_to_end() {
    let tmp = fixture_dir();
    let catalog = load_or_build_catalog(tmp.path(), REGION).expect("catalog");
    let links = load_hierarchy(tmp.path(), REGION).expect("links");
    let addresses = resolve_addresses(&catalog, &links, today());

    assert_eq!(addresses.len(), 2);

    let full = addresses.iter().find(|a| a.id == 100).expect("house 12");
    assert_eq!(full.region, "область Северная");
    assert_eq!(full.town, "город Среднегорск");
    assert_eq!(full.street, "улица Вязовая");
    assert_eq!(full.house, "дом 12");
    assert_eq!(full.extra_house, "гараж 3");

    // House 14's street (object 9) is not current, so its level-8 ancestor
    // dropped out of the catalog. The level vanishes from the pattern and
    // classification falls back through the precedence lists — never an
    // error.
    let gap = addresses.iter().find(|a| a.id == 101).expect("house 14");
    assert_eq!(gap.street, "город Среднегорск");
    assert_eq!(gap.town, "область Северная");
    assert_eq!(gap.region, "область Северная");
    assert_eq!(gap.house, "дом 14");
}

#[test]
fn second_load_hits_the_cache_and_agrees() {
    let tmp = fixture_dir();
    let first = load_or_build_catalog(tmp.path(), REGION).expect("first");
    assert!(cache_file_exists(tmp.path()));
    let second = load_or_build_catalog(tmp.path(), REGION).expect("second");
    assert_stats_equal(&first, &second);
}

fn cache_file_exists(data_dir: &Path) -> bool {
    data_dir
        .join(format!("{REGION}{}", gar_core::loader::CACHE_SUFFIX))
        .exists()
}

fn assert_stats_equal(a: &Catalog<DefaultBackend>, b: &Catalog<DefaultBackend>) {
    let (sa, sb) = (a.stats(), b.stats());
    assert_eq!(sa.objects, sb.objects);
    assert_eq!(sa.admin_units, sb.admin_units);
    assert_eq!(sa.buildings, sb.buildings);
}

#[test]
fn ambiguous_tables_abort_before_any_output() {
    let tmp = fixture_dir();
    // A second houses file makes the category ambiguous.
    let region_dir = tmp.path().join(REGION);
    write(
        &region_dir,
        "AS_HOUSES_20260801.XML",
        "<HOUSES/>",
    );
    let err = load_region_tables(tmp.path(), REGION).expect_err("must fail");
    match err {
        GarError::SourceData { region, category, found } => {
            assert_eq!(region, REGION);
            assert_eq!(category, "AS_HOUSES");
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resolution_is_deterministic_across_runs() {
    let tmp = fixture_dir();
    let catalog = load_or_build_catalog(tmp.path(), REGION).expect("catalog");
    let mut links = load_hierarchy(tmp.path(), REGION).expect("links");
    let a = resolve_addresses(&catalog, &links, today());
    links.reverse();
    let b = resolve_addresses(&catalog, &links, today());
    assert_eq!(a, b);
    let json_a = serde_json::to_string(&a).expect("json");
    let json_b = serde_json::to_string(&b).expect("json");
    assert_eq!(json_a, json_b);
}
