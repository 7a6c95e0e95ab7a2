// crates/gar-core/src/loader/xml.rs

//! GAR table XML parsing.
//!
//! Every export table shares one shape: a root element whose children each
//! carry a single record as attributes. Record typing happens through
//! [`FromXmlRecord`]; this module only walks the DOM.

use std::io::Read;
use std::path::Path;

use roxmltree::Document;

use super::open_stream;
use crate::error::Result;
use crate::raw::FromXmlRecord;

/// Parse a whole table file into typed records.
pub fn parse_table<T: FromXmlRecord>(path: &Path) -> Result<Vec<T>> {
    let mut text = String::new();
    open_stream(path)?.read_to_string(&mut text)?;
    parse_records(&text)
}

/// Parse typed records out of table XML text.
pub fn parse_records<T: FromXmlRecord>(xml: &str) -> Result<Vec<T>> {
    let doc = Document::parse(xml)?;
    doc.root_element()
        .children()
        .filter(|n| n.is_element())
        .map(T::from_record)
        .collect()
}
