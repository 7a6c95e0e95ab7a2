//! gar-cli
//! ========
//!
//! Command-line interface for the `gar-core` address resolver.
//!
//! This crate primarily provides a binary (`gar-cli`). We include a small
//! library target so that docs.rs renders a documentation page and shows
//! this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! gar-cli --help
//! gar-cli resolve 77 --out addresses.json
//! gar-cli upload 77 --url http://localhost:9200
//! gar-cli stats 77
//! gar-cli find 77 vyazovaya
//! ```
//!
//! For programmatic access to the catalog, the chain resolver and the
//! Elasticsearch sink, use the [`gar-core`] crate directly.
//!
//! [`gar-core`]: https://docs.rs/gar-core

// This library target intentionally exposes no API; the binary is the
// primary deliverable.
