// crates/gar-core/src/lib.rs

//! # gar-core
//!
//! Reconstructs human-readable structured postal addresses from GAR
//! (national address registry) region exports.
//!
//! Registry records form a region → municipal division → settlement →
//! street → building hierarchy stored as flat records linked by
//! parent/child path strings. The interesting part is not reading the
//! files — it is deciding, per building, *which* ancestor plays the role of
//! region, town, street, municipal division or leftover unit, because the
//! mapping from hierarchy level to semantic role varies per region and per
//! chain. See [`roles`] for the classifier and [`resolver`] for the
//! pipeline.
//!
//! ```no_run
//! use gar_core::loader;
//! use gar_core::resolver::resolve_addresses;
//!
//! # fn main() -> gar_core::Result<()> {
//! let data_dir = loader::default_data_dir();
//! let catalog = loader::load_or_build_catalog(&data_dir, "77")?;
//! let links = loader::load_hierarchy(&data_dir, "77")?;
//! let today = chrono::Local::now().date_naive();
//! let addresses = resolve_addresses(&catalog, &links, today);
//! println!("{} addresses", addresses.len());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod catalog;
pub mod chain;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod roles;
pub mod text;
pub mod traits;
// Raw wire-format records (used by loaders and tests)
pub mod raw;
#[cfg(feature = "upload")]
pub mod sink;

// Re-exports
pub use crate::address::StructuredAddress;
pub use crate::catalog::{Catalog, CatalogStats, RegistryObject, HOUSE_LEVEL};
pub use crate::chain::{extract_chains, Chain};
pub use crate::error::{GarError, Result};
pub use crate::resolver::resolve_addresses;
pub use crate::roles::{classify, LevelPattern, RoleAssignment, RoleCache};
pub use crate::traits::{DefaultBackend, StrBackend};
