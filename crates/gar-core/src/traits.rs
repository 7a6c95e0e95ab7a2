// crates/gar-core/src/traits.rs
use serde::{Deserialize, Serialize};

/// Backend abstraction: this controls how catalog strings are stored.
///
/// A region catalog holds millions of short strings (names, type labels,
/// GUIDs). This abstraction allows the crate to swap how textual data is
/// stored internally (for example to use more compact interned types)
/// without changing the public API of accessors that return `&str` views.
///
/// Implementors must be `Clone + Send + Sync + 'static` and ensure the
/// associated type can be serialized/deserialized so catalogs can be cached
/// via bincode.
pub trait StrBackend: Clone + Send + Sync + 'static {
    type Str: Clone
        + Send
        + Sync
        + std::fmt::Debug
        + Serialize
        + for<'de> Deserialize<'de>
        + AsRef<str>;

    /// Convert an `&str` into the backend string representation.
    fn str_from(s: &str) -> Self::Str;

    /// Convert backend string to owned Rust `String`.
    #[inline]
    fn str_to_string(v: &Self::Str) -> String {
        v.as_ref().to_string()
    }
}

/// Standard backend: plain heap `String`s.
#[derive(Clone, Serialize, Deserialize)]
pub struct DefaultBackend;

impl StrBackend for DefaultBackend {
    type Str = String;

    fn str_from(s: &str) -> Self::Str {
        s.to_string()
    }
}
