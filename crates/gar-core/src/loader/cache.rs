// crates/gar-core/src/loader/cache.rs

//! Binary catalog cache.
//!
//! Parsing a region's XML tables dominates startup, so the built catalog is
//! serialized with bincode next to the data directory and reused while it
//! stays newer than every source table.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bincode::Options;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::traits::DefaultBackend;

#[cfg(not(feature = "compact"))]
pub const CACHE_SUFFIX: &str = ".cat.bin";
#[cfg(feature = "compact")]
pub const CACHE_SUFFIX: &str = ".cat.bin.gz";

/// Upper bound for deserialized cache size; prevents malformed cache files
/// from acting as decompression bombs.
const CACHE_SIZE_LIMIT: u64 = 256 * 1024 * 1024;

pub(crate) fn cache_path(data_dir: &Path, region: &str) -> PathBuf {
    data_dir.join(format!("{region}{CACHE_SUFFIX}"))
}

/// A cache is fresh when it exists and none of the source tables has a
/// newer modification time.
pub(crate) fn is_cache_fresh(cache: &Path, sources: &[&Path]) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    for source in sources {
        if let Ok(source_time) = fs::metadata(source).and_then(|m| m.modified()) {
            if source_time > cache_time {
                return false;
            }
        }
    }
    true
}

/// Writes any serializable database to disk, gzip-wrapped under `compact`.
pub(crate) fn write_cache<T: serde::Serialize>(path: &Path, db: &T) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    #[cfg(feature = "compact")]
    let mut encoder: Box<dyn Write> = {
        use flate2::{write::GzEncoder, Compression};
        Box::new(GzEncoder::new(writer, Compression::default()))
    };
    #[cfg(not(feature = "compact"))]
    let mut encoder: Box<dyn Write> = Box::new(writer);

    bincode::serialize_into(&mut encoder, db)?;
    encoder.flush()?;
    Ok(())
}

pub(crate) fn read_cache(path: &Path) -> Result<Catalog<DefaultBackend>> {
    let mut data = Vec::new();
    read_stream(path)?.read_to_end(&mut data)?;

    let catalog = bincode::DefaultOptions::new()
        .with_limit(CACHE_SIZE_LIMIT)
        .allow_trailing_bytes()
        .with_fixint_encoding()
        .deserialize(&data)?;
    Ok(catalog)
}

fn read_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader = std::io::BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        use flate2::read::GzDecoder;
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}
