//! License catalog loading.
//!
//! The catalog is a JSON array of license descriptors. It comes from, in
//! order of precedence: the `--data` flag, the `NICELICENSE_DATA` environment
//! variable, or the copy bundled into the binary.

mod loader;

use include_dir::{Dir, include_dir};

pub use loader::{Catalog, CatalogLocation, parse_catalog};

/// The `data/` directory (catalog plus offline license texts), embedded at
/// build time.
pub static BUNDLED_DATA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

/// Catalog file name inside [`BUNDLED_DATA`].
pub const BUNDLED_CATALOG: &str = "licenses.json";

/// Environment variable naming a catalog file.
pub const DATA_ENV_VAR: &str = "NICELICENSE_DATA";
