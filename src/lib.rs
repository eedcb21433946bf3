pub mod app;
pub mod catalog;
pub mod cli;
pub mod fetch;
pub mod fields;
pub mod license;
pub mod project;
pub mod prompt;
pub mod report;

pub use app::{App, AppConfig};
pub use catalog::{Catalog, CatalogLocation};
pub use cli::Cli;
pub use license::{FieldValues, IdentificationStrategy, LicenseDescriptor};
