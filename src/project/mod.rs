//! Files in the user's project: an existing LICENSE, the LICENSE being
//! written, and `package.json`'s `license` field.

mod existing;
mod output;
mod package_json;

pub use existing::{LICENSE_FILES, find_existing_license};
pub use output::{resolve_output_path, write_license_file};
pub use package_json::{PackageJsonUpdate, update_package_json_license};
