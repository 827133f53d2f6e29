use anyhow::Result;

use crate::core::{CacheLocator, PackageId};

/// Print the cached directory of a package version; exit code 1 when it is missing
pub fn run(package: PackageId, elm_version: &str) -> Result<i32> {
    let locator = CacheLocator::from_env(elm_version);

    match locator.locate(&package) {
        Some(dir) => {
            println!("{}", dir.display());
            Ok(0)
        }
        None => {
            if locator.root().is_none() {
                eprintln!("Could not determine the Elm cache directory; set ELM_HOME");
            }
            Ok(1)
        }
    }
}
