//! Local Elm package cache lookup
//!
//! The Elm compiler keeps downloaded packages under
//! `$ELM_HOME/<elm version>/packages/<author>/<project>/<version>/`, each with
//! a `docs.json` describing the package's exposed modules. This module only
//! probes that layout; it never creates or modifies anything on disk.

use directories::BaseDirs;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Elm release whose cache layout is probed by default
pub const ELM_VERSION: &str = "0.19.1";

/// Documentation file inside a cached package version
pub const DOCS_FILE: &str = "docs.json";

/// Environment variable overriding the cache root
pub const ELM_HOME_ENV: &str = "ELM_HOME";

/// A package at an exact version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId {
    pub author: String,
    pub project: String,
    pub version: String,
}

impl PackageId {
    pub fn new(
        author: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            project: project.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.author, self.project, self.version)
    }
}

/// Why a package could not be found in the cache
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheMiss {
    #[error("could not determine the Elm cache directory")]
    NoRoot,

    #[error("required package not found in local cache: {}", .0.display())]
    PackageMissing(PathBuf),

    #[error("package found but version mismatch: {} - {version}", root.display())]
    VersionMissing { root: PathBuf, version: String },
}

#[derive(Debug, Clone)]
pub struct CacheLocator {
    root: Option<PathBuf>,
}

impl CacheLocator {
    /// Locator over an explicit packages directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Locator over the cache the Elm compiler would use on this machine
    pub fn from_env(elm_version: &str) -> Self {
        let elm_home = env::var_os(ELM_HOME_ENV).map(PathBuf::from);
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

        let root = packages_root(elm_home, home, elm_version);
        debug!("Elm package cache: {:?}", root);

        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolve a package directory, reporting why it is unavailable
    pub fn probe(&self, package: &PackageId) -> Result<PathBuf, CacheMiss> {
        let base = self.root.as_ref().ok_or(CacheMiss::NoRoot)?;

        let package_root = base.join(&package.author).join(&package.project);
        if !package_root.exists() {
            return Err(CacheMiss::PackageMissing(package_root));
        }

        let with_version = package_root.join(&package.version);
        if !with_version.exists() {
            return Err(CacheMiss::VersionMissing {
                root: package_root,
                version: package.version.clone(),
            });
        }

        Ok(with_version)
    }

    /// Resolve a package directory, warning when it is missing
    pub fn locate(&self, package: &PackageId) -> Option<PathBuf> {
        match self.probe(package) {
            Ok(path) => Some(path),
            Err(CacheMiss::NoRoot) => {
                debug!("No Elm cache directory, cannot locate {}", package);
                None
            }
            Err(miss) => {
                warn!("{}", miss);
                None
            }
        }
    }
}

/// Compute `<elm home>/<elm version>/<packages dir>`
fn packages_root(
    elm_home: Option<PathBuf>,
    home: Option<PathBuf>,
    elm_version: &str,
) -> Option<PathBuf> {
    let elm_home = elm_home.or_else(|| home.map(|h| h.join(default_elm_dir())))?;
    Some(elm_home.join(elm_version).join(packages_dir(elm_version)))
}

fn default_elm_dir() -> &'static str {
    if cfg!(windows) {
        "AppData/Roaming/elm"
    } else {
        ".elm"
    }
}

// 0.19.0 used a singular directory name
fn packages_dir(elm_version: &str) -> &'static str {
    if elm_version == "0.19.0" {
        "package"
    } else {
        "packages"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_with(packages: &[&str]) -> (TempDir, CacheLocator) {
        let temp = TempDir::new().unwrap();
        for package in packages {
            std::fs::create_dir_all(temp.path().join(package)).unwrap();
        }
        let locator = CacheLocator::new(temp.path());
        (temp, locator)
    }

    #[test]
    fn test_packages_root_prefers_elm_home() {
        let root = packages_root(
            Some(PathBuf::from("/opt/elm")),
            Some(PathBuf::from("/home/user")),
            ELM_VERSION,
        );
        assert_eq!(root, Some(PathBuf::from("/opt/elm/0.19.1/packages")));
    }

    #[test]
    fn test_packages_root_falls_back_to_home() {
        let root = packages_root(None, Some(PathBuf::from("/home/user")), ELM_VERSION).unwrap();
        assert!(root.starts_with("/home/user"));
        assert!(root.ends_with("0.19.1/packages"));
    }

    #[test]
    fn test_packages_root_legacy_layout() {
        let root = packages_root(Some(PathBuf::from("/opt/elm")), None, "0.19.0");
        assert_eq!(root, Some(PathBuf::from("/opt/elm/0.19.0/package")));
    }

    #[test]
    fn test_packages_root_without_home() {
        assert_eq!(packages_root(None, None, ELM_VERSION), None);
    }

    #[test]
    fn test_locate_found() {
        let (temp, locator) = cache_with(&["elm/core/1.0.5"]);
        let found = locator.locate(&PackageId::new("elm", "core", "1.0.5"));
        assert_eq!(found, Some(temp.path().join("elm/core/1.0.5")));
    }

    #[test]
    fn test_missing_package() {
        let (temp, locator) = cache_with(&["elm/core/1.0.5"]);
        let package = PackageId::new("elm", "json", "1.1.3");

        let miss = locator.probe(&package).unwrap_err();
        assert_eq!(miss, CacheMiss::PackageMissing(temp.path().join("elm/json")));
        assert!(miss.to_string().contains(&temp.path().join("elm/json").display().to_string()));
        assert_eq!(locator.locate(&package), None);
    }

    #[test]
    fn test_missing_version() {
        let (temp, locator) = cache_with(&["elm/core/1.0.5"]);
        let package = PackageId::new("elm", "core", "1.0.2");

        let miss = locator.probe(&package).unwrap_err();
        let message = miss.to_string();
        assert!(message.contains(&temp.path().display().to_string()));
        assert!(message.contains("1.0.2"));
        assert_eq!(locator.locate(&package), None);
    }

    #[test]
    fn test_no_root() {
        let locator = CacheLocator { root: None };
        let package = PackageId::new("elm", "core", "1.0.5");
        assert_eq!(locator.probe(&package), Err(CacheMiss::NoRoot));
        assert_eq!(locator.locate(&package), None);
    }

    #[test]
    fn test_locate_does_not_create_directories() {
        let (temp, locator) = cache_with(&[]);
        locator.locate(&PackageId::new("elm", "core", "1.0.5"));
        assert!(!temp.path().join("elm").exists());
    }
}
