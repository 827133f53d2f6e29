use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::cache::{CacheLocator, PackageId, DOCS_FILE};

/// Answers documentation requests coming from the engine
pub trait DocsResolver {
    fn resolve(&self, spec: &str) -> Result<Value, ResolveError>;
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no documentation source configured (pass --docs or --package-version)")]
    NoSource,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed package specifier {0:?}, expected <author>/<project>")]
    BadSpecifier(String),

    #[error("{0} is not available in the local package cache")]
    NotCached(PackageId),
}

/// Where documentation JSON comes from
#[derive(Debug, Clone)]
pub enum DocsSource {
    /// A JSON file given by the operator
    File(PathBuf),
    /// `docs.json` of a package version in the Elm cache
    Cache {
        locator: CacheLocator,
        version: String,
    },
    /// Nothing configured; every request fails
    Unconfigured,
}

impl DocsResolver for DocsSource {
    fn resolve(&self, spec: &str) -> Result<Value, ResolveError> {
        match self {
            DocsSource::File(path) => {
                debug!("Loading documentation for {:?} from {}", spec, path.display());
                read_json(path)
            }
            DocsSource::Cache { locator, version } => {
                let (author, project) = parse_specifier(spec)?;
                let package = PackageId::new(author, project, version.as_str());

                let dir = locator
                    .locate(&package)
                    .ok_or_else(|| ResolveError::NotCached(package.clone()))?;

                debug!("Loading documentation for {} from cache", package);
                read_json(&dir.join(DOCS_FILE))
            }
            DocsSource::Unconfigured => Err(ResolveError::NoSource),
        }
    }
}

/// Read and parse a JSON document without imposing a schema
pub fn read_json(path: &Path) -> Result<Value, ResolveError> {
    let content = fs::read_to_string(path).map_err(|source| ResolveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());

    serde_json::from_str(&content).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Split `<author>/<project>`
pub fn parse_specifier(spec: &str) -> Result<(&str, &str), ResolveError> {
    match spec.trim().split_once('/') {
        Some((author, project))
            if !author.is_empty() && !project.is_empty() && !project.contains('/') =>
        {
            Ok((author, project))
        }
        _ => Err(ResolveError::BadSpecifier(spec.to_string())),
    }
}
