pub mod bridge;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod resolver;

pub use bridge::Outcome;
pub use bundle::{AbortSignal, BundleOutput, Flags, ModuleRecord};
pub use cache::{CacheLocator, PackageId};
pub use config::Config;
pub use resolver::DocsSource;
