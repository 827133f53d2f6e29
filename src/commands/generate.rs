use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::core::resolver::{DocsResolver, ResolveError};
use crate::core::{bridge, CacheLocator, DocsSource, Flags, Outcome};
use crate::output;

pub struct GenerateArgs {
    pub output: PathBuf,
    pub spec: Option<String>,
    pub docs: Option<PathBuf>,
    pub package_version: Option<String>,
    pub engine: Vec<String>,
    pub elm_version: String,
    pub verbose: bool,
}

/// Run the engine for one package and write its bundle; returns the process exit code
pub async fn run(args: GenerateArgs) -> Result<i32> {
    let source = docs_source(&args);
    debug!("Documentation source: {:?}", source);

    let mut engine = crate::engine::get_engine(&args.engine)?;
    let flags = Flags {
        spec: args.spec.clone().unwrap_or_default(),
    };

    let pb = engine_spinner(args.verbose, engine.name())?;
    let resolver = Suspended {
        inner: &source,
        pb: &pb,
    };

    let result = bridge::run(engine.as_mut(), &flags, &resolver).await;
    pb.finish_and_clear();
    let outcome = result.context("Documentation engine failed")?;

    match outcome {
        Outcome::Aborted(signal) => {
            eprintln!("ERROR: {}", signal.message);
            Ok(signal.code)
        }
        Outcome::BundleReady(bundle) => {
            let title = output::page_title(args.spec.as_deref());
            info!("Writing documentation for {} to {}", title, args.output.display());

            let report = output::write_site(&bundle, &args.output, title)?;
            debug!(
                "{} module pages written (output directory created: {})",
                report.modules_written, report.created_dir
            );
            println!(
                "{} contents are generated in {}",
                style("Success!").green().bold(),
                report.dir.display()
            );
            Ok(0)
        }
    }
}

/// Spinner shown while the engine runs; hidden under `--verbose` where log lines take over
fn engine_spinner(verbose: bool, engine: &str) -> Result<ProgressBar> {
    if verbose {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner} {wide_msg}")?,
    );
    pb.set_message(format!("Waiting for {} engine...", engine));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

// Lookups may log warnings; the spinner is taken off the line while they print
struct Suspended<'a> {
    inner: &'a dyn DocsResolver,
    pb: &'a ProgressBar,
}

impl DocsResolver for Suspended<'_> {
    fn resolve(&self, spec: &str) -> Result<Value, ResolveError> {
        self.pb.suspend(|| self.inner.resolve(spec))
    }
}

fn docs_source(args: &GenerateArgs) -> DocsSource {
    match (&args.docs, &args.package_version) {
        (Some(path), _) => DocsSource::File(path.clone()),
        (None, Some(version)) => DocsSource::Cache {
            locator: CacheLocator::from_env(&args.elm_version),
            version: version.clone(),
        },
        (None, None) => DocsSource::Unconfigured,
    }
}
