use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::core::{bridge, DocsSource, Flags, Outcome};
use crate::output;

/// Documentation file answered to every request unless `--docs` says otherwise
pub const BUNDLED_DOCS: &str = "docs.json";

pub struct PreviewArgs {
    pub specifier: String,
    pub docs: PathBuf,
    pub output: PathBuf,
    pub engine: Vec<String>,
}

/// Run the engine and drop its module pages into a fresh scratch directory
pub async fn run(args: PreviewArgs) -> Result<i32> {
    let mut engine = crate::engine::get_engine(&args.engine)?;
    let source = DocsSource::File(args.docs);
    let flags = Flags {
        spec: args.specifier,
    };

    let outcome = bridge::run(engine.as_mut(), &flags, &source)
        .await
        .context("Documentation engine failed")?;

    match outcome {
        Outcome::Aborted(signal) => {
            eprintln!("ERROR: {}", signal.message);
            Ok(signal.code)
        }
        Outcome::BundleReady(bundle) => {
            let report = output::write_scratch(&bundle, &args.output)?;
            info!("Preview of {} modules ready", report.modules_written);
            println!("{}", report.dir.display());
            Ok(0)
        }
    }
}
