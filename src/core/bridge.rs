//! Request/response protocol between the host and a documentation engine
//!
//! One run initializes the engine once, answers its `docsFinder` requests
//! through a [`DocsResolver`] and ends on the first terminal message: a
//! finished bundle or an abort. A failed resolution ends the run as an abort
//! too, so callers only ever see one of the two outcomes.

use tracing::{debug, warn};

use super::bundle::{AbortSignal, BundleOutput, Flags};
use super::resolver::DocsResolver;
use crate::engine::{Engine, EngineError, Inbound, Outbound};

/// Exit code used when documentation could not be resolved for the engine
pub const RESOLUTION_FAILURE_CODE: i32 = 1;

/// Terminal result of one engine run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    BundleReady(BundleOutput),
    Aborted(AbortSignal),
}

/// Drive an engine from initialization to its terminal message
pub async fn run(
    engine: &mut dyn Engine,
    flags: &Flags,
    resolver: &dyn DocsResolver,
) -> Result<Outcome, EngineError> {
    debug!("Starting {} engine (spec: {:?})", engine.name(), flags.spec);
    engine.init(flags).await?;

    let outcome = drive(engine, resolver).await;

    if let Err(e) = engine.shutdown().await {
        warn!("Failed to shut down engine: {}", e);
    }

    outcome
}

async fn drive(
    engine: &mut dyn Engine,
    resolver: &dyn DocsResolver,
) -> Result<Outcome, EngineError> {
    let mut requests = 0usize;

    while let Some(message) = engine.recv().await? {
        match message {
            Outbound::DocsFinder(spec) => {
                requests += 1;
                debug!("docsFinder request #{} for {:?}", requests, spec);

                match resolver.resolve(&spec) {
                    Ok(docs) => engine.send(Inbound::ModuleLoader(docs)).await?,
                    Err(e) => {
                        debug!("Could not resolve documentation: {}", e);
                        return Ok(Outcome::Aborted(AbortSignal {
                            code: RESOLUTION_FAILURE_CODE,
                            message: format!("could not load documentation for {:?}: {}", spec, e),
                        }));
                    }
                }
            }
            Outbound::DocsWriter(bundle) => {
                debug!("Engine produced {} modules", bundle.len());
                return Ok(Outcome::BundleReady(bundle));
            }
            Outbound::Abort(signal) => {
                debug!("Engine aborted with code {}", signal.code);
                return Ok(Outcome::Aborted(signal));
            }
        }
    }

    Err(EngineError::Disconnected)
}
