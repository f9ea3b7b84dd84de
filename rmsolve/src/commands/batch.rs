use rms_core::models::{ErrorKind, Map};
use rms_solver::{
    Allocator, ProtectionHeuristic,
    io::{Batch, Report, ScenarioId, evaluate},
};
use serde::Serialize;
use tracing::{Level, event};

/// The outcome of one scenario of a batch
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Report(Report),
    Failure { kind: ErrorKind, error: String },
}

/// Evaluate every scenario on the blocking pool.
///
/// All scenarios are dispatched before any is awaited; results are collected
/// in input order. A scenario that fails, whether by error or by panic, is
/// reported in place and does not abort the others.
pub async fn run<H>(allocator: Allocator, heuristic: H, scenarios: Batch) -> Map<ScenarioId, Entry>
where
    H: ProtectionHeuristic + Copy + Send + 'static,
{
    let tasks = scenarios
        .into_iter()
        .map(|(id, scenario)| {
            let task =
                tokio::task::spawn_blocking(move || evaluate(&allocator, &heuristic, scenario));
            (id, task)
        })
        .collect::<Vec<_>>();

    let mut results = Map::default();
    for (id, task) in tasks {
        let entry = match task.await {
            Ok(Ok(report)) => Entry::Report(report),
            Ok(Err(err)) => {
                event!(Level::WARN, scenario = %id, error = %err, "scenario failed");
                Entry::Failure {
                    kind: err.kind(),
                    error: err.to_string(),
                }
            }
            // a panicking scenario is still reported in place
            Err(err) => {
                event!(Level::ERROR, scenario = %id, error = %err, "scenario aborted");
                Entry::Failure {
                    kind: ErrorKind::Internal,
                    error: err.to_string(),
                }
            }
        };
        results.insert(id, entry);
    }

    results
}
