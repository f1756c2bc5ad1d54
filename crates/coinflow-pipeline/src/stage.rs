//! The stage contract.

use coinflow_core::errors::PipelineError;
use coinflow_core::record::Record;

/// One unit of pipeline work.
///
/// A stage consumes the record produced by its predecessors and returns it
/// enriched with its own section. Side effects are confined to the returned
/// record and the collaborators the stage owns (directory, rate tables,
/// database); stages never touch global state.
///
/// Returning `Err` is total failure of the stage: the orchestrator aborts
/// the run and no later stage observes a partially enriched record.
pub trait Stage {
    /// Stable stage name, used in logs and error context.
    fn name(&self) -> &'static str;

    /// Transform the record or fail.
    fn process(&self, record: Record) -> Result<Record, PipelineError>;
}
