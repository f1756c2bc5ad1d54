//! The pipeline orchestrator.
//!
//! Holds an ordered, append-only list of stages and runs them strictly in
//! sequence, feeding each stage's output into the next. The first failure
//! aborts the run — no later stage executes — and reaches the caller
//! wrapped with the 1-based stage index and stage name. The orchestrator
//! holds no domain data; it only sequences.
//!
//! Stage-by-stage progress is reported through `tracing` events around
//! each transition rather than embedded in stage logic.

use tracing::{debug, info, warn};

use coinflow_core::directory::UserDirectory;
use coinflow_core::errors::{ConfigError, PipelineError};
use coinflow_core::rates::{FeeTable, PriceTable};
use coinflow_core::record::Record;
use coinflow_store::Database;

use crate::stage::Stage;
use crate::stages::{Authenticate, Fee, Persist, Quote, Validate};

/// Sequential pipe-and-filter orchestrator.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// An empty pipeline. Executing it is a configuration error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical five-stage transaction pipeline.
    #[must_use]
    pub fn standard(
        directory: UserDirectory,
        prices: PriceTable,
        fees: FeeTable,
        db: Database,
    ) -> Self {
        Self::new()
            .with_stage(Validate)
            .with_stage(Authenticate::new(directory))
            .with_stage(Quote::new(prices))
            .with_stage(Fee::new(fees))
            .with_stage(Persist::new(db))
    }

    /// Append a stage, chaining.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.add_stage(stage);
        self
    }

    /// Append a stage.
    pub fn add_stage(&mut self, stage: impl Stage + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether no stages are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order against a copy of the caller's record.
    ///
    /// The caller's record is never mutated. On success returns the fully
    /// enriched copy; on the first stage failure returns
    /// [`PipelineError::Stage`] carrying the 1-based index, the stage
    /// name, and the underlying error.
    pub fn execute(&self, input: &Record) -> Result<Record, PipelineError> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages.into());
        }

        debug!(stages = self.stages.len(), "pipeline run starting");
        let mut record = input.clone();

        for (position, stage) in self.stages.iter().enumerate() {
            let index = position + 1;
            let name = stage.name();
            debug!(index, stage = name, "stage starting");

            record = stage.process(record).map_err(|source| {
                warn!(index, stage = name, error = %source, "stage failed, aborting run");
                PipelineError::Stage {
                    index,
                    stage: name,
                    source: Box::new(source),
                }
            })?;

            debug!(index, stage = name, "stage completed");
        }

        info!(stages = self.stages.len(), "pipeline run completed");
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
