use tracing::{debug, warn};

use crate::data_model::{FilterOutcome, IndexedRow, RejectedRow, SourceRow};

/// One ordered stage of the filter funnel: a reason tag plus the predicate a
/// row must satisfy to survive the stage.
pub struct FilterStage {
    reason: &'static str,
    predicate: Box<dyn Fn(&SourceRow) -> bool + Send + Sync>,
}

impl FilterStage {
    pub fn new<F>(reason: &'static str, predicate: F) -> Self
    where
        F: Fn(&SourceRow) -> bool + Send + Sync + 'static,
    {
        FilterStage {
            reason,
            predicate: Box::new(predicate),
        }
    }

    /// The tag recorded in the reject ledger when a row fails this stage.
    pub fn reason(&self) -> &'static str {
        self.reason
    }

    fn passes(&self, row: &SourceRow) -> bool {
        (self.predicate)(row)
    }
}

/// Applies an ordered stage list to a row table as a funnel.
///
/// Each stage partitions the current survivor set; failures land in the reject
/// ledger tagged with that stage's reason, so a row failing several stages is
/// only ever recorded under the first one. The ledger is re-sorted by original
/// position before being returned.
pub struct FilterFunnel {
    stages: Vec<FilterStage>,
}

impl FilterFunnel {
    pub fn new(stages: Vec<FilterStage>) -> Self {
        if stages.is_empty() {
            warn!("Filter funnel created with no stages.");
        }
        FilterFunnel { stages }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn run(&self, rows: Vec<SourceRow>) -> FilterOutcome {
        let mut survivors: Vec<IndexedRow> = rows
            .into_iter()
            .enumerate()
            .map(|(orig_index, row)| IndexedRow { orig_index, row })
            .collect();
        let mut ledger: Vec<RejectedRow> = Vec::new();

        for stage in &self.stages {
            let (pass, fail): (Vec<IndexedRow>, Vec<IndexedRow>) = survivors
                .into_iter()
                .partition(|indexed| stage.passes(&indexed.row));

            debug!(
                stage = stage.reason,
                rejected = fail.len(),
                survivors = pass.len(),
                "Applied filter stage"
            );

            ledger.extend(fail.into_iter().map(|indexed| RejectedRow {
                orig_index: indexed.orig_index,
                row: indexed.row,
                reason: stage.reason.to_string(),
            }));
            survivors = pass;
        }

        // Ledger entries accumulate stage by stage, out of input order.
        ledger.sort_by_key(|rejected| rejected.orig_index);

        FilterOutcome {
            kept: survivors,
            rejected: ledger,
        }
    }
}
