use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::domain::{IntakeError, LoanId, LoanRecord, LoanType};
use super::evaluation::{auditable_operations, AuditableOperation, RiskRuleBook};
use super::pipeline::{DecisionNotifier, ProcessingOutcome, ProcessingPipeline};
use super::report::{FailedReport, LoanReporter, ProcessedReport};
use super::repository::{LoanRepository, RepositoryError};
use super::sequence::LoanIdSequence;
use crate::config::IntakeConfig;

/// Facade composing the id sequence, processing pipeline, and reporter.
pub struct LoanDesk<R, N> {
    sequence: LoanIdSequence,
    pipeline: ProcessingPipeline<R, N>,
    reporter: LoanReporter<R>,
    intake: Mutex<()>,
}

impl<R, N> LoanDesk<R, N>
where
    R: LoanRepository + 'static,
    N: DecisionNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: IntakeConfig) -> Self {
        Self::with_rules(RiskRuleBook::standard(), repository, notifier, config)
    }

    pub fn with_rules(
        rules: RiskRuleBook,
        repository: Arc<R>,
        notifier: Arc<N>,
        config: IntakeConfig,
    ) -> Self {
        let reporter = LoanReporter::new(Arc::clone(&repository));
        let pipeline = ProcessingPipeline::with_rules(rules, repository, notifier);

        Self {
            sequence: LoanIdSequence::new(config.id_seed),
            pipeline,
            reporter,
            intake: Mutex::new(()),
        }
    }

    /// Open and process an application, returning its id.
    pub fn submit(
        &self,
        loan_type: LoanType,
        customer_name: &str,
        amount: f64,
    ) -> Result<LoanId, LoanDeskError> {
        self.submit_with_outcome(loan_type, customer_name, amount)
            .map(|outcome| outcome.loan_id)
    }

    /// Like [`LoanDesk::submit`], also reporting the final status and classification.
    pub fn submit_with_outcome(
        &self,
        loan_type: LoanType,
        customer_name: &str,
        amount: f64,
    ) -> Result<ProcessingOutcome, LoanDeskError> {
        // One application runs validate-decide-notify-classify before the next starts.
        // The lock guards no data, so a poisoned guard is still usable.
        let _intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);

        let record = LoanRecord::open(&self.sequence, loan_type, customer_name, amount)?;
        debug!(loan_id = %record.id(), %loan_type, "application received");

        Ok(self.pipeline.process(record))
    }

    pub fn processed_view(&self) -> Result<ProcessedReport, LoanDeskError> {
        Ok(self.reporter.processed()?)
    }

    pub fn failed_view(&self) -> Result<FailedReport, LoanDeskError> {
        Ok(self.reporter.failed()?)
    }

    pub fn auditable_operations(&self) -> &'static [AuditableOperation] {
        auditable_operations()
    }

    pub fn last_issued_id(&self) -> u64 {
        self.sequence.last_issued()
    }
}

/// Error raised by the loan desk facade.
#[derive(Debug, thiserror::Error)]
pub enum LoanDeskError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
