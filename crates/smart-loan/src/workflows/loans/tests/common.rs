use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::workflows::loans::domain::{LoanRecord, LoanType};
use crate::workflows::loans::evaluation::{LoanDecision, RiskRule};
use crate::workflows::loans::pipeline::{
    DecisionNotice, DecisionNotifier, NotifyError, ProcessingPipeline,
};
use crate::workflows::loans::repository::{
    FailedLoan, FailedLoanView, InMemoryLoanRepository, LoanRepository, ProcessedBucket,
    RepositoryError, StoreRejection,
};
use crate::workflows::loans::sequence::LoanIdSequence;
use crate::workflows::loans::service::LoanDesk;

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<DecisionNotice> {
        self.notices.lock().expect("lock").clone()
    }
}

impl DecisionNotifier for MemoryNotifier {
    fn notify(&self, notice: &DecisionNotice) -> Result<(), NotifyError> {
        self.notices.lock().expect("lock").push(notice.clone());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl DecisionNotifier for FailingNotifier {
    fn notify(&self, _notice: &DecisionNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("pager offline".to_string()))
    }
}

/// Repository whose processed buckets refuse every write.
#[derive(Default)]
pub(super) struct ProcessedUnavailableRepository {
    inner: InMemoryLoanRepository,
}

impl LoanRepository for ProcessedUnavailableRepository {
    fn store_processed(&self, record: LoanRecord) -> Result<(), StoreRejection<LoanRecord>> {
        Err(StoreRejection::new(
            record,
            RepositoryError::Unavailable("processed store offline".to_string()),
        ))
    }

    fn store_failed(&self, failure: FailedLoan) -> Result<(), StoreRejection<FailedLoan>> {
        self.inner.store_failed(failure)
    }

    fn processed_buckets(&self) -> Result<Vec<ProcessedBucket>, RepositoryError> {
        self.inner.processed_buckets()
    }

    fn failed_entries(&self) -> Result<Vec<FailedLoanView>, RepositoryError> {
        self.inner.failed_entries()
    }
}

pub(super) struct UnavailableRepository;

impl LoanRepository for UnavailableRepository {
    fn store_processed(&self, record: LoanRecord) -> Result<(), StoreRejection<LoanRecord>> {
        Err(StoreRejection::new(record, unavailable()))
    }

    fn store_failed(&self, failure: FailedLoan) -> Result<(), StoreRejection<FailedLoan>> {
        Err(StoreRejection::new(failure, unavailable()))
    }

    fn processed_buckets(&self) -> Result<Vec<ProcessedBucket>, RepositoryError> {
        Err(unavailable())
    }

    fn failed_entries(&self) -> Result<Vec<FailedLoanView>, RepositoryError> {
        Err(unavailable())
    }
}

/// Home rule standing in for a defect inside an injected strategy.
pub(super) struct PanickingHomeRule;

impl RiskRule for PanickingHomeRule {
    fn loan_type(&self) -> LoanType {
        LoanType::Home
    }

    fn evaluate(&self, _amount: f64) -> LoanDecision {
        panic!("home rule table corrupted")
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("storage offline".to_string())
}

pub(super) fn open(
    sequence: &LoanIdSequence,
    loan_type: LoanType,
    customer_name: &str,
    amount: f64,
) -> LoanRecord {
    LoanRecord::open(sequence, loan_type, customer_name, amount).expect("finite amount")
}

pub(super) fn build_pipeline() -> (
    ProcessingPipeline<InMemoryLoanRepository, MemoryNotifier>,
    Arc<InMemoryLoanRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(InMemoryLoanRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let pipeline = ProcessingPipeline::new(repository.clone(), notifier.clone());
    (pipeline, repository, notifier)
}

pub(super) fn build_desk() -> (
    LoanDesk<InMemoryLoanRepository, MemoryNotifier>,
    Arc<InMemoryLoanRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(InMemoryLoanRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let desk = LoanDesk::new(repository.clone(), notifier.clone(), IntakeConfig::default());
    (desk, repository, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json payload")
}
