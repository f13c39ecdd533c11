use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use super::domain::{LoanRecord, LoanType, LoanView};

/// Why an application ended up in the failed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Unexpected,
}

impl FailureKind {
    pub const fn label(self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

/// Failed application together with the reason it was set aside.
#[derive(Debug)]
pub struct FailedLoan {
    pub record: LoanRecord,
    pub kind: FailureKind,
    pub reason: String,
}

impl FailedLoan {
    pub fn view(&self) -> FailedLoanView {
        FailedLoanView {
            loan: self.record.view(),
            kind: self.kind,
            reason: self.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedLoanView {
    #[serde(flatten)]
    pub loan: LoanView,
    pub kind: FailureKind,
    pub reason: String,
}

/// Processed applications of one product line, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedBucket {
    pub loan_type: LoanType,
    pub loans: Vec<LoanView>,
}

/// Classification storage. Rejected writes hand the value back to the caller.
pub trait LoanRepository: Send + Sync {
    fn store_processed(&self, record: LoanRecord) -> Result<(), StoreRejection<LoanRecord>>;
    fn store_failed(&self, failure: FailedLoan) -> Result<(), StoreRejection<FailedLoan>>;
    fn processed_buckets(&self) -> Result<Vec<ProcessedBucket>, RepositoryError>;
    fn failed_entries(&self) -> Result<Vec<FailedLoanView>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A write the repository refused, carrying the value it could not keep.
#[derive(Debug)]
pub struct StoreRejection<T> {
    pub value: T,
    pub error: RepositoryError,
}

impl<T> StoreRejection<T> {
    pub fn new(value: T, error: RepositoryError) -> Self {
        Self { value, error }
    }
}

/// Process-lifetime repository: grows monotonically, never deletes.
#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
    processed: Mutex<BTreeMap<LoanType, Vec<LoanRecord>>>,
    failed: Mutex<Vec<FailedLoan>>,
}

impl InMemoryLoanRepository {
    fn processed_guard(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<LoanType, Vec<LoanRecord>>>, RepositoryError> {
        self.processed
            .lock()
            .map_err(|_| RepositoryError::Unavailable("processed lock poisoned".to_string()))
    }

    fn failed_guard(&self) -> Result<MutexGuard<'_, Vec<FailedLoan>>, RepositoryError> {
        self.failed
            .lock()
            .map_err(|_| RepositoryError::Unavailable("failed lock poisoned".to_string()))
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn store_processed(&self, record: LoanRecord) -> Result<(), StoreRejection<LoanRecord>> {
        match self.processed_guard() {
            Ok(mut buckets) => {
                buckets.entry(record.loan_type()).or_default().push(record);
                Ok(())
            }
            Err(error) => Err(StoreRejection::new(record, error)),
        }
    }

    fn store_failed(&self, failure: FailedLoan) -> Result<(), StoreRejection<FailedLoan>> {
        match self.failed_guard() {
            Ok(mut failed) => {
                failed.push(failure);
                Ok(())
            }
            Err(error) => Err(StoreRejection::new(failure, error)),
        }
    }

    fn processed_buckets(&self) -> Result<Vec<ProcessedBucket>, RepositoryError> {
        let buckets = self.processed_guard()?;
        Ok(buckets
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(loan_type, records)| ProcessedBucket {
                loan_type: *loan_type,
                loans: records.iter().map(LoanRecord::view).collect(),
            })
            .collect())
    }

    fn failed_entries(&self) -> Result<Vec<FailedLoanView>, RepositoryError> {
        let failed = self.failed_guard()?;
        Ok(failed.iter().map(FailedLoan::view).collect())
    }
}
