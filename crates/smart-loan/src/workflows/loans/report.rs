use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use super::domain::{LoanType, LoanView};
use super::repository::{FailedLoanView, LoanRepository, RepositoryError};

/// Processed applications of one product line, sorted for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedGroup {
    pub loan_type: LoanType,
    pub loan_type_label: &'static str,
    pub loans: Vec<LoanView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedReport {
    pub groups: Vec<ProcessedGroup>,
}

impl ProcessedReport {
    /// True when no application has been processed at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, loan_type: LoanType) -> Option<&ProcessedGroup> {
        self.groups.iter().find(|group| group.loan_type == loan_type)
    }
}

/// Failed applications in the order the failures happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedReport {
    pub loans: Vec<FailedLoanView>,
}

impl FailedReport {
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

pub struct LoanReporter<R> {
    repository: Arc<R>,
}

impl<R: LoanRepository> LoanReporter<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Group processed applications by product line, each sorted by amount then
    /// customer name. Sorting works on snapshots and never reorders storage.
    pub fn processed(&self) -> Result<ProcessedReport, RepositoryError> {
        let mut buckets = self.repository.processed_buckets()?;

        let groups = LoanType::ordered()
            .into_iter()
            .filter_map(|loan_type| {
                let position = buckets
                    .iter()
                    .position(|bucket| bucket.loan_type == loan_type)?;
                let mut loans = buckets.swap_remove(position).loans;
                if loans.is_empty() {
                    return None;
                }
                loans.sort_by(review_order);
                Some(ProcessedGroup {
                    loan_type,
                    loan_type_label: loan_type.label(),
                    loans,
                })
            })
            .collect();

        Ok(ProcessedReport { groups })
    }

    pub fn failed(&self) -> Result<FailedReport, RepositoryError> {
        let loans = self.repository.failed_entries()?;
        Ok(FailedReport { loans })
    }
}

pub(crate) fn review_order(left: &LoanView, right: &LoanView) -> Ordering {
    left.amount
        .total_cmp(&right.amount)
        .then_with(|| cmp_ignore_case(&left.customer_name, &right.customer_name))
}

fn cmp_ignore_case(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}
