//! Loan application intake, risk adjudication, and review reporting.
//!
//! Applications flow through [`LoanDesk::submit`]: a record is opened with the next
//! id, validated for its product line, adjudicated by that line's risk rule, and
//! classified into either the processed buckets or the failed list.

pub mod domain;
pub(crate) mod evaluation;
pub mod pipeline;
pub mod report;
pub mod repository;
pub mod router;
pub mod sequence;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    IntakeError, LoanId, LoanRecord, LoanStatus, LoanType, LoanView, UnknownLoanType,
};
pub use evaluation::{
    auditable_operations, is_auditable, AuditableOperation, HomeRiskRule, LoanDecision,
    PersonalRiskRule, RiskRule, RiskRuleBook, EVALUATE_RISK, HOME_APPROVAL_CEILING,
    PERSONAL_APPROVAL_LIMIT,
};
pub use pipeline::{
    Classification, DecisionNotice, DecisionNotifier, NotifyError, ProcessingError,
    ProcessingOutcome, ProcessingPipeline, TracingNotifier,
};
pub use report::{FailedReport, LoanReporter, ProcessedGroup, ProcessedReport};
pub use repository::{
    FailedLoan, FailedLoanView, FailureKind, InMemoryLoanRepository, LoanRepository,
    ProcessedBucket, RepositoryError, StoreRejection,
};
pub use router::{loan_router, LoanSubmissionRequest};
pub use sequence::{LoanIdSequence, DEFAULT_ID_SEED};
pub use service::{LoanDesk, LoanDeskError};
pub use validation::{
    validator_for, HomeLoanValidator, LoanValidator, PersonalLoanValidator, ValidationError,
};
