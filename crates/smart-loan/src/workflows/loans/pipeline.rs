use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::domain::{LoanId, LoanRecord, LoanStatus, LoanType};
use super::evaluation::{is_auditable, LoanDecision, RiskRuleBook, EVALUATE_RISK};
use super::repository::{FailedLoan, FailureKind, LoanRepository, RepositoryError};
use super::validation::{validator_for, ValidationError};

/// Notification emitted once a decision has been applied to a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionNotice {
    pub loan_id: LoanId,
    pub loan_type: LoanType,
    pub amount: f64,
    pub decision: LoanDecision,
    pub decided_at: DateTime<Utc>,
}

/// Outbound hook for decision notifications (console, alerting, observability).
pub trait DecisionNotifier: Send + Sync {
    fn notify(&self, notice: &DecisionNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("decision notifier unavailable: {0}")]
    Transport(String),
}

/// Notifier that records each decision as a structured tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl DecisionNotifier for TracingNotifier {
    fn notify(&self, notice: &DecisionNotice) -> Result<(), NotifyError> {
        info!(
            loan_id = %notice.loan_id,
            loan_type = %notice.loan_type,
            amount = notice.amount,
            decision = notice.decision.label(),
            "loan decision issued"
        );
        Ok(())
    }
}

/// Anything that can stop an application short of the processed buckets.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no risk rule registered for {loan_type} applications")]
    MissingRiskRule { loan_type: LoanType },
    #[error(transparent)]
    Notification(#[from] NotifyError),
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("processing aborted: {message}")]
    Panicked { message: String },
}

impl ProcessingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProcessingError::Validation(_) => FailureKind::Validation,
            _ => FailureKind::Unexpected,
        }
    }
}

/// Where the pipeline put an application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Classification {
    Processed { decision: LoanDecision },
    Failed { kind: FailureKind, reason: String },
}

/// Final state of one application after the pipeline ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOutcome {
    pub loan_id: LoanId,
    pub loan_type: LoanType,
    pub status: LoanStatus,
    #[serde(flatten)]
    pub classification: Classification,
}

impl ProcessingOutcome {
    pub fn decision(&self) -> Option<LoanDecision> {
        match &self.classification {
            Classification::Processed { decision } => Some(*decision),
            Classification::Failed { .. } => None,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.classification, Classification::Processed { .. })
    }
}

/// Validate, adjudicate, notify, and classify a single application.
pub struct ProcessingPipeline<R, N> {
    rules: RiskRuleBook,
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> ProcessingPipeline<R, N>
where
    R: LoanRepository,
    N: DecisionNotifier,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self::with_rules(RiskRuleBook::standard(), repository, notifier)
    }

    pub fn with_rules(rules: RiskRuleBook, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            rules,
            repository,
            notifier,
        }
    }

    /// Run `record` to completion. Every failure, including a panic raised by an
    /// injected rule, notifier, or repository, is converted into repository
    /// state; nothing escapes to the caller.
    pub fn process(&self, mut record: LoanRecord) -> ProcessingOutcome {
        let loan_id = record.id();
        let loan_type = record.loan_type();

        let adjudicated = panic::catch_unwind(AssertUnwindSafe(|| self.adjudicate(&mut record)));
        let decision = match adjudicated {
            Ok(Ok(decision)) => decision,
            Ok(Err(err)) => return self.classify_failed(record, err),
            Err(payload) => {
                let err = ProcessingError::Panicked {
                    message: panic_message(payload.as_ref()),
                };
                return self.classify_failed(record, err);
            }
        };

        let stored = panic::catch_unwind(AssertUnwindSafe(|| {
            self.repository.store_processed(record)
        }));
        match stored {
            Ok(Ok(())) => ProcessingOutcome {
                loan_id,
                loan_type,
                status: decision.status(),
                classification: Classification::Processed { decision },
            },
            Ok(Err(rejection)) => self.classify_failed(rejection.value, rejection.error.into()),
            Err(payload) => {
                // The record went down with the repository call; report it unrecorded.
                let reason = ProcessingError::Panicked {
                    message: panic_message(payload.as_ref()),
                }
                .to_string();
                error!(
                    %loan_id,
                    %loan_type,
                    %reason,
                    "unexpected error while processing application"
                );
                ProcessingOutcome {
                    loan_id,
                    loan_type,
                    status: decision.status(),
                    classification: Classification::Failed {
                        kind: FailureKind::Unexpected,
                        reason,
                    },
                }
            }
        }
    }

    fn adjudicate(&self, record: &mut LoanRecord) -> Result<LoanDecision, ProcessingError> {
        validator_for(record.loan_type()).validate(record)?;
        record.mark_pending();

        let loan_type = record.loan_type();
        let rule = self
            .rules
            .rule_for(loan_type)
            .ok_or(ProcessingError::MissingRiskRule { loan_type })?;

        let decision = rule.evaluate(record.amount());
        if is_auditable(loan_type, EVALUATE_RISK) {
            info!(
                target: "smart_loan::audit",
                operation = %format_args!("{}.{}", loan_type.product_name(), EVALUATE_RISK),
                loan_id = %record.id(),
                decision = decision.label(),
                "audited operation invoked"
            );
        }
        record.settle(decision.status());

        let notice = DecisionNotice {
            loan_id: record.id(),
            loan_type,
            amount: record.amount(),
            decision,
            decided_at: Utc::now(),
        };
        self.notifier.notify(&notice)?;

        Ok(decision)
    }

    fn classify_failed(&self, record: LoanRecord, err: ProcessingError) -> ProcessingOutcome {
        let loan_id = record.id();
        let loan_type = record.loan_type();
        let kind = err.kind();
        let reason = err.to_string();

        match kind {
            FailureKind::Validation => warn!(
                %loan_id,
                product = loan_type.product_name(),
                %reason,
                "validation/processing failed"
            ),
            FailureKind::Unexpected => error!(
                %loan_id,
                %loan_type,
                %reason,
                "unexpected error while processing application"
            ),
        }

        let failure = FailedLoan {
            record,
            kind,
            reason: reason.clone(),
        };
        let status = failure.record.status();
        let stored = panic::catch_unwind(AssertUnwindSafe(|| {
            self.repository.store_failed(failure)
        }));
        let store_error = match stored {
            Ok(Ok(())) => None,
            Ok(Err(rejection)) => Some(rejection.error.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };
        if let Some(store_error) = store_error {
            error!(
                %loan_id,
                %loan_type,
                error = %store_error,
                "failed application could not be recorded"
            );
        }

        ProcessingOutcome {
            loan_id,
            loan_type,
            status,
            classification: Classification::Failed { kind, reason },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic without message".to_string()
    }
}
