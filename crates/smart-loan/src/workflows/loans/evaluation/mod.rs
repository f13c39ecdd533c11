mod audit;
mod rules;

pub use audit::{auditable_operations, is_auditable, AuditableOperation, EVALUATE_RISK};
pub use rules::{
    HomeRiskRule, PersonalRiskRule, RiskRule, RiskRuleBook, HOME_APPROVAL_CEILING,
    PERSONAL_APPROVAL_LIMIT,
};

use super::domain::LoanStatus;
use serde::{Deserialize, Serialize};

/// Terminal adjudication produced by a risk rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    pub const fn label(self) -> &'static str {
        self.status().label()
    }

    pub const fn status(self) -> LoanStatus {
        match self {
            LoanDecision::Approved => LoanStatus::Approved,
            LoanDecision::Rejected => LoanStatus::Rejected,
        }
    }
}

impl From<LoanDecision> for LoanStatus {
    fn from(decision: LoanDecision) -> Self {
        decision.status()
    }
}
