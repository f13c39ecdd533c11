use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sequence::LoanIdSequence;

/// Identifier issued to every application at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product line an application belongs to; selects the validator and risk rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    Home,
    Personal,
}

impl LoanType {
    pub const fn ordered() -> [LoanType; 2] {
        [LoanType::Home, LoanType::Personal]
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoanType::Home => "HOME",
            LoanType::Personal => "PERSONAL",
        }
    }

    /// Product name used in operator-facing messages and the audit registry.
    pub const fn product_name(self) -> &'static str {
        match self {
            LoanType::Home => "HomeLoan",
            LoanType::Personal => "PersonalLoan",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanType {
    type Err = UnknownLoanType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" | "home_loan" | "homeloan" => Ok(LoanType::Home),
            "personal" | "personal_loan" | "personalloan" => Ok(LoanType::Personal),
            _ => Err(UnknownLoanType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loan type '{0}' (expected HOME or PERSONAL)")]
pub struct UnknownLoanType(pub String);

/// Lifecycle status. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Pending => "PENDING",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, LoanStatus::Pending)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that abort record creation before the record reaches the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("loan amount must be a finite number (found {amount})")]
    NonFiniteAmount { amount: f64 },
    #[error("application ids are exhausted")]
    IdsExhausted,
}

/// A single loan application.
///
/// Records are created through [`LoanRecord::open`] and consumed by the pipeline.
/// They are deliberately not `Clone`; callers observe them through [`LoanView`].
#[derive(Debug, PartialEq)]
pub struct LoanRecord {
    id: LoanId,
    customer_name: String,
    amount: f64,
    loan_type: LoanType,
    status: LoanStatus,
}

impl LoanRecord {
    /// Draw the next id from `sequence` and open a pending application.
    pub fn open(
        sequence: &LoanIdSequence,
        loan_type: LoanType,
        customer_name: impl Into<String>,
        amount: f64,
    ) -> Result<Self, IntakeError> {
        if !amount.is_finite() {
            return Err(IntakeError::NonFiniteAmount { amount });
        }

        let id = sequence.next_id().ok_or(IntakeError::IdsExhausted)?;

        Ok(Self {
            id,
            customer_name: customer_name.into(),
            amount,
            loan_type,
            status: LoanStatus::Pending,
        })
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn loan_type(&self) -> LoanType {
        self.loan_type
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// Re-assert the accepted-for-evaluation state. A settled record keeps its decision.
    pub(crate) fn mark_pending(&mut self) {
        if !self.status.is_terminal() {
            self.status = LoanStatus::Pending;
        }
    }

    pub(crate) fn settle(&mut self, status: LoanStatus) {
        debug_assert!(!self.status.is_terminal(), "record {} settled twice", self.id);
        self.status = status;
    }

    pub fn view(&self) -> LoanView {
        LoanView {
            id: self.id,
            customer_name: self.customer_name.clone(),
            amount: self.amount,
            loan_type: self.loan_type,
            status: self.status,
        }
    }
}

/// Read-only snapshot of a record handed to reporters and external callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanView {
    pub id: LoanId,
    pub customer_name: String,
    pub amount: f64,
    pub loan_type: LoanType,
    pub status: LoanStatus,
}
