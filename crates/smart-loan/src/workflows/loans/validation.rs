use super::domain::{LoanRecord, LoanType};

/// Structural problems that keep an application out of risk evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Customer name is required for {}.", .loan_type.product_name())]
    MissingCustomerName { loan_type: LoanType },
    #[error("Amount must be positive for {}.", .loan_type.product_name())]
    NonPositiveAmount { loan_type: LoanType },
}

/// Per-product structural validation. Implementations must not mutate the record.
pub trait LoanValidator: Send + Sync {
    fn validate(&self, record: &LoanRecord) -> Result<(), ValidationError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HomeLoanValidator;

#[derive(Debug, Default, Clone, Copy)]
pub struct PersonalLoanValidator;

impl LoanValidator for HomeLoanValidator {
    fn validate(&self, record: &LoanRecord) -> Result<(), ValidationError> {
        require_name_and_amount(record, LoanType::Home)
    }
}

impl LoanValidator for PersonalLoanValidator {
    fn validate(&self, record: &LoanRecord) -> Result<(), ValidationError> {
        require_name_and_amount(record, LoanType::Personal)
    }
}

pub fn validator_for(loan_type: LoanType) -> &'static dyn LoanValidator {
    match loan_type {
        LoanType::Home => &HomeLoanValidator,
        LoanType::Personal => &PersonalLoanValidator,
    }
}

fn require_name_and_amount(
    record: &LoanRecord,
    loan_type: LoanType,
) -> Result<(), ValidationError> {
    if record.customer_name().trim().is_empty() {
        return Err(ValidationError::MissingCustomerName { loan_type });
    }

    if record.amount() <= 0.0 {
        return Err(ValidationError::NonPositiveAmount { loan_type });
    }

    Ok(())
}
