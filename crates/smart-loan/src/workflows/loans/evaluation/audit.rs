use std::fmt;

use serde::Serialize;

use super::super::domain::LoanType;

/// Operation name under which every risk rule's evaluation is registered.
pub const EVALUATE_RISK: &str = "evaluate_risk";

/// An operation tagged for audit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditableOperation {
    pub type_name: &'static str,
    pub operation: &'static str,
}

impl fmt::Display for AuditableOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}()", self.type_name, self.operation)
    }
}

const AUDITABLE_OPERATIONS: [AuditableOperation; 2] = [
    AuditableOperation {
        type_name: LoanType::Home.product_name(),
        operation: EVALUATE_RISK,
    },
    AuditableOperation {
        type_name: LoanType::Personal.product_name(),
        operation: EVALUATE_RISK,
    },
];

pub fn auditable_operations() -> &'static [AuditableOperation] {
    &AUDITABLE_OPERATIONS
}

pub fn is_auditable(loan_type: LoanType, operation: &str) -> bool {
    AUDITABLE_OPERATIONS
        .iter()
        .any(|entry| entry.type_name == loan_type.product_name() && entry.operation == operation)
}
