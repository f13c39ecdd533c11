use crate::infra::{format_amount, render_audit, render_failed, render_processed, Desk};
use smart_loan::error::AppError;
use smart_loan::workflows::loans::{Classification, LoanType};
use std::io::Write;

const DEMO_APPLICATIONS: [(LoanType, &str, f64); 8] = [
    (LoanType::Home, "Asha", 4_999_999.0),
    (LoanType::Home, "Asha", 5_000_000.0),
    (LoanType::Personal, "Raj", 500_000.0),
    (LoanType::Personal, "Raj", 500_001.0),
    (LoanType::Home, "", 10_000.0),
    (LoanType::Personal, "Meera", -5.0),
    (LoanType::Home, "vikram", 2_750_000.0),
    (LoanType::Personal, "Anil", 120_000.0),
];

pub(crate) fn run_demo<W: Write>(desk: &Desk, out: &mut W) -> Result<(), AppError> {
    writeln!(out, "Smart loan intake demo")?;

    for (loan_type, customer_name, amount) in DEMO_APPLICATIONS {
        let outcome = desk.submit_with_outcome(loan_type, customer_name, amount)?;
        let verdict = match &outcome.classification {
            Classification::Processed { decision } => decision.label().to_string(),
            Classification::Failed { kind, reason } => {
                format!("FAILED ({}): {reason}", kind.label())
            }
        };
        writeln!(
            out,
            "- #{} {} '{}' {} -> {}",
            outcome.loan_id,
            loan_type,
            customer_name,
            format_amount(amount),
            verdict
        )?;
    }

    render_processed(out, &desk.processed_view()?)?;
    render_failed(out, &desk.failed_view()?)?;
    render_audit(out, desk.auditable_operations())?;

    Ok(())
}
