use metrics_exporter_prometheus::PrometheusHandle;
use smart_loan::config::IntakeConfig;
use smart_loan::workflows::loans::{
    AuditableOperation, FailedReport, InMemoryLoanRepository, LoanDesk, LoanView,
    ProcessedReport, TracingNotifier,
};
use std::io::{self, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Desk = LoanDesk<InMemoryLoanRepository, TracingNotifier>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_desk(config: IntakeConfig) -> Desk {
    LoanDesk::new(
        Arc::new(InMemoryLoanRepository::default()),
        Arc::new(TracingNotifier),
        config,
    )
}

pub(crate) fn format_amount(amount: f64) -> String {
    format!("₹{amount:.2}")
}

pub(crate) fn format_loan(loan: &LoanView) -> String {
    format!(
        "LoanApplication{{id={}, customer='{}', amount={}, type={}, status={}}}",
        loan.id,
        loan.customer_name,
        format_amount(loan.amount),
        loan.loan_type,
        loan.status
    )
}

fn write_listing<'a, W: Write>(
    out: &mut W,
    title: &str,
    loans: impl IntoIterator<Item = &'a LoanView>,
) -> io::Result<()> {
    writeln!(out, "\n=== {title} ===")?;
    let mut any = false;
    for loan in loans {
        any = true;
        writeln!(out, "{}", format_loan(loan))?;
    }
    if !any {
        writeln!(out, "No records found.")?;
    }
    Ok(())
}

pub(crate) fn render_processed<W: Write>(out: &mut W, report: &ProcessedReport) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "\nNo processed applications yet.");
    }

    for group in &report.groups {
        let title = format!("Processed {} Applications", group.loan_type_label);
        write_listing(out, &title, &group.loans)?;
    }
    Ok(())
}

pub(crate) fn render_failed<W: Write>(out: &mut W, report: &FailedReport) -> io::Result<()> {
    write_listing(
        out,
        "Failed/Invalid Applications",
        report.loans.iter().map(|entry| &entry.loan),
    )
}

pub(crate) fn render_audit<W: Write>(
    out: &mut W,
    operations: &[AuditableOperation],
) -> io::Result<()> {
    writeln!(out, "\n=== Audit Logged Methods ===")?;
    for operation in operations {
        writeln!(out, "{operation}")?;
    }
    Ok(())
}
