use crate::infra::{format_amount, render_audit, render_failed, render_processed, Desk};
use smart_loan::error::AppError;
use smart_loan::workflows::loans::{Classification, FailureKind, LoanType};
use std::io::{BufRead, Write};
use tracing::debug;

enum Step {
    Continue,
    Exit,
}

/// Drive the numbered console menu until the operator exits or input ends.
pub(crate) fn run_menu<R: BufRead, W: Write>(
    desk: &Desk,
    mut input: R,
    mut output: W,
) -> Result<(), AppError> {
    loop {
        write_menu(&mut output)?;

        let Some(line) = read_line(&mut input)? else {
            debug!("menu input closed");
            return Ok(());
        };

        let choice = match line.trim().parse::<u32>() {
            Ok(choice) => choice,
            Err(_) => {
                writeln!(output, "Invalid input !")?;
                continue;
            }
        };

        let step = match choice {
            1 => apply(desk, LoanType::Home, &mut input, &mut output)?,
            2 => apply(desk, LoanType::Personal, &mut input, &mut output)?,
            3 => {
                render_processed(&mut output, &desk.processed_view()?)?;
                Step::Continue
            }
            4 => {
                render_failed(&mut output, &desk.failed_view()?)?;
                Step::Continue
            }
            5 => {
                render_audit(&mut output, desk.auditable_operations())?;
                Step::Continue
            }
            6 => {
                writeln!(output, "Exiting Smart Loan System")?;
                Step::Exit
            }
            _ => {
                writeln!(output, "Invalid choice !")?;
                Step::Continue
            }
        };

        output.flush()?;
        if let Step::Exit = step {
            return Ok(());
        }
    }
}

fn write_menu<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(output, "\n=== Smart Loan System ===")?;
    writeln!(output, "1. Apply for Home Loan")?;
    writeln!(output, "2. Apply for Personal Loan")?;
    writeln!(output, "3. View Processed Applications")?;
    writeln!(output, "4. View Failed Applications")?;
    writeln!(output, "5. View Audit Logged Methods")?;
    writeln!(output, "6. Exit\n")?;
    writeln!(output, "Enter Your Choice : ")?;
    output.flush()
}

fn apply<R: BufRead, W: Write>(
    desk: &Desk,
    loan_type: LoanType,
    input: &mut R,
    output: &mut W,
) -> Result<Step, AppError> {
    write!(output, "Enter customer name: ")?;
    output.flush()?;
    let Some(customer_name) = read_line(input)? else {
        return Ok(Step::Exit);
    };

    write!(output, "Enter loan amount (₹): ")?;
    output.flush()?;
    let Some(raw_amount) = read_line(input)? else {
        return Ok(Step::Exit);
    };
    let amount = match raw_amount.trim().parse::<f64>() {
        Ok(amount) => amount,
        Err(_) => {
            writeln!(output, "Invalid amount !")?;
            return Ok(Step::Continue);
        }
    };

    let outcome = match desk.submit_with_outcome(loan_type, &customer_name, amount) {
        Ok(outcome) => outcome,
        Err(err) => {
            writeln!(output, "Application not accepted: {err}")?;
            return Ok(Step::Continue);
        }
    };

    match &outcome.classification {
        Classification::Processed { decision } => writeln!(
            output,
            "Decision for Application #{} ({}, {}): {}",
            outcome.loan_id,
            outcome.loan_type,
            format_amount(amount),
            decision.label()
        )?,
        Classification::Failed {
            kind: FailureKind::Validation,
            reason,
        } => writeln!(
            output,
            "Validation/Processing failed for #{} ({}): {}",
            outcome.loan_id,
            outcome.loan_type.product_name(),
            reason
        )?,
        Classification::Failed { reason, .. } => writeln!(
            output,
            "Unexpected error for #{}: {}",
            outcome.loan_id, reason
        )?,
    }

    Ok(Step::Continue)
}

/// Next line without its terminator, or `None` once input is exhausted.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
