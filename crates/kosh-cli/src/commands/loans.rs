//! Loan command implementations
//!
//! - `cmd_loans_list` / `cmd_loans_add` / `cmd_loans_update` / `cmd_loans_close` - Loan management
//! - `cmd_payoff` - Avalanche payoff projection over active loans

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kosh_core::{
    db::Database,
    models::{LoanStatus, NewLoan, PayoffSchedule},
    payoff::simulate_avalanche_schedule,
    wire::{self, Entity},
    AnalysisConfig,
};

use super::truncate;

/// Arguments for `kosh loans add`
#[derive(Debug, Clone)]
pub struct LoanArgs {
    pub name: String,
    pub remaining: f64,
    pub rate: f64,
    pub emi: f64,
    pub lender: Option<String>,
    pub principal: Option<f64>,
    pub start: Option<NaiveDate>,
}

pub fn cmd_loans_list(db: &Database) -> Result<()> {
    let loans = db.list_loans(None)?;

    if loans.is_empty() {
        println!("No loans recorded. Add one with:");
        println!("  kosh loans add --name \"Home loan\" --remaining 2500000 --rate 8.5 --emi 25000");
        return Ok(());
    }

    println!();
    println!("🏦 Loans (highest rate first)");
    println!("   ─────────────────────────────────────────────────────────────");

    for loan in &loans {
        let marker = match loan.status {
            LoanStatus::Active => "●",
            LoanStatus::Closed => "○",
        };
        println!(
            "   {} [{}] {:<24} {:>6.2}% │ EMI {:>10.2} │ remaining {:>12.2}{}",
            marker,
            loan.id,
            truncate(&loan.name, 24),
            loan.interest_rate,
            loan.emi_amount,
            loan.remaining_amount,
            loan.lender
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default()
        );
    }

    let outstanding: f64 = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Active)
        .map(|l| l.remaining_amount)
        .sum();
    println!();
    println!("   Total outstanding: {:.2}", outstanding);

    Ok(())
}

pub fn cmd_loans_add(db: &Database, args: LoanArgs) -> Result<()> {
    let loan = NewLoan {
        name: args.name,
        lender: args.lender,
        principal_amount: args.principal,
        remaining_amount: args.remaining,
        interest_rate: args.rate,
        emi_amount: args.emi,
        start_date: args.start,
    };

    let id = db.create_loan(&loan).context("Failed to add loan")?;

    println!("✅ Added loan '{}' (ID: {})", loan.name, id);

    let monthly_interest = loan.remaining_amount * loan.interest_rate / 100.0 / 12.0;
    if loan.emi_amount <= monthly_interest {
        println!(
            "   ⚠️  EMI {:.2} does not cover the first month's interest ({:.2}); this loan never amortizes",
            loan.emi_amount, monthly_interest
        );
    }

    Ok(())
}

pub fn cmd_loans_update(db: &Database, id: i64, remaining: f64) -> Result<()> {
    let loan = db
        .get_loan(id)?
        .ok_or_else(|| anyhow::anyhow!("Loan {} not found", id))?;

    db.update_loan_balance(id, remaining)
        .context("Failed to update loan balance")?;

    println!(
        "✅ Updated '{}' balance: {:.2} → {:.2}",
        loan.name, loan.remaining_amount, remaining
    );
    Ok(())
}

pub fn cmd_loans_close(db: &Database, id: i64) -> Result<()> {
    let loan = db
        .get_loan(id)?
        .ok_or_else(|| anyhow::anyhow!("Loan {} not found", id))?;

    db.close_loan(id)?;

    println!("✅ Closed loan '{}' (ID: {})", loan.name, id);
    Ok(())
}

/// Run the projection over all active loans
pub fn project_payoff(
    db: &Database,
    analysis: &AnalysisConfig,
    extra: f64,
) -> Result<PayoffSchedule> {
    let loans = db.active_loan_records()?;
    Ok(simulate_avalanche_schedule(&loans, extra, &analysis.payoff))
}

pub fn cmd_payoff(
    db: &Database,
    analysis: &AnalysisConfig,
    extra: f64,
    show_schedule: bool,
    json: bool,
) -> Result<()> {
    let projection = project_payoff(db, analysis, extra)?;

    if json {
        let value = if show_schedule {
            wire::serialize(Entity::PayoffSchedule, &projection)?
        } else {
            wire::serialize(Entity::PayoffResult, &projection.result)?
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let result = projection.result;
    if result.months == 0 {
        println!("No active loans to pay off.");
        return Ok(());
    }

    println!();
    println!("📉 Avalanche Payoff Projection");
    println!("   ─────────────────────────────");
    if extra > 0.0 {
        println!("   Extra per month: {:.2}", extra);
    }
    println!(
        "   Debt-free in:    {} months ({} years {} months)",
        result.months,
        result.months / 12,
        result.months % 12
    );
    println!("   Total interest:  {:.2}", result.total_interest);

    if projection.capped {
        println!();
        println!(
            "   ⚠️  Stopped at the {} month cap with debt outstanding.",
            analysis.payoff.max_months
        );
        println!("      At least one EMI does not cover its interest.");
    }

    if show_schedule {
        println!();
        println!("   Month │     Interest │    Remaining");
        println!("   ──────┼──────────────┼─────────────");
        for month in &projection.months {
            println!(
                "   {:>5} │ {:>12.2} │ {:>12.2}",
                month.month, month.interest, month.remaining_balance
            );
        }
    }

    Ok(())
}
