//! Report command implementations

use anyhow::Result;
use chrono::{Local, NaiveDate};
use kosh_core::db::{resolve_report_range, Database};

pub fn cmd_report_cash_flow(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let (from, to) = resolve_report_range(from, to, Local::now().date_naive())?;
    let months = db.monthly_cash_flow(from, to)?;

    println!();
    println!("💰 Cash Flow: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    if months.is_empty() {
        println!("   No transactions in this period.");
        return Ok(());
    }

    println!(
        "   {:<8} │ {:>12} │ {:>12} │ {:>12} │ {:>5}",
        "Month", "Income", "Spending", "Net", "Txns"
    );

    for m in &months {
        println!(
            "   {:<8} │ {:>12.2} │ {:>12.2} │ {:>12.2} │ {:>5}",
            m.month, m.income, m.spending, m.net, m.transaction_count
        );
    }

    let income: f64 = months.iter().map(|m| m.income).sum();
    let spending: f64 = months.iter().map(|m| m.spending).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<8} │ {:>12.2} │ {:>12.2} │ {:>12.2} │",
        "Total",
        income,
        spending,
        income - spending
    );

    Ok(())
}
