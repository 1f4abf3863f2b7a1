//! Recurring payment commands
//!
//! - `cmd_recurring_list` / `cmd_recurring_add` - Declared SIPs, subscriptions, bills
//! - `cmd_detect` - Find recurring charges in imported transactions

use anyhow::{Context, Result};
use kosh_core::{
    db::Database,
    detect::RecurrenceDetector,
    models::{NewRecurringPayment, RecurrenceSuggestion, RecurringKind},
    wire::{self, Entity},
    AnalysisConfig,
};

use super::truncate;

pub fn cmd_recurring_list(db: &Database) -> Result<()> {
    let payments = db.list_recurring()?;

    if payments.is_empty() {
        println!("No recurring payments declared.");
        println!("Run 'kosh detect' to find candidates.");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring Payments");
    println!("   ─────────────────────────────────────────────────────────────");

    for p in &payments {
        let interval = p
            .interval_days
            .map(|d| format!("every {} days", d))
            .unwrap_or_else(|| "irregular".to_string());
        println!(
            "   [{}] {:<12} {:<36} {:>10.2}  {}",
            p.id,
            p.kind.as_str(),
            truncate(&p.description, 36),
            p.amount,
            interval
        );
    }

    Ok(())
}

pub fn cmd_recurring_add(
    db: &Database,
    description: &str,
    amount: f64,
    interval_days: Option<i64>,
    kind: &str,
) -> Result<()> {
    let kind: RecurringKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let payment = NewRecurringPayment {
        description: description.to_string(),
        amount,
        interval_days,
        kind,
    };
    let id = db
        .declare_recurring(&payment)
        .context("Failed to declare recurring payment")?;

    println!("✅ Declared {} '{}' (ID: {})", kind, description.trim(), id);
    Ok(())
}

/// Detected recurring charges the user has not declared yet
pub fn find_suggestions(
    db: &Database,
    analysis: &AnalysisConfig,
) -> Result<Vec<RecurrenceSuggestion>> {
    let records = db.all_transaction_records()?;
    let detected = RecurrenceDetector::with_config(analysis.detection.clone()).detect(&records);
    Ok(db.filter_undeclared(detected)?)
}

pub fn cmd_detect(db: &Database, analysis: &AnalysisConfig, json: bool) -> Result<()> {
    let suggestions = find_suggestions(db, analysis)?;

    if json {
        let value = wire::serialize(Entity::RecurrenceSuggestion, &suggestions)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("🔍 Looking for recurring charges...");

    if suggestions.is_empty() {
        println!("   No new recurring charges found.");
        return Ok(());
    }

    println!();
    println!("📊 {} recurring charge(s) found", suggestions.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for s in &suggestions {
        println!(
            "   {:<36} {:>10.2} │ every ~{} days │ {} times",
            truncate(&s.description, 36),
            s.amount,
            s.interval_days,
            s.occurrences
        );
    }

    println!();
    println!("Declare one with:");
    println!("  kosh recurring add --description \"...\" --amount <amount> --interval <days>");

    Ok(())
}
