//! Transaction command implementations

use anyhow::Result;
use kosh_core::db::Database;

use super::truncate;

/// Colored amount: red for expenses, green for income
pub(crate) fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("\x1b[31m{:.2}\x1b[0m", amount)
    } else {
        format!("\x1b[32m+{:.2}\x1b[0m", amount)
    }
}

pub fn cmd_transactions_list(db: &Database, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(limit.max(1), 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  kosh import --file statement.csv");
        return Ok(());
    }

    let total = db.count_transactions()?;

    println!();
    println!(
        "📝 Recent Transactions ({} of {})",
        transactions.len(),
        total
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        println!(
            "   [{}] {} │ {:>12} │ {}",
            tx.id,
            tx.date,
            format_amount(tx.amount),
            truncate(&tx.description, 40)
        );
    }

    Ok(())
}
