//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use kosh_core::{db::Database, import::parse_csv};
use tracing::info;

/// Counts from one import run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub found: usize,
    pub imported: usize,
    pub skipped: usize,
}

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let summary = import_file(db, file)?;

    println!("   Found {} transactions", summary.found);
    println!();
    println!("✅ Import complete!");
    println!("   Imported: {}", summary.imported);
    println!("   Skipped (duplicates): {}", summary.skipped);

    if summary.imported > 0 {
        println!();
        println!("Run 'kosh detect' to look for recurring charges.");
    }

    Ok(())
}

/// Parse a statement and store every transaction not seen before
pub fn import_file(db: &Database, file: &Path) -> Result<ImportSummary> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let transactions = parse_csv(csv_file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let mut summary = ImportSummary {
        found: transactions.len(),
        ..Default::default()
    };

    for tx in &transactions {
        match db.insert_transaction(tx)? {
            Some(_) => summary.imported += 1,
            None => summary.skipped += 1,
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Imported {}",
        file.display()
    );

    Ok(summary)
}
