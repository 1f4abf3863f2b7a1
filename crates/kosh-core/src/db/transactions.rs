//! Transaction operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionRecord};

const TRANSACTION_COLUMNS: &str = "id, date, description, amount, category, import_hash, created_at";

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    let created_at_str: String = row.get(6)?;

    let date = parse_date(&date_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("invalid date '{}'", date_str).into(),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        date,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        import_hash: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Insert a transaction (skips duplicates based on import_hash)
    ///
    /// Returns `None` when a transaction with the same hash already exists.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<Option<i64>> {
        if !tx.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "Transaction '{}' has a non-finite amount",
                tx.description
            )));
        }

        let conn = self.conn()?;

        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO transactions (date, description, amount, category, import_hash)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                tx.date.to_string(),
                tx.description,
                tx.amount,
                tx.category,
                tx.import_hash,
            ],
        )?;

        if inserted == 0 {
            return Ok(None);
        }

        Ok(Some(conn.last_insert_rowid()))
    }

    /// List transactions, newest first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![limit, offset], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count all transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Delete a transaction
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// All transactions as recurrence detector input, in insertion order
    pub fn all_transaction_records(&self) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY id",
            TRANSACTION_COLUMNS
        ))?;

        let records = stmt
            .query_map([], |row| row_to_transaction(row).map(|tx| tx.to_record()))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
