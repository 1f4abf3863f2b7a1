//! Loan operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Loan, LoanRecord, LoanStatus, NewLoan};

const LOAN_COLUMNS: &str = "id, name, lender, principal_amount, remaining_amount, interest_rate, emi_amount, start_date, status, created_at";

fn row_to_loan(row: &Row<'_>) -> rusqlite::Result<Loan> {
    let start_date_str: Option<String> = row.get(7)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    Ok(Loan {
        id: row.get(0)?,
        name: row.get(1)?,
        lender: row.get(2)?,
        principal_amount: row.get(3)?,
        remaining_amount: row.get(4)?,
        interest_rate: row.get(5)?,
        emi_amount: row.get(6)?,
        start_date: start_date_str.and_then(|s| parse_date(&s)),
        status: status_str.parse().unwrap_or(LoanStatus::Active),
        created_at: parse_datetime(&created_at_str),
    })
}

/// Highest accepted annual interest rate, in percent
pub const MAX_INTEREST_RATE: f64 = 100.0;

/// Largest accepted balance or EMI
pub const MAX_LOAN_AMOUNT: f64 = 1e15;

fn validate_amount(label: &str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "Loan {} must be a non-negative number",
            label
        )));
    }
    if value > max {
        return Err(Error::InvalidData(format!(
            "Loan {} must not exceed {}",
            label, max
        )));
    }
    Ok(())
}

fn validate_new_loan(loan: &NewLoan) -> Result<()> {
    if loan.name.trim().is_empty() {
        return Err(Error::InvalidData("Loan name is required".to_string()));
    }
    validate_amount("remaining amount", loan.remaining_amount, MAX_LOAN_AMOUNT)?;
    validate_amount("interest rate", loan.interest_rate, MAX_INTEREST_RATE)?;
    validate_amount("EMI", loan.emi_amount, MAX_LOAN_AMOUNT)
}

impl Database {
    /// Create a loan
    pub fn create_loan(&self, loan: &NewLoan) -> Result<i64> {
        validate_new_loan(loan)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO loans (name, lender, principal_amount, remaining_amount, interest_rate, emi_amount, start_date, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'active')
            "#,
            params![
                loan.name.trim(),
                loan.lender,
                loan.principal_amount,
                loan.remaining_amount,
                loan.interest_rate,
                loan.emi_amount,
                loan.start_date.map(|d| d.to_string()),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List loans, optionally filtered by status
    pub fn list_loans(&self, status: Option<LoanStatus>) -> Result<Vec<Loan>> {
        let conn = self.conn()?;

        let loans = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM loans WHERE status = ? ORDER BY interest_rate DESC, id",
                    LOAN_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![status.as_str()], row_to_loan)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM loans ORDER BY interest_rate DESC, id",
                    LOAN_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], row_to_loan)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(loans)
    }

    /// Get a loan by ID
    pub fn get_loan(&self, id: i64) -> Result<Option<Loan>> {
        let conn = self.conn()?;
        let loan = conn
            .query_row(
                &format!("SELECT {} FROM loans WHERE id = ?", LOAN_COLUMNS),
                params![id],
                row_to_loan,
            )
            .optional()?;
        Ok(loan)
    }

    /// Record a new outstanding balance (e.g. after a prepayment)
    pub fn update_loan_balance(&self, id: i64, remaining_amount: f64) -> Result<()> {
        validate_amount("remaining amount", remaining_amount, MAX_LOAN_AMOUNT)?;
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE loans SET remaining_amount = ? WHERE id = ?",
            params![remaining_amount, id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Loan {}", id)));
        }
        Ok(())
    }

    /// Mark a loan as closed and zero its balance
    pub fn close_loan(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE loans SET status = 'closed', remaining_amount = 0 WHERE id = ?",
            params![id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Loan {}", id)));
        }
        Ok(())
    }

    /// Delete a loan
    pub fn delete_loan(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM loans WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Loan {}", id)));
        }
        Ok(())
    }

    /// Active loans as payoff simulator input, in creation order
    pub fn active_loan_records(&self) -> Result<Vec<LoanRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM loans WHERE status = 'active' ORDER BY id",
            LOAN_COLUMNS
        ))?;

        let records = stmt
            .query_map([], |row| row_to_loan(row).map(|loan| loan.to_record()))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
