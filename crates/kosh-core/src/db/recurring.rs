//! Declared recurring payment operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::detect::normalize_description;
use crate::error::{Error, Result};
use crate::models::{NewRecurringPayment, RecurrenceSuggestion, RecurringKind, RecurringPayment};

impl Database {
    /// Declare a recurring payment
    pub fn declare_recurring(&self, payment: &NewRecurringPayment) -> Result<i64> {
        if payment.description.trim().is_empty() {
            return Err(Error::InvalidData("Description is required".to_string()));
        }
        if !payment.amount.is_finite() {
            return Err(Error::InvalidData("Amount must be a number".to_string()));
        }
        if let Some(days) = payment.interval_days {
            if days <= 0 {
                return Err(Error::InvalidData("Interval must be positive".to_string()));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO recurring_payments (description, amount, interval_days, kind) VALUES (?, ?, ?, ?)",
            params![
                payment.description.trim(),
                payment.amount,
                payment.interval_days,
                payment.kind.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List declared recurring payments
    pub fn list_recurring(&self) -> Result<Vec<RecurringPayment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, amount, interval_days, kind, created_at FROM recurring_payments ORDER BY description",
        )?;

        let payments = stmt
            .query_map([], |row| {
                let kind_str: String = row.get(4)?;
                let created_at_str: String = row.get(5)?;
                Ok(RecurringPayment {
                    id: row.get(0)?,
                    description: row.get(1)?,
                    amount: row.get(2)?,
                    interval_days: row.get(3)?,
                    kind: kind_str.parse().unwrap_or(RecurringKind::Sip),
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(payments)
    }

    /// Delete a declared recurring payment
    pub fn delete_recurring(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM recurring_payments WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Recurring payment {}", id)));
        }
        Ok(())
    }

    /// Drop suggestions the user has already declared
    ///
    /// A declaration matches on normalized description and exact amount.
    pub fn filter_undeclared(
        &self,
        suggestions: Vec<RecurrenceSuggestion>,
    ) -> Result<Vec<RecurrenceSuggestion>> {
        let declared: Vec<(String, f64)> = self
            .list_recurring()?
            .into_iter()
            .map(|p| (normalize_description(&p.description), p.amount))
            .collect();

        Ok(suggestions
            .into_iter()
            .filter(|s| {
                let key = normalize_description(&s.description);
                !declared
                    .iter()
                    .any(|(desc, amount)| *desc == key && *amount == s.amount)
            })
            .collect())
    }
}
