//! Cash flow rollups

use chrono::{Datelike, Months, NaiveDate};
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::CashFlowMonth;

/// Months covered when no start date is given (including the current one)
pub const DEFAULT_REPORT_MONTHS: u32 = 12;

/// Resolve an optional report range to concrete dates
///
/// `to` defaults to `today`. `from` defaults to the first day of the month
/// eleven months before `to`.
pub fn resolve_report_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let to = to.unwrap_or(today);
    let from = match from {
        Some(d) => d,
        None => to
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(DEFAULT_REPORT_MONTHS - 1)))
            .ok_or_else(|| Error::InvalidData(format!("Report end {} out of range", to)))?,
    };

    if from > to {
        return Err(Error::InvalidData(format!(
            "Report start {} is after end {}",
            from, to
        )));
    }
    Ok((from, to))
}

impl Database {
    /// Income, spending and net per calendar month in `[from, to]`
    ///
    /// Months without transactions are omitted.
    pub fn monthly_cash_flow(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CashFlowMonth>> {
        if from > to {
            return Err(Error::InvalidData(format!(
                "Report start {} is after end {}",
                from, to
            )));
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                strftime('%Y-%m', date) as period,
                COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0) as income,
                COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0 END), 0) as spending,
                COUNT(*) as tx_count
            FROM transactions
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY period
            ORDER BY period
            "#,
        )?;

        let months = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                let income: f64 = row.get(1)?;
                let spending: f64 = row.get(2)?;
                Ok(CashFlowMonth {
                    month: row.get(0)?,
                    income,
                    spending,
                    net: income - spending,
                    transaction_count: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(months)
    }
}
