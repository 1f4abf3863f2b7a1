//! CSV statement import
//!
//! Expected header: `Date,Description,Amount` with an optional `Category`
//! column anywhere. Column lookup is by header name, case-insensitive.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::NewTransaction;

/// Date formats accepted in statements
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing = |name: &str| Error::Import(format!("Missing '{}' column", name));

        Ok(Self {
            date: find("date").ok_or_else(|| missing("Date"))?,
            description: find("description").ok_or_else(|| missing("Description"))?,
            amount: find("amount").ok_or_else(|| missing("Amount"))?,
            category: find("category"),
        })
    }
}

/// Parse CSV statement data into transactions
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();
    // Identical rows in one file are separate charges
    let mut seen: HashMap<(NaiveDate, String, u64), u32> = HashMap::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let date_str = record
            .get(columns.date)
            .ok_or_else(|| Error::Import(format!("Line {}: missing date", line)))?;
        let date = parse_date(date_str)
            .ok_or_else(|| Error::Import(format!("Line {}: invalid date '{}'", line, date_str)))?;

        let description = record
            .get(columns.description)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::Import(format!("Line {}: missing description", line)))?
            .to_string();

        let amount_str = record
            .get(columns.amount)
            .ok_or_else(|| Error::Import(format!("Line {}: missing amount", line)))?;
        let amount = parse_amount(amount_str).ok_or_else(|| {
            Error::Import(format!("Line {}: invalid amount '{}'", line, amount_str))
        })?;

        let category = columns
            .category
            .and_then(|c| record.get(c))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let occurrence = seen
            .entry((date, description.clone(), amount.to_bits()))
            .or_insert(0);
        let import_hash = generate_hash(&date, &description, amount, *occurrence);
        *occurrence += 1;

        transactions.push(NewTransaction {
            date,
            description,
            amount,
            category,
            import_hash,
        });
    }

    debug!("Parsed {} transactions from CSV", transactions.len());
    Ok(transactions)
}

/// Parse a date in any supported statement format
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount, tolerating currency symbols, thousands separators and
/// accounting-style parentheses for negatives
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, body) = match s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | '₹' | ',' | ' '))
        .collect();

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Generate a unique hash for deduplication
///
/// `occurrence` distinguishes identical rows within the same statement, so
/// re-importing the same file still deduplicates row for row.
pub fn generate_hash(date: &NaiveDate, description: &str, amount: f64, occurrence: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(occurrence.to_be_bytes());
    hex::encode(hasher.finalize())
}
