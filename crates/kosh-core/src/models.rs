//! Domain models for Kosh
//!
//! Models serialize with their storage (snake_case) field names. The
//! camelCase wire shape is produced at the API boundary by [`crate::wire`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: Option<String>,
    /// Hash for deduplication
    pub import_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Snapshot used as recurrence detector input
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
        }
    }
}

/// A new transaction to be stored (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub import_hash: String,
}

/// Minimal transaction snapshot consumed by the recurrence detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl TransactionRecord {
    pub fn new(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
        }
    }
}

/// A group of transactions that repeats at a regular interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceSuggestion {
    /// Description as it appeared on the first transaction of the group
    pub description: String,
    pub amount: f64,
    pub occurrences: usize,
    /// Mean gap between charges, rounded to whole days
    pub interval_days: i64,
}

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Closed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Unknown loan status: {}", s)),
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub name: String,
    pub lender: Option<String>,
    pub principal_amount: Option<f64>,
    pub remaining_amount: f64,
    /// Annual interest rate in percent (e.g. 12.0 = 12% p.a.)
    pub interest_rate: f64,
    /// Equated monthly installment
    pub emi_amount: f64,
    pub start_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// Snapshot used as payoff simulator input
    pub fn to_record(&self) -> LoanRecord {
        LoanRecord {
            id: self.id,
            remaining_amount: self.remaining_amount,
            interest_rate: self.interest_rate,
            emi_amount: self.emi_amount,
        }
    }
}

/// A new loan to be stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoan {
    pub name: String,
    pub lender: Option<String>,
    pub principal_amount: Option<f64>,
    pub remaining_amount: f64,
    pub interest_rate: f64,
    pub emi_amount: f64,
    pub start_date: Option<NaiveDate>,
}

/// Read-only loan snapshot consumed by the payoff simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: i64,
    pub remaining_amount: f64,
    /// Annual percent
    pub interest_rate: f64,
    pub emi_amount: f64,
}

/// Outcome of a payoff simulation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoffResult {
    pub months: u32,
    pub total_interest: f64,
}

/// One simulated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    /// 1-based month number
    pub month: u32,
    pub interest: f64,
    /// Sum of all balances at the end of the month
    pub remaining_balance: f64,
}

/// Payoff simulation with the month-by-month trail
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayoffSchedule {
    pub result: PayoffResult,
    pub months: Vec<PayoffMonth>,
    /// True when the run stopped at the month cap with debt still outstanding
    pub capped: bool,
}

/// What kind of recurring payment the user declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringKind {
    /// Systematic investment plan
    #[default]
    Sip,
    Subscription,
    Bill,
}

impl RecurringKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sip => "sip",
            Self::Subscription => "subscription",
            Self::Bill => "bill",
        }
    }
}

impl std::str::FromStr for RecurringKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sip" => Ok(Self::Sip),
            "subscription" => Ok(Self::Subscription),
            "bill" => Ok(Self::Bill),
            _ => Err(format!("Unknown recurring payment kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecurringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring payment the user has declared (SIP, subscription, bill)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub interval_days: Option<i64>,
    pub kind: RecurringKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurringPayment {
    pub description: String,
    pub amount: f64,
    pub interval_days: Option<i64>,
    #[serde(default)]
    pub kind: RecurringKind,
}

/// Income and spending for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowMonth {
    /// "YYYY-MM"
    pub month: String,
    pub income: f64,
    /// Positive number (sum of absolute expense amounts)
    pub spending: f64,
    pub net: f64,
    pub transaction_count: i64,
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_email: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}
