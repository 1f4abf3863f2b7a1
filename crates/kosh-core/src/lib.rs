//! Kosh Core Library
//!
//! Shared functionality for the Kosh personal finance tool:
//! - Database access and migrations
//! - Statement CSV import
//! - Recurring payment (SIP) detection
//! - Avalanche loan payoff simulation
//! - Analysis config loading
//! - Wire field mapping for API clients

pub mod config;
pub mod db;
pub mod detect;
pub mod error;
pub mod import;
pub mod models;
pub mod payoff;
pub mod wire;

pub use config::AnalysisConfig;
pub use db::Database;
pub use detect::{detect_recurring_patterns, DetectionConfig, RecurrenceDetector};
pub use error::{Error, Result};
pub use models::{
    AuditEntry, CashFlowMonth, Loan, LoanRecord, LoanStatus, PayoffResult, PayoffSchedule,
    RecurrenceSuggestion, RecurringKind, RecurringPayment, Transaction, TransactionRecord,
};
pub use payoff::{simulate_avalanche_payoff, simulate_avalanche_schedule, PayoffConfig};
