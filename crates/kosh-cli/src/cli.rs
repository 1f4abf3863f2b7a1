//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Kosh - Track SIPs, recurring charges and loan payoff
#[derive(Parser)]
#[command(name = "kosh")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kosh.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set KOSH_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Analysis config file (detection thresholds, payoff cap)
    ///
    /// Defaults to ~/.local/share/kosh/config/analysis.toml when present,
    /// otherwise the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV (Date,Description,Amount[,Category])
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage loans
    Loans {
        #[command(subcommand)]
        action: Option<LoansAction>,
    },

    /// Manage declared recurring payments (SIPs, subscriptions, bills)
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Detect recurring charges in imported transactions
    Detect {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Project loan payoff under the avalanche strategy
    Payoff {
        /// Extra amount paid every month on top of the EMIs
        #[arg(long, default_value = "0")]
        extra: f64,

        /// Show the month-by-month balance
        #[arg(long)]
        schedule: bool,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report: ReportType,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum LoansAction {
    /// List loans
    List,

    /// Add a loan
    Add {
        /// Loan name (e.g. "Home loan")
        #[arg(long)]
        name: String,

        /// Outstanding balance
        #[arg(long)]
        remaining: f64,

        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,

        /// Monthly installment
        #[arg(long)]
        emi: f64,

        /// Lender name
        #[arg(long)]
        lender: Option<String>,

        /// Original principal
        #[arg(long)]
        principal: Option<f64>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Record a new outstanding balance (e.g. after a prepayment)
    Update {
        /// Loan ID
        id: i64,

        /// New outstanding balance
        #[arg(long)]
        remaining: f64,
    },

    /// Mark a loan as paid off
    Close {
        /// Loan ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List declared recurring payments
    List,

    /// Declare a recurring payment
    Add {
        /// Description as it appears on statements
        #[arg(long)]
        description: String,

        /// Amount as it appears on statements (negative for debits)
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,

        /// Days between payments
        #[arg(long)]
        interval: Option<i64>,

        /// sip, subscription or bill
        #[arg(long, default_value = "sip")]
        kind: String,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Monthly income, spending and net
    CashFlow {
        /// Start date (YYYY-MM-DD), defaults to twelve months back
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}
