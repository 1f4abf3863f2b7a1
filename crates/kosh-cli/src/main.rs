//! Kosh CLI - Personal finance tracker
//!
//! Usage:
//!   kosh init                      Initialize database
//!   kosh import --file CSV         Import transactions
//!   kosh detect                    Find recurring charges (SIPs, subscriptions)
//!   kosh payoff --extra 5000       Project avalanche loan payoff
//!   kosh serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use kosh_core::AnalysisConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let analysis =
        AnalysisConfig::load(cli.config.as_deref()).context("Failed to load analysis config")?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(&db, limit)
                }
            }
        }
        Commands::Loans { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(LoansAction::List) => commands::cmd_loans_list(&db),
                Some(LoansAction::Add {
                    name,
                    remaining,
                    rate,
                    emi,
                    lender,
                    principal,
                    start,
                }) => commands::cmd_loans_add(
                    &db,
                    commands::LoanArgs {
                        name,
                        remaining,
                        rate,
                        emi,
                        lender,
                        principal,
                        start,
                    },
                ),
                Some(LoansAction::Update { id, remaining }) => {
                    commands::cmd_loans_update(&db, id, remaining)
                }
                Some(LoansAction::Close { id }) => commands::cmd_loans_close(&db, id),
            }
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(RecurringAction::List) => commands::cmd_recurring_list(&db),
                Some(RecurringAction::Add {
                    description,
                    amount,
                    interval,
                    kind,
                }) => commands::cmd_recurring_add(&db, &description, amount, interval, &kind),
            }
        }
        Commands::Detect { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_detect(&db, &analysis, json)
        }
        Commands::Payoff {
            extra,
            schedule,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_payoff(&db, &analysis, extra, schedule, json)
        }
        Commands::Report { report } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match report {
                ReportType::CashFlow { from, to } => commands::cmd_report_cash_flow(&db, from, to),
            }
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt, analysis).await,
    }
}
