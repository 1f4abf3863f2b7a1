//! Integration tests for kosh-core
//!
//! These tests exercise the full import → store → detect → payoff workflow.

use kosh_core::{
    config::parse_config,
    db::Database,
    detect::RecurrenceDetector,
    import::parse_csv,
    models::{NewLoan, NewRecurringPayment, RecurringKind},
    payoff::{simulate_avalanche_payoff, simulate_avalanche_schedule},
    wire::{self, Entity},
};

/// Statement with two monthly charges, a monthly salary and noise:
/// - SIP debits of -5000 roughly every 30 days (4 occurrences)
/// - Netflix at -649 roughly every 30 days (3 occurrences)
/// - Salary credits on the 1st
/// - Groceries with varying amounts (never grouped)
fn statement_csv() -> &'static str {
    r#"Date,Description,Amount,Category
2024-01-01,ACME PAYROLL,85000.00,Income
2024-01-05,SIP Parag Parikh Flexi Cap,-5000.00,Investments
2024-01-09,Big Basket,-2310.50,Groceries
2024-01-12,Netflix,-649.00,Entertainment
2024-02-01,ACME PAYROLL,85000.00,Income
2024-02-04,SIP Parag Parikh Flexi Cap,-5000.00,Investments
2024-02-11,Netflix,-649.00,Entertainment
2024-02-17,Big Basket,-1875.25,Groceries
2024-03-01,ACME PAYROLL,85000.00,Income
2024-03-05,SIP Parag Parikh Flexi Cap,-5000.00,Investments
2024-03-12,netflix ,-649.00,Entertainment
2024-03-20,Big Basket,-2990.00,Groceries
2024-04-04,SIP Parag Parikh Flexi Cap,-5000.00,Investments"#
}

fn import_statement(db: &Database) -> usize {
    let transactions = parse_csv(statement_csv().as_bytes()).expect("Failed to parse CSV");
    transactions
        .iter()
        .filter(|tx| db.insert_transaction(tx).unwrap().is_some())
        .count()
}

// =============================================================================
// Import → Detect
// =============================================================================

#[test]
fn test_import_then_detect() {
    let db = Database::in_memory().expect("Failed to create database");

    assert_eq!(import_statement(&db), 13);

    let records = db.all_transaction_records().unwrap();
    let found = RecurrenceDetector::new().detect(&records);

    let sip = found
        .iter()
        .find(|s| s.description == "SIP Parag Parikh Flexi Cap")
        .expect("SIP should be detected");
    assert_eq!(sip.occurrences, 4);
    assert_eq!(sip.amount, -5000.0);
    assert_eq!(sip.interval_days, 30);

    let netflix = found
        .iter()
        .find(|s| s.description == "Netflix")
        .expect("Netflix should be detected across casing and whitespace");
    assert_eq!(netflix.occurrences, 3);

    let payroll = found
        .iter()
        .find(|s| s.description == "ACME PAYROLL")
        .expect("Salary is recurring too");
    assert_eq!(payroll.interval_days, 30);

    assert!(
        !found.iter().any(|s| s.description == "Big Basket"),
        "varying amounts never group"
    );
}

#[test]
fn test_reimport_is_idempotent() {
    let db = Database::in_memory().unwrap();

    assert_eq!(import_statement(&db), 13);
    assert_eq!(import_statement(&db), 0);
    assert_eq!(db.count_transactions().unwrap(), 13);
}

#[test]
fn test_declared_payments_are_filtered_from_suggestions() {
    let db = Database::in_memory().unwrap();
    import_statement(&db);

    db.declare_recurring(&NewRecurringPayment {
        description: "SIP Parag Parikh Flexi Cap".to_string(),
        amount: -5000.0,
        interval_days: Some(30),
        kind: RecurringKind::Sip,
    })
    .unwrap();

    let records = db.all_transaction_records().unwrap();
    let suggestions = RecurrenceDetector::new().detect(&records);
    let before = suggestions.len();

    let remaining = db.filter_undeclared(suggestions).unwrap();
    assert_eq!(remaining.len(), before - 1);
    assert!(!remaining
        .iter()
        .any(|s| s.description == "SIP Parag Parikh Flexi Cap"));
}

#[test]
fn test_custom_config_changes_detection() {
    let db = Database::in_memory().unwrap();
    import_statement(&db);

    let config = parse_config(
        r#"
        [detection]
        min_occurrences = 4

        [payoff]
        max_months = 1200
        "#,
    )
    .unwrap();

    let records = db.all_transaction_records().unwrap();
    let found = RecurrenceDetector::with_config(config.detection).detect(&records);

    // Only the SIP has four occurrences
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].description, "SIP Parag Parikh Flexi Cap");
}

// =============================================================================
// Loans → Payoff
// =============================================================================

fn loan(name: &str, remaining: f64, rate: f64, emi: f64) -> NewLoan {
    NewLoan {
        name: name.to_string(),
        lender: None,
        principal_amount: Some(remaining),
        remaining_amount: remaining,
        interest_rate: rate,
        emi_amount: emi,
        start_date: None,
    }
}

#[test]
fn test_stored_loans_payoff() {
    let db = Database::in_memory().unwrap();
    db.create_loan(&loan("Personal", 50_000.0, 10.5, 2_000.0))
        .unwrap();
    db.create_loan(&loan("Home", 200_000.0, 8.0, 5_000.0))
        .unwrap();
    db.create_loan(&loan("Card", 30_000.0, 18.0, 1_500.0))
        .unwrap();

    let records = db.active_loan_records().unwrap();
    assert_eq!(records.len(), 3);

    let baseline = simulate_avalanche_payoff(&records, 0.0);
    assert_eq!(baseline.months, 47);

    let accelerated = simulate_avalanche_payoff(&records, 5_000.0);
    assert_eq!(accelerated.months, 28);
    assert!(accelerated.total_interest < baseline.total_interest);
}

#[test]
fn test_closed_loans_are_excluded_from_payoff() {
    let db = Database::in_memory().unwrap();
    let id = db.create_loan(&loan("Car", 12_000.0, 12.0, 1_000.0)).unwrap();
    db.create_loan(&loan("Gold", 12_000.0, 12.0, 1_000.0))
        .unwrap();
    db.close_loan(id).unwrap();

    let result = simulate_avalanche_payoff(&db.active_loan_records().unwrap(), 0.0);
    assert_eq!(result.months, 13);
}

#[test]
fn test_schedule_wire_shape() {
    let db = Database::in_memory().unwrap();
    db.create_loan(&loan("Car", 12_000.0, 12.0, 1_000.0)).unwrap();

    let config = kosh_core::AnalysisConfig::default();
    let schedule =
        simulate_avalanche_schedule(&db.active_loan_records().unwrap(), 0.0, &config.payoff);
    assert_eq!(schedule.months.len(), 13);
    assert!(!schedule.capped);

    let value = wire::serialize(Entity::PayoffSchedule, &schedule).unwrap();
    assert_eq!(value["result"]["months"], 13);
    assert!(value["result"]["totalInterest"].is_number());
    assert!(value["months"][0]["remainingBalance"].is_number());
}
