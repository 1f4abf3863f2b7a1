//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::generate_hash;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_tx(d: NaiveDate, description: &str, amount: f64) -> NewTransaction {
        NewTransaction {
            date: d,
            description: description.to_string(),
            amount,
            category: None,
            import_hash: generate_hash(&d, description, amount, 0),
        }
    }

    fn new_loan(name: &str, remaining: f64, rate: f64, emi: f64) -> NewLoan {
        NewLoan {
            name: name.to_string(),
            lender: None,
            principal_amount: None,
            remaining_amount: remaining,
            interest_rate: rate,
            emi_amount: emi,
            start_date: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_transactions(10, 0).unwrap().is_empty());
        assert!(db.list_loans(None).unwrap().is_empty());
        assert!(db.list_recurring().unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('loans') WHERE name IN ('remaining_amount', 'interest_rate', 'emi_amount', 'status')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 4, "loans table should have the simulator columns");
    }

    #[test]
    fn test_transaction_insert_dedup() {
        let db = Database::in_memory().unwrap();
        let tx = new_tx(date(2024, 1, 1), "Netflix", -499.0);

        let first = db.insert_transaction(&tx).unwrap();
        assert!(first.is_some());

        let second = db.insert_transaction(&tx).unwrap();
        assert!(second.is_none(), "same import_hash should be skipped");

        assert_eq!(db.count_transactions().unwrap(), 1);
    }

    #[test]
    fn test_transaction_rejects_non_finite_amount() {
        let db = Database::in_memory().unwrap();
        let tx = new_tx(date(2024, 1, 1), "Broken", f64::NAN);
        assert!(matches!(
            db.insert_transaction(&tx),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_list_transactions_newest_first() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&new_tx(date(2024, 1, 1), "Old", -1.0))
            .unwrap();
        db.insert_transaction(&new_tx(date(2024, 3, 1), "New", -2.0))
            .unwrap();
        db.insert_transaction(&new_tx(date(2024, 2, 1), "Middle", -3.0))
            .unwrap();

        let txs = db.list_transactions(10, 0).unwrap();
        let names: Vec<_> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["New", "Middle", "Old"]);

        let page = db.list_transactions(1, 1).unwrap();
        assert_eq!(page[0].description, "Middle");
    }

    #[test]
    fn test_get_and_delete_transaction() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(&new_tx(date(2024, 1, 1), "Chai", -20.0))
            .unwrap()
            .unwrap();

        let tx = db.get_transaction(id).unwrap().unwrap();
        assert_eq!(tx.description, "Chai");
        assert_eq!(tx.date, date(2024, 1, 1));

        db.delete_transaction(id).unwrap();
        assert!(db.get_transaction(id).unwrap().is_none());
        assert!(matches!(db.delete_transaction(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_transaction_records_feed_detector() {
        let db = Database::in_memory().unwrap();
        for d in [date(2024, 1, 5), date(2024, 2, 4), date(2024, 3, 5)] {
            db.insert_transaction(&new_tx(d, "SIP Parag Parikh", -5000.0))
                .unwrap();
        }

        let records = db.all_transaction_records().unwrap();
        assert_eq!(records.len(), 3);

        let found = crate::detect::detect_recurring_patterns(&records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].occurrences, 3);
    }

    #[test]
    fn test_loan_crud() {
        let db = Database::in_memory().unwrap();
        let mut loan = new_loan("Home loan", 2_500_000.0, 8.5, 25_000.0);
        loan.lender = Some("SBI".to_string());
        loan.start_date = Some(date(2022, 6, 1));

        let id = db.create_loan(&loan).unwrap();
        let stored = db.get_loan(id).unwrap().unwrap();
        assert_eq!(stored.name, "Home loan");
        assert_eq!(stored.lender.as_deref(), Some("SBI"));
        assert_eq!(stored.start_date, Some(date(2022, 6, 1)));
        assert_eq!(stored.status, LoanStatus::Active);

        db.update_loan_balance(id, 2_400_000.0).unwrap();
        assert_eq!(db.get_loan(id).unwrap().unwrap().remaining_amount, 2_400_000.0);

        db.close_loan(id).unwrap();
        let closed = db.get_loan(id).unwrap().unwrap();
        assert_eq!(closed.status, LoanStatus::Closed);
        assert_eq!(closed.remaining_amount, 0.0);

        db.delete_loan(id).unwrap();
        assert!(db.get_loan(id).unwrap().is_none());
    }

    #[test]
    fn test_loan_validation() {
        let db = Database::in_memory().unwrap();
        assert!(db.create_loan(&new_loan("", 100.0, 1.0, 10.0)).is_err());
        assert!(db.create_loan(&new_loan("Bad", -1.0, 1.0, 10.0)).is_err());
        assert!(db
            .create_loan(&new_loan("Bad", 100.0, f64::INFINITY, 10.0))
            .is_err());

        let id = db.create_loan(&new_loan("Ok", 100.0, 1.0, 10.0)).unwrap();
        assert!(db.update_loan_balance(id, f64::NAN).is_err());
        assert!(matches!(
            db.update_loan_balance(9999, 1.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_loan_rate_and_amount_ceilings() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.create_loan(&new_loan("Shark", 100.0, 1e300, 0.0)),
            Err(Error::InvalidData(_))
        ));
        assert!(db
            .create_loan(&new_loan("Shark", 100.0, MAX_INTEREST_RATE + 0.5, 0.0))
            .is_err());
        assert!(db
            .create_loan(&new_loan("Huge", MAX_LOAN_AMOUNT * 2.0, 10.0, 0.0))
            .is_err());

        // Worst accepted loan still projects to a finite total
        let id = db
            .create_loan(&new_loan("Worst", MAX_LOAN_AMOUNT, MAX_INTEREST_RATE, 0.0))
            .unwrap();
        let records = db.active_loan_records().unwrap();
        let result = crate::payoff::simulate_avalanche_payoff(&records, 0.0);
        assert_eq!(result.months, 1200);
        assert!(result.total_interest.is_finite());
        assert!(result.total_interest > 0.0);

        assert!(db.update_loan_balance(id, MAX_LOAN_AMOUNT * 2.0).is_err());
    }

    #[test]
    fn test_concurrent_duplicate_inserts() {
        let db = Database::in_memory().unwrap();
        let tx = new_tx(date(2024, 5, 1), "Rent", -25_000.0);

        let results: Vec<Option<i64>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let db = db.clone();
                    let tx = tx.clone();
                    s.spawn(move || db.insert_transaction(&tx).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 1);
        assert_eq!(db.count_transactions().unwrap(), 1);
    }

    #[test]
    fn test_list_loans_by_status() {
        let db = Database::in_memory().unwrap();
        let car = db.create_loan(&new_loan("Car", 300_000.0, 9.0, 8_000.0)).unwrap();
        db.create_loan(&new_loan("Card", 40_000.0, 36.0, 4_000.0))
            .unwrap();
        db.close_loan(car).unwrap();

        let active = db.list_loans(Some(LoanStatus::Active)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Card");

        let all = db.list_loans(None).unwrap();
        assert_eq!(all.len(), 2);
        // Highest rate first
        assert_eq!(all[0].name, "Card");
    }

    #[test]
    fn test_active_loan_records_in_creation_order() {
        let db = Database::in_memory().unwrap();
        let a = db.create_loan(&new_loan("A", 1000.0, 5.0, 100.0)).unwrap();
        let b = db.create_loan(&new_loan("B", 2000.0, 15.0, 100.0)).unwrap();
        let c = db.create_loan(&new_loan("C", 3000.0, 10.0, 100.0)).unwrap();
        db.close_loan(b).unwrap();

        let records = db.active_loan_records().unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_recurring_crud_and_filter() {
        let db = Database::in_memory().unwrap();
        let id = db
            .declare_recurring(&NewRecurringPayment {
                description: "Netflix".to_string(),
                amount: -499.0,
                interval_days: Some(30),
                kind: RecurringKind::Subscription,
            })
            .unwrap();

        let declared = db.list_recurring().unwrap();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].kind, RecurringKind::Subscription);

        let suggestions = vec![
            RecurrenceSuggestion {
                description: "NETFLIX ".to_string(),
                amount: -499.0,
                occurrences: 3,
                interval_days: 30,
            },
            RecurrenceSuggestion {
                description: "Netflix".to_string(),
                amount: -649.0,
                occurrences: 3,
                interval_days: 30,
            },
        ];
        let remaining = db.filter_undeclared(suggestions).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].amount, -649.0);

        db.delete_recurring(id).unwrap();
        assert!(db.list_recurring().unwrap().is_empty());
        assert!(db.delete_recurring(id).is_err());
    }

    #[test]
    fn test_recurring_validation() {
        let db = Database::in_memory().unwrap();
        let result = db.declare_recurring(&NewRecurringPayment {
            description: "Gym".to_string(),
            amount: -1500.0,
            interval_days: Some(0),
            kind: RecurringKind::Bill,
        });
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_monthly_cash_flow() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(&new_tx(date(2024, 1, 1), "Salary", 80_000.0))
            .unwrap();
        db.insert_transaction(&new_tx(date(2024, 1, 10), "Rent", -25_000.0))
            .unwrap();
        db.insert_transaction(&new_tx(date(2024, 2, 3), "Groceries", -4_000.0))
            .unwrap();
        db.insert_transaction(&new_tx(date(2024, 4, 1), "Outside range", -1.0))
            .unwrap();

        let months = db
            .monthly_cash_flow(date(2024, 1, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(months.len(), 2);

        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].income, 80_000.0);
        assert_eq!(months[0].spending, 25_000.0);
        assert_eq!(months[0].net, 55_000.0);
        assert_eq!(months[0].transaction_count, 2);

        assert_eq!(months[1].month, "2024-02");
        assert_eq!(months[1].income, 0.0);
        assert_eq!(months[1].net, -4_000.0);
    }

    #[test]
    fn test_cash_flow_rejects_inverted_range() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .monthly_cash_flow(date(2024, 2, 1), date(2024, 1, 1))
            .is_err());
    }

    #[test]
    fn test_resolve_report_range() {
        let today = date(2024, 6, 15);

        let (from, to) = resolve_report_range(None, None, today).unwrap();
        assert_eq!(from, date(2023, 7, 1));
        assert_eq!(to, today);

        let (from, to) =
            resolve_report_range(Some(date(2024, 1, 1)), Some(date(2024, 2, 29)), today).unwrap();
        assert_eq!((from, to), (date(2024, 1, 1), date(2024, 2, 29)));

        assert!(resolve_report_range(Some(date(2024, 7, 1)), None, today).is_err());
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("local-dev", "list", Some("loan"), None, Some("count=0"))
            .unwrap();
        db.log_audit("api-key", "create", Some("loan"), Some(1), None)
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "create");
        assert_eq!(entries[0].entity_id, Some(1));
        assert_eq!(entries[1].details.as_deref(), Some("count=0"));
    }

    #[test]
    fn test_encrypted_database_reopens_with_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enc.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("correct horse")).unwrap();
            db.create_loan(&new_loan("Secret", 10.0, 1.0, 1.0)).unwrap();
        }

        let db = Database::new_with_key(path, Some("correct horse")).unwrap();
        assert_eq!(db.list_loans(None).unwrap().len(), 1);
    }
}
