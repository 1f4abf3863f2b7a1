//! Recurring charge detection
//!
//! Scans transaction history for groups of charges that repeat at a steady
//! interval, which usually means an undeclared SIP or subscription.
//!
//! A group is a (normalized description, exact amount) pair. It becomes a
//! suggestion when:
//! 1. It has at least `min_occurrences` members
//! 2. Every gap between consecutive charges is within `interval_tolerance_days`
//!    of the mean gap
//! 3. The mean gap falls inside `[min_interval_days, max_interval_days]`

use std::collections::HashMap;

use tracing::debug;

use crate::models::{RecurrenceSuggestion, TransactionRecord};

/// Detection thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Minimum charges needed to call something a pattern
    pub min_occurrences: usize,
    /// Maximum distance (days) any single gap may sit from the mean gap
    pub interval_tolerance_days: f64,
    /// Shortest accepted mean gap (filters same-day duplicates)
    pub min_interval_days: f64,
    /// Longest accepted mean gap
    pub max_interval_days: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            interval_tolerance_days: 5.0,
            min_interval_days: 5.0,
            max_interval_days: 35.0,
        }
    }
}

/// Detect recurring charges using the default thresholds
pub fn detect_recurring_patterns(transactions: &[TransactionRecord]) -> Vec<RecurrenceSuggestion> {
    RecurrenceDetector::new().detect(transactions)
}

/// Normalize a description for grouping: trimmed and case-folded
pub fn normalize_description(description: &str) -> String {
    description.trim().to_lowercase()
}

/// Grouping key for an amount. Exact match, with -0.0 folded into 0.0.
fn amount_key(amount: f64) -> u64 {
    (amount + 0.0).to_bits()
}

/// Transactions sharing a (description, amount) key, in input order
struct Group<'a> {
    description: &'a str,
    amount: f64,
    members: Vec<&'a TransactionRecord>,
}

/// Recurrence detector with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct RecurrenceDetector {
    config: DetectionConfig,
}

impl RecurrenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run detection over an unsorted transaction history
    ///
    /// Suggestions come back in the order their group first appears in the input.
    pub fn detect(&self, transactions: &[TransactionRecord]) -> Vec<RecurrenceSuggestion> {
        if transactions.len() < self.config.min_occurrences {
            return Vec::new();
        }

        let mut groups: Vec<Group<'_>> = Vec::new();
        let mut index: HashMap<(String, u64), usize> = HashMap::new();

        for tx in transactions {
            if !tx.amount.is_finite() {
                debug!("Ignoring transaction {:?} with non-finite amount", tx.description);
                continue;
            }

            let key = (normalize_description(&tx.description), amount_key(tx.amount));
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    description: &tx.description,
                    amount: tx.amount,
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].members.push(tx);
        }

        groups
            .into_iter()
            .filter_map(|group| self.evaluate(group))
            .collect()
    }

    fn evaluate(&self, group: Group<'_>) -> Option<RecurrenceSuggestion> {
        if group.members.len() < self.config.min_occurrences {
            return None;
        }

        let mut dates: Vec<_> = group.members.iter().map(|tx| tx.date).collect();
        dates.sort();

        let gaps: Vec<f64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days() as f64)
            .collect();

        if gaps.is_empty() {
            return None;
        }

        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;

        let regular = gaps
            .iter()
            .all(|gap| (gap - mean).abs() <= self.config.interval_tolerance_days);
        if !regular {
            debug!(
                "Skipping {:?} @ {:.2}: irregular gaps {:?} (mean {:.1})",
                group.description, group.amount, gaps, mean
            );
            return None;
        }

        if mean < self.config.min_interval_days || mean > self.config.max_interval_days {
            debug!(
                "Skipping {:?} @ {:.2}: mean gap {:.1} outside [{}, {}]",
                group.description,
                group.amount,
                mean,
                self.config.min_interval_days,
                self.config.max_interval_days
            );
            return None;
        }

        debug!(
            "Found recurring charge: {:?} @ {:.2} every ~{:.0} days ({} times)",
            group.description,
            group.amount,
            mean,
            group.members.len()
        );

        Some(RecurrenceSuggestion {
            description: group.description.to_string(),
            amount: group.amount,
            occurrences: group.members.len(),
            interval_days: mean.round() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Build a series of charges starting on `start` separated by `gaps`
    fn series(description: &str, amount: f64, start: NaiveDate, gaps: &[i64]) -> Vec<TransactionRecord> {
        let mut out = vec![TransactionRecord::new(description, amount, start)];
        let mut current = start;
        for gap in gaps {
            current += Duration::days(*gap);
            out.push(TransactionRecord::new(description, amount, current));
        }
        out
    }

    #[test]
    fn test_too_few_transactions() {
        let txs = series("Netflix", 499.0, date(2024, 1, 1), &[30]);
        assert!(detect_recurring_patterns(&txs).is_empty());
        assert!(detect_recurring_patterns(&[]).is_empty());
    }

    #[test]
    fn test_monthly_charge_detected() {
        let txs = series("Netflix", 499.0, date(2024, 1, 1), &[30, 30]);
        let found = detect_recurring_patterns(&txs);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Netflix");
        assert_eq!(found[0].amount, 499.0);
        assert_eq!(found[0].occurrences, 3);
        assert_eq!(found[0].interval_days, 30);
    }

    #[test]
    fn test_irregular_gap_rejected() {
        // Mean 36.7: every gap is more than 5 days from it
        let txs = series("Gym", 1500.0, date(2024, 1, 1), &[30, 30, 50]);
        assert!(detect_recurring_patterns(&txs).is_empty());
    }

    #[test]
    fn test_gap_exactly_at_tolerance_accepted() {
        // Gaps 25, 35 -> mean 30, both exactly 5 away
        let txs = series("Broadband", 799.0, date(2024, 1, 1), &[25, 35]);
        let found = detect_recurring_patterns(&txs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].interval_days, 30);
    }

    #[test]
    fn test_mean_outside_window_rejected() {
        // Same-day duplicates
        let same_day = series("Coffee", 120.0, date(2024, 3, 1), &[0, 0, 0]);
        assert!(detect_recurring_patterns(&same_day).is_empty());

        // Quarterly charges are too far apart
        let quarterly = series("Insurance", 5000.0, date(2024, 1, 1), &[90, 91]);
        assert!(detect_recurring_patterns(&quarterly).is_empty());

        // Weekly sits inside the window
        let weekly = series("Milk", 60.0, date(2024, 1, 1), &[7, 7, 7]);
        assert_eq!(detect_recurring_patterns(&weekly)[0].interval_days, 7);
    }

    #[test]
    fn test_boundary_means_inclusive() {
        let five = series("Tiffin", 200.0, date(2024, 1, 1), &[5, 5]);
        assert_eq!(detect_recurring_patterns(&five).len(), 1);

        let thirty_five = series("Rent", 20000.0, date(2024, 1, 1), &[35, 35]);
        assert_eq!(detect_recurring_patterns(&thirty_five).len(), 1);
    }

    #[test]
    fn test_grouping_ignores_case_and_whitespace() {
        let txs = vec![
            TransactionRecord::new("Netflix", 499.0, date(2024, 1, 1)),
            TransactionRecord::new("netflix ", 499.0, date(2024, 1, 31)),
            TransactionRecord::new("  NETFLIX", 499.0, date(2024, 3, 1)),
        ];
        let found = detect_recurring_patterns(&txs);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].occurrences, 3);
        // Original description of the first transaction is kept
        assert_eq!(found[0].description, "Netflix");
    }

    #[test]
    fn test_grouping_exact_on_amount() {
        let txs = vec![
            TransactionRecord::new("Netflix", 499.0, date(2024, 1, 1)),
            TransactionRecord::new("Netflix", 499.0, date(2024, 1, 31)),
            TransactionRecord::new("Netflix", 499.01, date(2024, 3, 1)),
        ];
        assert!(detect_recurring_patterns(&txs).is_empty());
    }

    #[test]
    fn test_unsorted_input() {
        let txs = vec![
            TransactionRecord::new("SIP Axis Bluechip", 5000.0, date(2024, 3, 5)),
            TransactionRecord::new("SIP Axis Bluechip", 5000.0, date(2024, 1, 5)),
            TransactionRecord::new("SIP Axis Bluechip", 5000.0, date(2024, 2, 5)),
        ];
        let found = detect_recurring_patterns(&txs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].interval_days, 30); // gaps 31, 29
    }

    #[test]
    fn test_first_appearance_order() {
        let mut txs = Vec::new();
        txs.push(TransactionRecord::new("Spotify", 119.0, date(2024, 1, 10)));
        txs.extend(series("Netflix", 499.0, date(2024, 1, 1), &[30, 30]));
        txs.extend(series("Spotify", 119.0, date(2024, 2, 9), &[30]));

        let found = detect_recurring_patterns(&txs);
        let names: Vec<_> = found.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(names, vec!["Spotify", "Netflix"]);
    }

    #[test]
    fn test_non_finite_amounts_ignored() {
        let mut txs = series("Netflix", 499.0, date(2024, 1, 1), &[30, 30]);
        txs.push(TransactionRecord::new("Netflix", f64::NAN, date(2024, 1, 15)));
        txs.push(TransactionRecord::new("Netflix", f64::INFINITY, date(2024, 1, 20)));

        let found = detect_recurring_patterns(&txs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].occurrences, 3);
    }

    #[test]
    fn test_negative_zero_groups_with_zero() {
        let txs = vec![
            TransactionRecord::new("Free trial", 0.0, date(2024, 1, 1)),
            TransactionRecord::new("Free trial", -0.0, date(2024, 1, 8)),
            TransactionRecord::new("Free trial", 0.0, date(2024, 1, 15)),
        ];
        assert_eq!(detect_recurring_patterns(&txs).len(), 1);
    }

    #[test]
    fn test_custom_config() {
        let detector = RecurrenceDetector::with_config(DetectionConfig {
            min_occurrences: 2,
            max_interval_days: 400.0,
            ..Default::default()
        });
        let txs = series("Domain renewal", 899.0, date(2023, 1, 1), &[365]);
        let found = detector.detect(&txs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].interval_days, 365);

        // Defaults still reject it
        assert!(detect_recurring_patterns(&txs).is_empty());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description("  Netflix "), "netflix");
        assert_eq!(normalize_description("SIP HDFC"), "sip hdfc");
    }
}
