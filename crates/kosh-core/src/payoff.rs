//! Avalanche debt payoff projection
//!
//! Simulates month-by-month amortization of a set of loans. Every month each
//! open loan accrues interest, then pays its own EMI. After that, the whole
//! extra monthly amount goes to the open loan with the highest interest rate.
//!
//! Extra money left over after that loan is cleared is dropped for the month.
//! It does not roll over to the next-highest-rate loan.

use tracing::{debug, warn};

use crate::models::{LoanRecord, PayoffMonth, PayoffResult, PayoffSchedule};

/// Default month cap (100 years)
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

/// Simulation limits
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffConfig {
    /// Hard stop for loans that never amortize (EMI below monthly interest)
    pub max_months: u32,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

/// Project payoff under the avalanche strategy with default limits
pub fn simulate_avalanche_payoff(loans: &[LoanRecord], extra_monthly: f64) -> PayoffResult {
    simulate_avalanche_schedule(loans, extra_monthly, &PayoffConfig::default()).result
}

/// Non-finite values count as zero
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Working state for one loan
struct Position {
    balance: f64,
    monthly_rate: f64,
    annual_rate: f64,
    emi: f64,
}

impl Position {
    fn from_record(loan: &LoanRecord) -> Self {
        let annual_rate = finite_or_zero(loan.interest_rate);
        Self {
            balance: finite_or_zero(loan.remaining_amount),
            monthly_rate: annual_rate / 100.0 / 12.0,
            annual_rate,
            emi: finite_or_zero(loan.emi_amount).max(0.0),
        }
    }

    fn is_open(&self) -> bool {
        self.balance > 0.0
    }

    /// Reduce the balance by at most `amount`
    fn pay(&mut self, amount: f64) {
        self.balance -= amount.min(self.balance);
    }
}

/// Project payoff under the avalanche strategy, keeping the monthly trail
pub fn simulate_avalanche_schedule(
    loans: &[LoanRecord],
    extra_monthly: f64,
    config: &PayoffConfig,
) -> PayoffSchedule {
    let extra = finite_or_zero(extra_monthly).max(0.0);
    let mut positions: Vec<Position> = loans.iter().map(Position::from_record).collect();

    let mut schedule = PayoffSchedule::default();
    let mut month = 0u32;
    let mut total_interest = 0.0;

    while positions.iter().any(Position::is_open) {
        if month >= config.max_months {
            warn!(
                "Payoff simulation hit the {} month cap with debt outstanding",
                config.max_months
            );
            schedule.capped = true;
            break;
        }

        let mut month_interest = 0.0;
        for position in positions.iter_mut().filter(|p| p.is_open()) {
            let interest = position.balance * position.monthly_rate;
            month_interest += interest;
            position.balance += interest;
            let emi = position.emi;
            position.pay(emi);
        }

        // Highest rate wins; strict comparison keeps the first loan on ties
        let mut target: Option<usize> = None;
        for (i, position) in positions.iter().enumerate() {
            if !position.is_open() {
                continue;
            }
            match target {
                Some(t) if positions[t].annual_rate >= position.annual_rate => {}
                _ => target = Some(i),
            }
        }
        if let Some(i) = target {
            positions[i].pay(extra);
        }

        month += 1;
        total_interest += month_interest;

        let remaining_balance = positions
            .iter()
            .filter(|p| p.is_open())
            .map(|p| p.balance)
            .sum();
        schedule.months.push(PayoffMonth {
            month,
            interest: month_interest,
            remaining_balance,
        });
    }

    debug!(
        "Avalanche payoff: {} loans, extra {:.2}/mo -> {} months, {:.2} interest",
        loans.len(),
        extra,
        month,
        total_interest
    );

    schedule.result = PayoffResult {
        months: month,
        total_interest,
    };
    schedule
}
