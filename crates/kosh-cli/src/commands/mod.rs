//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db) and init
//! - `import` - CSV statement import
//! - `transactions` - Transaction listing
//! - `loans` - Loan management and payoff projection
//! - `recurring` - Declared recurring payments and detection
//! - `reports` - Report generation commands
//! - `serve` - Web server command

pub mod core;
pub mod import;
pub mod loans;
pub mod recurring;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use self::core::*;
pub use import::*;
pub use loans::*;
pub use recurring::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
