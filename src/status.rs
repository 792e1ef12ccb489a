use chrono::{Duration, NaiveDate};

use crate::config::LedgerConfig;
use crate::interest::AccrualResult;
use crate::terms::LoanTerms;
use crate::types::{ExplicitStatus, LoanStatus};

/// decision table from terms, accrual and evaluation date to a status
///
/// Rules are checked in order and the first match wins: explicit closure,
/// explicit renewal, nothing outstanding, past due, due within the window,
/// otherwise active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClassifier {
    due_soon_window: Duration,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::from_config(&LedgerConfig::default())
    }
}

impl StatusClassifier {
    pub fn new(due_soon_window_days: u32) -> Self {
        Self {
            due_soon_window: Duration::days(due_soon_window_days as i64),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.due_soon_window_days)
    }

    pub fn classify(&self, terms: &LoanTerms, accrual: &AccrualResult, as_of: NaiveDate) -> LoanStatus {
        match terms.explicit_status {
            ExplicitStatus::Closed => return LoanStatus::Closed,
            ExplicitStatus::Renewed => return LoanStatus::Renewed,
            ExplicitStatus::None => {}
        }

        if !accrual.outstanding_balance.is_positive() {
            return LoanStatus::Paid;
        }

        match terms.due_date {
            Some(due) if due < as_of => LoanStatus::Overdue,
            Some(due) if due - as_of <= self.due_soon_window => LoanStatus::DueSoon,
            _ => LoanStatus::Active,
        }
    }
}

/// classify with the default config's due-soon window
pub fn classify_status(terms: &LoanTerms, accrual: &AccrualResult, as_of: NaiveDate) -> LoanStatus {
    StatusClassifier::default().classify(terms, accrual, as_of)
}
