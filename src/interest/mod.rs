pub mod accrual;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

pub use accrual::{
    calculate_days, compute_accrual, months_elapsed, AccrualResult, BreakdownEntry, PeriodAccrual,
    PeriodKind, DAYS_PER_MONTH,
};

/// simple interest on a fixed principal for a number of (possibly fractional) months
pub fn calculate_simple_interest(principal: Money, monthly_rate: Rate, months: Decimal) -> Money {
    principal.monthly_interest(monthly_rate, months)
}

/// flat monthly charge on a principal, the figure quoted to borrowers at the counter
///
/// `None` when the charge does not fit in a decimal.
pub fn monthly_charge(principal: Money, monthly_rate: Rate) -> Option<Money> {
    principal.checked_percentage(monthly_rate).map(|charge| charge.round_cents())
}
