//! Interest accrual and balance reconstruction.
//!
//! A loan's figures are never stored. They are rebuilt on every query from
//! the origination terms and the full event history:
//!
//! - interest is simple, monthly, on the principal currently lent out;
//! - elapsed time is whole calendar days divided by a fixed 30-day month;
//! - each period is charged on the principal in force during it, and only
//!   then is the event at its end applied;
//! - extra loans raise the running principal, payments lower it (never below
//!   zero);
//! - rounding to paise happens once, on the reported total.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::decimal::{clamp_overflow, Money, Rate};
use crate::errors::Result;
use crate::events::LedgerEvent;
use crate::terms::LoanTerms;

/// fixed month length used to turn days into months
pub const DAYS_PER_MONTH: u32 = 30;

/// whole calendar days from `start` to `end`, zero when `end` is not later
pub fn calculate_days(start: NaiveDate, end: NaiveDate) -> u32 {
    (end - start).num_days().max(0) as u32
}

/// fractional months for a day count
pub fn months_elapsed(days: u32) -> Decimal {
    Decimal::from(days) / Decimal::from(DAYS_PER_MONTH)
}

/// whether a period was closed by an event or runs up to the evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// ends at a recorded event
    Interim,
    /// ends at `as_of`, still accruing
    Current,
}

/// interest charged on one stretch of constant principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAccrual {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub principal: Money,
    pub days: u32,
    /// days / 30, to four places for display
    pub months: Decimal,
    /// unrounded period interest
    pub interest: Money,
    pub kind: PeriodKind,
}

/// one line of the audit breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BreakdownEntry {
    Period(PeriodAccrual),
    ExtraLoan {
        date: NaiveDate,
        amount: Money,
        new_principal: Money,
    },
    Payment {
        date: NaiveDate,
        amount: Money,
        new_principal: Money,
    },
}

impl BreakdownEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            BreakdownEntry::Period(period) => period.to,
            BreakdownEntry::ExtraLoan { date, .. } | BreakdownEntry::Payment { date, .. } => *date,
        }
    }

    pub fn as_period(&self) -> Option<&PeriodAccrual> {
        match self {
            BreakdownEntry::Period(period) => Some(period),
            _ => None,
        }
    }

    /// one-line description for statements
    pub fn describe(&self) -> String {
        match self {
            BreakdownEntry::Period(p) => format!(
                "interest on {} for {} days ({} months): {}",
                p.principal.round_cents(),
                p.days,
                p.months.round_dp(2),
                p.interest.round_cents()
            ),
            BreakdownEntry::ExtraLoan { date, amount, new_principal } => format!(
                "{}: extra loan given {}, principal now {}",
                date, amount, new_principal
            ),
            BreakdownEntry::Payment { date, amount, new_principal } => format!(
                "{}: payment received {}, principal now {}",
                date, amount, new_principal
            ),
        }
    }
}

/// derived figures for a loan as of one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualResult {
    pub as_of: NaiveDate,
    /// all interest earned, rounded to paise
    pub total_interest: Money,
    /// principal still earning interest
    pub current_principal: Money,
    /// origination amount plus every extra loan
    pub total_principal_disbursed: Money,
    pub total_paid: Money,
    /// disbursed plus interest less paid, floored at zero
    pub outstanding_balance: Money,
    pub original_principal: Money,
    pub total_extra_disbursed: Money,
    /// disbursed plus interest, before payments
    pub total_amount_due: Money,
    /// events dated after `as_of`, left out of this evaluation
    pub deferred_events: usize,
    /// some figure exceeded the decimal range and was clamped
    pub overflow_clamped: bool,
    pub breakdown: Vec<BreakdownEntry>,
}

impl AccrualResult {
    pub fn periods(&self) -> impl Iterator<Item = &PeriodAccrual> {
        self.breakdown.iter().filter_map(BreakdownEntry::as_period)
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding_balance.is_zero()
    }
}

#[derive(Debug, Clone, Copy)]
enum Movement {
    ExtraLoan(Money),
    Payment(Money),
}

impl Movement {
    // same-day extra loans go before payments
    fn rank(&self) -> u8 {
        match self {
            Movement::ExtraLoan(_) => 0,
            Movement::Payment(_) => 1,
        }
    }
}

/// working state while walking the event history
struct Accumulator {
    rate: Rate,
    running: Decimal,
    cursor: NaiveDate,
    total_interest: Decimal,
    disbursed: Decimal,
    extra: Decimal,
    paid: Decimal,
    breakdown: Vec<BreakdownEntry>,
    clamped: bool,
}

impl Accumulator {
    fn new(terms: &LoanTerms) -> Self {
        let principal = terms.principal.as_decimal();
        Self {
            rate: terms.monthly_rate,
            running: principal,
            cursor: terms.origination_date,
            total_interest: Decimal::ZERO,
            disbursed: principal,
            extra: Decimal::ZERO,
            paid: Decimal::ZERO,
            breakdown: Vec::new(),
            clamped: false,
        }
    }

    fn clamp(&mut self, value: Option<Decimal>, context: &str) -> Decimal {
        let (v, clamped) = clamp_overflow(value, context);
        self.clamped |= clamped;
        v
    }

    fn add(&mut self, a: Decimal, b: Decimal, context: &str) -> Decimal {
        let sum = a.checked_add(b);
        self.clamp(sum, context)
    }

    /// charge interest from the cursor up to `to` on the running principal
    fn accrue_until(&mut self, to: NaiveDate, kind: PeriodKind) {
        if to <= self.cursor || self.running <= Decimal::ZERO {
            return;
        }

        let days = calculate_days(self.cursor, to);
        if days == 0 {
            return;
        }

        // divide last so whole-rupee inputs stay exact
        let raw = self
            .running
            .checked_mul(self.rate.as_decimal())
            .and_then(|v| v.checked_mul(Decimal::from(days)))
            .and_then(|v| v.checked_div(Decimal::from(DAYS_PER_MONTH)));
        let interest = self.clamp(raw, "period interest");
        self.total_interest = self.add(self.total_interest, interest, "total interest");

        let period = PeriodAccrual {
            from: self.cursor,
            to,
            principal: Money::from_decimal(self.running),
            days,
            months: months_elapsed(days).round_dp(4),
            interest: Money::from_decimal(interest),
            kind,
        };

        trace!(
            from = %period.from,
            to = %period.to,
            principal = %period.principal,
            days,
            interest = %period.interest,
            "accrued period"
        );

        self.breakdown.push(BreakdownEntry::Period(period));
    }

    fn apply(&mut self, date: NaiveDate, movement: Movement) {
        match movement {
            Movement::ExtraLoan(amount) => {
                let amount = amount.as_decimal();
                self.running = self.add(self.running, amount, "running principal");
                self.disbursed = self.add(self.disbursed, amount, "total disbursed");
                self.extra = self.add(self.extra, amount, "extra disbursements");
                self.breakdown.push(BreakdownEntry::ExtraLoan {
                    date,
                    amount: Money::from_decimal(amount),
                    new_principal: Money::from_decimal(self.running),
                });
            }
            Movement::Payment(amount) => {
                let amount = amount.as_decimal();
                self.running = (self.running - amount).max(Decimal::ZERO);
                self.paid = self.add(self.paid, amount, "total paid");
                self.breakdown.push(BreakdownEntry::Payment {
                    date,
                    amount: Money::from_decimal(amount),
                    new_principal: Money::from_decimal(self.running),
                });
            }
        }
        self.cursor = date;
    }
}

/// rebuild a loan's balances from its terms and event history
///
/// `events` may be in any order. Events dated after `as_of` are not applied
/// and are counted in `deferred_events`. Fails before computing anything if
/// the terms are unusable, an amount is negative, or an event predates
/// origination.
pub fn compute_accrual(
    terms: &LoanTerms,
    events: &[LedgerEvent],
    as_of: NaiveDate,
) -> Result<AccrualResult> {
    terms.validate()?;
    for event in events {
        event.validate(terms.origination_date)?;
    }

    let mut movements: Vec<(NaiveDate, Movement)> = Vec::with_capacity(events.len() * 2);
    let mut deferred_events = 0;
    for event in events {
        if event.is_empty() {
            continue;
        }
        if event.date > as_of {
            deferred_events += 1;
            continue;
        }
        if event.extra_disbursement_amount.is_positive() {
            movements.push((event.date, Movement::ExtraLoan(event.extra_disbursement_amount)));
        }
        if event.payment_amount.is_positive() {
            movements.push((event.date, Movement::Payment(event.payment_amount)));
        }
    }
    // stable, so recording order survives within a date and kind
    movements.sort_by_key(|(date, movement)| (*date, movement.rank()));

    let mut acc = Accumulator::new(terms);
    for (date, movement) in movements {
        acc.accrue_until(date, PeriodKind::Interim);
        acc.apply(date, movement);
    }
    acc.accrue_until(as_of, PeriodKind::Current);

    if deferred_events > 0 {
        debug!(deferred_events, %as_of, "events dated after evaluation date were not applied");
    }

    let total_interest = Money::from_decimal(acc.total_interest).round_cents();
    let due = acc.add(acc.disbursed, total_interest.as_decimal(), "total amount due");
    let outstanding = (due - acc.paid).max(Decimal::ZERO);

    let result = AccrualResult {
        as_of,
        total_interest,
        current_principal: Money::from_decimal(acc.running),
        total_principal_disbursed: Money::from_decimal(acc.disbursed),
        total_paid: Money::from_decimal(acc.paid),
        outstanding_balance: Money::from_decimal(outstanding),
        original_principal: terms.principal,
        total_extra_disbursed: Money::from_decimal(acc.extra),
        total_amount_due: Money::from_decimal(due),
        deferred_events,
        overflow_clamped: acc.clamped,
        breakdown: acc.breakdown,
    };

    debug!(
        %as_of,
        total_interest = %result.total_interest,
        current_principal = %result.current_principal,
        outstanding = %result.outstanding_balance,
        "computed accrual"
    );

    Ok(result)
}
