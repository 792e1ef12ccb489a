use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::collateral::{Appraisal, LtvCalculator, LtvStatus, Ornaments};
use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventLedger, EventStore, LedgerEvent};
use crate::interest::{compute_accrual, AccrualResult, BreakdownEntry};
use crate::status::StatusClassifier;
use crate::terms::LoanTerms;
use crate::types::{Borrower, ExplicitStatus, LoanId, LoanStatus};

/// how a loan was settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    /// amount the borrower handed over at closing
    pub settlement_amount: Money,
    pub closed_on: NaiveDate,
    /// computed balance at closing, when known
    pub outstanding_at_close: Option<Money>,
    pub notes: Option<String>,
}

impl Closure {
    /// settlement less the computed balance; positive when the borrower paid more
    pub fn difference(&self) -> Option<Money> {
        self.outstanding_at_close
            .map(|outstanding| self.settlement_amount - outstanding)
    }
}

/// a pledged loan with its append-only history
///
/// Balances are never stored on the loan. Every figure is rebuilt from
/// `terms` and `ledger` for the date asked about.
#[derive(Debug)]
pub struct Loan {
    pub id: LoanId,
    /// number written on the pledge ticket
    pub loan_number: String,
    pub borrower: Borrower,
    pub ornaments: Ornaments,
    pub terms: LoanTerms,
    pub ledger: EventLedger,
    pub events: EventStore,
    pub renewed_from: Option<LoanId>,
    pub closure: Option<Closure>,
    pub config: LedgerConfig,
}

impl Loan {
    /// open a new loan against pledged ornaments
    #[instrument(skip(borrower, ornaments, terms, config, time_provider))]
    pub fn originate(
        loan_number: &str,
        borrower: Borrower,
        ornaments: Ornaments,
        terms: LoanTerms,
        config: &LedgerConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::open(
            loan_number.to_string(),
            borrower,
            ornaments,
            terms,
            None,
            config,
            time_provider,
        )
    }

    fn open(
        loan_number: String,
        borrower: Borrower,
        ornaments: Ornaments,
        terms: LoanTerms,
        renewed_from: Option<LoanId>,
        config: &LedgerConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        terms.validate()?;
        if !terms.explicit_status.is_open() {
            return Err(LedgerError::InvalidTerm {
                field: "explicit_status",
                message: format!("a new loan cannot start as {:?}", terms.explicit_status),
            });
        }

        let appraisal = Appraisal::value(&ornaments, &config.appraisal)?;
        if !appraisal.covers(terms.principal) {
            warn!(
                principal = %terms.principal,
                lendable = %appraisal.lendable_value,
                "principal exceeds the lendable value of the pledge"
            );
        }

        let mut loan = Self {
            id: Uuid::new_v4(),
            loan_number,
            borrower,
            ornaments,
            terms,
            ledger: EventLedger::new(),
            events: EventStore::new(),
            renewed_from,
            closure: None,
            config: config.clone(),
        };

        loan.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            principal: loan.terms.principal,
            monthly_rate: loan.terms.monthly_rate,
            origination_date: loan.terms.origination_date,
            renewed_from,
            timestamp: time_provider.now(),
        });

        info!(
            loan_id = %loan.id,
            principal = %loan.terms.principal,
            rate = %loan.terms.monthly_rate,
            "loan originated"
        );

        Ok(loan)
    }

    /// accepts payments, extra loans, closure and renewal
    pub fn is_open(&self) -> bool {
        self.terms.explicit_status.is_open()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(LedgerError::LoanNotOpen {
                loan_id: self.id,
                status: self.terms.explicit_status,
            })
        }
    }

    fn today(time_provider: &SafeTimeProvider) -> NaiveDate {
        time_provider.now().date_naive()
    }

    /// record a payment, an extra loan, or both on the entry's date
    ///
    /// Returns the balances as of the provider's current date.
    #[instrument(skip(self, time_provider), fields(loan_id = %self.id))]
    pub fn record_entry(
        &mut self,
        entry: LedgerEvent,
        time_provider: &SafeTimeProvider,
    ) -> Result<AccrualResult> {
        self.ensure_open()?;
        if entry.is_empty() {
            return Err(LedgerError::EmptyEntry { date: entry.date });
        }
        entry.validate(self.terms.origination_date)?;

        self.ledger.append(entry.clone());

        let now = time_provider.now();
        let on_entry_date = self.accrual_at(entry.date)?;

        if entry.extra_disbursement_amount.is_positive() {
            let new_principal = principal_after(&on_entry_date, entry.date, true)
                .unwrap_or(on_entry_date.current_principal);
            self.events.emit(Event::ExtraLoanDisbursed {
                loan_id: self.id,
                amount: entry.extra_disbursement_amount,
                date: entry.date,
                new_principal,
                timestamp: now,
            });
            info!(amount = %entry.extra_disbursement_amount, %new_principal, "extra loan disbursed");
        }

        if entry.payment_amount.is_positive() {
            let new_principal = principal_after(&on_entry_date, entry.date, false)
                .unwrap_or(on_entry_date.current_principal);
            self.events.emit(Event::PaymentReceived {
                loan_id: self.id,
                amount: entry.payment_amount,
                date: entry.date,
                new_principal,
                timestamp: now,
            });
            info!(amount = %entry.payment_amount, %new_principal, "payment received");
        }

        self.accrual_at(now.date_naive())
    }

    /// balances as of a given date
    pub fn accrual_at(&self, as_of: NaiveDate) -> Result<AccrualResult> {
        compute_accrual(&self.terms, self.ledger.entries(), as_of)
    }

    pub fn accrual(&self, time_provider: &SafeTimeProvider) -> Result<AccrualResult> {
        self.accrual_at(Self::today(time_provider))
    }

    /// balances using the system clock
    pub fn accrual_now(&self) -> Result<AccrualResult> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.accrual(&time)
    }

    pub fn status_at(&self, as_of: NaiveDate) -> Result<LoanStatus> {
        let accrual = self.accrual_at(as_of)?;
        Ok(StatusClassifier::from_config(&self.config).classify(&self.terms, &accrual, as_of))
    }

    pub fn status(&self, time_provider: &SafeTimeProvider) -> Result<LoanStatus> {
        self.status_at(Self::today(time_provider))
    }

    /// status using the system clock
    pub fn status_now(&self) -> Result<LoanStatus> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.status(&time)
    }

    /// close the loan against a settlement amount
    ///
    /// A settlement that differs from the computed balance is logged and
    /// recorded as an event, but the loan still closes.
    #[instrument(skip(self, notes, time_provider), fields(loan_id = %self.id))]
    pub fn close(
        &mut self,
        settlement_amount: Money,
        notes: Option<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Closure> {
        self.ensure_open()?;
        if !settlement_amount.is_positive() {
            return Err(LedgerError::InvalidSettlement {
                amount: settlement_amount,
            });
        }

        let now = time_provider.now();
        let closed_on = now.date_naive();
        let accrual = self.accrual_at(closed_on)?;
        let old_status = self.status_at(closed_on)?;
        let outstanding = accrual.outstanding_balance;

        if settlement_amount.round_cents() != outstanding {
            warn!(
                settlement = %settlement_amount,
                outstanding = %outstanding,
                "settlement does not match the computed balance"
            );
            self.events.emit(Event::SettlementMismatch {
                loan_id: self.id,
                settlement_amount,
                outstanding_balance: outstanding,
                timestamp: now,
            });
        }

        self.terms.explicit_status = ExplicitStatus::Closed;
        let closure = Closure {
            settlement_amount,
            closed_on,
            outstanding_at_close: Some(outstanding),
            notes,
        };
        self.closure = Some(closure.clone());

        self.events.emit(Event::LoanClosed {
            loan_id: self.id,
            settlement_amount,
            closed_on,
            timestamp: now,
        });
        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status: LoanStatus::Closed,
            timestamp: now,
        });

        info!(settlement = %settlement_amount, %closed_on, "loan closed");

        Ok(closure)
    }

    /// roll this loan into a new one on the same pledge
    ///
    /// This loan is marked renewed and keeps its history. The returned loan
    /// starts with an empty ledger and points back here.
    #[instrument(skip(self, new_terms, time_provider), fields(loan_id = %self.id))]
    pub fn renew(
        &mut self,
        new_loan_number: &str,
        new_terms: LoanTerms,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        self.ensure_open()?;
        new_terms.validate()?;

        let now = time_provider.now();
        let today = now.date_naive();
        let carried_balance = self.accrual_at(today)?.outstanding_balance;
        let old_status = self.status_at(today)?;

        let renewed = Self::open(
            new_loan_number.to_string(),
            self.borrower.clone(),
            self.ornaments.clone(),
            new_terms,
            Some(self.id),
            &self.config,
            time_provider,
        )?;

        self.terms.explicit_status = ExplicitStatus::Renewed;

        self.events.emit(Event::LoanRenewed {
            loan_id: self.id,
            new_loan_id: renewed.id,
            carried_balance,
            timestamp: now,
        });
        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status: LoanStatus::Renewed,
            timestamp: now,
        });

        info!(new_loan_id = %renewed.id, carried = %carried_balance, "loan renewed");

        Ok(renewed)
    }

    /// value the pledge at the configured rate card
    pub fn appraisal(&self) -> Result<Appraisal> {
        Appraisal::value(&self.ornaments, &self.config.appraisal)
    }

    /// outstanding balance over the market value of the pledge
    pub fn ltv_at(&self, as_of: NaiveDate) -> Result<(Rate, LtvStatus)> {
        let appraisal = self.appraisal()?;
        let outstanding = self.accrual_at(as_of)?.outstanding_balance;
        let calculator = LtvCalculator::new(&appraisal);
        Ok((
            calculator.calculate_ltv(outstanding)?,
            calculator.get_ltv_status(outstanding),
        ))
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

/// principal recorded after the last extra loan or payment on `date`
fn principal_after(accrual: &AccrualResult, date: NaiveDate, extra_loan: bool) -> Option<Money> {
    accrual.breakdown.iter().rev().find_map(|entry| match entry {
        BreakdownEntry::ExtraLoan { date: d, new_principal, .. } if extra_loan && *d == date => {
            Some(*new_principal)
        }
        BreakdownEntry::Payment { date: d, new_principal, .. } if !extra_loan && *d == date => {
            Some(*new_principal)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn new_loan(time: &SafeTimeProvider) -> Loan {
        let terms = LoanTerms::builder()
            .principal(Money::from_major(100_000))
            .monthly_rate(Rate::from_percentage(dec!(3)))
            .origination_date(date(2024, 1, 1))
            .build()
            .unwrap();

        Loan::originate(
            "GL-0001",
            Borrower::named("Lakshmi"),
            Ornaments::gold(dec!(20)),
            terms,
            &LedgerConfig::default(),
            time,
        )
        .unwrap()
    }

    #[test]
    fn test_originate_emits_event() {
        let time = clock(2024, 1, 1);
        let mut loan = new_loan(&time);

        assert!(loan.is_open());
        assert_eq!(loan.terms.due_date, Some(date(2024, 12, 1)));

        let events = loan.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::LoanOriginated { renewed_from: None, .. }
        ));
    }

    #[test]
    fn test_cannot_originate_closed_terms() {
        let time = clock(2024, 1, 1);
        let terms = LoanTerms::new(Money::from_major(1_000), Rate::from_percentage(dec!(3)), date(2024, 1, 1))
            .unwrap()
            .with_explicit_status(ExplicitStatus::Closed);

        let err = Loan::originate(
            "GL-0002",
            Borrower::named("Ravi"),
            Ornaments::silver(dec!(50)),
            terms,
            &LedgerConfig::default(),
            &time,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingTerm);
    }

    #[test]
    fn test_record_entries_over_time() {
        let time = clock(2024, 1, 1);
        let mut loan = new_loan(&time);
        loan.take_events();

        time.test_control().unwrap().advance(Duration::days(31));
        let result = loan
            .record_entry(LedgerEvent::payment(date(2024, 2, 1), Money::from_major(20_000)), &time)
            .unwrap();
        assert_eq!(result.current_principal, Money::from_major(80_000));
        assert_eq!(result.total_interest, money("3100.00"));

        time.test_control().unwrap().advance(Duration::days(60));
        let accrual = loan.accrual(&time).unwrap();
        assert_eq!(accrual.as_of, date(2024, 4, 1));
        assert_eq!(accrual.total_interest, money("7900.00"));
        assert_eq!(accrual.outstanding_balance, money("87900.00"));

        let events = loan.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::PaymentReceived { amount, new_principal, .. } => {
                assert_eq!(*amount, Money::from_major(20_000));
                assert_eq!(*new_principal, Money::from_major(80_000));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_combined_entry_emits_both_events() {
        let time = clock(2024, 2, 1);
        let mut loan = new_loan(&time);
        loan.take_events();

        loan.record_entry(
            LedgerEvent::new(date(2024, 2, 1), Money::from_major(20_000), Money::from_major(15_000)),
            &time,
        )
        .unwrap();

        let events = loan.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::ExtraLoanDisbursed { new_principal, .. } if new_principal == Money::from_major(115_000)
        ));
        assert!(matches!(
            events[1],
            Event::PaymentReceived { new_principal, .. } if new_principal == Money::from_major(95_000)
        ));
    }

    #[test]
    fn test_rejected_entries_leave_ledger_untouched() {
        let time = clock(2024, 3, 1);
        let mut loan = new_loan(&time);

        let err = loan
            .record_entry(LedgerEvent::new(date(2024, 2, 1), Money::ZERO, Money::ZERO), &time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::EmptyEntry { .. }));

        let err = loan
            .record_entry(LedgerEvent::payment(date(2023, 12, 1), Money::from_major(10)), &time)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);

        let err = loan
            .record_entry(LedgerEvent::payment(date(2024, 2, 1), Money::from_major(-10)), &time)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);

        assert!(loan.ledger.is_empty());
    }

    #[test]
    fn test_status_follows_the_clock() {
        let time = clock(2024, 11, 20);
        let loan = new_loan(&time);

        assert_eq!(loan.status(&time).unwrap(), LoanStatus::Active);

        time.test_control().unwrap().advance(Duration::days(8));
        assert_eq!(loan.status(&time).unwrap(), LoanStatus::DueSoon);

        time.test_control().unwrap().advance(Duration::days(10));
        assert_eq!(loan.status(&time).unwrap(), LoanStatus::Overdue);
    }

    #[test]
    fn test_close_with_matching_settlement() {
        let time = clock(2024, 4, 1);
        let mut loan = new_loan(&time);
        loan.take_events();

        let closure = loan.close(money("109100.00"), None, &time).unwrap();
        assert_eq!(closure.closed_on, date(2024, 4, 1));
        assert_eq!(closure.difference(), Some(Money::ZERO));
        assert_eq!(loan.status(&time).unwrap(), LoanStatus::Closed);

        let events = loan.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::LoanClosed { .. }));
        assert!(matches!(
            events[1],
            Event::StatusChanged { old_status: LoanStatus::Active, new_status: LoanStatus::Closed, .. }
        ));
    }

    #[test]
    fn test_close_with_mismatch_still_closes() {
        let time = clock(2024, 4, 1);
        let mut loan = new_loan(&time);
        loan.take_events();

        let closure = loan
            .close(Money::from_major(105_000), Some("waived part of interest".to_string()), &time)
            .unwrap();
        assert_eq!(closure.difference(), Some(money("-4100.00")));
        assert!(!loan.is_open());

        let events = loan.take_events();
        assert!(matches!(
            events[0],
            Event::SettlementMismatch { outstanding_balance, .. } if outstanding_balance == money("109100.00")
        ));
        assert!(events.iter().any(|e| matches!(e, Event::LoanClosed { .. })));
    }

    #[test]
    fn test_close_rejects_bad_settlement_and_closed_loans() {
        let time = clock(2024, 4, 1);
        let mut loan = new_loan(&time);

        let err = loan.close(Money::ZERO, None, &time).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSettlement { .. }));
        assert!(loan.is_open());

        loan.close(Money::from_major(1), None, &time).unwrap();

        let err = loan.close(Money::from_major(1), None, &time).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lifecycle);

        let err = loan
            .record_entry(LedgerEvent::payment(date(2024, 4, 1), Money::from_major(10)), &time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::LoanNotOpen { status: ExplicitStatus::Closed, .. }));
    }

    #[test]
    fn test_renew() {
        let time = clock(2024, 4, 1);
        let mut loan = new_loan(&time);
        loan.take_events();

        let new_terms = LoanTerms::builder()
            .principal(money("109100.00"))
            .origination_date(date(2024, 4, 1))
            .build()
            .unwrap();
        let mut renewed = loan.renew("GL-0001-R1", new_terms, &time).unwrap();

        assert_eq!(loan.status(&time).unwrap(), LoanStatus::Renewed);
        assert_eq!(renewed.renewed_from, Some(loan.id));
        assert_eq!(renewed.borrower, loan.borrower);
        assert!(renewed.ledger.is_empty());
        assert_eq!(renewed.status(&time).unwrap(), LoanStatus::Active);

        let events = loan.take_events();
        assert!(matches!(
            events[0],
            Event::LoanRenewed { carried_balance, .. } if carried_balance == money("109100.00")
        ));

        let new_events = renewed.take_events();
        assert!(matches!(
            new_events[0],
            Event::LoanOriginated { renewed_from: Some(id), .. } if id == loan.id
        ));

        let err = loan.renew("GL-0001-R2", renewed.terms.clone(), &time).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lifecycle);
    }

    #[test]
    fn test_ltv() {
        let time = clock(2024, 1, 1);
        let loan = new_loan(&time);

        // 20g at 9800 = 196000 market value
        let (ltv, status) = loan.ltv_at(date(2024, 1, 1)).unwrap();
        assert_eq!(ltv.as_decimal().round_dp(4), dec!(0.5102));
        assert_eq!(status, LtvStatus::Healthy);
    }

    #[test]
    fn test_now_variants() {
        let time = clock(2024, 1, 1);
        let mut loan = new_loan(&time);
        loan.terms.due_date = None;

        assert_eq!(loan.status_now().unwrap(), LoanStatus::Active);
        assert!(loan.accrual_now().unwrap().total_interest > Money::ZERO);
    }
}
