use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{LoanId, LoanStatus};

/// one cash movement against a loan, in canonical shape
///
/// A single entry may carry both amounts; the extra loan is applied before
/// the payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub date: NaiveDate,
    #[serde(default)]
    pub payment_amount: Money,
    #[serde(default)]
    pub extra_disbursement_amount: Money,
}

impl LedgerEvent {
    pub fn new(date: NaiveDate, payment_amount: Money, extra_disbursement_amount: Money) -> Self {
        Self {
            date,
            payment_amount,
            extra_disbursement_amount,
        }
    }

    pub fn payment(date: NaiveDate, amount: Money) -> Self {
        Self::new(date, amount, Money::ZERO)
    }

    pub fn extra_loan(date: NaiveDate, amount: Money) -> Self {
        Self::new(date, Money::ZERO, amount)
    }

    pub fn is_empty(&self) -> bool {
        self.payment_amount.is_zero() && self.extra_disbursement_amount.is_zero()
    }

    /// amounts non-negative and no earlier than origination
    pub fn validate(&self, origination_date: NaiveDate) -> Result<()> {
        if self.payment_amount.is_negative() {
            return Err(LedgerError::NegativeAmount {
                field: "payment",
                amount: self.payment_amount,
            });
        }

        if self.extra_disbursement_amount.is_negative() {
            return Err(LedgerError::NegativeAmount {
                field: "extra disbursement",
                amount: self.extra_disbursement_amount,
            });
        }

        if self.date < origination_date {
            return Err(LedgerError::EventBeforeOrigination {
                event_date: self.date,
                origination_date,
            });
        }

        Ok(())
    }
}

/// append-only history of a loan's cash events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLedger {
    entries: Vec<LedgerEvent>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn from_entries(entries: Vec<LedgerEvent>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: LedgerEvent) {
        self.entries.push(entry);
    }

    /// entries in recording order
    pub fn entries(&self) -> &[LedgerEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_activity(&self) -> Option<NaiveDate> {
        self.entries.iter().map(|e| e.date).max()
    }
}

/// audit trail of actions taken on loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOriginated {
        loan_id: LoanId,
        principal: Money,
        monthly_rate: Rate,
        origination_date: NaiveDate,
        renewed_from: Option<LoanId>,
        timestamp: DateTime<Utc>,
    },
    PaymentReceived {
        loan_id: LoanId,
        amount: Money,
        date: NaiveDate,
        new_principal: Money,
        timestamp: DateTime<Utc>,
    },
    ExtraLoanDisbursed {
        loan_id: LoanId,
        amount: Money,
        date: NaiveDate,
        new_principal: Money,
        timestamp: DateTime<Utc>,
    },
    SettlementMismatch {
        loan_id: LoanId,
        settlement_amount: Money,
        outstanding_balance: Money,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        settlement_amount: Money,
        closed_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    LoanRenewed {
        loan_id: LoanId,
        new_loan_id: LoanId,
        carried_balance: Money,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
