use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::ExplicitStatus;

/// coarse error taxonomy callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// bad ledger event or action input
    InvalidEvent,
    /// required loan term absent or unusable
    MissingTerm,
    /// arithmetic left the representable range
    NumericOverflow,
    /// action not allowed in the loan's current lifecycle state
    Lifecycle,
    /// collateral cannot be valued
    Collateral,
    /// record from the store could not be decoded
    InvalidRecord,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("event dated {event_date} precedes loan origination {origination_date}")]
    EventBeforeOrigination {
        event_date: NaiveDate,
        origination_date: NaiveDate,
    },

    #[error("negative {field} amount: {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: Money,
    },

    #[error("entry on {date} carries neither a payment nor an extra loan")]
    EmptyEntry {
        date: NaiveDate,
    },

    #[error("invalid event field {field}: {message}")]
    InvalidEventField {
        field: String,
        message: String,
    },

    #[error("invalid settlement amount: {amount}")]
    InvalidSettlement {
        amount: Money,
    },

    #[error("missing loan term: {field}")]
    MissingTerm {
        field: &'static str,
    },

    #[error("invalid loan term {field}: {message}")]
    InvalidTerm {
        field: &'static str,
        message: String,
    },

    #[error("numeric overflow while computing {context}")]
    NumericOverflow {
        context: String,
    },

    #[error("loan {loan_id} is not open: explicit status is {status:?}")]
    LoanNotOpen {
        loan_id: Uuid,
        status: ExplicitStatus,
    },

    #[error("invalid collateral: {message}")]
    InvalidCollateral {
        message: String,
    },

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::EventBeforeOrigination { .. }
            | LedgerError::NegativeAmount { .. }
            | LedgerError::EmptyEntry { .. }
            | LedgerError::InvalidEventField { .. }
            | LedgerError::InvalidSettlement { .. } => ErrorKind::InvalidEvent,
            LedgerError::MissingTerm { .. } | LedgerError::InvalidTerm { .. } => {
                ErrorKind::MissingTerm
            }
            LedgerError::NumericOverflow { .. } => ErrorKind::NumericOverflow,
            LedgerError::LoanNotOpen { .. } => ErrorKind::Lifecycle,
            LedgerError::InvalidCollateral { .. } => ErrorKind::Collateral,
            LedgerError::Json(_) => ErrorKind::InvalidRecord,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
