use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::ExplicitStatus;

/// static terms of a loan, fixed at origination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// amount handed over at origination
    pub principal: Money,
    /// percent per month on the running principal
    pub monthly_rate: Rate,
    pub origination_date: NaiveDate,
    /// drives status only, never interest
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub explicit_status: ExplicitStatus,
}

impl LoanTerms {
    /// terms with no due date and no status override
    pub fn new(principal: Money, monthly_rate: Rate, origination_date: NaiveDate) -> Result<Self> {
        let terms = Self {
            principal,
            monthly_rate,
            origination_date,
            due_date: None,
            explicit_status: ExplicitStatus::None,
        };
        terms.validate()?;
        Ok(terms)
    }

    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_explicit_status(mut self, status: ExplicitStatus) -> Self {
        self.explicit_status = status;
        self
    }

    /// principal must be positive and the rate non-negative
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LedgerError::InvalidTerm {
                field: "principal",
                message: format!("must be positive, got {}", self.principal),
            });
        }

        if self.monthly_rate.is_negative() {
            return Err(LedgerError::InvalidTerm {
                field: "monthly_rate",
                message: format!("cannot be negative, got {}", self.monthly_rate),
            });
        }

        Ok(())
    }
}

/// due date a fixed number of calendar months after origination
pub fn default_due_date(origination_date: NaiveDate, term_months: u32) -> Option<NaiveDate> {
    origination_date.checked_add_months(Months::new(term_months))
}

/// builder for loan terms
///
/// Fields left unset fall back to the config: rate from
/// `default_monthly_rate`, due date `default_term_months` after origination.
#[derive(Debug, Clone, Default)]
pub struct LoanTermsBuilder {
    principal: Option<Money>,
    monthly_rate: Option<Rate>,
    origination_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    without_due_date: bool,
    explicit_status: ExplicitStatus,
    config: Option<LedgerConfig>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn monthly_rate(mut self, rate: Rate) -> Self {
        self.monthly_rate = Some(rate);
        self
    }

    pub fn origination_date(mut self, date: NaiveDate) -> Self {
        self.origination_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// open-ended loan, never overdue
    pub fn no_due_date(mut self) -> Self {
        self.without_due_date = true;
        self
    }

    pub fn explicit_status(mut self, status: ExplicitStatus) -> Self {
        self.explicit_status = status;
        self
    }

    pub fn config(mut self, config: &LedgerConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    pub fn build(self) -> Result<LoanTerms> {
        let config = self.config.unwrap_or_default();

        let principal = self.principal.ok_or(LedgerError::MissingTerm { field: "principal" })?;
        let origination_date = self
            .origination_date
            .ok_or(LedgerError::MissingTerm { field: "origination_date" })?;

        let due_date = if self.without_due_date {
            None
        } else {
            match self.due_date {
                Some(date) => Some(date),
                None => Some(
                    default_due_date(origination_date, config.default_term_months).ok_or(
                        LedgerError::InvalidTerm {
                            field: "due_date",
                            message: format!(
                                "cannot add {} months to {}",
                                config.default_term_months, origination_date
                            ),
                        },
                    )?,
                ),
            }
        };

        let terms = LoanTerms {
            principal,
            monthly_rate: self.monthly_rate.unwrap_or(config.default_monthly_rate),
            origination_date,
            due_date,
            explicit_status: self.explicit_status,
        };
        terms.validate()?;
        Ok(terms)
    }
}
