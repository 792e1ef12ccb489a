use serde::{Deserialize, Serialize};

use crate::collateral::Appraisal;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

/// where the debt sits relative to the pledge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LtvStatus {
    /// debt within the lendable value
    Healthy,
    /// debt above the lendable value but below market value
    AboveAdvance,
    /// debt exceeds the full market value of the ornaments
    Underwater,
}

/// ltv calculator for a pledged loan
pub struct LtvCalculator<'a> {
    appraisal: &'a Appraisal,
}

impl<'a> LtvCalculator<'a> {
    pub fn new(appraisal: &'a Appraisal) -> Self {
        Self { appraisal }
    }

    /// outstanding balance over market value
    pub fn calculate_ltv(&self, outstanding: Money) -> Result<Rate> {
        if !self.appraisal.market_value.is_positive() {
            return Err(LedgerError::InvalidCollateral {
                message: "collateral value cannot be zero".to_string(),
            });
        }

        outstanding
            .as_decimal()
            .checked_div(self.appraisal.market_value.as_decimal())
            .map(Rate::from_decimal)
            .ok_or_else(|| LedgerError::InvalidCollateral {
                message: format!(
                    "ltv of {} against {} exceeds the representable range",
                    outstanding, self.appraisal.market_value
                ),
            })
    }

    pub fn get_ltv_status(&self, outstanding: Money) -> LtvStatus {
        if outstanding > self.appraisal.market_value {
            LtvStatus::Underwater
        } else if outstanding > self.appraisal.lendable_value {
            LtvStatus::AboveAdvance
        } else {
            LtvStatus::Healthy
        }
    }

    /// payment that brings the debt back inside the lendable value
    pub fn calculate_required_payment(&self, outstanding: Money) -> Money {
        outstanding.saturating_sub(self.appraisal.lendable_value)
    }
}
