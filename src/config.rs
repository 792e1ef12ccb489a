use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::collateral::AppraisalRates;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

/// business parameters for the ledger
///
/// Every field has a default, so a config file only needs the values a shop
/// actually changes:
///
/// ```
/// use pawn_ledger_rs::config::LedgerConfig;
///
/// let config = LedgerConfig::from_json_str(r#"{ "due_soon_window_days": 10 }"#).unwrap();
/// assert_eq!(config.due_soon_window_days, 10);
/// assert_eq!(config.default_term_months, 11);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// rate applied when a new loan does not name one, written in percent per month
    #[serde(with = "crate::decimal::percent")]
    pub default_monthly_rate: Rate,
    /// months from origination to the derived due date
    pub default_term_months: u32,
    /// days before the due date a loan is flagged as due soon
    pub due_soon_window_days: u32,
    /// metal prices and advance ratios used when pledging ornaments
    pub appraisal: AppraisalRates,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_monthly_rate: Rate::from_percentage(dec!(3)),
            default_term_months: 11,
            due_soon_window_days: 7,
            appraisal: AppraisalRates::default(),
        }
    }
}

impl LedgerConfig {
    /// parse a json config, filling absent fields from defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// reject values that would make every loan misbehave
    pub fn validate(&self) -> Result<()> {
        if self.default_monthly_rate.is_negative() || self.default_monthly_rate > Rate::ONE {
            return Err(LedgerError::InvalidTerm {
                field: "default_monthly_rate",
                message: format!("rate must lie between 0% and 100% a month: {}", self.default_monthly_rate),
            });
        }

        if self.default_term_months == 0 {
            return Err(LedgerError::InvalidTerm {
                field: "default_term_months",
                message: "term must be at least one month".to_string(),
            });
        }

        let rates = &self.appraisal;
        if rates.gold_rate_per_gram < Money::ZERO || rates.silver_rate_per_gram < Money::ZERO {
            return Err(LedgerError::InvalidCollateral {
                message: "metal rates cannot be negative".to_string(),
            });
        }

        if rates.gold_advance_ratio > Rate::ONE
            || rates.silver_advance_ratio > Rate::ONE
            || rates.gold_advance_ratio.is_negative()
            || rates.silver_advance_ratio.is_negative()
        {
            return Err(LedgerError::InvalidCollateral {
                message: "advance ratios must lie between 0% and 100%".to_string(),
            });
        }

        Ok(())
    }

    /// shop rate card for a given day's metal prices
    pub fn with_metal_prices(mut self, gold_per_gram: Money, silver_per_gram: Money) -> Self {
        self.appraisal.gold_rate_per_gram = gold_per_gram;
        self.appraisal.silver_rate_per_gram = silver_per_gram;
        self
    }
}
