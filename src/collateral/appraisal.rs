use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::OrnamentType;

/// ornaments pledged against a loan, weights in grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Ornaments {
    pub ornament_type: OrnamentType,
    pub gold_grams: Decimal,
    pub silver_grams: Decimal,
}

impl Ornaments {
    pub fn gold(grams: Decimal) -> Self {
        Self {
            ornament_type: OrnamentType::Gold,
            gold_grams: grams,
            silver_grams: Decimal::ZERO,
        }
    }

    pub fn silver(grams: Decimal) -> Self {
        Self {
            ornament_type: OrnamentType::Silver,
            gold_grams: Decimal::ZERO,
            silver_grams: grams,
        }
    }

    pub fn both(gold_grams: Decimal, silver_grams: Decimal) -> Self {
        Self {
            ornament_type: OrnamentType::Both,
            gold_grams,
            silver_grams,
        }
    }

    /// gold weight that counts toward the valuation
    pub fn counted_gold_grams(&self) -> Decimal {
        if self.ornament_type.includes_gold() {
            self.gold_grams
        } else {
            Decimal::ZERO
        }
    }

    /// silver weight that counts toward the valuation
    pub fn counted_silver_grams(&self) -> Decimal {
        if self.ornament_type.includes_silver() {
            self.silver_grams
        } else {
            Decimal::ZERO
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gold_grams < Decimal::ZERO || self.silver_grams < Decimal::ZERO {
            return Err(LedgerError::InvalidCollateral {
                message: format!(
                    "weights cannot be negative: gold {}g, silver {}g",
                    self.gold_grams, self.silver_grams
                ),
            });
        }
        Ok(())
    }
}

/// metal prices and the share of value the shop will lend against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppraisalRates {
    pub gold_rate_per_gram: Money,
    pub silver_rate_per_gram: Money,
    pub gold_advance_ratio: Rate,
    pub silver_advance_ratio: Rate,
}

impl Default for AppraisalRates {
    fn default() -> Self {
        Self {
            gold_rate_per_gram: Money::from_major(9_800),
            silver_rate_per_gram: Money::from_major(1_080),
            gold_advance_ratio: Rate::from_percentage(dec!(75)),
            silver_advance_ratio: Rate::from_percentage(dec!(65)),
        }
    }
}

/// valuation of a pledge at a given rate card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    pub gold_value: Money,
    pub silver_value: Money,
    /// full metal value at the rate card
    pub market_value: Money,
    /// market value after advance ratios, the most the shop will lend
    pub lendable_value: Money,
    pub rates: AppraisalRates,
}

impl Appraisal {
    /// value the ornaments at the given rates
    pub fn value(ornaments: &Ornaments, rates: &AppraisalRates) -> Result<Self> {
        ornaments.validate()?;

        let out_of_range = || LedgerError::InvalidCollateral {
            message: format!(
                "pledge of {}g gold and {}g silver is worth more than the representable range",
                ornaments.gold_grams, ornaments.silver_grams
            ),
        };

        let gold_value = rates
            .gold_rate_per_gram
            .checked_mul(ornaments.counted_gold_grams())
            .ok_or_else(out_of_range)?;
        let silver_value = rates
            .silver_rate_per_gram
            .checked_mul(ornaments.counted_silver_grams())
            .ok_or_else(out_of_range)?;
        let market_value = gold_value.checked_add(silver_value).ok_or_else(out_of_range)?;

        let lendable_value = gold_value
            .checked_percentage(rates.gold_advance_ratio)
            .zip(silver_value.checked_percentage(rates.silver_advance_ratio))
            .and_then(|(gold, silver)| gold.checked_add(silver))
            .ok_or_else(out_of_range)?;

        Ok(Self {
            gold_value,
            silver_value,
            market_value,
            lendable_value: lendable_value.round_cents(),
            rates: rates.clone(),
        })
    }

    /// whether a requested principal fits inside the lendable value
    pub fn covers(&self, principal: Money) -> bool {
        principal <= self.lendable_value
    }
}
