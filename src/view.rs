/// serialization support for loans
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collateral::{Appraisal, LtvCalculator, LtvStatus};
use crate::decimal::{clamp_overflow, Money, Rate};
use crate::errors::Result;
use crate::interest::{monthly_charge, AccrualResult, BreakdownEntry};
use crate::loan::{Closure, Loan};
use crate::status::StatusClassifier;
use crate::types::{Borrower, LoanId, LoanStatus, OrnamentType};

/// serializable view of a loan as of one date
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub loan_number: String,
    pub as_of: NaiveDate,
    pub status: LoanStatus,
    pub borrower: Borrower,
    pub terms: TermsView,
    pub balances: BalanceView,
    pub collateral: CollateralView,
    pub renewed_from: Option<LoanId>,
    pub closure: Option<Closure>,
    pub breakdown: Vec<BreakdownEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub origination_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    /// days left to the due date, negative once overdue
    pub days_to_due: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceView {
    pub original_principal: Money,
    pub total_extra_disbursed: Money,
    pub total_principal_disbursed: Money,
    pub current_principal: Money,
    pub total_interest: Money,
    pub total_amount_due: Money,
    pub total_paid: Money,
    pub outstanding_balance: Money,
    /// interest one more month would add at the current principal
    pub next_month_interest: Money,
    pub payment_count: usize,
    pub extra_loan_count: usize,
    /// some figure exceeded the decimal range and was clamped
    pub overflow_clamped: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollateralView {
    pub ornament_type: OrnamentType,
    pub gold_grams: Decimal,
    pub silver_grams: Decimal,
    pub market_value: Money,
    pub lendable_value: Money,
    /// absent when the pledge has no market value
    pub ltv_ratio: Option<Rate>,
    pub ltv_status: LtvStatus,
}

impl LoanView {
    pub fn build(loan: &Loan, as_of: NaiveDate) -> Result<Self> {
        let accrual = loan.accrual_at(as_of)?;
        let status = StatusClassifier::from_config(&loan.config).classify(&loan.terms, &accrual, as_of);
        let appraisal = loan.appraisal()?;

        Ok(LoanView {
            id: loan.id,
            loan_number: loan.loan_number.clone(),
            as_of,
            status,
            borrower: loan.borrower.clone(),
            terms: TermsView {
                principal: loan.terms.principal,
                monthly_rate: loan.terms.monthly_rate,
                origination_date: loan.terms.origination_date,
                due_date: loan.terms.due_date,
                days_to_due: loan.terms.due_date.map(|due| (due - as_of).num_days()),
            },
            balances: BalanceView::from_accrual(&accrual, loan.terms.monthly_rate),
            collateral: CollateralView::from_appraisal(loan, &appraisal, accrual.outstanding_balance),
            renewed_from: loan.renewed_from,
            closure: loan.closure.clone(),
            breakdown: accrual.breakdown,
        })
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl BalanceView {
    fn from_accrual(accrual: &AccrualResult, monthly_rate: Rate) -> Self {
        let count = |payment: bool| {
            accrual
                .breakdown
                .iter()
                .filter(|entry| match entry {
                    BreakdownEntry::Payment { .. } => payment,
                    BreakdownEntry::ExtraLoan { .. } => !payment,
                    BreakdownEntry::Period(_) => false,
                })
                .count()
        };

        let (next_month_interest, charge_clamped) = clamp_overflow(
            monthly_charge(accrual.current_principal, monthly_rate).map(|charge| charge.as_decimal()),
            "next month interest",
        );

        BalanceView {
            original_principal: accrual.original_principal,
            total_extra_disbursed: accrual.total_extra_disbursed,
            total_principal_disbursed: accrual.total_principal_disbursed,
            current_principal: accrual.current_principal,
            total_interest: accrual.total_interest,
            total_amount_due: accrual.total_amount_due,
            total_paid: accrual.total_paid,
            outstanding_balance: accrual.outstanding_balance,
            next_month_interest: Money::from_decimal(next_month_interest),
            payment_count: count(true),
            extra_loan_count: count(false),
            overflow_clamped: accrual.overflow_clamped || charge_clamped,
        }
    }
}

impl CollateralView {
    fn from_appraisal(loan: &Loan, appraisal: &Appraisal, outstanding: Money) -> Self {
        let calculator = LtvCalculator::new(appraisal);
        CollateralView {
            ornament_type: loan.ornaments.ornament_type,
            gold_grams: loan.ornaments.gold_grams,
            silver_grams: loan.ornaments.silver_grams,
            market_value: appraisal.market_value,
            lendable_value: appraisal.lendable_value,
            ltv_ratio: calculator.calculate_ltv(outstanding).ok(),
            ltv_status: calculator.get_ltv_status(outstanding),
        }
    }
}
