use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::Result;
use crate::interest::AccrualResult;
use crate::loan::Loan;
use crate::status::StatusClassifier;
use crate::types::{LoanId, LoanStatus};

/// one loan's line in a portfolio report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub loan_id: LoanId,
    pub loan_number: String,
    pub borrower_name: String,
    pub origination_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub principal_disbursed: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub outstanding_balance: Money,
}

/// sums over the loans still open
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub principal_disbursed: Money,
    pub interest: Money,
    pub outstanding: Money,
    /// a loan's figures or one of the sums exceeded the decimal range and was clamped
    pub overflow_clamped: bool,
}

impl PortfolioTotals {
    fn include(&mut self, accrual: &AccrualResult) {
        let clamped = &mut self.overflow_clamped;
        *clamped |= accrual.overflow_clamped;
        self.principal_disbursed = self.principal_disbursed.clamped_add(
            accrual.total_principal_disbursed,
            "report principal total",
            clamped,
        );
        self.interest = self.interest.clamped_add(accrual.total_interest, "report interest total", clamped);
        self.outstanding = self.outstanding.clamped_add(
            accrual.outstanding_balance,
            "report outstanding total",
            clamped,
        );
    }
}

/// book summary for loans originated in a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub as_of: NaiveDate,
    /// loans per status, statuses with no loans left out
    pub status_counts: BTreeMap<String, usize>,
    /// open loans only: active, due soon and overdue
    pub totals: PortfolioTotals,
    pub rows: Vec<ReportRow>,
}

impl PortfolioReport {
    /// summarize loans whose origination date falls inside `range`, both ends included
    pub fn generate<'a, I>(loans: I, range: RangeInclusive<NaiveDate>, as_of: NaiveDate) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Loan>,
    {
        let mut status_counts = BTreeMap::new();
        let mut totals = PortfolioTotals::default();
        let mut rows = Vec::new();

        for loan in loans {
            if !range.contains(&loan.terms.origination_date) {
                continue;
            }

            let accrual = loan.accrual_at(as_of)?;
            let status = StatusClassifier::from_config(&loan.config).classify(&loan.terms, &accrual, as_of);

            *status_counts.entry(status.label().to_string()).or_insert(0) += 1;

            if status.is_open() {
                totals.include(&accrual);
            }

            rows.push(ReportRow {
                loan_id: loan.id,
                loan_number: loan.loan_number.clone(),
                borrower_name: loan.borrower.name.clone(),
                origination_date: loan.terms.origination_date,
                due_date: loan.terms.due_date,
                status,
                principal_disbursed: accrual.total_principal_disbursed,
                total_interest: accrual.total_interest,
                total_paid: accrual.total_paid,
                outstanding_balance: accrual.outstanding_balance,
            });
        }

        totals.principal_disbursed = totals.principal_disbursed.round_cents();
        totals.interest = totals.interest.round_cents();
        totals.outstanding = totals.outstanding.round_cents();

        rows.sort_by(|a, b| {
            a.origination_date
                .cmp(&b.origination_date)
                .then_with(|| a.loan_number.cmp(&b.loan_number))
        });

        debug!(
            loans = rows.len(),
            outstanding = %totals.outstanding,
            overflow_clamped = totals.overflow_clamped,
            "generated portfolio report"
        );

        Ok(Self {
            from: *range.start(),
            to: *range.end(),
            as_of,
            status_counts,
            totals,
            rows,
        })
    }

    pub fn count(&self, status: LoanStatus) -> usize {
        self.status_counts.get(status.label()).copied().unwrap_or(0)
    }

    /// rows in a given status
    pub fn rows_with(&self, status: LoanStatus) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |row| row.status == status)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
