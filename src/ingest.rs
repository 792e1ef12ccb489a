//! Boundary between the document store's loosely typed JSON and the ledger.
//!
//! Records written by different versions of the counter software spell the
//! same field in camelCase or PascalCase, keep amounts as numbers or strings,
//! and leave placeholder payment rows behind. Everything here resolves those
//! spellings once; nothing past this module sees an alias.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::collateral::{Appraisal, AppraisalRates, Ornaments};
use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{EventLedger, EventStore, LedgerEvent};
use crate::loan::{Closure, Loan};
use crate::terms::LoanTerms;
use crate::types::{Borrower, ExplicitStatus, OrnamentType, RelationType};

// accepted spellings, in lookup order
const LOAN_NUMBER: &[&str] = &["loanId", "LoanId", "loanid", "id", "Id"];
const PRINCIPAL: &[&str] = &["loanAmount", "LoanAmount", "amount", "Amount"];
const INTEREST_RATE: &[&str] = &["interestRate", "InterestRate"];
const LOAN_DATE: &[&str] = &["loanDate", "LoanDate"];
const DUE_DATE: &[&str] = &["dueDate", "DueDate"];
const STATUS: &[&str] = &["status", "Status"];
const PAYMENTS: &[&str] = &["payments", "Payments"];
const CUSTOMER_NAME: &[&str] = &["customerName", "CustomerName"];
const RELATION_NAME: &[&str] = &["relationName", "RelationName"];
const RELATION_TYPE: &[&str] = &["relationType", "RelationType"];
const PHONE: &[&str] = &["phoneNumber", "PhoneNumber", "phone"];
const ADDRESS: &[&str] = &["address", "Address"];
const ORNAMENT_TYPE: &[&str] = &["ornamentType", "OrnamentType"];
const GOLD_WEIGHT: &[&str] = &["goldWeight", "GoldWeight"];
const SILVER_WEIGHT: &[&str] = &["silverWeight", "SilverWeight"];
const GOLD_RATE: &[&str] = &["goldRate", "GoldRate"];
const SILVER_RATE: &[&str] = &["silverRate", "SilverRate"];
const NOTES: &[&str] = &["notes", "Notes"];
const AMOUNT_PAID: &[&str] = &["amountPaid", "AmountPaid"];
const CLOSED_DATE: &[&str] = &["closedDate", "ClosedDate"];

const PAYMENT_DATE: &[&str] = &["date", "Date"];
const PARTIAL_PAYMENT: &[&str] = &["partialPayment", "PartialPayment"];
const EXTRA_LOAN: &[&str] = &["extraLoan", "ExtraLoan"];

/// one payment row as stored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPaymentRecord(Map<String, Value>);

/// one loan document as stored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLoanRecord(Map<String, Value>);

/// a loan document resolved into ledger types
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedLoan {
    pub loan_number: Option<String>,
    pub borrower: Borrower,
    pub ornaments: Ornaments,
    pub terms: LoanTerms,
    /// placeholder rows already dropped
    pub events: Vec<LedgerEvent>,
    /// metal prices the loan was written at, if the record kept them
    pub gold_rate_per_gram: Option<Money>,
    pub silver_rate_per_gram: Option<Money>,
    pub closure: Option<Closure>,
    pub notes: Option<String>,
}

/// first alias holding something other than null or blank text
fn lookup<'a>(
    map: &'a Map<String, Value>,
    aliases: &'static [&'static str],
) -> Option<(&'static str, &'a Value)> {
    aliases.iter().find_map(|alias| match map.get(*alias) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some((*alias, value)),
    })
}

/// parse a stored amount: a json number, a numeric string, or blank
pub fn parse_amount(value: &Value) -> std::result::Result<Option<Decimal>, String> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.replace(',', "")
        }
        other => return Err(format!("expected a number, got {}", other)),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| format!("{:?} is not a number", text))
}

/// parse a stored date: `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// first non-zero amount across the aliases, zero if all present ones are zero
fn amount_field(
    map: &Map<String, Value>,
    aliases: &'static [&'static str],
) -> std::result::Result<Option<Decimal>, (&'static str, String)> {
    let mut seen_zero = false;
    for alias in aliases {
        let Some(value) = map.get(*alias) else {
            continue;
        };
        match parse_amount(value) {
            Ok(Some(amount)) if amount.is_zero() => seen_zero = true,
            Ok(Some(amount)) => return Ok(Some(amount)),
            Ok(None) => {}
            Err(message) => return Err((*alias, message)),
        }
    }
    Ok(seen_zero.then_some(Decimal::ZERO))
}

fn date_field(
    map: &Map<String, Value>,
    aliases: &'static [&'static str],
) -> std::result::Result<Option<NaiveDate>, (&'static str, String)> {
    match lookup(map, aliases) {
        None => Ok(None),
        Some((alias, Value::String(s))) => parse_date(s)
            .map(Some)
            .ok_or_else(|| (alias, format!("unrecognised date {:?}", s))),
        Some((alias, other)) => Err((alias, format!("expected a date string, got {}", other))),
    }
}

fn text_field(map: &Map<String, Value>, aliases: &'static [&'static str]) -> Option<String> {
    match lookup(map, aliases)? {
        (_, Value::String(s)) => Some(s.trim().to_string()),
        (_, Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

impl RawPaymentRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// canonical event, or `None` for a placeholder row with no money in it
    pub fn normalize(&self) -> Result<Option<LedgerEvent>> {
        let invalid = |(field, message): (&'static str, String)| LedgerError::InvalidEventField {
            field: field.to_string(),
            message,
        };

        let payment = amount_field(&self.0, PARTIAL_PAYMENT).map_err(invalid)?;
        let extra = amount_field(&self.0, EXTRA_LOAN).map_err(invalid)?;

        let payment = Money::from_decimal(payment.unwrap_or(Decimal::ZERO));
        let extra = Money::from_decimal(extra.unwrap_or(Decimal::ZERO));
        if payment.is_zero() && extra.is_zero() {
            return Ok(None);
        }

        let date = date_field(&self.0, PAYMENT_DATE)
            .map_err(invalid)?
            .ok_or_else(|| LedgerError::InvalidEventField {
                field: PAYMENT_DATE[0].to_string(),
                message: "payment row has no date".to_string(),
            })?;

        Ok(Some(LedgerEvent::new(date, payment, extra)))
    }
}

impl RawLoanRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn payments(&self) -> Result<Vec<RawPaymentRecord>> {
        match lookup(&self.0, PAYMENTS) {
            None => Ok(Vec::new()),
            Some((_, value)) => Ok(serde_json::from_value(value.clone())?),
        }
    }

    /// resolve with default business parameters
    pub fn normalize(&self) -> Result<IngestedLoan> {
        self.normalize_with(&LedgerConfig::default())
    }

    /// resolve into ledger types; a missing due date is derived from `config`
    pub fn normalize_with(&self, config: &LedgerConfig) -> Result<IngestedLoan> {
        let fields = &self.0;
        let bad_term = |field: &'static str| {
            move |(alias, message): (&'static str, String)| LedgerError::InvalidTerm {
                field,
                message: format!("{}: {}", alias, message),
            }
        };

        let principal = amount_field(fields, PRINCIPAL)
            .map_err(bad_term("principal"))?
            .ok_or(LedgerError::MissingTerm { field: "principal" })?;
        let rate = amount_field(fields, INTEREST_RATE)
            .map_err(bad_term("monthly_rate"))?
            .ok_or(LedgerError::MissingTerm { field: "monthly_rate" })?;
        let origination_date = date_field(fields, LOAN_DATE)
            .map_err(bad_term("origination_date"))?
            .ok_or(LedgerError::MissingTerm { field: "origination_date" })?;
        let due_date = date_field(fields, DUE_DATE).map_err(bad_term("due_date"))?;
        let closure = self.closure()?;
        let mut explicit_status = text_field(fields, STATUS)
            .map(|s| ExplicitStatus::parse_lenient(&s))
            .unwrap_or_default();
        if let (Some(closure), ExplicitStatus::None) = (&closure, explicit_status) {
            debug!(
                closed_on = %closure.closed_on,
                "record carries a settlement but no status, treating it as closed"
            );
            explicit_status = ExplicitStatus::Closed;
        }

        let mut builder = LoanTerms::builder()
            .principal(Money::from_decimal(principal))
            .monthly_rate(Rate::from_percentage(rate))
            .origination_date(origination_date)
            .explicit_status(explicit_status)
            .config(config);
        if let Some(due) = due_date {
            builder = builder.due_date(due);
        }
        let terms = builder.build()?;

        let mut events = Vec::new();
        for (index, row) in self.payments()?.iter().enumerate() {
            let event = row.normalize().map_err(|err| match err {
                LedgerError::InvalidEventField { field, message } => LedgerError::InvalidEventField {
                    field: format!("payments[{}].{}", index, field),
                    message,
                },
                other => other,
            })?;
            match event {
                Some(event) => {
                    event.validate(terms.origination_date)?;
                    events.push(event);
                }
                None => debug!(index, "dropping placeholder payment row"),
            }
        }

        let loan = IngestedLoan {
            loan_number: text_field(fields, LOAN_NUMBER),
            borrower: self.borrower(),
            ornaments: self.ornaments()?,
            terms,
            events,
            gold_rate_per_gram: self.money_field(GOLD_RATE)?,
            silver_rate_per_gram: self.money_field(SILVER_RATE)?,
            closure,
            notes: text_field(fields, NOTES),
        };
        // refuse pledges the rate card cannot value
        Appraisal::value(&loan.ornaments, &loan.appraisal_rates(&config.appraisal))?;

        debug!(
            loan_number = ?loan.loan_number,
            events = loan.events.len(),
            "normalized loan record"
        );

        Ok(loan)
    }

    fn borrower(&self) -> Borrower {
        let relation = text_field(&self.0, RELATION_TYPE).and_then(|s| {
            match s.to_ascii_lowercase().as_str() {
                "father" => Some(RelationType::Father),
                "husband" => Some(RelationType::Husband),
                _ => None,
            }
        });

        Borrower {
            name: text_field(&self.0, CUSTOMER_NAME).unwrap_or_default(),
            guardian_name: text_field(&self.0, RELATION_NAME),
            relation,
            phone: text_field(&self.0, PHONE),
            address: text_field(&self.0, ADDRESS),
        }
    }

    fn ornaments(&self) -> Result<Ornaments> {
        let ornament_type = match text_field(&self.0, ORNAMENT_TYPE) {
            None => OrnamentType::default(),
            Some(s) => OrnamentType::parse_lenient(&s).ok_or_else(|| LedgerError::InvalidCollateral {
                message: format!("unknown ornament type {:?}", s),
            })?,
        };

        let weight = |aliases: &'static [&'static str]| -> Result<Decimal> {
            amount_field(&self.0, aliases)
                .map(|w| w.unwrap_or(Decimal::ZERO))
                .map_err(|(alias, message)| LedgerError::InvalidCollateral {
                    message: format!("{}: {}", alias, message),
                })
        };

        let ornaments = Ornaments {
            ornament_type,
            gold_grams: weight(GOLD_WEIGHT)?,
            silver_grams: weight(SILVER_WEIGHT)?,
        };
        ornaments.validate()?;
        Ok(ornaments)
    }

    fn money_field(&self, aliases: &'static [&'static str]) -> Result<Option<Money>> {
        amount_field(&self.0, aliases)
            .map(|amount| amount.filter(|a| !a.is_zero()).map(Money::from_decimal))
            .map_err(|(alias, message)| LedgerError::InvalidCollateral {
                message: format!("{}: {}", alias, message),
            })
    }

    fn closure(&self) -> Result<Option<Closure>> {
        let invalid = |(field, message): (&'static str, String)| LedgerError::InvalidEventField {
            field: field.to_string(),
            message,
        };

        let settlement = amount_field(&self.0, AMOUNT_PAID).map_err(invalid)?;
        let closed_on = date_field(&self.0, CLOSED_DATE).map_err(invalid)?;

        Ok(match (settlement, closed_on) {
            (Some(amount), Some(closed_on)) => Some(Closure {
                settlement_amount: Money::from_decimal(amount),
                closed_on,
                outstanding_at_close: None,
                notes: text_field(&self.0, NOTES),
            }),
            _ => None,
        })
    }
}

impl IngestedLoan {
    /// shop rate card with this loan's recorded metal prices laid over it
    pub fn appraisal_rates(&self, base: &AppraisalRates) -> AppraisalRates {
        let mut rates = base.clone();
        if let Some(gold) = self.gold_rate_per_gram {
            rates.gold_rate_per_gram = gold;
        }
        if let Some(silver) = self.silver_rate_per_gram {
            rates.silver_rate_per_gram = silver;
        }
        rates
    }

    /// rebuild the loan aggregate from a stored record
    ///
    /// The store's own id is reused when it is a uuid; otherwise a fresh one
    /// is assigned.
    pub fn into_loan(self, config: &LedgerConfig) -> Loan {
        let id = self
            .loan_number
            .as_deref()
            .and_then(|n| Uuid::parse_str(n).ok())
            .unwrap_or_else(Uuid::new_v4);

        let mut config = config.clone();
        config.appraisal = self.appraisal_rates(&config.appraisal);

        Loan {
            id,
            loan_number: self.loan_number.unwrap_or_else(|| id.to_string()),
            borrower: self.borrower,
            ornaments: self.ornaments,
            terms: self.terms,
            ledger: EventLedger::from_entries(self.events),
            events: EventStore::new(),
            renewed_from: None,
            closure: self.closure,
            config,
        }
    }
}

/// parse a json array of loan documents
pub fn ingest_loans(json: &str, config: &LedgerConfig) -> Result<Vec<IngestedLoan>> {
    let records: Vec<RawLoanRecord> = serde_json::from_str(json)?;
    records.iter().map(|record| record.normalize_with(config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::interest::compute_accrual;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(value: Value) -> RawLoanRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_camel_and_pascal_records_agree() {
        let camel = record(json!({
            "loanId": "GL-101",
            "loanAmount": 100000,
            "interestRate": "3",
            "loanDate": "2024-01-01",
            "dueDate": "2024-12-01",
            "payments": [
                { "date": "2024-02-01", "partialPayment": 20000, "extraLoan": "" }
            ]
        }));
        let pascal = record(json!({
            "LoanId": "GL-101",
            "LoanAmount": "100000",
            "InterestRate": 3,
            "LoanDate": "2024-01-01T00:00:00",
            "DueDate": "2024-12-01T05:30:00+05:30",
            "Payments": [
                { "Date": "2024-02-01T00:00:00.000Z", "PartialPayment": "20000", "ExtraLoan": null }
            ]
        }));

        let a = camel.normalize().unwrap();
        let b = pascal.normalize().unwrap();
        assert_eq!(a.terms, b.terms);
        assert_eq!(a.events, b.events);
        assert_eq!(a.loan_number.as_deref(), Some("GL-101"));
        assert_eq!(a.events, vec![LedgerEvent::payment(date(2024, 2, 1), Money::from_major(20_000))]);

        let result = compute_accrual(&a.terms, &a.events, date(2024, 4, 1)).unwrap();
        assert_eq!(result.outstanding_balance, Money::from_str_exact("87900.00").unwrap());
    }

    #[test]
    fn test_first_non_zero_spelling_wins() {
        let row = RawPaymentRecord::new(
            json!({ "date": "2024-02-01", "partialPayment": 0, "PartialPayment": "750" })
                .as_object()
                .unwrap()
                .clone(),
        );
        let event = row.normalize().unwrap().unwrap();
        assert_eq!(event.payment_amount, Money::from_major(750));
    }

    #[test]
    fn test_placeholder_rows_are_dropped() {
        let loan = record(json!({
            "loanAmount": 5000,
            "interestRate": 2,
            "loanDate": "2024-01-01",
            "payments": [
                { "date": "", "partialPayment": "", "extraLoan": "" },
                { "partialPayment": 0, "extraLoan": 0 },
                { "date": "2024-03-01", "extraLoan": 1000 }
            ]
        }))
        .normalize()
        .unwrap();

        assert_eq!(loan.events, vec![LedgerEvent::extra_loan(date(2024, 3, 1), Money::from_major(1_000))]);
    }

    #[test]
    fn test_missing_due_date_is_derived() {
        let loan = record(json!({ "loanAmount": 5000, "interestRate": 2, "loanDate": "2024-01-31" }))
            .normalize()
            .unwrap();
        assert_eq!(loan.terms.due_date, Some(date(2024, 12, 31)));
        assert_eq!(loan.terms.monthly_rate, Rate::from_percentage(dec!(2)));
    }

    #[test]
    fn test_missing_terms() {
        let err = record(json!({ "interestRate": 3, "loanDate": "2024-01-01" }))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingTerm { field: "principal" }));

        let err = record(json!({ "loanAmount": 1000, "loanDate": "2024-01-01" }))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, LedgerError::MissingTerm { field: "monthly_rate" }));

        let err = record(json!({ "loanAmount": "abc", "interestRate": 3, "loanDate": "2024-01-01" }))
            .normalize()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingTerm);

        let err = record(json!({ "loanAmount": 1000, "interestRate": 3, "loanDate": "01/02/2024" }))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTerm { field: "origination_date", .. }));
    }

    #[test]
    fn test_bad_event_fields() {
        let err = record(json!({
            "loanAmount": 1000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "payments": [{ "date": "2024-02-01", "partialPayment": "ten" }]
        }))
        .normalize()
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidEvent);
        match err {
            LedgerError::InvalidEventField { field, .. } => assert_eq!(field, "payments[0].partialPayment"),
            other => panic!("unexpected error {:?}", other),
        }

        let err = record(json!({
            "loanAmount": 1000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "payments": [{ "partialPayment": 100 }]
        }))
        .normalize()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);

        let err = record(json!({
            "loanAmount": 1000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "payments": [{ "date": "2023-06-01", "partialPayment": 100 }]
        }))
        .normalize()
        .unwrap_err();
        assert!(matches!(err, LedgerError::EventBeforeOrigination { .. }));
    }

    #[test]
    fn test_borrower_collateral_and_status() {
        let loan = record(json!({
            "id": "GL-77",
            "customerName": "Meena",
            "relationName": "Suresh",
            "relationType": "husband",
            "phoneNumber": 9876543210u64,
            "ornamentType": "both",
            "goldWeight": "12.5",
            "silverWeight": 40,
            "goldRate": 10000,
            "loanAmount": 80000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "status": "Closed",
            "amountPaid": 90000,
            "closedDate": "2024-05-01T11:00:00Z",
            "notes": "settled in cash"
        }))
        .normalize()
        .unwrap();

        assert_eq!(loan.borrower.name, "Meena");
        assert_eq!(loan.borrower.relation, Some(RelationType::Husband));
        assert_eq!(loan.borrower.phone.as_deref(), Some("9876543210"));
        assert_eq!(loan.ornaments, Ornaments::both(dec!(12.5), dec!(40)));
        assert_eq!(loan.terms.explicit_status, ExplicitStatus::Closed);

        let closure = loan.closure.clone().unwrap();
        assert_eq!(closure.closed_on, date(2024, 5, 1));
        assert_eq!(closure.settlement_amount, Money::from_major(90_000));

        let rates = loan.appraisal_rates(&AppraisalRates::default());
        assert_eq!(rates.gold_rate_per_gram, Money::from_major(10_000));
        assert_eq!(rates.silver_rate_per_gram, Money::from_major(1_080));

        let loan = loan.into_loan(&LedgerConfig::default());
        assert_eq!(loan.loan_number, "GL-77");
        assert!(!loan.is_open());
        assert_eq!(loan.appraisal().unwrap().gold_value, Money::from_major(125_000));
    }

    #[test]
    fn test_settled_record_without_status_is_closed() {
        let loan = record(json!({
            "loanAmount": 50000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "amountPaid": "54500",
            "closedDate": "2024-04-01"
        }))
        .normalize()
        .unwrap();

        assert_eq!(loan.terms.explicit_status, ExplicitStatus::Closed);
        assert!(loan.closure.is_some());
        assert!(!loan.into_loan(&LedgerConfig::default()).is_open());

        // a renewal keeps its own status
        let renewed = record(json!({
            "loanAmount": 50000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "status": "renewed",
            "amountPaid": 54500,
            "closedDate": "2024-04-01"
        }))
        .normalize()
        .unwrap();
        assert_eq!(renewed.terms.explicit_status, ExplicitStatus::Renewed);

        // half a closure is not a closure
        let open = record(json!({
            "loanAmount": 50000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "amountPaid": 54500
        }))
        .normalize()
        .unwrap();
        assert_eq!(open.terms.explicit_status, ExplicitStatus::None);
        assert!(open.closure.is_none());
    }

    #[test]
    fn test_oversized_weight_is_rejected() {
        let heavy = record(json!({
            "loanAmount": 1000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "goldWeight": "1e27"
        }));
        let err = heavy.normalize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collateral);

        let err = ingest_loans(
            r#"[{ "loanAmount": 1000, "interestRate": 3, "loanDate": "2024-01-01",
                 "ornamentType": "silver", "silverWeight": "1e27" }]"#,
            &LedgerConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collateral);
    }

    #[test]
    fn test_unknown_ornament_type() {
        let err = record(json!({
            "loanAmount": 1000,
            "interestRate": 3,
            "loanDate": "2024-01-01",
            "ornamentType": "platinum"
        }))
        .normalize()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collateral);
    }

    #[test]
    fn test_ingest_array() {
        let json = r#"[
            { "loanAmount": 1000, "interestRate": 3, "loanDate": "2024-01-01" },
            { "LoanAmount": "2000", "InterestRate": "2.5", "LoanDate": "2024-02-01" }
        ]"#;
        let loans = ingest_loans(json, &LedgerConfig::default()).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[1].terms.principal, Money::from_major(2_000));

        let err = ingest_loans("{ not json", &LedgerConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRecord);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_amount(&json!(" 1,250.50 ")).unwrap(), Some(dec!(1250.50)));
        assert_eq!(parse_amount(&json!("")).unwrap(), None);
        assert_eq!(parse_amount(&json!(null)).unwrap(), None);
        assert!(parse_amount(&json!(true)).is_err());

        assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29T18:30:00.000Z"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("2024-02-29T08:15:00"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date("yesterday"), None);
    }
}
