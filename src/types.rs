use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// status override set by business actions, short-circuits computed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExplicitStatus {
    #[default]
    None,
    Closed,
    Renewed,
}

impl ExplicitStatus {
    /// loan still accepts payments, extra loans, closure and renewal
    pub fn is_open(&self) -> bool {
        matches!(self, ExplicitStatus::None)
    }

    /// parse the free-text status the store keeps ("closed", "Renewed", "Active", ...)
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed" => ExplicitStatus::Closed,
            "renewed" => ExplicitStatus::Renewed,
            _ => ExplicitStatus::None,
        }
    }
}

/// loan lifecycle status, always derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// closed by settlement
    Closed,
    /// rolled into a new loan
    Renewed,
    /// nothing outstanding
    Paid,
    /// past due date
    Overdue,
    /// due within the warning window
    DueSoon,
    /// performing
    Active,
}

impl LoanStatus {
    /// statuses whose balances still count as money on the street
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::DueSoon | LoanStatus::Overdue)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Closed => "Closed",
            LoanStatus::Renewed => "Renewed",
            LoanStatus::Paid => "Paid",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::DueSoon => "Due Soon",
            LoanStatus::Active => "Active",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// metal pledged against the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrnamentType {
    #[default]
    Gold,
    Silver,
    Both,
}

impl OrnamentType {
    pub fn includes_gold(&self) -> bool {
        matches!(self, OrnamentType::Gold | OrnamentType::Both)
    }

    pub fn includes_silver(&self) -> bool {
        matches!(self, OrnamentType::Silver | OrnamentType::Both)
    }

    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(OrnamentType::Gold),
            "silver" => Some(OrnamentType::Silver),
            "both" => Some(OrnamentType::Both),
            _ => None,
        }
    }
}

/// how the borrower is related to the named guardian
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Father,
    Husband,
}

/// borrower contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Borrower {
    pub name: String,
    pub guardian_name: Option<String>,
    pub relation: Option<RelationType>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Borrower {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
