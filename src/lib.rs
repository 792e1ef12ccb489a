pub mod collateral;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ingest;
pub mod interest;
pub mod loan;
pub mod report;
pub mod status;
pub mod terms;
pub mod types;
pub mod view;

// re-export key types
pub use collateral::{Appraisal, AppraisalRates, LtvCalculator, LtvStatus, Ornaments};
pub use config::LedgerConfig;
pub use decimal::{Money, Rate};
pub use errors::{ErrorKind, LedgerError, Result};
pub use events::{Event, EventLedger, EventStore, LedgerEvent};
pub use ingest::{ingest_loans, IngestedLoan, RawLoanRecord, RawPaymentRecord};
pub use interest::{compute_accrual, AccrualResult, BreakdownEntry, PeriodAccrual, PeriodKind};
pub use loan::{Closure, Loan};
pub use report::{PortfolioReport, PortfolioTotals, ReportRow};
pub use status::{classify_status, StatusClassifier};
pub use terms::{LoanTerms, LoanTermsBuilder};
pub use types::{Borrower, ExplicitStatus, LoanId, LoanStatus, OrnamentType, RelationType};
pub use view::LoanView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
