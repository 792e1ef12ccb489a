/// store records - ingest mixed-spelling json and summarize the book
use pawn_ledger_rs::chrono::NaiveDate;
use pawn_ledger_rs::{ingest_loans, LedgerConfig, LoanStatus, PortfolioReport};

const STORE: &str = r#"[
    {
        "loanId": "GL-9001",
        "customerName": "Lakshmi",
        "ornamentType": "gold",
        "goldWeight": "20",
        "loanAmount": 100000,
        "interestRate": "3",
        "loanDate": "2024-01-01",
        "dueDate": "2024-12-01",
        "payments": [
            { "date": "2024-02-01", "partialPayment": "20000", "extraLoan": "" },
            { "date": "", "partialPayment": "", "extraLoan": "" }
        ]
    },
    {
        "LoanId": "GL-9002",
        "CustomerName": "Venkat",
        "OrnamentType": "silver",
        "SilverWeight": 500,
        "LoanAmount": "25000",
        "InterestRate": 2.5,
        "LoanDate": "2024-01-20T00:00:00.000Z",
        "DueDate": "2024-03-20",
        "Payments": []
    },
    {
        "id": "GL-9003",
        "customerName": "Farida",
        "ornamentType": "both",
        "goldWeight": 4,
        "silverWeight": 100,
        "loanAmount": 30000,
        "interestRate": 3,
        "loanDate": "2024-02-15",
        "status": "closed",
        "amountPaid": 31000,
        "closedDate": "2024-03-15T12:00:00Z"
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ingest and report ===\n");

    let config = LedgerConfig::from_json_str(r#"{ "due_soon_window_days": 10 }"#)?;
    let loans: Vec<_> = ingest_loans(STORE, &config)?
        .into_iter()
        .map(|record| record.into_loan(&config))
        .collect();

    let from = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let to = NaiveDate::from_ymd_opt(2024, 3, 31).ok_or("bad date")?;
    let as_of = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad date")?;

    let report = PortfolioReport::generate(&loans, from..=to, as_of)?;

    for row in &report.rows {
        println!(
            "{:<8} {:<10} {:<8} interest {:>10} outstanding {:>12}",
            row.loan_number,
            row.borrower_name,
            row.status.label(),
            row.total_interest.to_string(),
            row.outstanding_balance.to_string()
        );
    }
    println!("\noverdue loans: {}", report.count(LoanStatus::Overdue));
    println!("open outstanding: {}", report.totals.outstanding);
    println!("\n{}", report.to_json_pretty()?);

    Ok(())
}
