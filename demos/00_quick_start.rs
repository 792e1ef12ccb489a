/// quick start - minimal example to get started
use pawn_ledger_rs::chrono::NaiveDate;
use pawn_ledger_rs::{compute_accrual, classify_status, LoanTerms, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let as_of = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad date")?;

    // 100,000 at the default 3% a month, due eleven months out
    let terms = LoanTerms::builder()
        .principal(Money::from_major(100_000))
        .origination_date(start)
        .build()?;

    let accrual = compute_accrual(&terms, &[], as_of)?;
    let status = classify_status(&terms, &accrual, as_of);

    println!("interest to {}: {}", as_of, accrual.total_interest);
    println!("outstanding:      {}", accrual.outstanding_balance);
    println!("status:           {}", status);

    Ok(())
}
