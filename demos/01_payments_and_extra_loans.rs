/// payments and extra loans - how each entry moves the interest-earning principal
use pawn_ledger_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};
use pawn_ledger_rs::{
    Borrower, LedgerConfig, LedgerEvent, Loan, LoanTerms, Money, Ornaments, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== payments and extra loans ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();
    let config = LedgerConfig::default();

    let terms = LoanTerms::builder()
        .principal(Money::from_major(100_000))
        .origination_date(time.now().date_naive())
        .config(&config)
        .build()?;

    let mut loan = Loan::originate(
        "GL-2024-001",
        Borrower::named("Kavitha"),
        Ornaments::gold(dec!(18.5)),
        terms,
        &config,
        &time,
    )?;
    println!("loan {} originated on {}", loan.loan_number, time.now().format("%Y-%m-%d"));

    // a month later the borrower repays 20,000 and takes 15,000 more the same day
    controller.advance(Duration::days(31));
    let today = time.now().date_naive();
    let result = loan.record_entry(
        LedgerEvent::new(today, Money::from_major(20_000), Money::from_major(15_000)),
        &time,
    )?;
    println!("\n{}: principal now {}", today, result.current_principal);

    // two more months pass
    controller.advance(Duration::days(60));
    let accrual = loan.accrual(&time)?;

    println!("\nstatement as of {}", accrual.as_of);
    for entry in &accrual.breakdown {
        println!("  {}", entry.describe());
    }
    println!("\ntotal interest:     {}", accrual.total_interest);
    println!("principal given:    {}", accrual.total_principal_disbursed);
    println!("paid so far:        {}", accrual.total_paid);
    println!("outstanding:        {}", accrual.outstanding_balance);
    println!("status:             {}", loan.status(&time)?);

    for event in loan.take_events() {
        println!("event: {:?}", event);
    }

    // an empty entry is refused
    let date = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad date")?;
    if let Err(err) = loan.record_entry(LedgerEvent::new(date, Money::ZERO, Money::ZERO), &time) {
        println!("\nrejected: {}", err);
    }

    Ok(())
}
