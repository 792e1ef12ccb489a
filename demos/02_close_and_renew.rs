/// lifecycle - settle one loan, renew another into a fresh ticket
use pawn_ledger_rs::chrono::{Duration, TimeZone, Utc};
use pawn_ledger_rs::{
    Borrower, LedgerConfig, Loan, LoanTerms, LoanView, Money, Ornaments, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== close and renew ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();
    let config = LedgerConfig::default();
    let today = time.now().date_naive();

    let mut first = Loan::originate(
        "GL-100",
        Borrower::named("Ramesh"),
        Ornaments::gold(dec!(10)),
        LoanTerms::builder()
            .principal(Money::from_major(50_000))
            .origination_date(today)
            .build()?,
        &config,
        &time,
    )?;

    let mut second = Loan::originate(
        "GL-101",
        Borrower::named("Saroja"),
        Ornaments::both(dec!(5), dec!(200)),
        LoanTerms::builder()
            .principal(Money::from_major(40_000))
            .origination_date(today)
            .build()?,
        &config,
        &time,
    )?;

    controller.advance(Duration::days(90));

    // settle the first loan, a little short of the computed balance
    let owed = first.accrual(&time)?.outstanding_balance;
    let closure = first.close(Money::from_major(54_000), Some("rounded down at the counter".to_string()), &time)?;
    println!("{} owed {} and settled for {}", first.loan_number, owed, closure.settlement_amount);
    if let Some(diff) = closure.difference() {
        println!("difference recorded: {}", diff);
    }
    println!("status: {}", first.status(&time)?);

    // roll the second loan's balance into a new ticket
    let carried = second.accrual(&time)?.outstanding_balance;
    let terms = LoanTerms::builder()
        .principal(carried.round_cents())
        .origination_date(time.now().date_naive())
        .build()?;
    let renewed = second.renew("GL-101-R1", terms, &time)?;
    println!("\n{} renewed as {} carrying {}", second.loan_number, renewed.loan_number, carried);

    let view = LoanView::build(&renewed, time.now().date_naive())?;
    println!("\n{}", view.to_json_pretty()?);

    for event in first.take_events().into_iter().chain(second.take_events()) {
        println!("event: {:?}", event);
    }

    Ok(())
}
