/// json state - serialized views for the host application
use chrono::{Duration, TimeZone, Utc};
use receivables_rs::serialization::SaleView;
use receivables_rs::{
    Customer, LineItem, MemorySaleRepository, Money, PaymentMethod, ReceivablesConfig,
    SafeTimeProvider, SalesLedger, TimeSource, YearMonth,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let config = ReceivablesConfig::from_json_str(r#"{"urgency": {"due_soon_days": 5}}"#)?;
    let mut ledger = SalesLedger::with_config(MemorySaleRepository::new(), config)?;

    let sale = ledger
        .sale_builder()
        .item(LineItem::new("Notebook", 1, Money::from_major(3000), Money::from_major(2200)))
        .customer(Customer::new("Pedro"))
        .down_payment(Money::from_major(500))
        .installments(3)
        .set_time(&time)
        .build()?;
    let sale_id = ledger.record_sale(sale, &time)?;

    let cash = ledger
        .sale_builder()
        .item(LineItem::new("Mouse", 2, Money::from_major(60), Money::from_major(25)))
        .payment_method(PaymentMethod::Pix)
        .set_time(&time)
        .build()?;
    ledger.record_sale(cash, &time)?;

    println!("stage 1: sale recorded");
    println!("----------------------");
    println!("{}\n", SaleView::from_sale(&ledger.sale(sale_id)?).to_json_pretty()?);

    controller.advance(Duration::days(29));
    println!("stage 2: pending payments");
    println!("-------------------------");
    println!("{}\n", serde_json::to_string_pretty(&ledger.pending_payments(&time)?)?);

    let first = ledger.sale(sale_id)?.installments[0].id.clone();
    controller.advance(Duration::days(3));
    ledger.confirm_payment(sale_id, &first, &time)?;
    println!("stage 3: dashboard after first payment");
    println!("--------------------------------------");
    println!("{}\n", serde_json::to_string_pretty(&ledger.summary(&time)?)?);

    let calendar = ledger.month_calendar(YearMonth::new(2024, 3)?, &time)?;
    println!("stage 4: march calendar total R$ {}", calendar.month_total);

    println!("\nevents:");
    println!("{}", serde_json::to_string_pretty(ledger.events().events())?);

    Ok(())
}
