/// installment sale - controlled time, reminders and payment confirmation
use chrono::{Duration, TimeZone, Utc};
use receivables_rs::{
    Customer, LineItem, MemorySaleRepository, Money, SafeTimeProvider, SalesLedger, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== installment sale ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let mut ledger = SalesLedger::new(MemorySaleRepository::new());

    let sale = ledger
        .sale_builder()
        .items(vec![
            LineItem::new("Vestido", 2, Money::from_major(250), Money::from_major(120)),
            LineItem::new("Sandália", 1, Money::from_major(500), Money::from_major(260)),
        ])
        .customer(Customer::new("Maria Souza").with_phone("11 99999-0000"))
        .down_payment(Money::from_major(200))
        .installments(4)
        .set_time(&time)
        .build()?;
    let sale_id = ledger.record_sale(sale, &time)?;

    let stored = ledger.sale(sale_id)?;
    println!("sale total: R$ {}", stored.total_value);
    println!("profit: R$ {}", stored.total_profit);
    println!("status: {:?}\n", stored.status);
    for installment in &stored.installments {
        println!(
            "  parcela {} - R$ {} - {}",
            installment.number,
            installment.value,
            installment.due_date.format("%d/%m/%Y")
        );
    }

    // day before the first due date
    controller.advance(Duration::days(30));
    println!("\ntoday: {}", time.now().format("%d/%m/%Y"));
    for reminder in ledger.reminders(&time)? {
        println!(
            "  reminder: {} - parcela {} - {}",
            reminder.customer_name.as_deref().unwrap_or("-"),
            reminder.number,
            reminder.label
        );
    }

    // customer pays the first two installments late
    controller.advance(Duration::days(35));
    let flagged = ledger.refresh_overdue(&time)?;
    println!("\ntoday: {} ({} overdue)", time.now().format("%d/%m/%Y"), flagged);

    let ids: Vec<String> = stored.installments.iter().map(|i| i.id.clone()).collect();
    ledger.confirm_payment(sale_id, &ids[0], &time)?;
    ledger.confirm_payment(sale_id, &ids[1], &time)?;
    println!("status after two payments: {:?}", ledger.sale(sale_id)?.status);

    for id in &ids[2..] {
        ledger.confirm_payment(sale_id, id, &time)?;
    }
    println!("status after all payments: {:?}", ledger.sale(sale_id)?.status);
    println!("\nlogged events: {}", ledger.events().len());

    Ok(())
}
