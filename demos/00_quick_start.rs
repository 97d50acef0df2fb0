/// quick start - record an installment sale and list what is owed
use receivables_rs::{LineItem, MemorySaleRepository, Money, Sale, SalesLedger, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = SalesLedger::new(MemorySaleRepository::new());

    // R$ 600 sofa, R$ 100 down, five monthly installments
    let sale = Sale::builder()
        .item(LineItem::new("Sofá", 1, Money::from_major(600), Money::from_major(350)))
        .down_payment(Money::from_major(100))
        .installments(5)
        .set_time(&time)
        .build()?;
    ledger.record_sale(sale, &time)?;

    for payment in ledger.pending_payments(&time)? {
        println!(
            "#{} R$ {} due {} ({})",
            payment.number, payment.value, payment.due_date, payment.label
        );
    }

    Ok(())
}
