/// calendar - month grid of amounts due per day
use chrono::{TimeZone, Utc};
use receivables_rs::{
    build_month_calendar, Customer, LineItem, Money, SafeTimeProvider, Sale, TimeSource, YearMonth,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== receivables calendar ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 2, 5, 9, 0, 0).unwrap(),
    ));

    let mut sales = Vec::new();
    for (name, day_offset, count) in [("Ana", 0, 3), ("Bruno", 8, 6), ("Carla", 20, 2)] {
        let clock = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap() + chrono::Duration::days(day_offset),
        ));
        sales.push(
            Sale::builder()
                .item(LineItem::new("Kit", 1, Money::from_major(300), Money::from_major(150)))
                .customer(Customer::new(name))
                .installments(count)
                .set_time(&clock)
                .build()?,
        );
    }

    let today = time.now().date_naive();
    let month = YearMonth::of(today);
    let calendar = build_month_calendar(&sales, month.year, month.month, today)?;

    println!("{:04}-{:02}", month.year, month.month);
    println!(" Dom       Seg       Ter       Qua       Qui       Sex       Sáb");
    for week in calendar.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|day| {
                let marker = if day.is_today { '*' } else { ' ' };
                if day.has_payments() {
                    format!("{}{}:{:>5} ", marker, day.date.format("%d"), day.total_amount.round_dp(0).to_string())
                } else if day.is_current_month {
                    format!("{}{}       ", marker, day.date.format("%d"))
                } else {
                    " ".repeat(10)
                }
            })
            .collect();
        println!("{}", row.join(""));
    }

    println!("\nmonth total: R$ {}", calendar.month_total());
    println!("window total: R$ {}", calendar.total_amount());

    Ok(())
}
