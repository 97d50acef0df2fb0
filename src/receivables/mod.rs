pub mod calendar;
pub mod outstanding;
pub mod settlement;
pub mod summary;
pub mod urgency;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::config::{CalendarConfig, ReceivablesConfig};
use crate::errors::Result;
use crate::events::EventStore;
use crate::sale::{Installment, Sale};
use crate::types::YearMonth;

pub use calendar::{CalendarDay, MonthCalendar};
pub use outstanding::{
    collect_outstanding, due_reminders, group_by_day, group_by_month, DueGroup, PendingPayment,
    Reminder,
};
pub use settlement::{derive_sale_status, mark_installment_paid, refresh_overdue};
pub use summary::ReceivablesSummary;
pub use urgency::{classify_urgency, classify_urgency_with, days_until_due, Urgency};

/// 42-cell month grid with the default layout
pub fn build_month_calendar<'a, I>(
    sales: I,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthCalendar<'a>>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let outstanding = collect_outstanding(sales);
    calendar::build_calendar(
        &outstanding,
        YearMonth::new(year, month)?,
        today,
        &CalendarConfig::default(),
    )
}

/// surfaces and classifies money owed across sales using one configuration
#[derive(Debug, Clone, Default)]
pub struct ReceivablesAggregator {
    config: ReceivablesConfig,
}

impl ReceivablesAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReceivablesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReceivablesConfig {
        &self.config
    }

    pub fn collect_outstanding<'a>(&self, sales: &'a [Sale]) -> Vec<PendingPayment<'a>> {
        collect_outstanding(sales)
    }

    pub fn classify(&self, installment: &Installment, today: NaiveDate) -> Urgency {
        classify_urgency_with(installment, today, &self.config.urgency)
    }

    pub fn month_calendar<'a>(
        &self,
        sales: &'a [Sale],
        month: YearMonth,
        time_provider: &SafeTimeProvider,
    ) -> Result<MonthCalendar<'a>> {
        let outstanding = collect_outstanding(sales);
        calendar::build_calendar(
            &outstanding,
            month,
            time_provider.now().date_naive(),
            &self.config.calendar,
        )
    }

    /// calendar for the month containing "now"
    pub fn current_month_calendar<'a>(
        &self,
        sales: &'a [Sale],
        time_provider: &SafeTimeProvider,
    ) -> Result<MonthCalendar<'a>> {
        let month = YearMonth::of(time_provider.now().date_naive());
        self.month_calendar(sales, month, time_provider)
    }

    pub fn reminders<'a>(&self, sales: &'a [Sale], time_provider: &SafeTimeProvider) -> Vec<Reminder<'a>> {
        let outstanding = collect_outstanding(sales);
        outstanding::due_reminders(
            &outstanding,
            time_provider.now().date_naive(),
            &self.config.urgency,
        )
    }

    pub fn summary(&self, sales: &[Sale], time_provider: &SafeTimeProvider) -> ReceivablesSummary {
        let outstanding = collect_outstanding(sales);
        ReceivablesSummary::build(
            sales,
            &outstanding,
            time_provider.now().date_naive(),
            &self.config.urgency,
        )
    }

    pub fn mark_paid(
        &self,
        sale: &mut Sale,
        installment_id: &str,
        paid_at: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<Installment> {
        mark_installment_paid(sale, installment_id, paid_at, events)
    }
}
