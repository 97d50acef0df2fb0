use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::config::ReceivablesConfig;
use crate::errors::{Result, SaleError};
use crate::events::{Event, EventStore};
use crate::planner::InstallmentPlanner;
use crate::receivables::{self, collect_outstanding, ReceivablesAggregator, ReceivablesSummary};
use crate::sale::{Installment, Sale, SaleBuilder};
use crate::serialization::{MonthCalendarView, PendingPaymentView, SaleView};
use crate::store::SaleRepository;
use crate::types::{SaleId, YearMonth};

/// sales workflows over a repository: recording sales, surfacing receivables
/// and confirming installment payments
pub struct SalesLedger<R: SaleRepository> {
    repository: R,
    aggregator: ReceivablesAggregator,
    events: EventStore,
}

impl<R: SaleRepository> SalesLedger<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            aggregator: ReceivablesAggregator::new(),
            events: EventStore::new(),
        }
    }

    pub fn with_config(repository: R, config: ReceivablesConfig) -> Result<Self> {
        Ok(Self {
            repository,
            aggregator: ReceivablesAggregator::with_config(config)?,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &ReceivablesConfig {
        self.aggregator.config()
    }

    /// sale builder using this ledger's installment settings
    pub fn sale_builder<'t>(&self) -> SaleBuilder<'t> {
        SaleBuilder::new().planner(InstallmentPlanner::with_config(self.config().plan.clone()))
    }

    /// persist a newly built sale
    pub fn record_sale(&mut self, sale: Sale, time_provider: &SafeTimeProvider) -> Result<SaleId> {
        let now = time_provider.now();
        self.repository.save(&sale)?;

        self.events.emit(Event::SaleRecorded {
            sale_id: sale.id,
            total_value: sale.total_value,
            payment_method: sale.payment_method.clone(),
            status: sale.status,
            timestamp: now,
        });

        if let Some(first) = sale.installments.first() {
            self.events.emit(Event::ScheduleGenerated {
                sale_id: sale.id,
                down_payment: sale.down_payment,
                installment_count: sale.installments.len() as u32,
                per_installment: first.value,
                first_due_date: first.due_date.date_naive(),
                timestamp: now,
            });
        }

        info!(
            sale_id = %sale.id,
            total = %sale.total_value,
            installments = sale.installments.len(),
            "sale recorded"
        );
        Ok(sale.id)
    }

    pub fn sale(&self, sale_id: SaleId) -> Result<Sale> {
        self.repository
            .get(sale_id)?
            .ok_or(SaleError::SaleNotFound { sale_id })
    }

    pub fn sales(&self) -> Result<Vec<Sale>> {
        self.repository.all()
    }

    pub fn sale_views(&self) -> Result<Vec<SaleView>> {
        Ok(self.sales()?.iter().map(SaleView::from_sale).collect())
    }

    /// every outstanding installment in storage order
    pub fn pending_payments(&self, time_provider: &SafeTimeProvider) -> Result<Vec<PendingPaymentView>> {
        let sales = self.sales()?;
        let today = time_provider.now().date_naive();
        Ok(collect_outstanding(&sales)
            .iter()
            .map(|p| PendingPaymentView::from_payment(p, today, &self.config().urgency))
            .collect())
    }

    /// overdue and due-soon payments, most urgent first
    pub fn reminders(&self, time_provider: &SafeTimeProvider) -> Result<Vec<PendingPaymentView>> {
        let sales = self.sales()?;
        let today = time_provider.now().date_naive();
        Ok(self
            .aggregator
            .reminders(&sales, time_provider)
            .iter()
            .map(|r| PendingPaymentView::from_payment(&r.payment, today, &self.config().urgency))
            .collect())
    }

    pub fn month_calendar(&self, month: YearMonth, time_provider: &SafeTimeProvider) -> Result<MonthCalendarView> {
        let sales = self.sales()?;
        let calendar = self.aggregator.month_calendar(&sales, month, time_provider)?;
        Ok(MonthCalendarView::from_calendar(
            &calendar,
            time_provider.now().date_naive(),
            &self.config().urgency,
        ))
    }

    pub fn summary(&self, time_provider: &SafeTimeProvider) -> Result<ReceivablesSummary> {
        let sales = self.sales()?;
        Ok(self.aggregator.summary(&sales, time_provider))
    }

    /// mark an installment paid and persist the whole updated sale.
    ///
    /// The transition runs on a copy; the stored record and the event log only
    /// change once the repository accepted the new record.
    pub fn confirm_payment(
        &mut self,
        sale_id: SaleId,
        installment_id: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<Installment> {
        let mut sale = self.sale(sale_id)?;
        let mut pending_events = EventStore::new();

        let paid = self
            .aggregator
            .mark_paid(&mut sale, installment_id, time_provider.now(), &mut pending_events)
            .map_err(|err| {
                warn!(%sale_id, installment_id, error = %err, "payment confirmation rejected");
                err
            })?;

        self.repository.save(&sale)?;
        self.events.extend(&mut pending_events);
        Ok(paid)
    }

    /// confirm payment with system time
    pub fn confirm_payment_now(&mut self, sale_id: SaleId, installment_id: &str) -> Result<Installment> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.confirm_payment(sale_id, installment_id, &time)
    }

    /// flag late pending installments across all sales; returns how many changed
    pub fn refresh_overdue(&mut self, time_provider: &SafeTimeProvider) -> Result<usize> {
        let now = time_provider.now();
        let mut flagged = 0;

        for mut sale in self.sales()? {
            let mut pending_events = EventStore::new();
            let count = receivables::refresh_overdue(&mut sale, now, &mut pending_events);
            if count > 0 {
                self.repository.save(&sale)?;
                self.events.extend(&mut pending_events);
                flagged += count;
            }
        }

        Ok(flagged)
    }

    /// all sales as pretty-printed json
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.sales()?)?)
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}
