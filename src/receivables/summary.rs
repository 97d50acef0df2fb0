use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::UrgencyThresholds;
use crate::decimal::Money;
use crate::receivables::outstanding::PendingPayment;
use crate::receivables::urgency::{classify_urgency_with, Urgency};
use crate::sale::Sale;

/// dashboard totals for sales and money still owed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceivablesSummary {
    pub sale_count: usize,
    pub total_sales: Money,
    pub total_profit: Money,
    pub total_received: Money,

    pub outstanding_count: usize,
    pub total_outstanding: Money,
    pub overdue_count: usize,
    pub total_overdue: Money,
    pub due_today: Money,
    /// tomorrow plus the rest of the due-soon window
    pub due_soon: Money,
    pub upcoming: Money,
}

impl ReceivablesSummary {
    pub(crate) fn build<'a>(
        sales: impl IntoIterator<Item = &'a Sale>,
        outstanding: &[PendingPayment<'a>],
        today: NaiveDate,
        thresholds: &UrgencyThresholds,
    ) -> Self {
        let mut summary = ReceivablesSummary::default();

        for sale in sales {
            summary.sale_count += 1;
            summary.total_sales += sale.total_value;
            summary.total_profit += sale.total_profit;
            summary.total_received += sale.paid_amount();
        }

        for payment in outstanding {
            let value = payment.value();
            summary.outstanding_count += 1;
            summary.total_outstanding += value;

            match classify_urgency_with(payment.installment, today, thresholds) {
                Urgency::Overdue { .. } => {
                    summary.overdue_count += 1;
                    summary.total_overdue += value;
                }
                Urgency::DueToday => summary.due_today += value,
                Urgency::DueTomorrow | Urgency::DueSoon { .. } => summary.due_soon += value,
                Urgency::Upcoming { .. } => summary.upcoming += value,
                Urgency::None => {}
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivables::outstanding::collect_outstanding;
    use crate::receivables::test_support::{cash_sale, sale_with_schedule, today};
    use crate::types::InstallmentStatus;

    #[test]
    fn test_summary_buckets() {
        let mut partly_paid = sale_with_schedule("Ana", 3, -40);
        partly_paid.installments[0].status = InstallmentStatus::Paid;
        let sales = vec![
            partly_paid,
            sale_with_schedule("Bruno", 1, 0),
            sale_with_schedule("Carla", 1, 1),
            cash_sale(),
        ];
        let outstanding = collect_outstanding(&sales);

        let summary = ReceivablesSummary::build(&sales, &outstanding, today(), &UrgencyThresholds::default());

        assert_eq!(summary.sale_count, 4);
        assert_eq!(summary.outstanding_count, 4);
        assert_eq!(summary.total_outstanding, Money::from_major(400));
        // ana's 2nd installment (about ten days late)
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.total_overdue, Money::from_major(100));
        assert_eq!(summary.due_today, Money::from_major(100));
        assert_eq!(summary.due_soon, Money::from_major(100));
        assert_eq!(summary.upcoming, Money::from_major(100));
        assert_eq!(
            summary.total_overdue + summary.due_today + summary.due_soon + summary.upcoming,
            summary.total_outstanding
        );
        // cash sale 150 + ana's paid installment 100
        assert_eq!(summary.total_received, Money::from_major(250));
    }
}
