use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::UrgencyThresholds;
use crate::decimal::Money;
use crate::receivables::urgency::{classify_urgency_with, Urgency};
use crate::sale::{Installment, Sale};
use crate::types::{SaleId, YearMonth};

/// outstanding installment together with the sale it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPayment<'a> {
    pub sale: &'a Sale,
    pub installment: &'a Installment,
}

impl<'a> PendingPayment<'a> {
    pub fn sale_id(&self) -> SaleId {
        self.sale.id
    }

    pub fn customer_name(&self) -> Option<&'a str> {
        self.sale.customer_name()
    }

    pub fn customer_phone(&self) -> Option<&'a str> {
        self.sale.customer_phone()
    }

    pub fn value(&self) -> Money {
        self.installment.value
    }

    pub fn due_day(&self) -> NaiveDate {
        self.installment.due_date.date_naive()
    }
}

/// every pending or overdue installment across all sales, in storage order
pub fn collect_outstanding<'a, I>(sales: I) -> Vec<PendingPayment<'a>>
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales
        .into_iter()
        .flat_map(|sale| {
            sale.installments
                .iter()
                .filter(|installment| installment.is_outstanding())
                .map(move |installment| PendingPayment { sale, installment })
        })
        .collect()
}

/// payments sharing a due day or month
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DueGroup<'a> {
    pub payments: Vec<PendingPayment<'a>>,
    pub total: Money,
}

impl<'a> DueGroup<'a> {
    fn push(&mut self, payment: PendingPayment<'a>) {
        self.total += payment.value();
        self.payments.push(payment);
    }

    pub fn count(&self) -> usize {
        self.payments.len()
    }
}

pub fn group_by_day<'a>(payments: &[PendingPayment<'a>]) -> BTreeMap<NaiveDate, DueGroup<'a>> {
    let mut groups: BTreeMap<NaiveDate, DueGroup<'a>> = BTreeMap::new();
    for payment in payments {
        groups.entry(payment.due_day()).or_default().push(*payment);
    }
    groups
}

pub fn group_by_month<'a>(payments: &[PendingPayment<'a>]) -> BTreeMap<YearMonth, DueGroup<'a>> {
    let mut groups: BTreeMap<YearMonth, DueGroup<'a>> = BTreeMap::new();
    for payment in payments {
        groups
            .entry(YearMonth::of(payment.due_day()))
            .or_default()
            .push(*payment);
    }
    groups
}

/// outstanding payment with its urgency bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reminder<'a> {
    pub payment: PendingPayment<'a>,
    pub urgency: Urgency,
}

/// payments that are overdue or due within the due-soon window, most urgent
/// first, earliest due date first within the same priority
pub fn due_reminders<'a>(
    payments: &[PendingPayment<'a>],
    today: NaiveDate,
    thresholds: &UrgencyThresholds,
) -> Vec<Reminder<'a>> {
    let mut reminders: Vec<Reminder<'a>> = payments
        .iter()
        .map(|payment| Reminder {
            payment: *payment,
            urgency: classify_urgency_with(payment.installment, today, thresholds),
        })
        .filter(|reminder| reminder.urgency.needs_reminder())
        .collect();

    reminders.sort_by_key(|r| (Reverse(r.urgency.priority()), r.payment.installment.due_date));
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivables::test_support::{sale_with_schedule, today};
    use crate::types::InstallmentStatus;

    #[test]
    fn test_collect_preserves_storage_order() {
        let mut first = sale_with_schedule("Ana", 3, -40);
        first.installments[0].status = InstallmentStatus::Paid;
        let second = sale_with_schedule("Bruno", 2, 5);
        let cash = crate::receivables::test_support::cash_sale();

        let sales = vec![first.clone(), cash, second.clone()];
        let outstanding = collect_outstanding(&sales);

        let keys: Vec<(&str, u32)> = outstanding
            .iter()
            .map(|p| (p.customer_name().unwrap(), p.installment.number))
            .collect();
        assert_eq!(keys, vec![("Ana", 2), ("Ana", 3), ("Bruno", 1), ("Bruno", 2)]);
        assert_eq!(outstanding[0].sale_id(), first.id);
    }

    #[test]
    fn test_overdue_counts_as_outstanding() {
        let mut sale = sale_with_schedule("Carla", 2, -60);
        sale.installments[0].status = InstallmentStatus::Overdue;
        sale.installments[1].status = InstallmentStatus::Paid;
        let sales = vec![sale];

        let outstanding = collect_outstanding(&sales);
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].installment.status, InstallmentStatus::Overdue);
    }

    #[test]
    fn test_grouping() {
        let sales = vec![sale_with_schedule("Ana", 3, 0), sale_with_schedule("Bruno", 2, 0)];
        let outstanding = collect_outstanding(&sales);

        let by_day = group_by_day(&outstanding);
        // both schedules start on the same day, so due days coincide
        assert_eq!(by_day.len(), 3);
        let first = by_day.values().next().unwrap();
        assert_eq!(first.count(), 2);
        assert_eq!(first.total, Money::from_major(200));

        let by_month = group_by_month(&outstanding);
        assert_eq!(by_month.len(), 3);
        let total: Money = by_month.values().map(|g| g.total).sum();
        assert_eq!(total, Money::from_major(500));
    }

    #[test]
    fn test_reminders_sorted_by_urgency() {
        // due offsets relative to today: -3 (overdue), 10 (upcoming), 2 (soon), 0 (today)
        let overdue = sale_with_schedule("Ana", 1, -3);
        let upcoming = sale_with_schedule("Bruno", 1, 10);
        let soon = sale_with_schedule("Carla", 1, 2);
        let due_today = sale_with_schedule("Davi", 1, 0);
        let sales = vec![upcoming, soon, due_today, overdue];

        let outstanding = collect_outstanding(&sales);
        let reminders = due_reminders(&outstanding, today(), &UrgencyThresholds::default());

        let names: Vec<&str> = reminders
            .iter()
            .map(|r| r.payment.customer_name().unwrap())
            .collect();
        assert_eq!(names, vec!["Ana", "Davi", "Carla"]);
        assert!(reminders[0].urgency.is_overdue());
    }
}
