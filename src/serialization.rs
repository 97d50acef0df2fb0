/// serializable views for host applications
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::UrgencyThresholds;
use crate::decimal::Money;
use crate::receivables::{classify_urgency_with, MonthCalendar, PendingPayment, Urgency};
use crate::sale::Sale;
use crate::types::{InstallmentId, InstallmentStatus, SaleId, SaleStatus};

/// owned projection of one outstanding installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPaymentView {
    pub sale_id: SaleId,
    pub installment_id: InstallmentId,
    pub number: u32,
    pub value: Money,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub urgency: Urgency,
    pub label: String,
}

impl PendingPaymentView {
    pub fn from_payment(payment: &PendingPayment<'_>, today: NaiveDate, thresholds: &UrgencyThresholds) -> Self {
        let urgency = classify_urgency_with(payment.installment, today, thresholds);
        PendingPaymentView {
            sale_id: payment.sale_id(),
            installment_id: payment.installment.id.clone(),
            number: payment.installment.number,
            value: payment.value(),
            due_date: payment.due_day(),
            status: payment.installment.status,
            customer_name: payment.customer_name().map(str::to_string),
            customer_phone: payment.customer_phone().map(str::to_string),
            urgency,
            label: urgency.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDayView {
    pub date: NaiveDate,
    pub total_amount: Money,
    pub is_today: bool,
    pub is_current_month: bool,
    pub payments: Vec<PendingPaymentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCalendarView {
    pub year: i32,
    pub month: u32,
    pub total_amount: Money,
    pub month_total: Money,
    pub days: Vec<CalendarDayView>,
}

impl MonthCalendarView {
    pub fn from_calendar(calendar: &MonthCalendar<'_>, today: NaiveDate, thresholds: &UrgencyThresholds) -> Self {
        MonthCalendarView {
            year: calendar.month.year,
            month: calendar.month.month,
            total_amount: calendar.total_amount(),
            month_total: calendar.month_total(),
            days: calendar
                .days
                .iter()
                .map(|day| CalendarDayView {
                    date: day.date,
                    total_amount: day.total_amount,
                    is_today: day.is_today,
                    is_current_month: day.is_current_month,
                    payments: day
                        .payments
                        .iter()
                        .map(|p| PendingPaymentView::from_payment(p, today, thresholds))
                        .collect(),
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// compact sale listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleView {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub payment_method: String,
    pub item_count: usize,
    pub status: SaleStatus,
    pub total_value: Money,
    pub total_profit: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub installments_paid: usize,
    pub installment_count: usize,
}

impl SaleView {
    pub fn from_sale(sale: &Sale) -> Self {
        SaleView {
            id: sale.id,
            date: sale.date,
            customer_name: sale.customer_name().map(str::to_string),
            payment_method: sale.payment_method.label().to_string(),
            item_count: sale.items().len(),
            status: sale.status,
            total_value: sale.total_value,
            total_profit: sale.total_profit,
            paid_amount: sale.paid_amount(),
            outstanding_amount: sale.outstanding_amount(),
            installments_paid: sale.installments.iter().filter(|i| i.is_paid()).count(),
            installment_count: sale.installments.len(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
