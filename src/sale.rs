use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::decimal::{Money, Quantity};
use crate::errors::{Result, SaleError};
use crate::planner::{classify_initial_status, InstallmentPlan, InstallmentPlanner};
use crate::types::{InstallmentId, InstallmentStatus, PaymentMethod, SaleId, SaleStatus};

/// one scheduled payment against a sale's remaining balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    /// 1-based position in the schedule
    pub number: u32,
    pub value: Money,
    pub due_date: DateTime<Utc>,
    pub status: InstallmentStatus,
    pub paid_date: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    pub fn is_outstanding(&self) -> bool {
        self.status.is_outstanding()
    }
}

/// product line on a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub unit_cost: Money,
}

impl LineItem {
    pub fn new(product_name: impl Into<String>, quantity: Quantity, unit_price: Money, unit_cost: Money) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price,
            unit_cost,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    pub fn line_cost(&self) -> Money {
        self.unit_cost.times(self.quantity)
    }

    pub fn line_profit(&self) -> Money {
        self.line_total() - self.line_cost()
    }
}

/// single-product or multi-product sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaleKind {
    Single(LineItem),
    Multi(Vec<LineItem>),
}

impl SaleKind {
    pub fn items(&self) -> &[LineItem] {
        match self {
            SaleKind::Single(item) => std::slice::from_ref(item),
            SaleKind::Multi(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// completed sale, optionally carrying an installment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub kind: SaleKind,
    pub customer: Option<Customer>,
    pub payment_method: PaymentMethod,
    pub down_payment: Money,
    pub total_value: Money,
    pub total_cost: Money,
    pub total_profit: Money,
    pub status: SaleStatus,
    pub installments: Vec<Installment>,
}

impl Sale {
    pub fn builder<'t>() -> SaleBuilder<'t> {
        SaleBuilder::new()
    }

    pub fn items(&self) -> &[LineItem] {
        self.kind.items()
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.kind, SaleKind::Multi(_))
    }

    pub fn has_installments(&self) -> bool {
        !self.installments.is_empty()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.name.as_str())
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.phone.as_deref())
    }

    pub fn find_installment(&self, installment_id: &str) -> Option<&Installment> {
        self.installments.iter().find(|i| i.id == installment_id)
    }

    /// amount collected so far: down payment plus paid installments, or the
    /// whole total for a sale settled without a schedule
    pub fn paid_amount(&self) -> Money {
        if !self.has_installments() {
            return match self.status {
                SaleStatus::Paid => self.total_value,
                _ => self.down_payment,
            };
        }
        let paid: Money = self
            .installments
            .iter()
            .filter(|i| i.is_paid())
            .map(|i| i.value)
            .sum();
        self.down_payment + paid
    }

    /// sum of pending and overdue installment values
    pub fn outstanding_amount(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| i.is_outstanding())
            .map(|i| i.value)
            .sum()
    }
}

/// builder for sales
pub struct SaleBuilder<'t> {
    items: Vec<LineItem>,
    customer: Option<Customer>,
    payment_method: Option<PaymentMethod>,
    down_payment: Option<Money>,
    installment_count: Option<u32>,
    date: Option<DateTime<Utc>>,
    planner: InstallmentPlanner,
    time_provider: Option<&'t SafeTimeProvider>,
}

impl<'t> SaleBuilder<'t> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            customer: None,
            payment_method: None,
            down_payment: None,
            installment_count: None,
            date: None,
            planner: InstallmentPlanner::new(),
            time_provider: None,
        }
    }

    pub fn set_time(mut self, time: &'t SafeTimeProvider) -> Self {
        self.time_provider = Some(time);
        self
    }

    pub fn item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = LineItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn down_payment(mut self, amount: Money) -> Self {
        self.down_payment = Some(amount);
        self
    }

    /// split the remaining balance into `count` monthly installments
    pub fn installments(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self.payment_method = Some(PaymentMethod::Installments);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn planner(mut self, planner: InstallmentPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// build with stored time or system time if not set
    pub fn build(self) -> Result<Sale> {
        match self.time_provider {
            Some(time) => self.build_with_time(time),
            None => self.build_now(),
        }
    }

    /// build with system time
    pub fn build_now(self) -> Result<Sale> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with explicit time provider
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<Sale> {
        let SaleBuilder {
            mut items,
            customer,
            payment_method,
            down_payment,
            installment_count,
            date,
            planner,
            ..
        } = self;

        if items.is_empty() {
            return Err(SaleError::invalid_sale("sale needs at least one line item"));
        }
        if let Some(bad) = items
            .iter()
            .find(|i| i.unit_price.is_negative() || i.unit_cost.is_negative())
        {
            warn!(product = %bad.product_name, "rejecting line item with negative price");
            return Err(SaleError::invalid_sale(format!(
                "negative price or cost on '{}'",
                bad.product_name
            )));
        }

        let total_value: Money = items.iter().map(LineItem::line_total).sum();
        let total_cost: Money = items.iter().map(LineItem::line_cost).sum();
        let payment_method = payment_method.unwrap_or(PaymentMethod::Cash);
        let date = date.unwrap_or_else(|| time_provider.now());

        let (status, down_payment, installments) = if payment_method.is_deferred() {
            let count = installment_count.ok_or_else(|| {
                SaleError::invalid_sale("installment payment requires a number of installments")
            })?;
            let down = down_payment.unwrap_or(Money::ZERO);
            if down > total_value {
                warn!(%total_value, %down, "rejecting down payment above sale total");
                return Err(SaleError::invalid_plan(format!(
                    "down payment {} exceeds total value {}",
                    down, total_value
                )));
            }
            let status = classify_initial_status(total_value, down);
            if status == SaleStatus::Paid {
                debug!(%total_value, %down, "down payment covers total, skipping schedule");
                (status, down, Vec::new())
            } else {
                let plan: InstallmentPlan = planner.plan(total_value, down, count, time_provider)?;
                (status, down, plan.installments)
            }
        } else {
            (SaleStatus::Paid, total_value, Vec::new())
        };

        let kind = if items.len() == 1 {
            SaleKind::Single(items.remove(0))
        } else {
            SaleKind::Multi(items)
        };

        Ok(Sale {
            id: Uuid::new_v4(),
            date,
            kind,
            customer,
            payment_method,
            down_payment,
            total_value,
            total_cost,
            total_profit: total_value - total_cost,
            status,
            installments,
        })
    }
}

impl Default for SaleBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
