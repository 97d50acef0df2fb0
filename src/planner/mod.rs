pub mod schedule;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::config::PlanConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::sale::Installment;
use crate::types::SaleStatus;

pub use schedule::{InstallmentPlan, RoundingDrift};

/// turns a deferred sale balance into a fixed monthly schedule
#[derive(Debug, Clone, Default)]
pub struct InstallmentPlanner {
    config: PlanConfig,
}

impl InstallmentPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// generate the full plan starting from the provider's current time
    pub fn plan(
        &self,
        total_value: Money,
        down_payment: Money,
        num_installments: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<InstallmentPlan> {
        self.plan_from(total_value, down_payment, num_installments, time_provider.now())
    }

    /// generate the full plan from an explicit start instant
    pub fn plan_from(
        &self,
        total_value: Money,
        down_payment: Money,
        num_installments: u32,
        start_date: DateTime<Utc>,
    ) -> Result<InstallmentPlan> {
        schedule::build_plan(total_value, down_payment, num_installments, start_date, &self.config)
    }
}

/// split `total_value - down_payment` into `num_installments` monthly
/// installments, each rounded to cents, due one month apart from now
pub fn generate_installments(
    total_value: Money,
    down_payment: Money,
    num_installments: u32,
    time_provider: &SafeTimeProvider,
) -> Result<Vec<Installment>> {
    InstallmentPlanner::new()
        .plan(total_value, down_payment, num_installments, time_provider)
        .map(|plan| plan.installments)
}

/// initial status of a deferred sale; never `Partial`
pub fn classify_initial_status(total_value: Money, down_payment: Money) -> SaleStatus {
    if down_payment >= total_value {
        SaleStatus::Paid
    } else {
        SaleStatus::Pending
    }
}
