use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PlanConfig;
use crate::decimal::Money;
use crate::errors::{Result, SaleError};
use crate::sale::Installment;
use crate::types::InstallmentStatus;

/// installment schedule materialized for a deferred sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total_value: Money,
    pub down_payment: Money,
    /// total minus down payment, unrounded
    pub remaining: Money,
    pub per_installment: Money,
    pub start_date: DateTime<Utc>,
    pub installments: Vec<Installment>,
}

/// difference between the rounded schedule and the exact remaining balance.
/// informational only: each installment is rounded on its own and the last one
/// is never adjusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingDrift {
    pub expected: Money,
    pub scheduled: Money,
    /// scheduled minus expected
    pub difference: Money,
    /// one cent per installment
    pub tolerance: Money,
}

impl RoundingDrift {
    pub fn is_within_tolerance(&self) -> bool {
        self.difference.abs() <= self.tolerance
    }
}

impl InstallmentPlan {
    pub fn count(&self) -> u32 {
        self.installments.len() as u32
    }

    /// sum of all scheduled installment values
    pub fn scheduled_total(&self) -> Money {
        self.installments.iter().map(|i| i.value).sum()
    }

    pub fn rounding_drift(&self) -> RoundingDrift {
        let scheduled = self.scheduled_total();
        RoundingDrift {
            expected: self.remaining,
            scheduled,
            difference: scheduled - self.remaining,
            tolerance: Money::CENT.times(self.count()),
        }
    }

    /// due date of the first installment
    pub fn first_due_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|i| i.due_date.date_naive())
    }
}

/// validate inputs and build the schedule
pub(crate) fn build_plan(
    total_value: Money,
    down_payment: Money,
    num_installments: u32,
    start_date: DateTime<Utc>,
    config: &PlanConfig,
) -> Result<InstallmentPlan> {
    validate_plan_input(total_value, down_payment, num_installments, config)?;

    let remaining = total_value - down_payment;
    let per_installment = (remaining / Decimal::from(num_installments)).round_dp(config.decimal_places);

    // the last due date bounds every earlier one
    let span = num_installments
        .checked_mul(config.interval_months)
        .ok_or_else(|| SaleError::InvalidDate {
            message: format!(
                "{} installments every {} months overflows the calendar",
                num_installments, config.interval_months
            ),
        })?;
    add_months(start_date, span)?;

    let installments = (1..=num_installments)
        .map(|number| -> Result<Installment> {
            Ok(Installment {
                id: installment_id(start_date, number),
                number,
                value: per_installment,
                due_date: add_months(start_date, number * config.interval_months)?,
                status: InstallmentStatus::Pending,
                paid_date: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let plan = InstallmentPlan {
        total_value,
        down_payment,
        remaining,
        per_installment,
        start_date,
        installments,
    };

    let drift = plan.rounding_drift();
    debug!(
        %total_value,
        %down_payment,
        installments = num_installments,
        %per_installment,
        drift = %drift.difference,
        "generated installment schedule"
    );

    Ok(plan)
}

fn validate_plan_input(
    total_value: Money,
    down_payment: Money,
    num_installments: u32,
    config: &PlanConfig,
) -> Result<()> {
    let rejection = if config.interval_months == 0 {
        Some("installment interval must be at least one month".to_string())
    } else if num_installments < 1 {
        Some("number of installments must be at least 1".to_string())
    } else if down_payment.is_negative() {
        Some(format!("down payment {} is negative", down_payment))
    } else if down_payment > total_value {
        Some(format!(
            "down payment {} exceeds total value {}",
            down_payment, total_value
        ))
    } else {
        match config.max_installments {
            Some(max) if num_installments > max => Some(format!(
                "{} installments requested, at most {} allowed",
                num_installments, max
            )),
            _ => None,
        }
    };

    match rejection {
        Some(message) => {
            warn!(%message, "rejecting installment plan");
            Err(SaleError::invalid_plan(message))
        }
        None => Ok(()),
    }
}

/// id unique within the sale: creation timestamp plus sequence number
fn installment_id(start_date: DateTime<Utc>, number: u32) -> String {
    format!("{}-{}", start_date.timestamp_millis(), number)
}

/// add whole calendar months, clamping to the last day of shorter months
pub(crate) fn add_months(date: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| SaleError::InvalidDate {
            message: format!("{} plus {} months is out of range", date, months),
        })
}
