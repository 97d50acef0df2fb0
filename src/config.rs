use serde::{Deserialize, Serialize};

use crate::errors::{Result, SaleError};

/// receivables configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReceivablesConfig {
    pub plan: PlanConfig,
    pub urgency: UrgencyThresholds,
    pub calendar: CalendarConfig,
}

/// installment schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// calendar months between consecutive due dates
    pub interval_months: u32,
    /// decimal places each installment value is rounded to
    pub decimal_places: u32,
    /// upper bound on the number of installments, if any
    pub max_installments: Option<u32>,
}

/// urgency bucket boundaries in whole days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyThresholds {
    /// last day offset still classified as due soon
    pub due_soon_days: i64,
}

/// first column of the calendar grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekStart {
    Sunday,
    Monday,
}

/// upper bound on grid height, a year of weeks
pub const MAX_CALENDAR_WEEKS: u32 = 53;

/// month calendar layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub weeks: u32,
    pub week_start: WeekStart,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            interval_months: 1,
            decimal_places: crate::decimal::CURRENCY_DP,
            max_installments: None,
        }
    }
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self { due_soon_days: 3 }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            weeks: 6,
            week_start: WeekStart::Sunday,
        }
    }
}

impl CalendarConfig {
    /// number of day cells in the grid
    pub fn cell_count(&self) -> usize {
        self.weeks as usize * 7
    }
}

impl ReceivablesConfig {
    /// store credit preset: monthly installments capped at twelve
    pub fn store_credit() -> Self {
        Self {
            plan: PlanConfig {
                max_installments: Some(12),
                ..PlanConfig::default()
            },
            ..Self::default()
        }
    }

    /// parse from json, missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plan.interval_months == 0 {
            return Err(SaleError::InvalidConfiguration {
                message: "installment interval must be at least one month".to_string(),
            });
        }
        if self.plan.max_installments == Some(0) {
            return Err(SaleError::InvalidConfiguration {
                message: "max installments must be at least 1".to_string(),
            });
        }
        if self.urgency.due_soon_days < 1 {
            return Err(SaleError::InvalidConfiguration {
                message: format!(
                    "due soon window must be at least 1 day, got {}",
                    self.urgency.due_soon_days
                ),
            });
        }
        if self.calendar.weeks == 0 || self.calendar.weeks > MAX_CALENDAR_WEEKS {
            return Err(SaleError::InvalidConfiguration {
                message: format!(
                    "calendar must show between 1 and {} weeks, got {}",
                    MAX_CALENDAR_WEEKS, self.calendar.weeks
                ),
            });
        }
        Ok(())
    }
}
