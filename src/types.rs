use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, SaleError};

/// unique identifier for a sale
pub type SaleId = Uuid;

/// installment identifier, unique within its sale
pub type InstallmentId = String;

/// settlement status of a sale, derived from its installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// fully settled
    Paid,
    /// deferred, nothing paid yet
    Pending,
    /// some installments paid
    Partial,
}

/// status of a single installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
}

impl InstallmentStatus {
    /// pending or overdue
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InstallmentStatus::Pending | InstallmentStatus::Overdue)
    }
}

/// how the customer paid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Cash,
    Pix,
    DebitCard,
    CreditCard,
    /// store credit split into monthly installments
    Installments,
    Other(String),
}

impl PaymentMethod {
    /// whether the balance is collected later through an installment schedule
    pub fn is_deferred(&self) -> bool {
        matches!(self, PaymentMethod::Installments)
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::DebitCard => "Cartão de Débito",
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::Installments => "Parcelado",
            PaymentMethod::Other(label) => label,
        }
    }
}

/// calendar month key used for grouping and calendar navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SaleError::InvalidDate {
                message: format!("month must be within 1..=12, got {}", month),
            });
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// first calendar day of the month
    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| SaleError::InvalidDate {
            message: format!("{}-{:02} is not representable", self.year, self.month),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }
}
