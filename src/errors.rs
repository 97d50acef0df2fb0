use thiserror::Error;

use crate::types::{InstallmentId, SaleId};

#[derive(Error, Debug)]
pub enum SaleError {
    #[error("invalid plan input: {message}")]
    InvalidPlanInput {
        message: String,
    },

    #[error("installment not found: {installment_id}")]
    NotFound {
        installment_id: InstallmentId,
    },

    #[error("sale not found: {sale_id}")]
    SaleNotFound {
        sale_id: SaleId,
    },

    #[error("invalid sale: {message}")]
    InvalidSale {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SaleError {
    pub(crate) fn invalid_plan(message: impl Into<String>) -> Self {
        SaleError::InvalidPlanInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_sale(message: impl Into<String>) -> Self {
        SaleError::InvalidSale {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SaleError>;
