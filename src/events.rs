use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::sale::Installment;
use crate::types::{InstallmentId, PaymentMethod, SaleId, SaleStatus};

/// all events emitted by sale and receivables operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // sale events
    SaleRecorded {
        sale_id: SaleId,
        total_value: Money,
        payment_method: PaymentMethod,
        status: SaleStatus,
        timestamp: DateTime<Utc>,
    },
    ScheduleGenerated {
        sale_id: SaleId,
        down_payment: Money,
        installment_count: u32,
        per_installment: Money,
        first_due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },

    // installment events
    InstallmentPaid {
        sale_id: SaleId,
        installment: Installment,
        timestamp: DateTime<Utc>,
    },
    InstallmentOverdue {
        sale_id: SaleId,
        installment_id: InstallmentId,
        due_date: NaiveDate,
        value: Money,
        timestamp: DateTime<Utc>,
    },

    // status change events
    SaleStatusChanged {
        sale_id: SaleId,
        old_status: SaleStatus,
        new_status: SaleStatus,
        timestamp: DateTime<Utc>,
    },
}

/// append-only event log collected during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// append every event from another store, preserving order
    pub fn extend(&mut self, other: &mut EventStore) {
        self.events.append(&mut other.events);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// every installment payment recorded so far
    pub fn paid_installments(&self) -> impl Iterator<Item = (&SaleId, &Installment)> {
        self.events.iter().filter_map(|event| match event {
            Event::InstallmentPaid { sale_id, installment, .. } => Some((sale_id, installment)),
            _ => None,
        })
    }
}
