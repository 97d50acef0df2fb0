pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod planner;
pub mod receivables;
pub mod sale;
pub mod serialization;
pub mod store;
pub mod types;

// re-export key types
pub use config::{CalendarConfig, PlanConfig, ReceivablesConfig, UrgencyThresholds, WeekStart};
pub use decimal::{Money, Quantity};
pub use errors::{Result, SaleError};
pub use events::{Event, EventStore};
pub use ledger::SalesLedger;
pub use planner::{
    classify_initial_status, generate_installments, InstallmentPlan, InstallmentPlanner,
    RoundingDrift,
};
pub use receivables::{
    build_month_calendar, classify_urgency, collect_outstanding, derive_sale_status,
    mark_installment_paid, refresh_overdue, CalendarDay, MonthCalendar, PendingPayment,
    ReceivablesAggregator, ReceivablesSummary, Urgency,
};
pub use sale::{Customer, Installment, LineItem, Sale, SaleBuilder, SaleKind};
pub use store::{MemorySaleRepository, SaleRepository};
pub use types::{
    InstallmentId, InstallmentStatus, PaymentMethod, SaleId, SaleStatus, YearMonth,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
