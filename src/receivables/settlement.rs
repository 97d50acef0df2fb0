use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{Result, SaleError};
use crate::events::{Event, EventStore};
use crate::sale::{Installment, Sale};
use crate::types::{InstallmentStatus, SaleStatus};

/// sale status derived from its installments: empty or all paid is `Paid`,
/// some paid is `Partial`, none paid is `Pending`
pub fn derive_sale_status(installments: &[Installment]) -> SaleStatus {
    let paid = installments.iter().filter(|i| i.is_paid()).count();
    if paid == installments.len() {
        SaleStatus::Paid
    } else if paid > 0 {
        SaleStatus::Partial
    } else {
        SaleStatus::Pending
    }
}

/// mark one installment paid and recompute the sale status in the same step.
///
/// The sale is left untouched when the installment id is unknown. Marking an
/// installment that is already paid is a deliberate no-op: `paid_at` is
/// ignored, the original paid date is kept and nothing is emitted. On a transition, `InstallmentPaid` carries a copy of the updated
/// installment and is followed by `SaleStatusChanged` when the status moved.
pub fn mark_installment_paid(
    sale: &mut Sale,
    installment_id: &str,
    paid_at: DateTime<Utc>,
    events: &mut EventStore,
) -> Result<Installment> {
    let index = sale
        .installments
        .iter()
        .position(|i| i.id == installment_id)
        .ok_or_else(|| SaleError::NotFound {
            installment_id: installment_id.to_string(),
        })?;

    if sale.installments[index].is_paid() {
        debug!(sale_id = %sale.id, installment_id, "installment already paid");
        return Ok(sale.installments[index].clone());
    }

    let old_status = sale.status;
    {
        let installment = &mut sale.installments[index];
        installment.status = InstallmentStatus::Paid;
        installment.paid_date = Some(paid_at);
    }
    sale.status = derive_sale_status(&sale.installments);

    let updated = sale.installments[index].clone();
    info!(
        sale_id = %sale.id,
        installment = updated.number,
        value = %updated.value,
        status = ?sale.status,
        "installment paid"
    );

    events.emit(Event::InstallmentPaid {
        sale_id: sale.id,
        installment: updated.clone(),
        timestamp: paid_at,
    });
    if old_status != sale.status {
        events.emit(Event::SaleStatusChanged {
            sale_id: sale.id,
            old_status,
            new_status: sale.status,
            timestamp: paid_at,
        });
    }

    Ok(updated)
}

/// flag pending installments whose due day is before `now`'s day as overdue.
/// paid installments and the derived sale status are never touched
pub fn refresh_overdue(sale: &mut Sale, now: DateTime<Utc>, events: &mut EventStore) -> usize {
    let today = now.date_naive();
    let mut flagged = 0;

    for installment in sale
        .installments
        .iter_mut()
        .filter(|i| i.status == InstallmentStatus::Pending && i.due_date.date_naive() < today)
    {
        installment.status = InstallmentStatus::Overdue;
        flagged += 1;
        events.emit(Event::InstallmentOverdue {
            sale_id: sale.id,
            installment_id: installment.id.clone(),
            due_date: installment.due_date.date_naive(),
            value: installment.value,
            timestamp: now,
        });
    }

    if flagged > 0 {
        info!(sale_id = %sale.id, flagged, "installments now overdue");
    }
    flagged
}
