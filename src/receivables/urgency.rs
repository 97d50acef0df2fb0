use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::UrgencyThresholds;
use crate::sale::Installment;
use crate::types::InstallmentStatus;

/// how pressing an installment is relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "bucket", rename_all = "camelCase")]
pub enum Urgency {
    /// already paid
    None,
    Overdue { days_overdue: u32 },
    DueToday,
    DueTomorrow,
    DueSoon { days_until: u32 },
    Upcoming { days_until: u32 },
}

impl Urgency {
    /// display ordering weight, higher is more urgent
    pub fn priority(&self) -> u8 {
        match self {
            Urgency::Overdue { .. } => 3,
            Urgency::DueToday | Urgency::DueTomorrow | Urgency::DueSoon { .. } => 2,
            Urgency::Upcoming { .. } => 1,
            Urgency::None => 0,
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, Urgency::Overdue { .. })
    }

    /// overdue or due within the due-soon window
    pub fn needs_reminder(&self) -> bool {
        self.priority() >= 2
    }

    /// text shown next to the payment in the host app
    pub fn label(&self) -> String {
        match self {
            Urgency::None => "Pago".to_string(),
            Urgency::Overdue { days_overdue } => format!("Vencido há {} dias", days_overdue),
            Urgency::DueToday => "Vence hoje".to_string(),
            Urgency::DueTomorrow => "Vence amanhã".to_string(),
            Urgency::DueSoon { days_until } | Urgency::Upcoming { days_until } => {
                format!("{} dias", days_until)
            }
        }
    }
}

/// whole calendar days from `today` to the installment's due day
pub fn days_until_due(installment: &Installment, today: NaiveDate) -> i64 {
    (installment.due_date.date_naive() - today).num_days()
}

/// classify with the default thresholds
pub fn classify_urgency(installment: &Installment, today: NaiveDate) -> Urgency {
    classify_urgency_with(installment, today, &UrgencyThresholds::default())
}

pub fn classify_urgency_with(
    installment: &Installment,
    today: NaiveDate,
    thresholds: &UrgencyThresholds,
) -> Urgency {
    if installment.status == InstallmentStatus::Paid {
        return Urgency::None;
    }

    let diff_days = days_until_due(installment, today);

    if installment.status == InstallmentStatus::Overdue || diff_days < 0 {
        Urgency::Overdue {
            days_overdue: (-diff_days).max(0) as u32,
        }
    } else if diff_days == 0 {
        Urgency::DueToday
    } else if diff_days == 1 {
        Urgency::DueTomorrow
    } else if diff_days <= thresholds.due_soon_days {
        Urgency::DueSoon {
            days_until: diff_days as u32,
        }
    } else {
        Urgency::Upcoming {
            days_until: diff_days as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn installment_due(days_from_today: i64, status: InstallmentStatus) -> Installment {
        // late evening due time: comparison must ignore time of day
        let today = Utc.with_ymd_and_hms(2024, 3, 10, 23, 45, 0).unwrap();
        Installment {
            id: "1-1".to_string(),
            number: 1,
            value: crate::decimal::Money::from_major(50),
            due_date: today + Duration::days(days_from_today),
            status,
            paid_date: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_urgency_boundaries() {
        let pending = InstallmentStatus::Pending;
        assert_eq!(classify_urgency(&installment_due(0, pending), today()), Urgency::DueToday);
        assert_eq!(classify_urgency(&installment_due(1, pending), today()), Urgency::DueTomorrow);
        assert_eq!(
            classify_urgency(&installment_due(2, pending), today()),
            Urgency::DueSoon { days_until: 2 }
        );
        assert_eq!(
            classify_urgency(&installment_due(3, pending), today()),
            Urgency::DueSoon { days_until: 3 }
        );
        assert_eq!(
            classify_urgency(&installment_due(4, pending), today()),
            Urgency::Upcoming { days_until: 4 }
        );
        assert_eq!(
            classify_urgency(&installment_due(-1, pending), today()),
            Urgency::Overdue { days_overdue: 1 }
        );
    }

    #[test]
    fn test_status_takes_priority() {
        assert_eq!(
            classify_urgency(&installment_due(-5, InstallmentStatus::Paid), today()),
            Urgency::None
        );
        // flagged overdue even though the due day has not arrived
        assert_eq!(
            classify_urgency(&installment_due(2, InstallmentStatus::Overdue), today()),
            Urgency::Overdue { days_overdue: 0 }
        );
        assert_eq!(
            classify_urgency(&installment_due(-7, InstallmentStatus::Overdue), today()),
            Urgency::Overdue { days_overdue: 7 }
        );
    }

    #[test]
    fn test_custom_due_soon_window() {
        let wide = UrgencyThresholds { due_soon_days: 7 };
        let installment = installment_due(6, InstallmentStatus::Pending);
        assert_eq!(
            classify_urgency_with(&installment, today(), &wide),
            Urgency::DueSoon { days_until: 6 }
        );
        assert_eq!(
            classify_urgency(&installment, today()),
            Urgency::Upcoming { days_until: 6 }
        );
    }

    #[test]
    fn test_labels_and_priority() {
        assert_eq!(Urgency::DueToday.label(), "Vence hoje");
        assert_eq!(Urgency::DueTomorrow.label(), "Vence amanhã");
        assert_eq!(Urgency::DueSoon { days_until: 3 }.label(), "3 dias");
        assert_eq!(Urgency::Upcoming { days_until: 12 }.label(), "12 dias");
        assert_eq!(Urgency::Overdue { days_overdue: 4 }.label(), "Vencido há 4 dias");

        assert!(Urgency::Overdue { days_overdue: 1 }.priority() > Urgency::DueToday.priority());
        assert_eq!(Urgency::DueToday.priority(), Urgency::DueSoon { days_until: 2 }.priority());
        assert!(Urgency::DueSoon { days_until: 2 }.priority() > Urgency::Upcoming { days_until: 9 }.priority());
        assert!(!Urgency::Upcoming { days_until: 9 }.needs_reminder());
        assert!(Urgency::DueTomorrow.needs_reminder());
    }

    #[test]
    fn test_serialized_bucket_names() {
        let json = serde_json::to_value(Urgency::Overdue { days_overdue: 2 }).unwrap();
        assert_eq!(json["bucket"], "overdue");
        assert_eq!(json["days_overdue"], 2);
        let json = serde_json::to_value(Urgency::DueTomorrow).unwrap();
        assert_eq!(json["bucket"], "dueTomorrow");
    }
}
