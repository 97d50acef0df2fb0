use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::config::{CalendarConfig, WeekStart};
use crate::decimal::Money;
use crate::errors::{Result, SaleError};
use crate::receivables::outstanding::{group_by_day, PendingPayment};
use crate::types::YearMonth;

/// one cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub payments: Vec<PendingPayment<'a>>,
    pub total_amount: Money,
    pub is_today: bool,
    pub is_current_month: bool,
}

impl CalendarDay<'_> {
    pub fn has_payments(&self) -> bool {
        !self.payments.is_empty()
    }
}

/// full display window for a month, padded to whole weeks
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCalendar<'a> {
    pub month: YearMonth,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> MonthCalendar<'a> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// sum across every cell, including padding days from adjacent months
    pub fn total_amount(&self) -> Money {
        self.days.iter().map(|d| d.total_amount).sum()
    }

    /// sum across the days of the viewed month only
    pub fn month_total(&self) -> Money {
        self.days
            .iter()
            .filter(|d| d.is_current_month)
            .map(|d| d.total_amount)
            .sum()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a>]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a>> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// first grid date: the configured week start on or before the 1st
fn grid_start(first_of_month: NaiveDate, week_start: WeekStart) -> Result<NaiveDate> {
    let offset = match week_start {
        WeekStart::Sunday => first_of_month.weekday().num_days_from_sunday(),
        WeekStart::Monday => first_of_month.weekday().num_days_from_monday(),
    };
    first_of_month
        .checked_sub_days(Days::new(offset as u64))
        .ok_or_else(|| SaleError::InvalidDate {
            message: format!("calendar window before {} is out of range", first_of_month),
        })
}

pub(crate) fn build_calendar<'a>(
    outstanding: &[PendingPayment<'a>],
    month: YearMonth,
    today: NaiveDate,
    config: &CalendarConfig,
) -> Result<MonthCalendar<'a>> {
    let start = grid_start(month.first_day()?, config.week_start)?;
    let mut by_day = group_by_day(outstanding);

    let mut days = Vec::with_capacity(config.cell_count());
    for offset in 0..config.cell_count() {
        let date = start
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| SaleError::InvalidDate {
                message: format!("calendar window after {} is out of range", start),
            })?;
        let group = by_day.remove(&date).unwrap_or_default();
        days.push(CalendarDay {
            date,
            payments: group.payments,
            total_amount: group.total,
            is_today: date == today,
            is_current_month: month.contains(date),
        });
    }

    debug!(
        year = month.year,
        month = month.month,
        cells = days.len(),
        "built month calendar"
    );

    Ok(MonthCalendar { month, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receivables::outstanding::collect_outstanding;
    use crate::receivables::test_support::{sale_with_schedule, today};
    use chrono::Weekday;

    #[test]
    fn test_grid_shape() {
        let sales: Vec<crate::sale::Sale> = Vec::new();
        let outstanding = collect_outstanding(&sales);
        // march 2024 starts on a friday
        let calendar = build_calendar(
            &outstanding,
            YearMonth::new(2024, 3).unwrap(),
            today(),
            &CalendarConfig::default(),
        )
        .unwrap();

        assert_eq!(calendar.days.len(), 42);
        assert_eq!(calendar.first_date(), NaiveDate::from_ymd_opt(2024, 2, 25));
        assert_eq!(calendar.first_date().unwrap().weekday(), Weekday::Sun);
        assert_eq!(calendar.last_date(), NaiveDate::from_ymd_opt(2024, 4, 6));
        assert_eq!(calendar.weeks().count(), 6);
        assert_eq!(calendar.days.iter().filter(|d| d.is_current_month).count(), 31);
        assert_eq!(calendar.total_amount(), Money::ZERO);
    }

    #[test]
    fn test_month_starting_on_sunday() {
        // september 2024 starts on a sunday, so the grid starts on the 1st
        let calendar = build_calendar(
            &[],
            YearMonth::new(2024, 9).unwrap(),
            today(),
            &CalendarConfig::default(),
        )
        .unwrap();
        assert_eq!(calendar.first_date(), NaiveDate::from_ymd_opt(2024, 9, 1));
    }

    #[test]
    fn test_today_and_amounts() {
        let sales = vec![
            sale_with_schedule("Ana", 3, 0),
            sale_with_schedule("Bruno", 1, 0),
            sale_with_schedule("Carla", 1, -20),
        ];
        let outstanding = collect_outstanding(&sales);
        let calendar = build_calendar(
            &outstanding,
            YearMonth::of(today()),
            today(),
            &CalendarConfig::default(),
        )
        .unwrap();

        let cell = calendar.day(today()).unwrap();
        assert!(cell.is_today);
        assert!(cell.is_current_month);
        assert_eq!(cell.payments.len(), 2);
        assert_eq!(cell.total_amount, Money::from_major(200));
        assert_eq!(calendar.days.iter().filter(|d| d.is_today).count(), 1);

        // carla's installment falls on feb 19, before the grid starts
        let padded = calendar.day(NaiveDate::from_ymd_opt(2024, 2, 19).unwrap());
        assert!(padded.is_none());
        // ana's 2nd and 3rd installments fall in april/may, april 10 is past the window
        let window_total: Money = outstanding
            .iter()
            .filter(|p| {
                let day = p.due_day();
                day >= calendar.first_date().unwrap() && day <= calendar.last_date().unwrap()
            })
            .map(|p| p.value())
            .sum();
        assert_eq!(calendar.total_amount(), window_total);
        assert_eq!(calendar.month_total(), Money::from_major(200));
    }

    #[test]
    fn test_padding_days_carry_payments() {
        // due feb 28, shown in the leading padding of the march grid
        let sales = vec![sale_with_schedule("Ana", 1, -11)];
        let outstanding = collect_outstanding(&sales);
        let calendar = build_calendar(
            &outstanding,
            YearMonth::new(2024, 3).unwrap(),
            today(),
            &CalendarConfig::default(),
        )
        .unwrap();

        let cell = calendar.day(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()).unwrap();
        assert!(!cell.is_current_month);
        assert!(cell.has_payments());
        assert_eq!(calendar.total_amount(), Money::from_major(100));
        assert_eq!(calendar.month_total(), Money::ZERO);
    }

    #[test]
    fn test_monday_start() {
        let config = CalendarConfig {
            weeks: 6,
            week_start: WeekStart::Monday,
        };
        let calendar = build_calendar(&[], YearMonth::new(2024, 3).unwrap(), today(), &config).unwrap();
        assert_eq!(calendar.first_date(), NaiveDate::from_ymd_opt(2024, 2, 26));
    }
}
