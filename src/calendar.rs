use crate::ledger::NutritionLedger;
use crate::models::{CalendarDay, DashboardView};
use crate::palette;
use chrono::{Duration, Local, NaiveDate};

const DAYS_BEFORE_TODAY: i64 = 7;
const DAYS_AFTER_TODAY: i64 = 6;

pub fn build_calendar(ledger: &NutritionLedger) -> Vec<CalendarDay> {
    build_calendar_at(Local::now().date_naive(), ledger)
}

/// Two weeks of progress around `today`: the previous seven days, today, and
/// the six days after.
pub fn build_calendar_at(today: NaiveDate, ledger: &NutritionLedger) -> Vec<CalendarDay> {
    let active = ledger.active_date();
    let mut days = Vec::with_capacity((DAYS_BEFORE_TODAY + DAYS_AFTER_TODAY + 1) as usize);

    for (position, offset) in (-DAYS_BEFORE_TODAY..=DAYS_AFTER_TODAY).enumerate() {
        let date = today + Duration::days(offset);
        let has_record = ledger.record(date).is_some();
        let percentage = ledger.progress(date);
        let is_today = date == today;

        days.push(CalendarDay {
            date,
            label: date.format("%b %-d").to_string(),
            badge: if is_today {
                "Today".to_string()
            } else {
                format!("Day {}", position + 1)
            },
            is_today,
            is_active: date == active,
            has_record,
            percentage,
            color: palette::color_for_percentage(percentage).to_string(),
        });
    }

    days
}

pub fn build_dashboard(ledger: &NutritionLedger) -> DashboardView {
    build_dashboard_at(Local::now().date_naive(), ledger)
}

pub fn build_dashboard_at(today: NaiveDate, ledger: &NutritionLedger) -> DashboardView {
    DashboardView {
        day: ledger.active_view(),
        catalog: ledger.catalog().to_vec(),
        calendar: build_calendar_at(today, ledger),
    }
}
