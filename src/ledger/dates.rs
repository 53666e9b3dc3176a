use chrono::{Datelike, Duration, NaiveDate};

/// Returns the date `months` calendar months after `from`. When the target
/// month is shorter than the original day-of-month allows, the result clamps
/// to the last valid day of that month (e.g. Jan 31 + 1 month = Feb 29 in a
/// leap year, Feb 28 otherwise).
pub fn add_months(from: NaiveDate, months: u32) -> NaiveDate {
    let mut year = from.year();
    let mut month = from.month() as i32 + months as i32;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    let day = from.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(from)
}

/// True iff `due` is strictly before `today` at day granularity; a due date
/// of today is never overdue.
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}
