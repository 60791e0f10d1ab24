use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};

use crate::error::ValidationError;

/// Due-date input relative to the local calendar date.
pub fn parse_human_date(input: &str) -> Result<NaiveDate, ValidationError> {
    parse_human_date_from(input, Local::now().date_naive())
}

/// Accepts `today`, `tomorrow`, `eow`, `eom`, `+3d`/`+2w`/`+1m`, weekday
/// names (`fri`, `2:fri`) and `YYYY-MM-DD`.
pub fn parse_human_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        "eow" => {
            // Sunday closes the week.
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return Ok(today + Duration::days(days_to_sunday));
        }
        "eom" => {
            let first_of_month = today.with_day(1).ok_or_else(invalid)?;
            let next_month = first_of_month.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
            return Ok(next_month - Duration::days(1));
        }
        _ => {}
    }

    if let Some(relative) = input.strip_prefix('+') {
        return parse_relative(relative, today).ok_or_else(invalid);
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Some(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // 1:fri is the coming Friday, 2:fri the one after.
            return (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_needed))
                .and_then(Duration::try_days)
                .and_then(|delta| today.checked_add_signed(delta))
                .ok_or_else(invalid);
        }
    }

    Err(invalid())
}

fn parse_relative(offset: &str, today: NaiveDate) -> Option<NaiveDate> {
    let unit_at = offset.len().checked_sub(1)?;
    if !offset.is_char_boundary(unit_at) {
        return None;
    }
    let (num_str, unit) = offset.split_at(unit_at);
    let count: u32 = num_str.parse().ok()?;
    match unit {
        "d" => today.checked_add_signed(Duration::days(count as i64)),
        "w" => today.checked_add_signed(Duration::weeks(count as i64)),
        // chrono clamps to the last day of shorter months.
        "m" => today.checked_add_months(Months::new(count)),
        _ => None,
    }
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => {
            let count = count.parse::<i64>().ok()?;
            (count >= 1).then_some((count, day))
        }
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
